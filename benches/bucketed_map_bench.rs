use bucketed_map::BucketedMap;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

// Loads stay modest: the table never grows, so chains lengthen linearly.
const LOAD: usize = 5_000;

fn filled(seed: u64) -> (BucketedMap<String, u64>, Vec<String>) {
    let mut m = BucketedMap::new();
    let keys: Vec<String> = lcg(seed).take(LOAD).map(key).collect();
    for (i, k) in keys.iter().enumerate() {
        m.put(k.clone(), i as u64);
    }
    (m, keys)
}

fn bench_put_fresh(c: &mut Criterion) {
    c.bench_function("bucketed::put_fresh_5k", |b| {
        b.iter_batched(
            BucketedMap::<String, u64>::new,
            |mut m| {
                for (i, x) in lcg(1).take(LOAD).enumerate() {
                    m.put(key(x), i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_put_replace(c: &mut Criterion) {
    c.bench_function("bucketed::put_replace_5k", |b| {
        b.iter_batched(
            || filled(2),
            |(mut m, keys)| {
                for (i, k) in keys.into_iter().enumerate() {
                    black_box(m.put(k, i as u64 + 1));
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_hit(c: &mut Criterion) {
    c.bench_function("bucketed::get_hit_5k", |b| {
        let (m, keys) = filled(7);
        b.iter(|| {
            for k in &keys {
                black_box(m.get(k));
            }
        })
    });
}

fn bench_get_miss(c: &mut Criterion) {
    c.bench_function("bucketed::get_miss_5k", |b| {
        let (m, _) = filled(11);
        let misses: Vec<String> = lcg(0xdead_beef).take(LOAD).map(key).collect();
        b.iter(|| {
            for k in &misses {
                black_box(m.get(k));
            }
        })
    });
}

fn bench_remove_all(c: &mut Criterion) {
    c.bench_function("bucketed::remove_all_5k", |b| {
        b.iter_batched(
            || filled(5),
            |(mut m, keys)| {
                for k in &keys {
                    black_box(m.remove(k));
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_report_collisions(c: &mut Criterion) {
    c.bench_function("bucketed::report_collisions_5k", |b| {
        let (m, _) = filled(13);
        b.iter(|| black_box(m.report_collisions()))
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(20)
        .measurement_time(Duration::from_secs(3))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches_write;
    config = bench_config();
    targets = bench_put_fresh, bench_put_replace, bench_remove_all
}
criterion_group! {
    name = benches_read;
    config = bench_config();
    targets = bench_get_hit,
              bench_get_miss,
              bench_report_collisions
}
criterion_main!(benches_write, benches_read);
