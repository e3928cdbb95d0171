// BucketedMap property tests (consolidated).
//
// Property 1: put/get/remove laws for arbitrary keys and values.
//  - put-then-get returns the stored value.
//  - A second put returns the first value and leaves len unchanged.
//  - remove returns the value once and shrinks len by exactly one.
//
// Property 2: collision accounting against a brute-force count.
//  - Model: per-index counts of distinct keys, computed with `bucket_of`.
//  - Invariant: report_collisions() == sum of counts above one.
//
// Property 3: put_all equals sequential puts.
use bucketed_map::BucketedMap;
use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap};

// Property 1: per-key laws.
proptest! {
    #[test]
    fn prop_put_get_replace_remove(k in any::<i64>(), v1 in any::<u32>(), v2 in any::<u32>(), noise in proptest::collection::vec(any::<i64>(), 0..30)) {
        let mut m: BucketedMap<i64, u32> = BucketedMap::with_buckets(31).unwrap();
        for n in noise.iter().filter(|&&n| n != k) {
            m.put(*n, 0);
        }
        let base = m.len();

        prop_assert_eq!(m.get(&k), None);
        prop_assert_eq!(m.put(k, v1), None);
        prop_assert_eq!(m.get(&k), Some(&v1));
        prop_assert_eq!(m.len(), base + 1);

        prop_assert_eq!(m.put(k, v2), Some(v1));
        prop_assert_eq!(m.get(&k), Some(&v2));
        prop_assert_eq!(m.len(), base + 1);

        prop_assert_eq!(m.remove(&k), Some(v2));
        prop_assert_eq!(m.get(&k), None);
        prop_assert_eq!(m.len(), base);
        prop_assert_eq!(m.remove(&k), None);
        prop_assert_eq!(m.is_empty(), m.len() == 0);
    }
}

// Property 2: collisions counted per pair.
proptest! {
    #[test]
    fn prop_collision_count_matches_brute_force(
        buckets in 1usize..=13,
        keys in proptest::collection::vec("[a-z]{1,4}", 0..40),
    ) {
        let mut m: BucketedMap<String, ()> = BucketedMap::with_buckets(buckets).unwrap();
        for k in &keys {
            m.put(k.clone(), ());
        }
        let mut per_index: BTreeMap<usize, usize> = BTreeMap::new();
        for k in m.keys() {
            *per_index.entry(m.bucket_of(k)).or_default() += 1;
        }
        let expected: usize = per_index.values().filter(|&&n| n > 1).sum();
        prop_assert_eq!(m.report_collisions(), expected);
        prop_assert_eq!(m.collision_report().pairs(), expected);
        for g in m.collision_report().groups() {
            prop_assert!(g.len() > 1);
            prop_assert_eq!(m.bucket_len(g.index), g.len());
        }
    }
}

// Property 3: put_all is a sequence of puts.
proptest! {
    #[test]
    fn prop_put_all_matches_model(
        a in proptest::collection::vec(("[a-d]", any::<i8>()), 0..12),
        b in proptest::collection::vec(("[a-d]", any::<i8>()), 0..12),
    ) {
        let mut ma: BucketedMap<String, i8> = a.iter().cloned().collect();
        let mb: BucketedMap<String, i8> = b.iter().cloned().collect();
        let mut model: HashMap<String, i8> = a.into_iter().collect();
        model.extend(b);

        ma.put_all(&mb);
        prop_assert_eq!(ma.len(), model.len());
        for (k, v) in &model {
            prop_assert_eq!(ma.get(k), Some(v));
        }
    }
}
