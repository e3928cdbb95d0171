#![cfg(test)]

// Property tests for BucketedMap kept inside the crate so they can inspect
// bucket state directly.

use crate::bucketed_map::BucketedMap;
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations so shrinking moves toward earlier keys and
// shorter op lists.
#[derive(Clone, Debug)]
enum OpI {
    Put(usize, i32),
    Remove(usize),
    Get(usize),
    ContainsKey(String),
    ContainsValue(i32),
    PutAll(Vec<(usize, i32)>),
    Clear,
    Iterate,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (usize, Vec<String>, Vec<OpI>)> {
    (1usize..=7, proptest::collection::vec("[a-z]{0,5}", 1..=10)).prop_flat_map(
        |(buckets, pool)| {
            let idxs: Vec<usize> = (0..pool.len()).collect();
            let idx = proptest::sample::select(idxs);
            let contains_pool = proptest::sample::select(pool.clone());
            let op = prop_oneof![
                4 => (idx.clone(), -3i32..3).prop_map(|(i, v)| OpI::Put(i, v)),
                2 => idx.clone().prop_map(OpI::Remove),
                2 => idx.clone().prop_map(OpI::Get),
                1 => prop_oneof![
                    contains_pool.prop_map(|s: String| s),
                    "[a-z]{0,5}".prop_map(|s| s)
                ]
                .prop_map(OpI::ContainsKey),
                1 => (-3i32..3).prop_map(OpI::ContainsValue),
                1 => proptest::collection::vec((idx.clone(), -3i32..3), 0..4).prop_map(OpI::PutAll),
                1 => Just(OpI::Clear),
                1 => Just(OpI::Iterate),
            ];
            proptest::collection::vec(op, 1..60).prop_map(move |ops| (buckets, pool.clone(), ops))
        },
    )
}

// Pairs in collided buckets, computed from the model's keys alone.
fn expected_collisions(sut: &BucketedMap<Key, i32>, model: &HashMap<Key, i32>) -> usize {
    let mut per_bucket: BTreeMap<usize, usize> = BTreeMap::new();
    for k in model.keys() {
        *per_bucket.entry(sut.bucket_of(k)).or_default() += 1;
    }
    per_bucket.values().filter(|&&n| n > 1).sum()
}

// Property: State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences, with small bucket
// counts so chains are long:
// - `put` returns the previous value exactly when the model has the key.
// - `get`/`contains_key` agree with the model; borrowed `&str` lookup works.
// - `remove` returns the model's value, and `None` for unseen buckets.
// - `put_all` follows per-pair `put` semantics.
// - `len`/`is_empty` parity; `len` equals the sum of bucket lengths.
// - `iter` yields each pair once; `values` matches `iter` order.
// - `report_collisions` equals the per-pair count derived from `bucket_of`.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((buckets, pool, ops) in arb_scenario()) {
        let mut sut: BucketedMap<Key, i32> = BucketedMap::with_buckets(buckets).unwrap();
        let mut model: HashMap<Key, i32> = HashMap::new();

        for op in ops {
            match op {
                OpI::Put(i, v) => {
                    let k = key_from(&pool, i);
                    let before = sut.len();
                    let prev = sut.put(k.clone(), v);
                    let mprev = model.insert(k, v);
                    prop_assert_eq!(prev, mprev);
                    let grew = usize::from(mprev.is_none());
                    prop_assert_eq!(sut.len(), before + grew);
                }
                OpI::Remove(i) => {
                    let k = key_from(&pool, i);
                    let before = sut.len();
                    let got = sut.remove(&k);
                    let expected = model.remove(&k);
                    prop_assert_eq!(got, expected);
                    let shrank = usize::from(expected.is_some());
                    prop_assert_eq!(sut.len(), before - shrank);
                    prop_assert!(sut.get(&k).is_none());
                }
                OpI::Get(i) => {
                    let k = key_from(&pool, i);
                    prop_assert_eq!(sut.get(&k), model.get(&k));
                    prop_assert_eq!(sut.get(k.0.as_str()), model.get(&k));
                }
                OpI::ContainsKey(s) => {
                    prop_assert_eq!(sut.contains_key(s.as_str()), model.contains_key(&Key(s)));
                }
                OpI::ContainsValue(v) => {
                    prop_assert_eq!(sut.contains_value(&v), model.values().any(|&mv| mv == v));
                }
                OpI::PutAll(items) => {
                    let mut other: BucketedMap<Key, i32> = BucketedMap::new();
                    for (i, v) in items {
                        let k = key_from(&pool, i);
                        other.put(k, v);
                    }
                    for (k, v) in other.iter() {
                        model.insert(k.clone(), *v);
                    }
                    sut.put_all(&other);
                }
                OpI::Clear => {
                    sut.clear();
                    model.clear();
                    prop_assert_eq!(sut.len(), 0);
                }
                OpI::Iterate => {
                    let seen: Vec<(Key, i32)> = sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                    let keys: BTreeSet<Key> = seen.iter().map(|(k, _)| k.clone()).collect();
                    prop_assert_eq!(keys.len(), seen.len(), "each pair yielded once");
                    let expected: BTreeSet<Key> = model.keys().cloned().collect();
                    prop_assert_eq!(keys, expected);
                    let vals: Vec<i32> = sut.values().into_iter().copied().collect();
                    let iter_vals: Vec<i32> = seen.iter().map(|(_, v)| *v).collect();
                    prop_assert_eq!(vals, iter_vals);
                }
            }

            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), sut.len() == 0);
            let bucket_sum: usize = (0..sut.bucket_count()).map(|i| sut.bucket_len(i)).sum();
            prop_assert_eq!(bucket_sum, sut.len());
            prop_assert_eq!(sut.report_collisions(), expected_collisions(&sut, &model));
        }
    }
}

// Property: every pair sits in the bucket its key hashes to, and no bucket
// holds two pairs with equal keys.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_pairs_live_in_their_bucket(
        buckets in 1usize..=11,
        items in proptest::collection::vec(("[a-c]{1,3}", any::<i16>()), 0..40),
    ) {
        let mut m: BucketedMap<String, i16> = BucketedMap::with_buckets(buckets).unwrap();
        for (k, v) in items {
            m.put(k, v);
        }
        for (idx, bucket) in m.buckets.iter().enumerate() {
            let Some(chain) = bucket else { continue };
            let mut keys = BTreeSet::new();
            for &sk in chain {
                let slot = m.slots.get(sk).expect("chain points at live slot");
                prop_assert_eq!(m.bucket_of(&slot.pair.key), idx);
                prop_assert!(keys.insert(slot.pair.key.clone()), "duplicate key in bucket");
            }
        }
    }
}
