//! BucketedMap: fixed bucket array, separate chaining, arena-backed pairs.

use crate::collisions::CollisionReport;
use crate::error::ConfigError;
use crate::index::normalize;
use crate::pair::Pair;
use crate::reentrancy::DebugReentrancy;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use slotmap::{DefaultKey, SlotMap};
use std::collections::hash_map::RandomState;

/// Bucket count used by [`BucketedMap::new`] and [`BucketedMap::with_hasher`].
/// Prime, so keys spread evenly under the modulo.
pub const DEFAULT_BUCKETS: usize = 997;

#[derive(Clone, Debug)]
pub(crate) struct Slot<K, V> {
    pub(crate) pair: Pair<K, V>,
    pub(crate) hash: u64,
}

/// An ordered chain of arena keys; `None` until the first insertion.
type Bucket = Option<Vec<DefaultKey>>;

/// A hash map with a fixed number of buckets that never grows or rehashes.
///
/// Each key lives in bucket `normalize(hash(key), bucket_count)`; a bucket is
/// an insertion-ordered chain scanned linearly by key equality. Pairs are
/// stored in a `SlotMap` arena and buckets hold arena keys.
///
/// The map is `Send` but not `Sync`. Sharing it between threads requires
/// external synchronization such as a `Mutex`.
#[derive(Clone)]
pub struct BucketedMap<K, V, S = RandomState> {
    hasher: S,
    pub(crate) buckets: Box<[Bucket]>,
    pub(crate) slots: SlotMap<DefaultKey, Slot<K, V>>,
    reentrancy: DebugReentrancy,
}

impl<K, V> BucketedMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    pub fn with_buckets(buckets: usize) -> Result<Self, ConfigError> {
        Self::with_buckets_and_hasher(buckets, RandomState::new())
    }
}

impl<K, V> Default for BucketedMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> BucketedMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::build(DEFAULT_BUCKETS, hasher)
    }

    pub fn with_buckets_and_hasher(buckets: usize, hasher: S) -> Result<Self, ConfigError> {
        if buckets == 0 {
            return Err(ConfigError::ZeroBuckets);
        }
        Ok(Self::build(buckets, hasher))
    }

    fn build(buckets: usize, hasher: S) -> Self {
        Self {
            hasher,
            buckets: (0..buckets).map(|_| None).collect(),
            slots: SlotMap::with_key(),
            reentrancy: DebugReentrancy::new(),
        }
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    fn index_of_hash(&self, hash: u64) -> usize {
        normalize(hash, self.buckets.len())
    }

    /// Arena key of the pair whose key equals `q`, scanning only its bucket.
    fn find_slot<Q>(&self, q: &Q) -> Option<DefaultKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let idx = self.index_of_hash(self.make_hash(q));
        let bucket = self.buckets[idx].as_ref()?;
        bucket.iter().copied().find(|&sk| {
            self.slots
                .get(sk)
                .map(|s| s.pair.key.borrow() == q)
                .unwrap_or(false)
        })
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Bucket index `q` hashes to, whether or not it is present.
    pub fn bucket_of<Q>(&self, q: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash,
    {
        let _g = self.reentrancy.enter();
        self.index_of_hash(self.make_hash(q))
    }

    /// Number of pairs in bucket `index`; 0 for absent or out-of-range buckets.
    pub fn bucket_len(&self, index: usize) -> usize {
        self.buckets
            .get(index)
            .and_then(Option::as_ref)
            .map(Vec::len)
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Insert or replace. An existing pair with an equal key is replaced in
    /// place (same bucket position) and its value returned; otherwise the
    /// pair is appended to the end of its bucket.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        // Displaced key/value are dropped after the guard is released.
        self.put_pair(key, value).map(|old| old.into_parts().1)
    }

    fn put_pair(&mut self, key: K, value: V) -> Option<Pair<K, V>> {
        let _g = self.reentrancy.enter();
        let hash = self.make_hash(&key);
        let idx = self.index_of_hash(hash);
        let bucket = self.buckets[idx].get_or_insert_with(Vec::new);
        for &sk in bucket.iter() {
            if let Some(slot) = self.slots.get_mut(sk) {
                if slot.pair.key == key {
                    slot.hash = hash;
                    return Some(core::mem::replace(&mut slot.pair, Pair::new(key, value)));
                }
            }
        }
        let sk = self.slots.insert(Slot {
            pair: Pair::new(key, value),
            hash,
        });
        bucket.push(sk);
        None
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter();
        let sk = self.find_slot(q)?;
        self.slots.get(sk).map(|s| &s.pair.value)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter();
        let sk = self.find_slot(q)?;
        self.slots.get_mut(sk).map(|s| &mut s.pair.value)
    }

    /// Remove the pair for `q` and return its value. A bucket that was never
    /// materialized simply yields `None`.
    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_slot(q).map(|s| s.pair.into_parts().1)
    }

    fn remove_slot<Q>(&mut self, q: &Q) -> Option<Slot<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter();
        let idx = self.index_of_hash(self.make_hash(q));
        let bucket = self.buckets[idx].as_mut()?;
        let slots = &self.slots;
        let pos = bucket.iter().position(|&sk| {
            slots
                .get(sk)
                .map(|s| s.pair.key.borrow() == q)
                .unwrap_or(false)
        })?;
        // Vec::remove keeps the remaining chain in order.
        let sk = bucket.remove(pos);
        self.slots.remove(sk)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter();
        self.find_slot(q).is_some()
    }

    /// Scan every bucket for a value equal to `value`, stopping at the first hit.
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        let _g = self.reentrancy.enter();
        self.iter().any(|(_, v)| v == value)
    }

    /// Drop every pair. Materialized buckets stay allocated, empty.
    pub fn clear(&mut self) {
        let drained = {
            let _g = self.reentrancy.enter();
            for bucket in self.buckets.iter_mut().flatten() {
                bucket.clear();
            }
            core::mem::take(&mut self.slots)
        };
        drop(drained);
    }

    /// Copy every pair of `other` into `self` through [`put`](Self::put), so
    /// shared keys take `other`'s value.
    pub fn put_all<S2>(&mut self, other: &BucketedMap<K, V, S2>)
    where
        K: Clone,
        V: Clone,
    {
        for (k, v) in other.iter() {
            self.put(k.clone(), v.clone());
        }
    }

    /// Values in bucket order, then chain order within each bucket.
    pub fn values(&self) -> Vec<&V> {
        self.iter().map(|(_, v)| v).collect()
    }

    /// Every pair, collected into a set keyed by pair (key) equality.
    pub fn entries(&self) -> hashbrown::HashSet<&Pair<K, V>> {
        let _g = self.reentrancy.enter();
        self.iter_pairs().collect()
    }

    /// Number of pairs sitting in buckets that hold more than one pair.
    pub fn report_collisions(&self) -> usize {
        self.collision_report().pairs()
    }

    /// Colliding buckets with the stored hashes of their pairs.
    pub fn collision_report(&self) -> CollisionReport {
        let slots = &self.slots;
        CollisionReport::from_buckets(self.buckets.iter().enumerate().filter_map(
            |(index, bucket)| {
                let bucket = bucket.as_ref().filter(|b| b.len() > 1)?;
                let hashes = bucket
                    .iter()
                    .filter_map(|&sk| slots.get(sk).map(|s| s.hash))
                    .collect();
                Some((index, hashes))
            },
        ))
    }
}

impl<K, V, S> BucketedMap<K, V, S> {
    /// Pairs in bucket order, then chain order within each bucket.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            pairs: self.iter_pairs(),
        }
    }

    fn iter_pairs(&self) -> Pairs<'_, K, V> {
        let empty: &[DefaultKey] = &[];
        Pairs {
            slots: &self.slots,
            buckets: self.buckets.iter(),
            chain: empty.iter(),
            remaining: self.slots.len(),
        }
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { it: self.iter() }
    }

    /// Mutable access to every value. Order is the arena's, not bucket order.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            it: self.slots.iter_mut(),
        }
    }
}

struct Pairs<'a, K, V> {
    slots: &'a SlotMap<DefaultKey, Slot<K, V>>,
    buckets: core::slice::Iter<'a, Bucket>,
    chain: core::slice::Iter<'a, DefaultKey>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Pairs<'a, K, V> {
    type Item = &'a Pair<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(&sk) = self.chain.next() {
                if let Some(slot) = self.slots.get(sk) {
                    self.remaining -= 1;
                    return Some(&slot.pair);
                }
                continue;
            }
            let bucket = self.buckets.next()?;
            self.chain = bucket.as_deref().unwrap_or(&[]).iter();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

/// Iterator over `(&K, &V)` in bucket order.
pub struct Iter<'a, K, V> {
    pairs: Pairs<'a, K, V>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.pairs.next().map(|p| (&p.key, &p.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.pairs.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

pub struct Keys<'a, K, V> {
    it: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

/// Iterator over `(&K, &mut V)` in arena order.
pub struct IterMut<'a, K, V> {
    it: slotmap::basic::IterMut<'a, DefaultKey, Slot<K, V>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, s)| (&s.pair.key, &mut s.pair.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

/// Owning iterator in bucket order.
pub struct IntoIter<K, V> {
    slots: SlotMap<DefaultKey, Slot<K, V>>,
    order: std::vec::IntoIter<DefaultKey>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let sk = self.order.next()?;
            if let Some(slot) = self.slots.remove(sk) {
                return Some(slot.pair.into_parts());
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.slots.len(), Some(self.slots.len()))
    }
}

impl<K, V, S> IntoIterator for BucketedMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let order: Vec<DefaultKey> = self.buckets.iter().flatten().flatten().copied().collect();
        IntoIter {
            slots: self.slots,
            order: order.into_iter(),
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a BucketedMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S> Extend<(K, V)> for BucketedMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for BucketedMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut m = Self::with_hasher(S::default());
        m.extend(iter);
        m
    }
}

/// Equal when both hold the same keys mapped to equal values, regardless of
/// hasher or bucket count.
impl<K, V, S1, S2> PartialEq<BucketedMap<K, V, S2>> for BucketedMap<K, V, S1>
where
    K: Eq + Hash,
    V: PartialEq,
    S1: BuildHasher,
    S2: BuildHasher,
{
    fn eq(&self, other: &BucketedMap<K, V, S2>) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).map(|ov| v == ov).unwrap_or(false))
    }
}

impl<K, V, S> Eq for BucketedMap<K, V, S>
where
    K: Eq + Hash,
    V: Eq,
    S: BuildHasher,
{
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for BucketedMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// `{k1=v1, k2=v2}` in bucket order.
impl<K: fmt::Display, V: fmt::Display, S> fmt::Display for BucketedMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, p) in self.iter_pairs().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", p)?;
        }
        write!(f, "}}")
    }
}
