//! Pair: the key/value association stored in a bucket.

use core::fmt;
use core::hash::{Hash, Hasher};

/// A key/value pair whose identity is its key.
///
/// `Eq` and `Hash` look only at the key, so a set of pairs can never hold two
/// entries for the same key. The value is carried along for retrieval.
#[derive(Clone)]
pub struct Pair<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
}

impl<K, V> Pair<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K: PartialEq, V> PartialEq for Pair<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<K: Eq, V> Eq for Pair<K, V> {}

impl<K: Hash, V> Hash for Pair<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Pair<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}={:?}", self.key, self.value)
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for Pair<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

impl<K, V> From<(K, V)> for Pair<K, V> {
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}
