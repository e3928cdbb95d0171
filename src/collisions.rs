//! Collision diagnostics computed from bucket state.
//!
//! A bucket holding more than one pair is a collision; every pair in it is
//! counted, so two keys sharing an index contribute 2, not 1.

use core::fmt;
use hashbrown::HashMap;

/// One over-full bucket: its index and the stored hashes of its pairs, in
/// bucket order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CollisionGroup {
    pub index: usize,
    pub hashes: Vec<u64>,
}

impl CollisionGroup {
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}

/// Snapshot of every collided bucket, ordered by bucket index.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CollisionReport {
    groups: Vec<CollisionGroup>,
}

impl CollisionReport {
    /// Build a report from `(index, hashes)` for each bucket; buckets with
    /// fewer than two pairs are ignored.
    pub(crate) fn from_buckets<I>(buckets: I) -> Self
    where
        I: IntoIterator<Item = (usize, Vec<u64>)>,
    {
        let groups = buckets
            .into_iter()
            .filter(|(_, hashes)| hashes.len() > 1)
            .map(|(index, hashes)| CollisionGroup { index, hashes })
            .collect();
        Self { groups }
    }

    /// Total number of pairs living in collided buckets.
    pub fn pairs(&self) -> usize {
        self.groups.iter().map(CollisionGroup::len).sum()
    }

    /// True when no bucket holds more than one pair.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn groups(&self) -> &[CollisionGroup] {
        &self.groups
    }

    /// Hash → bucket index for every collided pair. Distinct keys with equal
    /// hashes collapse into one entry.
    pub fn hash_indices(&self) -> HashMap<u64, usize> {
        self.groups
            .iter()
            .flat_map(|g| g.hashes.iter().map(move |&h| (h, g.index)))
            .collect()
    }
}

impl fmt::Display for CollisionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "collided hashes and indices: {{")?;
        let mut first = true;
        for g in &self.groups {
            for h in &g.hashes {
                if !first {
                    write!(f, ", ")?;
                }
                first = false;
                write!(f, "{:#018x}={}", h, g.index)?;
            }
        }
        write!(f, "}}; collided pairs: {}", self.pairs())
    }
}
