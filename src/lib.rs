//! bucketed-map: a fixed-size hash map with separate chaining and
//! collision diagnostics.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a hash table whose bucket count is chosen once and never
//!   changes, with every bucket an ordered chain of key/value pairs.
//! - Layers:
//!   - `index::normalize`: raw `u64` hash → bucket index in `[0, SZ)`,
//!     reading the hash as signed and negating negative remainders.
//!   - `Pair<K, V>`: stored association; equality and hashing are the key's.
//!   - `BucketedMap<K, V, S>`: `SZ` optional chains of arena keys over a
//!     `SlotMap` of pairs. All map operations live here.
//!   - `CollisionReport`: pure snapshot of over-full buckets.
//!
//! Constraints
//! - Fixed capacity: no resizing, no rehashing. Lookups degrade linearly as
//!   chains grow; pick a bucket count well above the expected load.
//! - Buckets materialize on first insertion and are never freed, even when
//!   emptied by `remove` or `clear`.
//! - At most one pair per key, and it lives in `bucket[index(key)]`.
//! - `put` on an existing key replaces the pair in place and returns the old
//!   value; `len` is unchanged.
//! - Absence is never an error: lookups return `None`/`false`, and `remove`
//!   on a never-materialized bucket returns `None`.
//!
//! Threading
//! - Single-threaded and synchronous. The map is `Send` but not `Sync`;
//!   callers that share it across threads supply their own lock.
//! - A debug-only reentrancy guard fires if user `Hash`/`Eq`/`PartialEq`
//!   code re-enters the same map mid-scan. Displaced keys and values are
//!   dropped after the guard is released.
//!
//! Hashes
//! - Each pair stores the hash computed at insertion. Collision reports
//!   read the stored hash and never call back into `K: Hash`.
//!
//! Ordering
//! - `iter`, `keys`, `values`, `into_iter` and `Display` walk buckets in
//!   index order and each chain in insertion order. `iter_mut` follows arena
//!   order. `entries` is a set and carries no order.

mod bucketed_map;
mod bucketed_map_proptest;
mod collisions;
mod error;
pub mod index;
mod pair;
mod reentrancy;

// Public surface
pub use bucketed_map::{BucketedMap, IntoIter, Iter, IterMut, Keys, DEFAULT_BUCKETS};
pub use collisions::{CollisionGroup, CollisionReport};
pub use error::ConfigError;
pub use pair::Pair;
pub use reentrancy::{DebugReentrancy, ReentrancyGuard};
