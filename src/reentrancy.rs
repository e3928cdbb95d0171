//! Debug-only reentrancy guard.
//!
//! `BucketedMap` calls into user code (`K: Hash`, `K: Eq`, `V: PartialEq`)
//! while scanning buckets. A key whose `Eq` reaches back into the same map
//! would observe a half-updated bucket, so every public entry point takes a
//! guard. In debug builds a nested entry panics; in release builds the guard
//! is a zero-sized no-op.
//!
//! The depth counter is a `Cell`, which keeps the owning map `!Sync` while
//! leaving it `Send`.

use core::cell::Cell;
use core::marker::PhantomData;

/// Per-map entry tracker. Guard a method with `let _g = self.reentrancy.enter();`.
#[derive(Debug)]
pub struct DebugReentrancy {
    #[cfg(debug_assertions)]
    depth: Cell<u32>,
    // Present in every build so the map is `!Sync` in release too.
    _unsync: PhantomData<Cell<()>>,
}

impl DebugReentrancy {
    pub const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            depth: Cell::new(0),
            _unsync: PhantomData,
        }
    }

    /// Enter a guarded section. In debug builds, panics if one is already open.
    #[inline]
    pub fn enter(&self) -> ReentrancyGuard<'_> {
        #[cfg(debug_assertions)]
        {
            let d = self.depth.get();
            assert!(d == 0, "reentrancy detected: nested entry into BucketedMap");
            self.depth.set(d + 1);
            return ReentrancyGuard { owner: self };
        }

        #[cfg(not(debug_assertions))]
        {
            return ReentrancyGuard { _z: PhantomData };
        }
    }
}

impl Default for DebugReentrancy {
    fn default() -> Self {
        Self::new()
    }
}

// A fresh map gets a fresh tracker; open guards are never cloned.
impl Clone for DebugReentrancy {
    fn clone(&self) -> Self {
        Self::new()
    }
}

/// RAII guard returned by [`DebugReentrancy::enter`].
pub struct ReentrancyGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a DebugReentrancy,
    #[cfg(not(debug_assertions))]
    _z: PhantomData<&'a ()>,
}

impl Drop for ReentrancyGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            let d = self.owner.depth.get();
            debug_assert!(d > 0);
            self.owner.depth.set(d - 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DebugReentrancy;

    #[test]
    fn sequential_entries_are_ok() {
        let r = DebugReentrancy::new();
        {
            let _g = r.enter();
        }
        let _g = r.enter();
    }

    #[cfg(debug_assertions)]
    #[test]
    fn nested_entry_panics_in_debug() {
        let r = DebugReentrancy::new();
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _outer = r.enter();
            let _inner = r.enter();
        }));
        assert!(res.is_err(), "expected nested entry to panic in debug builds");
    }

    #[cfg(debug_assertions)]
    #[test]
    fn clone_does_not_inherit_open_guard() {
        let r = DebugReentrancy::new();
        let _g = r.enter();
        let c = r.clone();
        let _g2 = c.enter();
    }
}
