//! Index-addressed circular doubly-linked rings.
//!
//! This crate provides circular doubly-linked list operations for nodes that
//! live in an arena (a `Vec`, a `SlotMap`, ...) and refer to each other by
//! index instead of by pointer. Relinking is a matter of rewriting indices, so
//! there is no unsafe code and no way to produce a dangling reference: a stale
//! index is caught by the arena, not dereferenced.
//!
//! # Rings
//!
//! In a ring:
//! - A single node points to itself (both `next` and `prev`)
//! - There is no head or tail - any node can be the "entry point"
//! - Splicing two rings together is O(1)
//! - Iteration wraps around (must track starting point)
//!
//! A freshly created [`RingLink`] is already a ring of one, which is why links
//! are built from the index of the node that owns them. With `slotmap` this is
//! what `SlotMap::insert_with_key` is for.
//!
//! # Example
//!
//! ```rust
//! use index_ring::{RingLink, RingOps, RingStorage};
//!
//! struct Node {
//!     link: RingLink<usize>,
//!     value: i32,
//! }
//!
//! struct Arena(Vec<Node>);
//!
//! impl RingStorage<usize> for Arena {
//!     fn link(&self, index: usize) -> &RingLink<usize> {
//!         &self.0[index].link
//!     }
//!     fn link_mut(&mut self, index: usize) -> &mut RingLink<usize> {
//!         &mut self.0[index].link
//!     }
//! }
//!
//! let mut arena = Arena(
//!     (0..3)
//!         .map(|i| Node { link: RingLink::new(i), value: i as i32 * 10 })
//!         .collect(),
//! );
//! let ops = RingOps;
//!
//! ops.insert_after(&mut arena, 0, 1);
//! ops.insert_after(&mut arena, 1, 2);
//!
//! assert_eq!(ops.count(&arena, 0), 3);
//! let values: Vec<i32> = ops.iter(&arena, 0).map(|i| arena.0[i].value).collect();
//! assert_eq!(values, vec![0, 10, 20]);
//! ```

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

extern crate alloc;

use alloc::vec::Vec;
use core::fmt;

// =============================================================================
// RingLink
// =============================================================================

/// The `next`/`prev` pair embedded in every node that takes part in a ring.
///
/// A link always belongs to some ring: when detached it is a ring of one,
/// pointing at its own node in both directions.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RingLink<I> {
    next: I,
    prev: I,
}

impl<I: Copy + Eq> RingLink<I> {
    /// Creates a ring of one for the node stored at `own`.
    #[inline]
    pub const fn new(own: I) -> Self {
        RingLink {
            next: own,
            prev: own,
        }
    }

    /// Gets the next index in the ring.
    #[inline]
    pub fn next(&self) -> I {
        self.next
    }

    /// Gets the previous index in the ring.
    #[inline]
    pub fn prev(&self) -> I {
        self.prev
    }

    /// Returns true if this link points back at `own`, i.e. the ring has one node.
    #[inline]
    pub fn is_alone(&self, own: I) -> bool {
        self.next == own && self.prev == own
    }
}

impl<I: fmt::Debug> fmt::Debug for RingLink<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingLink")
            .field("prev", &self.prev)
            .field("next", &self.next)
            .finish()
    }
}

// =============================================================================
// RingStorage
// =============================================================================

/// Access to the ring links of nodes held in some index-addressed storage.
///
/// Implementations may panic on an index that does not name a live node;
/// the ring operations only ever pass indices reachable from the ring they
/// were given.
pub trait RingStorage<I: Copy + Eq> {
    /// Returns the link of the node at `index`.
    fn link(&self, index: I) -> &RingLink<I>;

    /// Returns the link of the node at `index` for modification.
    fn link_mut(&mut self, index: I) -> &mut RingLink<I>;
}

// =============================================================================
// RingOps
// =============================================================================

/// Operations for manipulating index-addressed circular doubly-linked rings.
///
/// All operations except [`count`](RingOps::count), [`collect`](RingOps::collect),
/// [`iter`](RingOps::iter) and [`is_consistent`](RingOps::is_consistent) are O(1).
#[derive(Clone, Copy, Default, Debug)]
pub struct RingOps;

impl RingOps {
    /// Creates a new `RingOps`.
    #[inline]
    pub const fn new() -> Self {
        RingOps
    }

    /// Gets the next index in the ring.
    #[inline]
    pub fn next<I: Copy + Eq, S: RingStorage<I> + ?Sized>(&self, store: &S, index: I) -> I {
        store.link(index).next()
    }

    /// Gets the previous index in the ring.
    #[inline]
    pub fn prev<I: Copy + Eq, S: RingStorage<I> + ?Sized>(&self, store: &S, index: I) -> I {
        store.link(index).prev()
    }

    /// Returns true if `index` is the only node of its ring.
    #[inline]
    pub fn is_alone<I: Copy + Eq, S: RingStorage<I> + ?Sized>(&self, store: &S, index: I) -> bool {
        store.link(index).is_alone(index)
    }

    /// Turns `index` into a ring of one without touching its old neighbours.
    ///
    /// Only use this on a node whose former ring is being discarded or
    /// rebuilt wholesale; otherwise use [`remove`](RingOps::remove).
    #[inline]
    pub fn reset<I: Copy + Eq, S: RingStorage<I> + ?Sized>(&self, store: &mut S, index: I) {
        *store.link_mut(index) = RingLink::new(index);
    }

    /// Inserts `new` after `at` in the ring containing `at`.
    ///
    /// `new` must be a ring of one.
    #[inline]
    pub fn insert_after<I: Copy + Eq, S: RingStorage<I> + ?Sized>(&self, store: &mut S, at: I, new: I) {
        debug_assert!(self.is_alone(store, new), "new is already linked");

        let next = store.link(at).next;

        store.link_mut(at).next = new;
        let link = store.link_mut(new);
        link.prev = at;
        link.next = next;
        store.link_mut(next).prev = new;
    }

    /// Inserts `new` before `at` in the ring containing `at`.
    ///
    /// `new` must be a ring of one.
    #[inline]
    pub fn insert_before<I: Copy + Eq, S: RingStorage<I> + ?Sized>(&self, store: &mut S, at: I, new: I) {
        debug_assert!(self.is_alone(store, new), "new is already linked");

        let prev = store.link(at).prev;

        store.link_mut(at).prev = new;
        let link = store.link_mut(new);
        link.next = at;
        link.prev = prev;
        store.link_mut(prev).next = new;
    }

    /// Removes `index` from its ring, leaving it as a ring of one.
    ///
    /// Returns a node that is still in the old ring (the former `next`),
    /// or `None` if `index` was the only node.
    #[inline]
    pub fn remove<I: Copy + Eq, S: RingStorage<I> + ?Sized>(&self, store: &mut S, index: I) -> Option<I> {
        let RingLink { next, prev } = *store.link(index);

        if next == index {
            return None;
        }

        store.link_mut(prev).next = next;
        store.link_mut(next).prev = prev;
        self.reset(store, index);
        Some(next)
    }

    /// Splices two rings together.
    ///
    /// Returns an entry point into the merged ring, or `None` if both were
    /// empty. If either is `None`, returns the other.
    ///
    /// `a` and `b` must not already be in the same ring.
    #[inline]
    pub fn splice<I: Copy + Eq, S: RingStorage<I> + ?Sized>(
        &self,
        store: &mut S,
        a: Option<I>,
        b: Option<I>,
    ) -> Option<I> {
        match (a, b) {
            (None, None) => None,
            (Some(a), None) => Some(a),
            (None, Some(b)) => Some(b),
            (Some(a), Some(b)) => {
                // Before:
                //   Ring A: ... <-> a_prev <-> a <-> ...
                //   Ring B: ... <-> b_prev <-> b <-> ...
                //
                // After:
                //   ... <-> a_prev <-> b <-> ... <-> b_prev <-> a <-> ...
                let a_prev = store.link(a).prev;
                let b_prev = store.link(b).prev;

                store.link_mut(a_prev).next = b;
                store.link_mut(b).prev = a_prev;

                store.link_mut(b_prev).next = a;
                store.link_mut(a).prev = b_prev;

                Some(a)
            }
        }
    }

    /// Counts the number of nodes in the ring. O(n).
    pub fn count<I: Copy + Eq, S: RingStorage<I> + ?Sized>(&self, store: &S, start: I) -> usize {
        self.iter(store, start).count()
    }

    /// Collects the ring into a `Vec`, starting at `start`.
    ///
    /// Use this when the ring is about to be relinked: the returned indices
    /// stay valid while the links they came from are rewritten.
    pub fn collect<I: Copy + Eq, S: RingStorage<I> + ?Sized>(&self, store: &S, start: I) -> Vec<I> {
        self.iter(store, start).collect()
    }

    /// Walks the ring once, starting at `start`.
    pub fn iter<'a, I: Copy + Eq, S: RingStorage<I> + ?Sized>(&self, store: &'a S, start: I) -> RingIter<'a, I, S> {
        RingIter {
            store,
            start,
            next: Some(start),
        }
    }

    /// Checks that every node in the ring satisfies
    /// `next.prev == node` and `prev.next == node`.
    ///
    /// Gives up (returning false) after `limit` steps, so a corrupted ring
    /// that never returns to `start` cannot loop forever.
    pub fn is_consistent<I: Copy + Eq, S: RingStorage<I> + ?Sized>(&self, store: &S, start: I, limit: usize) -> bool {
        let mut current = start;
        for _ in 0..limit {
            let RingLink { next, prev } = *store.link(current);
            if store.link(next).prev != current || store.link(prev).next != current {
                return false;
            }
            current = next;
            if current == start {
                return true;
            }
        }
        false
    }
}

/// Iterator over the indices of one ring. See [`RingOps::iter`].
pub struct RingIter<'a, I, S: ?Sized> {
    store: &'a S,
    start: I,
    next: Option<I>,
}

impl<I: Copy + Eq, S: RingStorage<I> + ?Sized> Iterator for RingIter<'_, I, S> {
    type Item = I;

    fn next(&mut self) -> Option<I> {
        let current = self.next?;
        let following = self.store.link(current).next();
        self.next = if following == self.start { None } else { Some(following) };
        Some(current)
    }
}

impl<I: Copy + Eq, S: RingStorage<I> + ?Sized> core::iter::FusedIterator for RingIter<'_, I, S> {}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    struct TestNode {
        link: RingLink<usize>,
        value: i32,
    }

    struct TestArena(Vec<TestNode>);

    impl TestArena {
        fn with_nodes(n: usize) -> Self {
            TestArena(
                (0..n)
                    .map(|i| TestNode {
                        link: RingLink::new(i),
                        value: i as i32,
                    })
                    .collect(),
            )
        }
    }

    impl RingStorage<usize> for TestArena {
        fn link(&self, index: usize) -> &RingLink<usize> {
            &self.0[index].link
        }

        fn link_mut(&mut self, index: usize) -> &mut RingLink<usize> {
            &mut self.0[index].link
        }
    }

    #[test]
    fn test_new_link_is_alone() {
        let arena = TestArena::with_nodes(1);
        let ops = RingOps::new();
        assert!(ops.is_alone(&arena, 0));
        assert_eq!(ops.next(&arena, 0), 0);
        assert_eq!(ops.prev(&arena, 0), 0);
    }

    #[test]
    fn test_insert_after() {
        let mut arena = TestArena::with_nodes(2);
        let ops = RingOps::new();

        ops.insert_after(&mut arena, 0, 1);

        // Now: 0 <-> 1 <-> 0
        assert_eq!(ops.next(&arena, 0), 1);
        assert_eq!(ops.next(&arena, 1), 0);
        assert_eq!(ops.prev(&arena, 0), 1);
        assert_eq!(ops.prev(&arena, 1), 0);
    }

    #[test]
    fn test_insert_before_keeps_order() {
        let mut arena = TestArena::with_nodes(3);
        let ops = RingOps::new();

        // Inserting before the entry point appends at the "end" of the walk.
        ops.insert_before(&mut arena, 0, 1);
        ops.insert_before(&mut arena, 0, 2);

        assert_eq!(ops.collect(&arena, 0), vec![0, 1, 2]);
        assert_eq!(ops.prev(&arena, 0), 2);
        assert!(ops.is_consistent(&arena, 0, 10));
    }

    #[test]
    fn test_remove_single() {
        let mut arena = TestArena::with_nodes(1);
        let ops = RingOps::new();

        assert_eq!(ops.remove(&mut arena, 0), None);
        assert!(ops.is_alone(&arena, 0));
    }

    #[test]
    fn test_remove_from_two() {
        let mut arena = TestArena::with_nodes(2);
        let ops = RingOps::new();

        ops.insert_after(&mut arena, 0, 1);

        assert_eq!(ops.remove(&mut arena, 0), Some(1));
        assert!(ops.is_alone(&arena, 0));
        assert!(ops.is_alone(&arena, 1));
    }

    #[test]
    fn test_remove_middle() {
        let mut arena = TestArena::with_nodes(3);
        let ops = RingOps::new();

        ops.insert_after(&mut arena, 0, 1);
        ops.insert_after(&mut arena, 1, 2);

        assert_eq!(ops.remove(&mut arena, 1), Some(2));
        assert!(ops.is_alone(&arena, 1));

        // Now: 0 <-> 2 <-> 0
        assert_eq!(ops.next(&arena, 0), 2);
        assert_eq!(ops.next(&arena, 2), 0);
        assert!(ops.is_consistent(&arena, 0, 10));
    }

    #[test]
    fn test_splice_empty() {
        let mut arena = TestArena::with_nodes(1);
        let ops = RingOps::new();

        assert_eq!(ops.splice(&mut arena, None, None), None);
        assert_eq!(ops.splice(&mut arena, Some(0), None), Some(0));
        assert_eq!(ops.splice(&mut arena, None, Some(0)), Some(0));
    }

    #[test]
    fn test_splice_two_pairs() {
        let mut arena = TestArena::with_nodes(4);
        let ops = RingOps::new();

        // Ring 1: 0 <-> 1
        ops.insert_after(&mut arena, 0, 1);
        // Ring 2: 2 <-> 3
        ops.insert_after(&mut arena, 2, 3);

        assert_eq!(ops.splice(&mut arena, Some(0), Some(2)), Some(0));

        assert_eq!(ops.count(&arena, 0), 4);
        assert_eq!(ops.collect(&arena, 0), vec![0, 1, 2, 3]);
        assert!(ops.is_consistent(&arena, 3, 10));
    }

    #[test]
    fn test_count_from_any_node() {
        let mut arena = TestArena::with_nodes(5);
        let ops = RingOps::new();

        for i in 1..5 {
            ops.insert_after(&mut arena, i - 1, i);
        }

        assert_eq!(ops.count(&arena, 0), 5);
        assert_eq!(ops.count(&arena, 2), 5);
    }

    #[test]
    fn test_iter_reads_values() {
        let mut arena = TestArena::with_nodes(3);
        let ops = RingOps::new();

        ops.insert_after(&mut arena, 0, 1);
        ops.insert_after(&mut arena, 1, 2);

        let visited: Vec<i32> = ops.iter(&arena, 1).map(|i| arena.0[i].value).collect();
        assert_eq!(visited, vec![1, 2, 0]);
    }

    #[test]
    fn test_is_consistent_detects_broken_ring() {
        let mut arena = TestArena::with_nodes(3);
        let ops = RingOps::new();

        ops.insert_after(&mut arena, 0, 1);
        ops.insert_after(&mut arena, 1, 2);
        assert!(ops.is_consistent(&arena, 0, 10));

        // Break a back link by hand.
        arena.0[2].link.prev = 0;
        assert!(!ops.is_consistent(&arena, 0, 10));
    }
}
