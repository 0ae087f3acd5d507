//! Index arithmetic for array-backed d-ary heaps
//!
//! A heap of arity `d` stored with its root at slot `r` uses one pair of
//! formulas, written over the 1-based logical position `p = k - r + 1` of slot
//! `k`:
//!
//! ```text
//! parent(p)      = (p + d - 2) / d
//! first_child(p) = d * (p - 1) + 2
//! ```
//!
//! With `d = 2` these are the familiar binary formulas for any root offset,
//! e.g. `parent(k) = (k + 1 - r) / 2 + r - 1`. With `r = 1` they are the
//! textbook d-ary formulas. The children of `k` occupy the `d` consecutive
//! slots starting at `first_child(k)`.

use std::num::NonZeroUsize;

/// Number of children per node; always at least 2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Arity(NonZeroUsize);

impl Arity {
    /// Two children per node
    pub const BINARY: Arity = Arity(NonZeroUsize::MIN.saturating_add(1));

    /// Four children per node
    pub const QUATERNARY: Arity = Arity(NonZeroUsize::MIN.saturating_add(3));

    /// Returns `None` if `d < 2`
    pub fn new(d: usize) -> Option<Self> {
        if d < 2 {
            return None;
        }
        NonZeroUsize::new(d).map(Arity)
    }

    /// The number of children per node
    #[inline]
    pub fn get(self) -> usize {
        self.0.get()
    }
}

/// Slot arithmetic for one heap: an arity plus the index of the root slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Layout {
    arity: usize,
    root: usize,
}

impl Layout {
    pub(crate) fn new(arity: Arity, root: usize) -> Self {
        Self {
            arity: arity.get(),
            root,
        }
    }

    #[inline]
    pub(crate) fn arity(&self) -> usize {
        self.arity
    }

    #[inline]
    pub(crate) fn root(&self) -> usize {
        self.root
    }

    /// Slot of the parent of `k`. `k` must not be the root.
    #[inline]
    pub(crate) fn parent(&self, k: usize) -> usize {
        debug_assert!(k > self.root, "the root has no parent");
        let p = k - self.root + 1;
        (p + self.arity - 2) / self.arity - 1 + self.root
    }

    /// Slot of the first child of `k`.
    ///
    /// Saturates instead of overflowing; a saturated result is past any real
    /// slot and reads as "no children".
    #[inline]
    pub(crate) fn first_child(&self, k: usize) -> usize {
        let p = k - self.root + 1;
        self.arity
            .saturating_mul(p - 1)
            .saturating_add(1)
            .saturating_add(self.root)
    }
}
