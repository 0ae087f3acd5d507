//! Construction-time configuration for [`BoundedHeap`](crate::BoundedHeap)
//!
//! Every knob of the bounded heap is fixed when it is built: capacity, where
//! the root lives, max or min ordering, arity, and which removal procedure
//! restores order after `remove`. [`HeapConfig`] gathers them in one value so
//! that validation happens in exactly one place.
//!
//! # Example
//!
//! ```rust
//! use bounded_heaps::{BoundedHeap, HeapConfig, Polarity, RemovalStrategy};
//!
//! let config = HeapConfig::new(4095)
//!     .polarity(Polarity::Min)
//!     .arity(4)
//!     .removal(RemovalStrategy::Snake);
//!
//! let heap: BoundedHeap<i32> = BoundedHeap::with_config(config).unwrap();
//! assert_eq!(heap.capacity(), 4095);
//! assert_eq!(heap.arity(), 4);
//! ```

use crate::arity::Arity;
use crate::traits::HeapError;
use std::cmp::Ordering;

/// Whether the root holds the greatest or the least key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Polarity {
    /// The root is the greatest key under the comparator
    #[default]
    Max,
    /// The root is the least key under the comparator
    Min,
}

impl Polarity {
    /// Returns true if a key comparing `ordering` to another should sit above it.
    ///
    /// Equal keys never outrank each other.
    #[inline]
    pub fn prefers(self, ordering: Ordering) -> bool {
        match self {
            Polarity::Max => ordering == Ordering::Greater,
            Polarity::Min => ordering == Ordering::Less,
        }
    }
}

/// How order is restored after the root is removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RemovalStrategy {
    /// Classic sink: at each level compare the moved key with its best child
    #[default]
    Sink,
    /// Floyd's trick ("snake"): walk the hole down to a leaf along the best
    /// children without looking at the moved key, then swim it back up
    Snake,
}

/// Parameters for [`BoundedHeap::with_config`](crate::BoundedHeap::with_config)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapConfig {
    pub(crate) capacity: usize,
    pub(crate) root_offset: usize,
    pub(crate) polarity: Polarity,
    pub(crate) arity: usize,
    pub(crate) removal: RemovalStrategy,
}

impl HeapConfig {
    /// Root index used unless [`root_offset`](HeapConfig::root_offset) says otherwise
    pub const DEFAULT_ROOT_OFFSET: usize = 1;

    /// Starts a configuration for a heap holding at most `capacity` keys
    ///
    /// Defaults: root at index 1, max polarity, binary, plain sink.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            root_offset: Self::DEFAULT_ROOT_OFFSET,
            polarity: Polarity::Max,
            arity: Arity::BINARY.get(),
            removal: RemovalStrategy::Sink,
        }
    }

    /// Index of the root slot; slots below it are reserved and never used
    pub fn root_offset(mut self, root_offset: usize) -> Self {
        self.root_offset = root_offset;
        self
    }

    /// Max- or min-ordering
    pub fn polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    /// Number of children per node (2 for a binary heap)
    pub fn arity(mut self, arity: usize) -> Self {
        self.arity = arity;
        self
    }

    /// Removal procedure used by `remove`
    pub fn removal(mut self, removal: RemovalStrategy) -> Self {
        self.removal = removal;
        self
    }

    /// Checks the parameters, returning the validated arity.
    ///
    /// # Errors
    /// [`HeapError::InvalidArgument`] if the capacity is zero or the arity is below 2.
    pub(crate) fn validate(&self) -> Result<Arity, HeapError> {
        if self.capacity == 0 {
            return Err(HeapError::InvalidArgument("capacity must be positive"));
        }
        // Guard the storage length `capacity + root_offset` against wrapping.
        if self.capacity.checked_add(self.root_offset).is_none() {
            return Err(HeapError::InvalidArgument("capacity plus root offset overflows"));
        }
        Arity::new(self.arity).ok_or(HeapError::InvalidArgument("arity must be at least 2"))
    }
}
