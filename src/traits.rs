//! Common traits for the priority queues in this crate
//!
//! This module provides the pieces both heap families share:
//!
//! - [`Comparator`]: the caller-supplied total order over keys
//! - [`PriorityQueue`]: the insert / remove / query surface
//! - [`HeapError`]: the failures those operations can report
//!
//! Ordering is never taken from `K: Ord` implicitly. Every heap is generic over
//! a comparator, with [`NaturalOrder`] as the default so that plain `Ord` keys
//! need no ceremony.

use std::cmp::Ordering;
use std::fmt;

/// Error type for heap operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// A construction parameter is out of range (zero capacity, arity below 2,
    /// more pre-formed keys than capacity)
    InvalidArgument(&'static str),
    /// `remove` was called on an empty bounded heap
    EmptyQueue,
    /// `extract_min` was called on an empty amortized heap
    EmptyHeap,
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::InvalidArgument(reason) => write!(f, "invalid argument: {reason}"),
            HeapError::EmptyQueue => write!(f, "priority queue is empty"),
            HeapError::EmptyHeap => write!(f, "heap is empty, cannot extract minimum"),
        }
    }
}

impl std::error::Error for HeapError {}

/// A total order over keys of type `K`, supplied by the caller
///
/// The heaps only ever call [`compare`](Comparator::compare) through a shared
/// reference; a comparator is never mutated by the structure that holds it.
///
/// Any `Fn(&K, &K) -> Ordering` is a comparator:
///
/// ```rust
/// use bounded_heaps::Comparator;
/// use std::cmp::Ordering;
///
/// let by_len = |a: &&str, b: &&str| a.len().cmp(&b.len());
/// assert_eq!(by_len.compare(&"abc", &"de"), Ordering::Greater);
/// ```
pub trait Comparator<K> {
    /// Compares two keys
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

impl<K, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}

/// The comparator for keys that implement `Ord`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<K: Ord> Comparator<K> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Base trait for the priority queues in this crate
///
/// Keys go in with [`insert`](PriorityQueue::insert) and the extremal key comes
/// out with [`remove`](PriorityQueue::remove). Which key is extremal is decided
/// by the queue's comparator (and, for [`BoundedHeap`](crate::BoundedHeap), its
/// polarity).
///
/// # Example
///
/// ```rust
/// use bounded_heaps::{FibonacciHeap, PriorityQueue};
///
/// let mut heap = FibonacciHeap::new();
/// heap.insert(3);
/// heap.insert(1);
/// heap.insert(2);
///
/// assert_eq!(heap.peek(), Some(&1));
/// assert_eq!(heap.pop(), Some(1));
/// assert_eq!(heap.len(), 2);
/// ```
pub trait PriorityQueue<K> {
    /// Returns true if the queue holds no keys
    fn is_empty(&self) -> bool;

    /// Returns the number of live keys
    fn len(&self) -> usize;

    /// Inserts a key
    ///
    /// # Time Complexity
    /// O(log n) for the bounded heap, O(1) for the amortized heap.
    fn insert(&mut self, key: K);

    /// Returns the extremal key without removing it
    ///
    /// # Time Complexity
    /// O(1) for all implementations
    fn peek(&self) -> Option<&K>;

    /// Removes and returns the extremal key
    ///
    /// # Errors
    /// Returns [`HeapError::EmptyQueue`] or [`HeapError::EmptyHeap`] when there
    /// is nothing to remove. The queue is left untouched in that case.
    fn remove(&mut self) -> Result<K, HeapError>;

    /// Removes and returns the extremal key, or `None` if the queue is empty
    fn pop(&mut self) -> Option<K> {
        self.remove().ok()
    }
}
