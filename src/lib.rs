//! Bounded and amortized heaps for Rust
//!
//! This crate provides two priority queue families:
//!
//! - **Bounded heap** ([`BoundedHeap`]): an array-backed heap of fixed
//!   capacity. The arity (binary or any `d >= 2`), the root offset and the
//!   polarity (max or min) are chosen at construction. Inserting into a full
//!   heap evicts the current root instead of failing, and the heap remembers
//!   the most extreme key it has ever evicted (the *spill record*). Removal
//!   restores order either with a classic sink or with Floyd's bottom-up
//!   "snake".
//! - **Fibonacci heap** ([`FibonacciHeap`]): O(1) insert and O(log n)
//!   amortized extract-min over an arena of nodes linked into circular
//!   sibling rings.
//!
//! Both are ordered by a caller-supplied [`Comparator`] and implement
//! [`PriorityQueue`].
//!
//! # Example
//!
//! ```rust
//! use bounded_heaps::{BoundedHeap, Polarity};
//!
//! // Keep the three largest keys seen so far in a min-heap.
//! let mut top = BoundedHeap::new(3, Polarity::Min).unwrap();
//! for key in [5, 3, 8, 1] {
//!     top.insert(key);
//! }
//!
//! assert_eq!(top.len(), 3);
//! assert_eq!(top.spill_record(), Some(&3));
//! assert_eq!(top.remove(), Ok(1));
//! ```

pub mod arity;
pub mod bounded;
pub mod config;
pub mod fibonacci;
pub mod traits;

pub use arity::Arity;
pub use bounded::{BoundedHeap, Snapshot};
pub use config::{HeapConfig, Polarity, RemovalStrategy};
pub use fibonacci::FibonacciHeap;
pub use traits::{Comparator, HeapError, NaturalOrder, PriorityQueue};
