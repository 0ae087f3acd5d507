//! Bounded array-backed heap
//!
//! A fixed-capacity d-ary heap stored in a single array, with the root at a
//! configurable slot. Slots below the root are reserved and always empty, which
//! is what makes the "root at 1" and "root at 2" layouts possible.
//!
//! # Overflow
//!
//! Inserting into a full heap is not an error. The current root is evicted
//! ("spilled"), the new key takes its slot and sinks into place, so the heap
//! stays at capacity. The heap remembers the highest-priority key it has ever
//! spilled in [`spill_record`](BoundedHeap::spill_record); the record only ever
//! moves to a key that strictly outranks it, and is never cleared.
//!
//! # Removal
//!
//! [`RemovalStrategy::Sink`] restores order after `remove` the classic way.
//! [`RemovalStrategy::Snake`] uses Floyd's trick: the hole left by the root is
//! walked down to a leaf along the best children, and the displaced last key
//! is swum back up from there. Both leave a valid heap; the snake usually
//! needs fewer comparisons because the displaced key tends to belong near the
//! bottom anyway.
//!
//! # Time Complexity
//!
//! | Operation   | Complexity       |
//! |-------------|------------------|
//! | `insert`    | O(log_d n)       |
//! | `remove`    | O(d log_d n)     |
//! | `peek`      | O(1)             |
//! | `from_keys` | O(n)             |
//! | `iter`      | O(n) (snapshot)  |
//!
//! # Example
//!
//! ```rust
//! use bounded_heaps::{BoundedHeap, Polarity};
//!
//! let mut heap = BoundedHeap::new(3, Polarity::Min).unwrap();
//! heap.insert(5);
//! heap.insert(3);
//! heap.insert(8);
//!
//! // Full: the root (3) is spilled to make room.
//! heap.insert(1);
//! assert_eq!(heap.len(), 3);
//! assert_eq!(heap.spill_record(), Some(&3));
//!
//! assert_eq!(heap.remove(), Ok(1));
//! assert_eq!(heap.remove(), Ok(5));
//! assert_eq!(heap.remove(), Ok(8));
//! assert!(heap.remove().is_err());
//! ```

use crate::arity::{Arity, Layout};
use crate::config::{HeapConfig, Polarity, RemovalStrategy};
use crate::traits::{Comparator, HeapError, NaturalOrder, PriorityQueue};
use std::fmt;
use std::iter::FusedIterator;

/// A bounded d-ary heap with spill tracking
///
/// See the [module documentation](self) for the overflow and removal rules.
#[derive(Clone)]
pub struct BoundedHeap<K, C = NaturalOrder> {
    /// `capacity + root_offset` slots; live keys occupy `root..root + count`
    slots: Vec<Option<K>>,
    count: usize,
    layout: Layout,
    polarity: Polarity,
    removal: RemovalStrategy,
    comparator: C,
    spill: Option<K>,
}

impl<K: Ord> BoundedHeap<K> {
    /// Creates a binary heap with its root at slot 1 and plain sink removal
    ///
    /// # Errors
    /// [`HeapError::InvalidArgument`] if `capacity` is zero.
    pub fn new(capacity: usize, polarity: Polarity) -> Result<Self, HeapError> {
        Self::with_config(HeapConfig::new(capacity).polarity(polarity))
    }

    /// Creates a heap of the given arity with its root at slot 1
    ///
    /// # Errors
    /// [`HeapError::InvalidArgument`] if `capacity` is zero or `arity < 2`.
    pub fn d_ary(
        capacity: usize,
        arity: usize,
        polarity: Polarity,
        removal: RemovalStrategy,
    ) -> Result<Self, HeapError> {
        Self::with_config(
            HeapConfig::new(capacity)
                .arity(arity)
                .polarity(polarity)
                .removal(removal),
        )
    }

    /// Creates a heap from a full configuration, ordered by `K: Ord`
    ///
    /// # Errors
    /// [`HeapError::InvalidArgument`] if the configuration is invalid.
    pub fn with_config(config: HeapConfig) -> Result<Self, HeapError> {
        Self::with_comparator(config, NaturalOrder)
    }
}

impl<K, C: Comparator<K>> BoundedHeap<K, C> {
    /// Creates an empty heap ordered by `comparator`
    ///
    /// # Errors
    /// [`HeapError::InvalidArgument`] if the configuration is invalid.
    pub fn with_comparator(config: HeapConfig, comparator: C) -> Result<Self, HeapError> {
        let arity = config.validate()?;
        let mut slots = Vec::with_capacity(config.capacity + config.root_offset);
        slots.resize_with(config.capacity + config.root_offset, || None);
        Ok(Self::from_parts(slots, 0, arity, config, comparator))
    }

    /// Wraps pre-formed keys in a heap and establishes heap order bottom-up
    ///
    /// The keys need not already be a heap.
    ///
    /// # Errors
    /// [`HeapError::InvalidArgument`] if the configuration is invalid or there
    /// are more keys than `capacity`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bounded_heaps::{BoundedHeap, HeapConfig, NaturalOrder};
    ///
    /// let heap = BoundedHeap::from_keys(["A", "B", "C", "D", "E"], HeapConfig::new(5), NaturalOrder).unwrap();
    /// assert_eq!(heap.peek(), Some(&"E"));
    /// assert_eq!(heap.len(), 5);
    /// ```
    pub fn from_keys<I>(keys: I, config: HeapConfig, comparator: C) -> Result<Self, HeapError>
    where
        I: IntoIterator<Item = K>,
    {
        let arity = config.validate()?;
        let len = config.capacity + config.root_offset;
        let mut slots: Vec<Option<K>> = Vec::with_capacity(len);
        slots.resize_with(config.root_offset, || None);
        slots.extend(keys.into_iter().map(Some));

        let count = slots.len() - config.root_offset;
        if count > config.capacity {
            return Err(HeapError::InvalidArgument("more keys than capacity"));
        }
        slots.resize_with(len, || None);

        let mut heap = Self::from_parts(slots, count, arity, config, comparator);
        heap.heapify();
        Ok(heap)
    }

    fn from_parts(slots: Vec<Option<K>>, count: usize, arity: Arity, config: HeapConfig, comparator: C) -> Self {
        Self {
            slots,
            count,
            layout: Layout::new(arity, config.root_offset),
            polarity: config.polarity,
            removal: config.removal,
            comparator,
            spill: None,
        }
    }

    /// Maximum number of live keys
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len() - self.layout.root()
    }

    /// Returns true if the next insert will spill the root
    #[inline]
    pub fn is_full(&self) -> bool {
        self.count == self.capacity()
    }

    /// Returns true if the heap holds no keys
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the number of live keys
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Index of the root slot
    #[inline]
    pub fn root_offset(&self) -> usize {
        self.layout.root()
    }

    /// Children per node
    #[inline]
    pub fn arity(&self) -> usize {
        self.layout.arity()
    }

    /// Max or min ordering
    #[inline]
    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Returns true if the root is the greatest key
    #[inline]
    pub fn is_max(&self) -> bool {
        self.polarity == Polarity::Max
    }

    /// Removal procedure chosen at construction
    #[inline]
    pub fn removal_strategy(&self) -> RemovalStrategy {
        self.removal
    }

    /// The highest-priority key ever spilled by overflow, if any
    #[inline]
    pub fn spill_record(&self) -> Option<&K> {
        self.spill.as_ref()
    }

    /// The root key, if any
    #[inline]
    pub fn peek(&self) -> Option<&K> {
        self.slots.get(self.layout.root()).and_then(Option::as_ref)
    }

    /// Raw contents of slot `index`, for diagnostics
    ///
    /// Reserved slots, slots past the live keys and out-of-range indices all
    /// read as `None`. Nothing about the order of non-root slots is promised.
    #[inline]
    pub fn peek_slot(&self, index: usize) -> Option<&K> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Inserts a key, spilling the root if the heap is full
    ///
    /// Below capacity the key is appended and swum up. At capacity the root is
    /// evicted, `key` takes its place and sinks, and the spill record is
    /// updated if the evicted key outranks it.
    pub fn insert(&mut self, key: K) {
        if self.is_full() {
            self.spill_root(key);
            return;
        }

        let slot = self.layout.root() + self.count;
        self.slots[slot] = Some(key);
        self.count += 1;
        self.swim(slot);
    }

    /// Removes and returns the root
    ///
    /// # Errors
    /// [`HeapError::EmptyQueue`] if the heap is empty; nothing is modified.
    pub fn remove(&mut self) -> Result<K, HeapError> {
        if self.count == 0 {
            return Err(HeapError::EmptyQueue);
        }

        let root = self.layout.root();
        let last = self.last();
        self.slots.swap(root, last);
        // Taking the slot also clears it, so no stale key lingers past `count`.
        let top = self.slots[last].take();
        self.count -= 1;

        if self.count > 1 {
            match self.removal {
                RemovalStrategy::Sink => {
                    self.sink(root);
                }
                RemovalStrategy::Snake => {
                    let leaf = self.sink_to_leaf(root);
                    self.swim(leaf);
                }
            }
        }

        top.ok_or(HeapError::EmptyQueue)
    }

    /// Removes every key, returning them in removal order
    pub fn into_sorted_vec(mut self) -> Vec<K> {
        let mut sorted = Vec::with_capacity(self.count);
        while let Ok(key) = self.remove() {
            sorted.push(key);
        }
        sorted
    }

    /// Iterates over a snapshot of the live keys
    ///
    /// The first key yielded is the root; the rest come in slot order, which
    /// carries no ordering guarantee. Later changes to the heap do not affect
    /// an iterator already handed out.
    pub fn iter(&self) -> Snapshot<K>
    where
        K: Clone,
    {
        Snapshot {
            keys: self.live().iter().flatten().cloned().collect::<Vec<_>>().into_iter(),
        }
    }

    /// Checks the heap-order invariant and the slot layout
    ///
    /// Returns false if any live key outranks its parent, a live slot is empty,
    /// or a reserved or vacated slot still holds a key.
    pub fn verify_heap_order(&self) -> bool {
        let root = self.layout.root();
        let end = root + self.count;

        let layout_ok = self
            .slots
            .iter()
            .enumerate()
            .all(|(i, slot)| slot.is_some() == (root..end).contains(&i));

        layout_ok && (root + 1..end).all(|k| !self.outranks(k, self.layout.parent(k)))
    }

    // ------------------------------------------------------------------------
    // internals
    // ------------------------------------------------------------------------

    #[inline]
    fn live(&self) -> &[Option<K>] {
        let root = self.layout.root();
        &self.slots[root..root + self.count]
    }

    /// Slot of the last live key. Only meaningful when `count > 0`.
    #[inline]
    fn last(&self) -> usize {
        self.layout.root() + self.count - 1
    }

    fn spill_root(&mut self, key: K) {
        let root = self.layout.root();
        let spilled = self.slots[root].replace(key);
        self.sink(root);
        if let Some(spilled) = spilled {
            self.record_spill(spilled);
        }
    }

    fn record_spill(&mut self, spilled: K) {
        let outranks_record = match &self.spill {
            None => true,
            Some(record) => self.polarity.prefers(self.comparator.compare(&spilled, record)),
        };
        if outranks_record {
            self.spill = Some(spilled);
        }
    }

    /// True if the key in slot `i` belongs above the key in slot `j`.
    #[inline]
    fn outranks(&self, i: usize, j: usize) -> bool {
        match (&self.slots[i], &self.slots[j]) {
            (Some(a), Some(b)) => self.polarity.prefers(self.comparator.compare(a, b)),
            _ => false,
        }
    }

    /// The highest-ranked child of `k`, or `None` if `k` is a leaf.
    fn best_child(&self, k: usize) -> Option<usize> {
        if self.count == 0 {
            return None;
        }
        let first = self.layout.first_child(k);
        let last = self.last();
        if first > last {
            return None;
        }

        let end = first.saturating_add(self.layout.arity() - 1).min(last);
        let mut best = first;
        for child in first + 1..=end {
            if self.outranks(child, best) {
                best = child;
            }
        }
        Some(best)
    }

    /// Moves the key at `k` toward the root while it outranks its parent.
    fn swim(&mut self, mut k: usize) -> usize {
        let root = self.layout.root();
        while k > root {
            let parent = self.layout.parent(k);
            if !self.outranks(k, parent) {
                break;
            }
            self.slots.swap(k, parent);
            k = parent;
        }
        k
    }

    /// Moves the key at `k` toward the leaves while a child outranks it.
    fn sink(&mut self, mut k: usize) -> usize {
        while let Some(child) = self.best_child(k) {
            if !self.outranks(child, k) {
                break;
            }
            self.slots.swap(k, child);
            k = child;
        }
        k
    }

    /// Moves the key at `k` all the way to a leaf along the best children,
    /// without comparing it. Returns the leaf it ends up in.
    fn sink_to_leaf(&mut self, mut k: usize) -> usize {
        while let Some(child) = self.best_child(k) {
            self.slots.swap(k, child);
            k = child;
        }
        k
    }

    fn heapify(&mut self) {
        if self.count < 2 {
            return;
        }
        let root = self.layout.root();
        let last_parent = self.layout.parent(self.last());
        for k in (root..=last_parent).rev() {
            self.sink(k);
        }
    }
}

impl<K, C: Comparator<K>> PriorityQueue<K> for BoundedHeap<K, C> {
    fn is_empty(&self) -> bool {
        BoundedHeap::is_empty(self)
    }

    fn len(&self) -> usize {
        BoundedHeap::len(self)
    }

    fn insert(&mut self, key: K) {
        BoundedHeap::insert(self, key)
    }

    fn peek(&self) -> Option<&K> {
        BoundedHeap::peek(self)
    }

    fn remove(&mut self) -> Result<K, HeapError> {
        BoundedHeap::remove(self)
    }
}

impl<K: fmt::Debug, C> fmt::Debug for BoundedHeap<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let root = self.layout.root();
        let live: Vec<&K> = self.slots[root..root + self.count].iter().flatten().collect();
        f.debug_struct("BoundedHeap")
            .field("len", &self.count)
            .field("capacity", &(self.slots.len() - root))
            .field("root_offset", &root)
            .field("arity", &self.layout.arity())
            .field("polarity", &self.polarity)
            .field("removal", &self.removal)
            .field("keys", &live)
            .field("spill_record", &self.spill)
            .finish()
    }
}

impl<K, C> IntoIterator for BoundedHeap<K, C> {
    type Item = K;
    type IntoIter = Snapshot<K>;

    /// Consumes the heap, yielding its live keys root first
    fn into_iter(self) -> Snapshot<K> {
        let root = self.layout.root();
        let keys: Vec<K> = self
            .slots
            .into_iter()
            .skip(root)
            .take(self.count)
            .flatten()
            .collect();
        Snapshot { keys: keys.into_iter() }
    }
}

/// Iterator over a copy of a heap's live keys
///
/// Created by [`BoundedHeap::iter`] or by consuming the heap. It is not tied to
/// the heap's lifetime and cannot be restarted.
#[derive(Debug, Clone)]
pub struct Snapshot<K> {
    keys: std::vec::IntoIter<K>,
}

impl<K> Iterator for Snapshot<K> {
    type Item = K;

    #[inline]
    fn next(&mut self) -> Option<K> {
        self.keys.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl<K> ExactSizeIterator for Snapshot<K> {}

impl<K> FusedIterator for Snapshot<K> {}
