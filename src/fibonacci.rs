//! Fibonacci Heap implementation
//!
//! A Fibonacci heap keeps a collection of heap-ordered trees whose roots are
//! linked in a circular doubly linked list, plus a pointer to the minimum root.
//!
//! - O(1) insert: the new node simply joins the root ring
//! - O(log n) amortized extract-min: the minimum's children join the root ring,
//!   then trees of equal degree are linked pairwise until every root has a
//!   distinct degree ("consolidation")
//!
//! # Storage
//!
//! Nodes live in a [`slotmap`] arena and refer to each other by key. Every
//! sibling ring (the root ring and each node's child ring) is an
//! [`index_ring`] ring threaded through the arena, so splicing and relinking
//! are key rewrites. A removed node is first detached from every ring and only
//! then taken out of the arena; its key is never handed out again.
//!
//! "Minimum" always means minimum under the heap's comparator. Pass a reversed
//! comparator to get a max-heap.
//!
//! # Example
//!
//! ```rust
//! use bounded_heaps::FibonacciHeap;
//!
//! let mut heap = FibonacciHeap::new();
//! for key in [7, 2, 9, 1, 5] {
//!     heap.insert(key);
//! }
//! assert_eq!(heap.extract_min(), Ok(1));
//! assert_eq!(heap.extract_min(), Ok(2));
//! assert_eq!(heap.len(), 3);
//! ```

use crate::traits::{Comparator, HeapError, NaturalOrder, PriorityQueue};
use index_ring::{RingLink, RingOps, RingStorage};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;

new_key_type! {
    /// Arena key of a heap node
    struct NodeKey;
}

const RING: RingOps = RingOps::new();

#[derive(Clone)]
struct Node<K> {
    key: K,
    parent: Option<NodeKey>,
    /// Any one child; the rest are reachable through its sibling ring
    child: Option<NodeKey>,
    siblings: RingLink<NodeKey>,
    degree: usize,
    /// Lost a child since it last became a child itself. Without decrease-key
    /// nothing ever sets it, but linking and promotion keep it cleared.
    marked: bool,
}

impl<K> Node<K> {
    fn new(own: NodeKey, key: K) -> Self {
        Node {
            key,
            parent: None,
            child: None,
            siblings: RingLink::new(own),
            degree: 0,
            marked: false,
        }
    }
}

#[derive(Clone)]
struct Arena<K>(SlotMap<NodeKey, Node<K>>);

impl<K> RingStorage<NodeKey> for Arena<K> {
    #[inline]
    fn link(&self, index: NodeKey) -> &RingLink<NodeKey> {
        &self.0[index].siblings
    }

    #[inline]
    fn link_mut(&mut self, index: NodeKey) -> &mut RingLink<NodeKey> {
        &mut self.0[index].siblings
    }
}

/// Fibonacci Heap
///
/// # Example
///
/// ```rust
/// use bounded_heaps::FibonacciHeap;
///
/// // A max-heap via a reversed comparator.
/// let mut heap = FibonacciHeap::with_comparator(|a: &i32, b: &i32| b.cmp(a));
/// heap.insert(3);
/// heap.insert(8);
/// assert_eq!(heap.peek(), Some(&8));
/// ```
#[derive(Clone)]
pub struct FibonacciHeap<K, C = NaturalOrder> {
    nodes: Arena<K>,
    min: Option<NodeKey>,
    len: usize,
    comparator: C,
}

impl<K: Ord> FibonacciHeap<K> {
    /// Creates an empty heap ordered by `K: Ord`
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<K: Ord> Default for FibonacciHeap<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, C: Comparator<K>> FibonacciHeap<K, C> {
    /// Creates an empty heap ordered by `comparator`
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            nodes: Arena(SlotMap::with_key()),
            min: None,
            len: 0,
            comparator,
        }
    }

    /// Returns true if the heap holds no keys
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.is_none()
    }

    /// Returns the number of keys
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// The minimum key, if any
    pub fn peek(&self) -> Option<&K> {
        self.min.and_then(|min| self.nodes.0.get(min)).map(|node| &node.key)
    }

    /// Number of trees in the root ring. O(roots).
    pub fn root_count(&self) -> usize {
        self.min.map_or(0, |min| RING.count(&self.nodes, min))
    }

    /// Inserts a key into the root ring
    ///
    /// No consolidation happens here; the new node is a tree of its own until
    /// the next `extract_min`.
    pub fn insert(&mut self, key: K) {
        let node = self.nodes.0.insert_with_key(|own| Node::new(own, key));

        match self.min {
            None => self.min = Some(node),
            Some(min) => {
                RING.insert_before(&mut self.nodes, min, node);
                if self.precedes(node, min) {
                    self.min = Some(node);
                }
            }
        }

        self.len += 1;
    }

    /// Removes and returns the minimum key
    ///
    /// # Errors
    /// [`HeapError::EmptyHeap`] if the heap is empty; nothing is modified.
    pub fn extract_min(&mut self) -> Result<K, HeapError> {
        let min = self.min.ok_or(HeapError::EmptyHeap)?;

        // Promote the children: clear their parent links, then splice the
        // whole child ring into the root ring at once.
        if let Some(child) = self.nodes.0[min].child.take() {
            for promoted in RING.collect(&self.nodes, child) {
                let node = &mut self.nodes.0[promoted];
                node.parent = None;
                node.marked = false;
            }
            RING.splice(&mut self.nodes, Some(min), Some(child));
            self.nodes.0[min].degree = 0;
        }

        let survivor = RING.remove(&mut self.nodes, min);
        let removed = self.nodes.0.remove(min);
        self.len -= 1;

        match survivor {
            None => self.min = None,
            Some(start) => {
                self.min = Some(start);
                self.consolidate(start);
            }
        }

        removed.map(|node| node.key).ok_or(HeapError::EmptyHeap)
    }

    /// Removes every key, returning them in ascending comparator order
    pub fn into_sorted_vec(mut self) -> Vec<K> {
        let mut sorted = Vec::with_capacity(self.len);
        while let Ok(key) = self.extract_min() {
            sorted.push(key);
        }
        sorted
    }

    /// Checks every structural invariant of the heap
    ///
    /// - the root ring and every child ring are consistent circular lists
    /// - `min` is on the root ring and no root precedes it
    /// - roots have no parent and are unmarked; children point at their parent
    /// - every node's degree equals the size of its child ring
    /// - no child precedes its parent
    /// - the number of reachable nodes equals `len()` and the arena size
    pub fn verify_structure(&self) -> bool {
        let Some(min) = self.min else {
            return self.len == 0 && self.nodes.0.is_empty();
        };
        if self.nodes.0.len() != self.len || !self.nodes.0.contains_key(min) {
            return false;
        }

        let limit = self.len + 1;
        if !RING.is_consistent(&self.nodes, min, limit) {
            return false;
        }

        let mut seen = 0;
        let mut rings: Vec<(NodeKey, Option<NodeKey>)> = vec![(min, None)];
        while let Some((start, parent)) = rings.pop() {
            for key in RING.iter(&self.nodes, start) {
                seen += 1;
                if seen > self.len {
                    return false;
                }

                let node = &self.nodes.0[key];
                if node.parent != parent {
                    return false;
                }
                match parent {
                    None if node.marked || self.precedes(key, min) => return false,
                    Some(parent) if self.precedes(key, parent) => return false,
                    _ => {}
                }

                match node.child {
                    Some(child) => {
                        if !self.nodes.0.contains_key(child)
                            || !RING.is_consistent(&self.nodes, child, limit)
                            || RING.count(&self.nodes, child) != node.degree
                        {
                            return false;
                        }
                        rings.push((child, Some(key)));
                    }
                    None if node.degree != 0 => return false,
                    None => {}
                }
            }
        }

        seen == self.len
    }

    /// True if `a`'s key comes strictly before `b`'s.
    #[inline]
    fn precedes(&self, a: NodeKey, b: NodeKey) -> bool {
        self.comparator.compare(&self.nodes.0[a].key, &self.nodes.0[b].key) == Ordering::Less
    }

    /// Links root trees of equal degree until all degrees are distinct, then
    /// rebuilds the root ring and finds the new minimum.
    fn consolidate(&mut self, start: NodeKey) {
        let roots = RING.collect(&self.nodes, start);
        let mut by_degree: SmallVec<[Option<NodeKey>; 64]> = SmallVec::new();

        for root in roots {
            // The old root ring is rebuilt from scratch below.
            RING.reset(&mut self.nodes, root);

            let mut tree = root;
            let mut degree = self.nodes.0[tree].degree;
            loop {
                if degree >= by_degree.len() {
                    by_degree.resize(degree + 1, None);
                }
                let Some(mut other) = by_degree[degree].take() else {
                    by_degree[degree] = Some(tree);
                    break;
                };
                if self.precedes(other, tree) {
                    std::mem::swap(&mut tree, &mut other);
                }
                self.link(other, tree);
                degree += 1;
            }
        }

        self.min = None;
        for root in by_degree.into_iter().flatten() {
            match self.min {
                None => self.min = Some(root),
                Some(min) => {
                    RING.insert_before(&mut self.nodes, min, root);
                    if self.precedes(root, min) {
                        self.min = Some(root);
                    }
                }
            }
        }
    }

    /// Makes `child` (a detached root) a child of `parent`.
    fn link(&mut self, child: NodeKey, parent: NodeKey) {
        let node = &mut self.nodes.0[child];
        node.parent = Some(parent);
        node.marked = false;

        match self.nodes.0[parent].child {
            Some(first) => RING.insert_before(&mut self.nodes, first, child),
            None => self.nodes.0[parent].child = Some(child),
        }
        self.nodes.0[parent].degree += 1;
    }
}

impl<K, C: Comparator<K>> PriorityQueue<K> for FibonacciHeap<K, C> {
    fn is_empty(&self) -> bool {
        FibonacciHeap::is_empty(self)
    }

    fn len(&self) -> usize {
        FibonacciHeap::len(self)
    }

    fn insert(&mut self, key: K) {
        FibonacciHeap::insert(self, key)
    }

    fn peek(&self) -> Option<&K> {
        FibonacciHeap::peek(self)
    }

    fn remove(&mut self) -> Result<K, HeapError> {
        self.extract_min()
    }
}

impl<K: fmt::Debug, C: Comparator<K>> fmt::Debug for FibonacciHeap<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FibonacciHeap")
            .field("len", &self.len)
            .field("roots", &self.root_count())
            .field("min", &self.peek())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let mut heap = FibonacciHeap::new();
        assert!(heap.is_empty());
        assert_eq!(heap.len(), 0);

        heap.insert(5);
        heap.insert(3);
        heap.insert(7);

        assert_eq!(heap.len(), 3);
        assert_eq!(heap.peek(), Some(&3));
        assert!(heap.verify_structure());

        assert_eq!(heap.extract_min(), Ok(3));
        assert_eq!(heap.peek(), Some(&5));
        assert!(heap.verify_structure());
    }

    #[test]
    fn test_extract_scenario() {
        let mut heap = FibonacciHeap::new();
        for key in [7, 2, 9, 1, 5] {
            heap.insert(key);
        }
        assert_eq!(heap.extract_min(), Ok(1));
        assert_eq!(heap.extract_min(), Ok(2));
        assert_eq!(heap.len(), 3);
        assert!(heap.verify_structure());
    }

    #[test]
    fn test_insert_does_not_consolidate() {
        let mut heap = FibonacciHeap::new();
        for key in 0..10 {
            heap.insert(key);
        }
        assert_eq!(heap.root_count(), 10);
    }

    #[test]
    fn test_consolidation_leaves_distinct_degrees() {
        let mut heap = FibonacciHeap::new();
        for key in 0..16 {
            heap.insert(key);
        }
        assert_eq!(heap.extract_min(), Ok(0));

        // 15 nodes in trees of sizes 8, 4, 2 and 1.
        assert_eq!(heap.root_count(), 4);
        assert!(heap.verify_structure());

        let min = heap.min.unwrap();
        let mut degrees: Vec<usize> = RING
            .iter(&heap.nodes, min)
            .map(|root| heap.nodes.0[root].degree)
            .collect();
        degrees.sort();
        assert_eq!(degrees, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_empty_extract() {
        let mut heap: FibonacciHeap<i32> = FibonacciHeap::new();
        assert_eq!(heap.extract_min(), Err(HeapError::EmptyHeap));
        assert!(heap.is_empty());
        assert!(heap.verify_structure());

        heap.insert(4);
        assert_eq!(heap.extract_min(), Ok(4));
        assert_eq!(heap.extract_min(), Err(HeapError::EmptyHeap));
        assert_eq!(heap.len(), 0);
        assert_eq!(heap.peek(), None);
        assert!(heap.verify_structure());
    }

    #[test]
    fn test_removed_nodes_leave_arena() {
        let mut heap = FibonacciHeap::new();
        for key in 0..8 {
            heap.insert(key);
        }
        for _ in 0..5 {
            heap.extract_min().unwrap();
        }
        assert_eq!(heap.nodes.0.len(), 3);
    }

    #[test]
    fn test_interleaved_operations() {
        let mut heap = FibonacciHeap::new();
        let mut model: Vec<i32> = Vec::new();

        for round in 0..50 {
            for j in 0..5 {
                let key = (round * 31 + j * 17) % 97;
                heap.insert(key);
                model.push(key);
            }
            for _ in 0..3 {
                model.sort();
                let expected = model.remove(0);
                assert_eq!(heap.extract_min(), Ok(expected));
                assert!(heap.verify_structure());
            }
            assert_eq!(heap.len(), model.len());
        }
    }

    #[test]
    fn test_duplicate_keys() {
        let mut heap = FibonacciHeap::new();
        for _ in 0..6 {
            heap.insert(2);
        }
        heap.insert(1);
        assert_eq!(heap.into_sorted_vec(), vec![1, 2, 2, 2, 2, 2, 2]);
    }

    #[test]
    fn test_reversed_comparator() {
        let mut heap = FibonacciHeap::with_comparator(|a: &i32, b: &i32| b.cmp(a));
        for key in [4, 8, 1, 9, 3] {
            heap.insert(key);
        }
        assert_eq!(heap.into_sorted_vec(), vec![9, 8, 4, 3, 1]);
    }

    #[test]
    fn test_descending_insertion() {
        let mut heap = FibonacciHeap::new();
        for key in (0..200).rev() {
            heap.insert(key);
        }
        for key in 0..200 {
            assert_eq!(heap.extract_min(), Ok(key));
        }
        assert!(heap.is_empty());
    }

    #[test]
    fn test_debug_output() {
        let mut heap = FibonacciHeap::new();
        heap.insert("b");
        heap.insert("a");
        assert_eq!(format!("{heap:?}"), r#"FibonacciHeap { len: 2, roots: 2, min: Some("a") }"#);
    }
}
