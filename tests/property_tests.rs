//! Property-based tests using proptest
//!
//! These tests generate random sequences of operations and check every heap
//! against a plain `Vec` model after each step.

use bounded_heaps::{
    BoundedHeap, FibonacciHeap, HeapConfig, HeapError, NaturalOrder, Polarity, RemovalStrategy,
};
use proptest::prelude::*;

/// Position of the key the heap's root must hold, under `polarity`.
fn extreme(model: &[i32], polarity: Polarity) -> Option<usize> {
    let indexed = model.iter().enumerate();
    match polarity {
        Polarity::Max => indexed.max_by_key(|&(_, key)| *key).map(|(i, _)| i),
        Polarity::Min => indexed.min_by_key(|&(_, key)| *key).map(|(i, _)| i),
    }
}

fn polarity_strategy() -> impl Strategy<Value = Polarity> {
    prop_oneof![Just(Polarity::Max), Just(Polarity::Min)]
}

fn removal_strategy() -> impl Strategy<Value = RemovalStrategy> {
    prop_oneof![Just(RemovalStrategy::Sink), Just(RemovalStrategy::Snake)]
}

/// Run a random op sequence against a bounded heap and its model
fn check_bounded_against_model(
    config: HeapConfig,
    capacity: usize,
    polarity: Polarity,
    ops: Vec<(bool, i32)>,
) -> Result<(), TestCaseError> {
    let mut heap: BoundedHeap<i32> = BoundedHeap::with_config(config).unwrap();
    let mut model: Vec<i32> = Vec::new();
    let mut spill: Option<i32> = None;

    for (should_remove, key) in ops {
        if should_remove {
            match extreme(&model, polarity) {
                Some(pos) => {
                    let expected = model.swap_remove(pos);
                    prop_assert_eq!(heap.remove(), Ok(expected));
                }
                None => prop_assert_eq!(heap.remove(), Err(HeapError::EmptyQueue)),
            }
        } else {
            if model.len() == capacity {
                // The root is evicted regardless of how `key` compares to it.
                let pos = extreme(&model, polarity).unwrap();
                let evicted = model.swap_remove(pos);
                spill = Some(match (spill, polarity) {
                    (None, _) => evicted,
                    (Some(record), Polarity::Max) => record.max(evicted),
                    (Some(record), Polarity::Min) => record.min(evicted),
                });
            }
            model.push(key);
            heap.insert(key);
        }

        prop_assert!(heap.verify_heap_order());
        prop_assert_eq!(heap.len(), model.len());
        prop_assert_eq!(heap.is_full(), model.len() == capacity);
        prop_assert_eq!(heap.spill_record().copied(), spill);
        prop_assert_eq!(heap.peek().copied(), extreme(&model, polarity).map(|pos| model[pos]));
    }

    Ok(())
}

proptest! {
    #[test]
    fn test_bounded_matches_model(
        capacity in 1usize..20,
        arity in 2usize..6,
        root_offset in 0usize..3,
        polarity in polarity_strategy(),
        removal in removal_strategy(),
        ops in prop::collection::vec((any::<bool>(), -50i32..50), 0..200),
    ) {
        let config = HeapConfig::new(capacity)
            .arity(arity)
            .root_offset(root_offset)
            .polarity(polarity)
            .removal(removal);
        check_bounded_against_model(config, capacity, polarity, ops)?;
    }

    #[test]
    fn test_sink_and_snake_remove_the_same_keys(
        arity in 2usize..5,
        keys in prop::collection::vec(any::<i32>(), 1..100),
    ) {
        let config = HeapConfig::new(keys.len()).arity(arity);
        let sink = BoundedHeap::from_keys(keys.clone(), config, NaturalOrder).unwrap();
        let snake = BoundedHeap::from_keys(keys, config.removal(RemovalStrategy::Snake), NaturalOrder).unwrap();
        prop_assert_eq!(sink.into_sorted_vec(), snake.into_sorted_vec());
    }

    #[test]
    fn test_binary_and_four_ary_drain_alike(
        polarity in polarity_strategy(),
        keys in prop::collection::vec(-1000i32..1000, 1..150),
    ) {
        let mut binary = BoundedHeap::d_ary(keys.len(), 2, polarity, RemovalStrategy::Sink).unwrap();
        let mut four_ary = BoundedHeap::d_ary(keys.len(), 4, polarity, RemovalStrategy::Snake).unwrap();
        for &key in &keys {
            binary.insert(key);
            four_ary.insert(key);
        }
        prop_assert_eq!(binary.into_sorted_vec(), four_ary.into_sorted_vec());
    }

    #[test]
    fn test_from_keys_heapifies(
        arity in 2usize..6,
        root_offset in 0usize..3,
        polarity in polarity_strategy(),
        keys in prop::collection::vec(any::<i32>(), 0..100),
    ) {
        let config = HeapConfig::new(keys.len().max(1))
            .arity(arity)
            .root_offset(root_offset)
            .polarity(polarity);
        let heap = BoundedHeap::from_keys(keys.clone(), config, NaturalOrder).unwrap();
        prop_assert!(heap.verify_heap_order());
        prop_assert_eq!(heap.spill_record(), None);

        let mut expected = keys;
        expected.sort_unstable();
        if polarity == Polarity::Max {
            expected.reverse();
        }
        prop_assert_eq!(heap.into_sorted_vec(), expected);
    }

    #[test]
    fn test_iter_yields_live_keys(
        capacity in 1usize..30,
        keys in prop::collection::vec(-20i32..20, 0..60),
    ) {
        let mut heap = BoundedHeap::new(capacity, Polarity::Max).unwrap();
        for key in keys {
            heap.insert(key);
        }

        let snapshot: Vec<i32> = heap.iter().collect();
        prop_assert_eq!(snapshot.len(), heap.len());
        prop_assert_eq!(snapshot.first(), heap.peek());

        let mut from_iter = snapshot;
        from_iter.sort_unstable();
        let mut drained = heap.into_sorted_vec();
        drained.sort_unstable();
        prop_assert_eq!(from_iter, drained);
    }

    #[test]
    fn test_fibonacci_matches_model(
        ops in prop::collection::vec((any::<bool>(), any::<i32>()), 0..300),
    ) {
        let mut heap = FibonacciHeap::new();
        let mut model: Vec<i32> = Vec::new();

        for (should_extract, key) in ops {
            if should_extract {
                match extreme(&model, Polarity::Min) {
                    Some(pos) => {
                        let expected = model.swap_remove(pos);
                        prop_assert_eq!(heap.extract_min(), Ok(expected));
                    }
                    None => prop_assert_eq!(heap.extract_min(), Err(HeapError::EmptyHeap)),
                }
            } else {
                heap.insert(key);
                model.push(key);
            }

            prop_assert!(heap.verify_structure());
            prop_assert_eq!(heap.len(), model.len());
            prop_assert_eq!(heap.peek().copied(), model.iter().min().copied());
        }
    }

    #[test]
    fn test_fibonacci_sorts(keys in prop::collection::vec(any::<i64>(), 0..200)) {
        let mut heap = FibonacciHeap::new();
        for &key in &keys {
            heap.insert(key);
        }
        let mut expected = keys;
        expected.sort_unstable();
        prop_assert_eq!(heap.into_sorted_vec(), expected);
    }
}
