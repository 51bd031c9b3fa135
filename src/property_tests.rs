use proptest_derive::Arbitrary;

use super::*;
use proptest::prelude::*;
use std::collections::VecDeque;

// pushes and pops in any order
#[derive(Debug, Clone, Copy, Arbitrary)]
enum DequeOps<T> {
    PushFront(T),
    PopFront,
    PushBack(T),
    PopBack,
}

// everything that moves elements around, with positions reduced modulo the current length
#[derive(Debug, Clone, Arbitrary)]
enum EditOps<T> {
    PushFront(T),
    PopFront,
    PushBack(T),
    PopBack,
    Insert(usize, T),
    Remove(usize),
    Resize(u8, T),
    Truncate(u8),
}

fn apply_push_pop<T>(deque: &mut Deque<T>, model: &mut VecDeque<T>, op: DequeOps<T>)
where
    T: Clone + PartialEq + std::fmt::Debug,
{
    match op {
        DequeOps::PushFront(item) => {
            deque.push_front(item.clone());
            model.push_front(item);
        }
        DequeOps::PopFront => assert_eq!(deque.pop_front(), model.pop_front()),
        DequeOps::PushBack(item) => {
            deque.push_back(item.clone());
            model.push_back(item);
        }
        DequeOps::PopBack => assert_eq!(deque.pop_back(), model.pop_back()),
    }
}

fn apply_edit<T>(deque: &mut Deque<T>, model: &mut VecDeque<T>, op: EditOps<T>)
where
    T: Clone + PartialEq + std::fmt::Debug,
{
    match op {
        EditOps::PushFront(item) => {
            deque.push_front(item.clone());
            model.push_front(item);
        }
        EditOps::PopFront => assert_eq!(deque.pop_front(), model.pop_front()),
        EditOps::PushBack(item) => {
            deque.push_back(item.clone());
            model.push_back(item);
        }
        EditOps::PopBack => assert_eq!(deque.pop_back(), model.pop_back()),
        EditOps::Insert(index, item) => {
            let index = index % (model.len() + 1);
            deque.insert(index, item.clone());
            model.insert(index, item);
        }
        EditOps::Remove(index) => {
            if !model.is_empty() {
                let index = index % model.len();
                assert_eq!(deque.remove(index), model.remove(index).unwrap());
            }
        }
        EditOps::Resize(len, item) => {
            let len = len as usize % 64;
            deque.resize(len, item.clone());
            model.resize(len, item);
        }
        EditOps::Truncate(len) => {
            let len = len as usize % 64;
            deque.truncate(len);
            model.truncate(len);
        }
    }
}

proptest! {
    // no combination of pushes and pops of String panics
    #[test]
    fn test_push_pop_string(
        ref ops in proptest::collection::vec(any::<DequeOps<String>>(), 0..200)
    ) {
        let mut deque = Deque::new();
        let mut model = VecDeque::new();
        for op in ops.iter() {
            apply_push_pop(&mut deque, &mut model, op.clone());
        }
        prop_assert_eq!(deque.len(), model.len());
    }

    // every index matches the model after any sequence of pushes and pops
    #[test]
    fn test_push_pop_indices(ref ops in proptest::collection::vec(any::<DequeOps<i32>>(), 0..300)) {
        let mut deque = Deque::new();
        let mut model = VecDeque::new();
        for &op in ops.iter() {
            apply_push_pop(&mut deque, &mut model, op);
            let accounted = deque.space_front() + deque.len() + deque.space_back();
            prop_assert_eq!(accounted, deque.capacity());
        }
        prop_assert_eq!(deque.len(), model.len());
        for (i, expected) in model.iter().enumerate() {
            prop_assert_eq!(&deque[i], expected);
            prop_assert_eq!(deque.get_checked(i), Ok(expected));
        }
        prop_assert!(deque.iter().eq(model.iter()));
        prop_assert!(deque.iter().rev().eq(model.iter().rev()));
    }

    // inserts, removes, and resizes agree with the model
    #[test]
    fn test_edit_ops(ref ops in proptest::collection::vec(any::<EditOps<i16>>(), 0..200)) {
        let mut deque = Deque::new();
        let mut model = VecDeque::new();
        for op in ops.iter() {
            apply_edit(&mut deque, &mut model, op.clone());
        }
        let model_slice = model.make_contiguous();
        prop_assert_eq!(&deque, &*model_slice);
    }

    // checked access fails exactly at the length
    #[test]
    fn test_checked_access_boundary(len in 0usize..80, value in any::<u8>()) {
        let deque = Deque::from_elem(len, value);
        prop_assert_eq!(deque.get_checked(len), Err(RangeError { index: len, len }));
        if len > 0 {
            prop_assert_eq!(deque.get_checked(len - 1), Ok(&value));
        }
    }

    // a clone is equal and owns its elements
    #[test]
    fn test_clone_independence(
        ref values in proptest::collection::vec(any::<String>(), 0..60),
        extra in any::<String>()
    ) {
        let original: Deque<String> = values.iter().cloned().collect();
        let mut copy = original.clone();
        prop_assert_eq!(&copy, &original);
        prop_assert_eq!(copy.block_count(), settings::blocks_for(values.len()));
        copy.push_front(extra.clone());
        if let Some(first) = copy.get_mut(1) {
            first.push('!');
        }
        prop_assert_eq!(&original, values);
    }

    // clone_from gives the same contents whichever storage path it takes
    #[test]
    fn test_clone_from(
        ref target in proptest::collection::vec(any::<i32>(), 0..50),
        ref source in proptest::collection::vec(any::<i32>(), 0..50),
        pops in 0usize..20
    ) {
        let mut deque: Deque<i32> = target.iter().copied().collect();
        for _ in 0..pops {
            deque.pop_front();
        }
        let source: Deque<i32> = source.iter().copied().collect();
        deque.clone_from(&source);
        prop_assert_eq!(&deque, &source);
    }

    // ordering agrees with the ordering of the same elements in a Vec
    #[test]
    fn test_ordering_matches_vec(
        ref a in proptest::collection::vec(0u8..4, 0..25),
        ref b in proptest::collection::vec(0u8..4, 0..25)
    ) {
        let deque_a: Deque<u8> = a.iter().copied().collect();
        let deque_b: Deque<u8> = b.iter().copied().collect();
        prop_assert_eq!(deque_a.cmp(&deque_b), a.cmp(b));
        prop_assert_eq!(deque_a == deque_b, a == b);
    }

    // the size hint is exact at every step of a mixed front and back walk
    #[test]
    fn test_size_hint(
        len in 0usize..50,
        ref from_back in proptest::collection::vec(any::<bool>(), 0..60)
    ) {
        let deque: Deque<usize> = (0..len).collect();
        let mut iter = deque.iter();
        let mut remaining = len;
        for &back in from_back.iter() {
            prop_assert_eq!(iter.size_hint(), (remaining, Some(remaining)));
            let item = if back { iter.next_back() } else { iter.next() };
            prop_assert_eq!(item.is_some(), remaining > 0);
            remaining = remaining.saturating_sub(1);
        }
    }
}
