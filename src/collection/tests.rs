//! Tests for collection module

use super::*;
use crate::error::Error;
use crate::types::{CountCapability, KeyOp, KeyOrdering, SortDirection};
use pretty_assertions::assert_eq;
use std::cell::OnceCell;
use std::rc::Rc;

// ============================================================================
// VecCollection Tests
// ============================================================================

#[test]
fn test_vec_collection_slice() {
    let collection = VecCollection::from_keys(0..50);

    assert_eq!(collection.slice(0, 3).unwrap(), vec![0, 1, 2]);
    assert_eq!(collection.slice(18, 20).unwrap(), vec![18, 19]);
    assert_eq!(collection.slice(48, 60).unwrap(), vec![48, 49]);
    assert!(collection.slice(60, 70).unwrap().is_empty());
}

#[test]
fn test_vec_collection_sorts_on_creation() {
    let collection = VecCollection::from_keys(vec![5, 1, 4, 2, 3]);
    assert_eq!(collection.slice(0, 10).unwrap(), vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_vec_collection_filter_and_order() {
    let collection = VecCollection::from_keys(0..10);

    let after = collection.filter_key(KeyOp::Gte, &7);
    assert_eq!(after.slice(0, 10).unwrap(), vec![7, 8, 9]);
    assert_eq!(after.count().unwrap(), Some(3));

    let before = collection
        .filter_key(KeyOp::Lte, &3)
        .order_by("id", SortDirection::Desc)
        .unwrap();
    assert_eq!(before.keys(0, 10).unwrap(), vec![3, 2, 1, 0]);

    // Original view is untouched
    assert_eq!(collection.count().unwrap(), Some(10));
}

#[test]
fn test_vec_collection_order_by_unknown_key() {
    let collection = VecCollection::from_keys(0..10);
    let result = collection.order_by("created", SortDirection::Asc);
    assert!(matches!(result, Err(Error::Config { .. })));
}

#[test]
fn test_vec_collection_count_capability() {
    let collection =
        VecCollection::from_keys(0..500).with_count_capability(CountCapability::Unsupported);

    assert_eq!(collection.count().unwrap(), None);
    assert_eq!(collection.count_up_to(100).unwrap(), 100);
    assert_eq!(collection.count_up_to(1000).unwrap(), 500);
}

#[test]
fn test_vec_collection_insert_and_remove() {
    let mut collection = VecCollection::from_keys(vec![1, 3, 5]);
    let snapshot = collection.clone();

    collection.insert(4);
    collection.remove(&1);

    assert_eq!(collection.slice(0, 10).unwrap(), vec![3, 4, 5]);
    assert_eq!(snapshot.slice(0, 10).unwrap(), vec![1, 3, 5]);
}

#[test]
fn test_vec_collection_struct_items() {
    #[derive(Debug, Clone, PartialEq)]
    struct Comment {
        id: i64,
        body: &'static str,
    }

    let collection = VecCollection::new(
        vec![
            Comment { id: 2, body: "second" },
            Comment { id: 1, body: "first" },
        ],
        KeyOrdering::unique("id").with_direction(SortDirection::Desc),
        |c: &Comment| c.id,
    );

    let items = collection.slice(0, 1).unwrap();
    assert_eq!(items[0].body, "second");
    assert_eq!(collection.unique_key_name(), Some("id".to_string()));
}

#[test]
fn test_non_unique_key_name() {
    let collection = VecCollection::new(vec![1, 1, 2], KeyOrdering::non_unique("score"), |k| *k);
    assert_eq!(collection.unique_key_name(), None);
}

// ============================================================================
// Decorated Tests
// ============================================================================

#[test]
fn test_decorated_applies_hook_on_slice() {
    let decorated = Decorated::new(VecCollection::from_keys(0..10), |item: &mut i64| {
        *item *= 100;
    });

    assert_eq!(decorated.slice(0, 3).unwrap(), vec![0, 100, 200]);
    // Keys come from the undecorated collection
    assert_eq!(decorated.keys(0, 3).unwrap(), vec![0, 1, 2]);
}

#[test]
fn test_decorated_keeps_hook_through_filters() {
    let decorated = Decorated::new(VecCollection::from_keys(0..10), |item: &mut i64| {
        *item = -*item;
    });

    let filtered = decorated.filter_key(KeyOp::Gte, &8);
    assert_eq!(filtered.slice(0, 5).unwrap(), vec![-8, -9]);

    let reversed = decorated.order_by("id", SortDirection::Desc).unwrap();
    assert_eq!(reversed.slice(0, 2).unwrap(), vec![-9, -8]);
}

// ============================================================================
// Unwrap Tests
// ============================================================================

#[test]
fn test_unwrap_raw_collection() {
    let collection = VecCollection::from_keys(0..5);
    let unwrapped = unwrap_collection(&collection, 10).unwrap();

    assert_eq!(unwrapped.depth, 0);
    assert_eq!(unwrapped.raw.count().unwrap(), Some(5));
}

#[test]
fn test_unwrap_nested_decorators() {
    let inner = VecCollection::from_keys(0..5);
    let once = Decorated::new(inner, |item: &mut i64| *item += 1);
    let twice = Decorated::new(once, |item: &mut i64| *item *= 2);

    let unwrapped = unwrap_collection(&twice, 10).unwrap();
    assert_eq!(unwrapped.depth, 2);
    assert_eq!(unwrapped.raw.slice(0, 2).unwrap(), vec![0, 1]);
    assert_eq!(unwrapped.source.slice(0, 2).unwrap(), vec![2, 4]);
}

#[test]
fn test_unwrap_depth_limit() {
    let inner = VecCollection::from_keys(0..5);
    let once = Decorated::new(inner, |_: &mut i64| {});
    let twice = Decorated::new(once, |_: &mut i64| {});

    assert!(unwrap_collection(&twice, 2).is_ok());
    assert!(matches!(
        unwrap_collection(&twice, 1),
        Err(Error::UnwrapLoop { max_depth: 1 })
    ));
}

/// Proxy whose inner layer is set after construction so it can form cycles
struct Proxy {
    next: OnceCell<Rc<Proxy>>,
}

impl Unwrap for Proxy {
    type Raw = VecCollection<i64>;

    fn inner(&self) -> Layer<'_, Self::Raw> {
        match self.next.get() {
            Some(next) => Layer::Wrapped(next.as_ref()),
            None => Layer::Wrapped(self),
        }
    }
}

#[test]
fn test_unwrap_self_loop() {
    let proxy = Proxy {
        next: OnceCell::new(),
    };

    let result = unwrap_collection(&proxy, 10);
    assert!(matches!(result, Err(Error::UnwrapLoop { max_depth: 10 })));
}

#[test]
fn test_unwrap_two_step_cycle() {
    let a = Rc::new(Proxy {
        next: OnceCell::new(),
    });
    let b = Rc::new(Proxy {
        next: OnceCell::new(),
    });
    let _ = a.next.set(Rc::clone(&b));
    let _ = b.next.set(Rc::clone(&a));

    let result = unwrap_collection(a.as_ref(), 10);
    assert!(matches!(result, Err(Error::UnwrapLoop { .. })));
}
