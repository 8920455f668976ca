//! Tests for the paged value arena.

use crate::values::{Value, ValueArena};
use crate::{String, Vec};

#[test]
fn test_acquire_and_get() {
    let mut arena = ValueArena::new(4, 16);
    assert!(arena.is_empty());
    assert_eq!(arena.page_count(), 0);

    let a = arena.acquire(7i64);
    let b = arena.acquire("seven");

    assert_eq!(arena.get(a), Some(&Value::Number(7)));
    assert_eq!(arena.get(b).and_then(Value::as_str), Some("seven"));
    assert_eq!(arena.len(), 2);
    assert_eq!(arena.page_count(), 1);
    assert_eq!(arena.capacity(), 4);
}

#[test]
fn test_pages_grow_geometrically_up_to_max() {
    let mut arena = ValueArena::new(2, 8);
    for n in 0..22i64 {
        arena.acquire(n);
    }
    assert_eq!(arena.page_count(), 4);
    assert_eq!(arena.capacity(), 22);

    arena.acquire(99i64);
    assert_eq!(arena.page_count(), 5);
    assert_eq!(arena.capacity(), 30);
}

#[test]
fn test_growth_keeps_existing_handles_valid() {
    let mut arena = ValueArena::new(1, 4);
    let ids: Vec<_> = (0..20i64).map(|n| arena.acquire(n)).collect();
    for (n, id) in ids.iter().enumerate() {
        assert_eq!(arena.get(*id).and_then(Value::as_number), Some(n as i64));
    }
}

#[test]
fn test_release_recycles_slot_and_invalidates_handle() {
    let mut arena = ValueArena::new(4, 4);
    let a = arena.acquire(1i64);
    let _b = arena.acquire(2i64);

    assert_eq!(arena.release(a), Some(Value::Number(1)));
    assert_eq!(arena.get(a), None);
    assert_eq!(arena.release(a), None, "double release must be rejected");

    // The freed slot is reused first, under a new generation.
    let c = arena.acquire(3i64);
    assert_eq!(c.index(), a.index());
    assert_ne!(c, a);
    assert_eq!(arena.get(a), None);
    assert_eq!(arena.get(c), Some(&Value::Number(3)));
    assert_eq!(arena.len(), 2);
    assert_eq!(arena.capacity(), 4);
}

#[test]
fn test_release_does_not_touch_list_elements() {
    let mut arena = ValueArena::default();
    let element = arena.acquire("shared");
    let list = arena.acquire(Value::List(crate::vec![element]));

    arena.release(list);
    assert_eq!(arena.get(element).and_then(Value::as_str), Some("shared"));
}

#[test]
fn test_reclaim_keeps_pages_and_invalidates_everything() {
    let mut arena = ValueArena::new(2, 4);
    let ids: Vec<_> = (0..5i64).map(|n| arena.acquire(n)).collect();
    let capacity = arena.capacity();
    let pages = arena.page_count();

    arena.reclaim();

    assert!(arena.is_empty());
    assert_eq!(arena.capacity(), capacity);
    assert_eq!(arena.page_count(), pages);
    assert!(ids.iter().all(|id| !arena.contains(*id)));

    // All the old slots are reused before any new page is needed.
    for n in 0..capacity as i64 {
        arena.acquire(n);
    }
    assert_eq!(arena.page_count(), pages);
}

#[test]
fn test_clear_returns_pages_and_keeps_handles_stale() {
    let mut arena = ValueArena::new(2, 4);
    let old = arena.acquire(String::from("old"));
    arena.clear();

    assert_eq!(arena.page_count(), 0);
    assert_eq!(arena.capacity(), 0);

    let new = arena.acquire(String::from("new"));
    assert_eq!(new.index(), old.index());
    assert_eq!(arena.get(old), None);
    assert_eq!(arena.get(new).and_then(Value::as_str), Some("new"));
}

#[test]
fn test_get_mut_overwrites_in_place() {
    let mut arena = ValueArena::default();
    let id = arena.acquire(Value::None);
    arena.get_mut(id).unwrap().set_string("filled");
    assert_eq!(arena.get(id).and_then(Value::as_str), Some("filled"));
}
