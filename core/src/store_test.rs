use super::*;
use crate::Vec;
use crate::values::ValueArena;

fn ids(n: usize) -> Vec<ValueId> {
    let mut arena = ValueArena::default();
    (0..n as i64).map(|i| arena.acquire(i)).collect()
}

#[test]
fn test_bind_and_lookup_global() {
    let ids = ids(2);
    let mut store = VariableStore::new();

    assert_eq!(store.bind(Scope::Global, "x", ids[0]), None);
    assert_eq!(store.lookup(Scope::Global, "x"), Some(ids[0]));
    assert_eq!(store.lookup(Scope::Global, "y"), None);

    // Rebinding overwrites and hands back the displaced value.
    assert_eq!(store.bind(Scope::Global, "x", ids[1]), Some(ids[0]));
    assert_eq!(store.lookup(Scope::Global, "x"), Some(ids[1]));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_sections_are_created_enabled() {
    let ids = ids(1);
    let mut store = VariableStore::new();

    assert!(!store.has_section("s"));
    assert!(!store.is_section_enabled("s"));
    assert!(!store.set_section_enabled("s", true), "unknown section");

    store.bind(Scope::Section("s"), "x", ids[0]);
    assert!(store.has_section("s"));
    assert!(store.is_section_enabled("s"));

    assert!(store.set_section_enabled("s", false));
    assert!(!store.is_section_enabled("s"));
    assert!(store.set_section_enabled("s", true));
    assert!(store.is_section_enabled("s"));
}

#[test]
fn test_scopes_are_independent() {
    let ids = ids(2);
    let mut store = VariableStore::new();
    store.bind(Scope::Global, "x", ids[0]);
    store.bind(Scope::Section("s"), "x", ids[1]);

    assert_eq!(store.lookup(Scope::Global, "x"), Some(ids[0]));
    assert_eq!(store.lookup(Scope::Section("s"), "x"), Some(ids[1]));
    assert_eq!(store.lookup(Scope::Section("t"), "x"), None);
    assert_eq!(store.len(), 2);
}

#[test]
fn test_lookup_with_fallback() {
    let ids = ids(3);
    let mut store = VariableStore::new();
    store.bind(Scope::Global, "shared", ids[0]);
    store.bind(Scope::Global, "global_only", ids[1]);
    store.bind(Scope::Section("s"), "shared", ids[2]);

    assert_eq!(store.lookup_with_fallback(Some("s"), "shared"), Some(ids[2]));
    assert_eq!(store.lookup_with_fallback(Some("s"), "global_only"), Some(ids[1]));
    assert_eq!(store.lookup_with_fallback(None, "shared"), Some(ids[0]));
    assert_eq!(store.lookup_with_fallback(Some("s"), "missing"), None);

    // A disabled section is never consulted.
    store.set_section_enabled("s", false);
    assert_eq!(store.lookup_with_fallback(Some("s"), "shared"), Some(ids[0]));
}

#[test]
fn test_values_and_clear() {
    let ids = ids(3);
    let mut store = VariableStore::new();
    store.bind(Scope::Global, "a", ids[0]);
    store.bind(Scope::Section("s"), "b", ids[1]);
    store.bind(Scope::Section("t"), "c", ids[2]);

    let mut bound: Vec<_> = store.values().map(|id| id.index()).collect();
    bound.sort();
    assert_eq!(bound, [ids[0].index(), ids[1].index(), ids[2].index()]);

    store.clear();
    assert!(store.is_empty());
    assert!(!store.has_section("s"));
    assert_eq!(store.lookup(Scope::Global, "a"), None);
}

#[test]
fn test_scope_display_name() {
    assert_eq!(Scope::Global.display_name(), "<Global>");
    assert_eq!(Scope::Section("nav").display_name(), "nav");
    assert_eq!(Scope::from_section(None), Scope::Global);
    assert_eq!(Scope::from_section(Some("nav")), Scope::Section("nav"));
}
