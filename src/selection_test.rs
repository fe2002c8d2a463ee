use serde_json::json;
use uuid::Uuid;

use super::*;
use crate::doc::{Element, ElementKind, Geometry};

fn element(z: f64) -> Element {
    Element::new(ElementKind::Shape, Geometry::new(0.0, 0.0, 10.0, 10.0, 0.0), z, json!({}))
}

// =============================================================
// Selection
// =============================================================

#[test]
fn set_dedups_and_reports_change() {
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    let mut s = Selection::new();
    assert!(s.set(vec![a, b, a]));
    assert_eq!(s.ids(), &[a, b]);
    assert!(!s.set(vec![a, b]));
    assert_eq!(s.len(), 2);
}

#[test]
fn add_remove_toggle() {
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    let mut s = Selection::new();
    assert!(s.add(a));
    assert!(!s.add(a));
    assert!(s.toggle(b));
    assert!(s.contains(&b));
    assert!(!s.toggle(b));
    assert!(!s.contains(&b));
    assert!(s.remove(&a));
    assert!(!s.remove(&a));
    assert!(s.is_empty());
}

#[test]
fn clear_reports_change_once() {
    let mut s = Selection::new();
    s.add(Uuid::new_v4());
    assert!(s.clear());
    assert!(!s.clear());
}

#[test]
fn union_appends_new_ids_in_order() {
    let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let mut s = Selection::new();
    s.set(vec![b]);
    assert!(s.union(&[a, b, c]));
    assert_eq!(s.ids(), &[b, a, c]);
    assert!(!s.union(&[c]));
}

#[test]
fn retain_present_drops_missing() {
    let e = element(0.0);
    let mut store = ElementStore::new();
    store.load_snapshot(vec![e.clone()]);
    let mut s = Selection::new();
    s.set(vec![e.id, Uuid::new_v4()]);
    assert!(s.retain_present(&store));
    assert_eq!(s.ids(), &[e.id]);
}

// =============================================================
// expand_groups
// =============================================================

#[test]
fn expand_groups_pulls_in_group_mates() {
    let group = Uuid::new_v4();
    let mut a = element(0.0);
    let mut b = element(1.0);
    let c = element(2.0);
    a.group_id = Some(group);
    b.group_id = Some(group);
    let mut store = ElementStore::new();
    store.load_snapshot(vec![a.clone(), b.clone(), c.clone()]);

    assert_eq!(expand_groups(&[b.id], &store), vec![b.id, a.id]);
    assert_eq!(expand_groups(&[c.id, a.id], &store), vec![c.id, a.id, b.id]);
}

#[test]
fn expand_groups_ignores_unknown_ids() {
    let store = ElementStore::new();
    let id = Uuid::new_v4();
    assert_eq!(expand_groups(&[id], &store), vec![id]);
}
