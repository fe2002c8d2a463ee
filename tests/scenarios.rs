//! End-to-end behaviour of the public API: geometry laws, snapping, paint
//! order, history round trips, and full pointer gestures through `Editor`.
#![allow(clippy::float_cmp)]

use kanva::geometry::{Point, Size, create_bounds, get_bounds_center, get_bounds_size, rotate_point};
use kanva::input::{Button, Modifiers};
use kanva::snap::{GuideAxis, SnapOptions, SnapTarget, snap_position};
use kanva::{Action, Editor, Element, ElementKind, EngineConfig, Geometry};
use serde_json::json;
use uuid::Uuid;

const EPSILON: f64 = 1e-9;

fn init_tracing() {
    // Several tests race to install the subscriber; only the first wins.
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn rect(x: f64, y: f64, w: f64, h: f64, z: f64) -> Element {
    Element::new(ElementKind::Shape, Geometry::new(x, y, w, h, 0.0), z, json!({}))
}

fn editor(config: EngineConfig, elements: Vec<Element>) -> Editor {
    init_tracing();
    let mut ed = Editor::new(config, Size::new(1000.0, 1000.0));
    ed.load_snapshot(elements);
    ed
}

fn snapshot(ed: &Editor) -> Vec<Element> {
    ed.store().sorted().into_iter().cloned().collect()
}

fn none() -> Modifiers {
    Modifiers::default()
}

// =============================================================
// Geometry laws
// =============================================================

#[test]
fn rotation_round_trips() {
    let center = Point::new(13.0, -7.5);
    for &(x, y) in &[(0.0, 0.0), (100.0, 50.0), (-42.5, 3.25), (13.0, -7.5)] {
        for &theta in &[0.0, 15.0, 90.0, 133.7, 270.0, -45.0, 721.0] {
            let p = Point::new(x, y);
            let back = rotate_point(rotate_point(p, center, theta), center, -theta);
            assert!((back.x - p.x).abs() < EPSILON && (back.y - p.y).abs() < EPSILON, "{p:?} at {theta}");
        }
    }
}

#[test]
fn bounds_round_trip() {
    let b = create_bounds(12.5, -4.0, 30.0, 8.0);
    let center = get_bounds_center(&b);
    let size = get_bounds_size(&b);
    assert_eq!((size.width, size.height), (30.0, 8.0));
    assert_eq!(center.x - size.width / 2.0, 12.5);
    assert_eq!(center.y - size.height / 2.0, -4.0);
}

// =============================================================
// Snapping
// =============================================================

fn sibling_at(left: f64) -> [SnapTarget; 1] {
    [SnapTarget { id: Uuid::new_v4(), bounds: create_bounds(left, 300.0, 50.0, 50.0) }]
}

const OPTIONS: SnapOptions = SnapOptions { threshold: 8.0, grid_size: None };

#[test]
fn snapping_on_target_is_idempotent() {
    let others = sibling_at(106.0);
    let moving = create_bounds(106.0, 100.0, 50.0, 50.0);
    let result = snap_position(&moving, &others, Size::new(1000.0, 1000.0), &OPTIONS);
    assert_eq!((result.x, result.y), (106.0, 100.0));
    assert_eq!(result.guides.len(), 1);
    assert_eq!(result.guides[0].position, 106.0);
}

#[test]
fn snap_threshold_boundary() {
    let others = sibling_at(106.0);
    let canvas = Size::new(1000.0, 1000.0);

    let outside = snap_position(&create_bounds(106.0 - 8.0 - 1e-3, 100.0, 50.0, 50.0), &others, canvas, &OPTIONS);
    assert_eq!(outside.x, 106.0 - 8.0 - 1e-3);
    assert!(outside.guides.is_empty());

    let inside = snap_position(&create_bounds(106.0 - 8.0 + 1e-3, 100.0, 50.0, 50.0), &others, canvas, &OPTIONS);
    assert!((inside.x - 106.0).abs() < EPSILON);
    assert_eq!(inside.guides.len(), 1);
}

// =============================================================
// Pointer gestures
// =============================================================

#[test]
fn drag_snaps_to_sibling_left_edge() {
    let a = rect(100.0, 100.0, 50.0, 50.0, 0.0);
    let b = rect(106.0, 300.0, 50.0, 50.0, 1.0);
    let mut ed = editor(EngineConfig::default(), vec![a.clone(), b]);

    ed.on_pointer_down(Point::new(120.0, 120.0), Button::Primary, none());
    assert_eq!(ed.on_pointer_move(Point::new(124.0, 120.0), none()), vec![Action::FrameRequested]);
    ed.on_animation_frame(16.0);

    let working = ed.display_geometry(&a.id).unwrap();
    assert_eq!((working.x, working.y), (106.0, 100.0));
    assert_eq!(ed.guides().len(), 1);
    assert_eq!(ed.guides()[0].axis, GuideAxis::Vertical);
    assert_eq!(ed.guides()[0].position, 106.0);
    assert_eq!(ed.element(&a.id).map(|e| e.x), Some(100.0), "store untouched mid-gesture");

    let actions = ed.on_pointer_up(Point::new(124.0, 120.0), Button::Primary, none());
    assert_eq!(actions.iter().filter(|a| matches!(a, Action::Committed(_))).count(), 1);
    assert_eq!(ed.element(&a.id).map(|e| e.x), Some(106.0));
    assert!(ed.is_idle());
    assert!(ed.guides().is_empty());
}

#[test]
fn resize_clamps_to_minimum_size() {
    let a = rect(100.0, 100.0, 50.0, 50.0, 0.0);
    let config = EngineConfig { snap_enabled: false, ..EngineConfig::default() };
    let mut ed = editor(config, vec![a.clone()]);

    // Click to select, then grab the east handle and drag far past the west edge.
    ed.on_pointer_down(Point::new(120.0, 120.0), Button::Primary, none());
    ed.on_pointer_up(Point::new(120.0, 120.0), Button::Primary, none());
    assert!(ed.selection().contains(&a.id));
    assert_eq!(ed.history().undo_len(), 0);

    ed.on_pointer_down(Point::new(150.0, 125.0), Button::Primary, none());
    ed.on_pointer_up(Point::new(20.0, 125.0), Button::Primary, none());

    let element = ed.element(&a.id).unwrap();
    assert_eq!(element.width, 1.0);
    assert_eq!(element.x, 100.0);
    assert_eq!(element.height, 50.0);
}

#[test]
fn marquee_selects_intersecting_elements() {
    let first = rect(0.0, 0.0, 10.0, 10.0, 0.0);
    let second = rect(20.0, 20.0, 10.0, 10.0, 1.0);
    let third = rect(5.0, 5.0, 3.0, 3.0, 2.0);
    let mut ed = editor(EngineConfig::default(), vec![first.clone(), second.clone(), third.clone()]);

    // Drag from the empty corner (12, 12) back to the origin: rectangle {0, 0, 12, 12}.
    ed.on_pointer_down(Point::new(12.0, 12.0), Button::Primary, none());
    ed.on_pointer_move(Point::new(0.0, 0.0), none());
    ed.on_animation_frame(16.0);
    assert_eq!(ed.marquee_rect(), Some(create_bounds(0.0, 0.0, 12.0, 12.0)));
    assert_eq!(ed.marquee_preview(), vec![first.id, third.id]);
    assert!(ed.selection().is_empty(), "preview is not committed");

    ed.on_pointer_up(Point::new(0.0, 0.0), Button::Primary, none());
    assert_eq!(ed.selection().ids(), [first.id, third.id]);
    assert!(!ed.selection().contains(&second.id));
}

// =============================================================
// Paint order
// =============================================================

#[test]
fn bring_to_front_then_normalize() {
    let els: Vec<Element> = (0..4).map(|i| rect(f64::from(i) * 20.0, 0.0, 10.0, 10.0, f64::from(i))).collect();
    let mut ed = editor(EngineConfig::default(), els.clone());

    ed.set_selection(vec![els[1].id]);
    ed.bring_to_front();
    let front = ed.element(&els[1].id).map_or(f64::NAN, |e| e.z_index);
    assert!(els.iter().filter(|e| e.id != els[1].id).all(|e| ed.element(&e.id).is_some_and(|o| o.z_index < front)));

    ed.set_selection(vec![els[0].id]);
    ed.bring_forward();
    ed.bring_forward();
    let order: Vec<_> = snapshot(&ed).iter().map(|e| e.id).collect();

    let saved = ed.prepare_save();
    assert_eq!(saved.iter().map(|e| e.id).collect::<Vec<_>>(), order);
    for (e, z) in saved.iter().zip((0u32..).map(f64::from)) {
        assert_eq!(e.z_index, z);
    }
}

// =============================================================
// History
// =============================================================

#[test]
fn undo_redo_round_trip_reproduces_final_state() {
    let mut ed = editor(EngineConfig::default(), Vec::new());
    let a = rect(0.0, 0.0, 10.0, 10.0, 0.0);
    let b = rect(50.0, 0.0, 10.0, 10.0, 0.0);
    let c = rect(100.0, 0.0, 10.0, 10.0, 0.0);

    ed.add_element(a.clone());
    ed.nudge(5.0, 0.0);
    ed.add_element(b.clone());
    ed.add_element(c.clone());
    ed.set_selection(vec![a.id, b.id]);
    ed.group_selection();
    ed.set_selection(vec![c.id]);
    ed.send_to_back();
    ed.set_payload(&b.id, json!({ "fill": "red" }));
    ed.set_selection(vec![a.id]);
    ed.delete_selection();

    let final_state = snapshot(&ed);
    let n = ed.history().undo_len();
    assert_eq!(n, 8);
    assert_eq!(final_state.len(), 1, "a and its group mate b are gone");

    for _ in 0..n {
        assert!(ed.undo().iter().any(|a| matches!(a, Action::Undone(_))));
    }
    assert!(ed.store().is_empty());
    assert!(ed.undo().is_empty(), "undo past the bottom is a no-op");

    for _ in 0..n {
        assert!(ed.redo().iter().any(|a| matches!(a, Action::Redone(_))));
    }
    assert_eq!(snapshot(&ed), final_state);
}

#[test]
fn new_command_after_undo_clears_redo() {
    let a = rect(0.0, 0.0, 10.0, 10.0, 0.0);
    let mut ed = editor(EngineConfig::default(), vec![a.clone()]);
    ed.set_selection(vec![a.id]);
    ed.nudge(3.0, 0.0);
    ed.undo();
    assert!(ed.history().can_redo());

    ed.nudge(0.0, 4.0);
    assert!(!ed.history().can_redo());
    assert!(ed.redo().is_empty());
    assert_eq!(ed.element(&a.id).map(|e| (e.x, e.y)), Some((0.0, 4.0)));
}
