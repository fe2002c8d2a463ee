#![allow(clippy::float_cmp)]

use serde_json::json;
use uuid::Uuid;

use super::*;
use crate::doc::{Element, ElementKind};
use crate::geometry::create_bounds;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn member(x: f64, y: f64, w: f64, h: f64, rotation: f64) -> (ElementId, Geometry) {
    (Uuid::new_v4(), Geometry::new(x, y, w, h, rotation))
}

fn target(x: f64, y: f64, w: f64, h: f64) -> SnapTarget {
    SnapTarget { id: Uuid::new_v4(), bounds: create_bounds(x, y, w, h) }
}

fn ctx<'a>(others: &'a [SnapTarget], canvas: f64) -> SnapContext<'a> {
    SnapContext { others, canvas: Size::new(canvas, canvas), options: SnapOptions { threshold: 8.0, grid_size: None } }
}

const ANGLES: [f64; 8] = [0.0, 45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0];

// =============================================================
// Seeding helpers
// =============================================================

#[test]
fn seed_and_targets_split_the_store() {
    let a = Element::new(ElementKind::Shape, Geometry::new(0.0, 0.0, 10.0, 10.0, 0.0), 0.0, json!({}));
    let b = Element::new(ElementKind::Text, Geometry::new(50.0, 0.0, 10.0, 10.0, 0.0), 1.0, json!({}));
    let mut store = ElementStore::new();
    store.load_snapshot(vec![a.clone(), b.clone()]);

    let seeded = seed(&store, &[a.id, Uuid::new_v4()]);
    assert_eq!(seeded, vec![(a.id, a.geometry())]);
    let targets = snap_targets(&store, &[a.id]);
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].id, b.id);
}

#[test]
fn pivot_for_one_and_many() {
    assert_eq!(rotation_pivot(&[]), None);
    let one = [member(0.0, 0.0, 10.0, 20.0, 30.0)];
    assert_eq!(rotation_pivot(&one), Some(Point::new(5.0, 10.0)));
    let many = [member(0.0, 0.0, 10.0, 10.0, 0.0), member(90.0, 40.0, 10.0, 10.0, 0.0)];
    assert_eq!(rotation_pivot(&many), Some(Point::new(50.0, 25.0)));
}

// =============================================================
// drag_frame
// =============================================================

#[test]
fn drag_translates_every_member() {
    let start = [member(0.0, 0.0, 10.0, 10.0, 0.0), member(30.0, 5.0, 10.0, 10.0, 45.0)];
    let frame = drag_frame(&start, Point::new(5.0, -3.0), None);
    assert_eq!(frame.working[0].1, Geometry::new(5.0, -3.0, 10.0, 10.0, 0.0));
    assert_eq!(frame.working[1].1, Geometry::new(35.0, 2.0, 10.0, 10.0, 45.0));
    assert!(frame.guides.is_empty());
}

#[test]
fn drag_snaps_left_edge_to_sibling() {
    let start = [member(100.0, 100.0, 50.0, 50.0, 0.0)];
    let others = [target(106.0, 300.0, 50.0, 50.0)];
    let frame = drag_frame(&start, Point::new(4.0, 0.0), Some(&ctx(&others, 1000.0)));
    assert_eq!(frame.working[0].1.x, 106.0);
    assert_eq!(frame.working[0].1.y, 100.0);
    assert_eq!(frame.guides.len(), 1);
    assert_eq!(frame.guides[0].position, 106.0);
}

#[test]
fn multi_drag_snaps_as_one_box() {
    let start = [member(0.0, 300.0, 10.0, 10.0, 0.0), member(30.0, 300.0, 10.0, 10.0, 0.0)];
    let frame = drag_frame(&start, Point::new(2.5, 0.0), Some(&ctx(&[], 1000.0)));
    assert_eq!(frame.working[0].1.x, 0.0);
    assert_eq!(frame.working[1].1.x, 30.0);
}

// =============================================================
// resize_frame
// =============================================================

#[test]
fn single_resize_without_snap() {
    let start = [member(0.0, 0.0, 50.0, 40.0, 0.0)];
    let frame = resize_frame(ResizeAnchor::E, ResizeMode::Proportional, false, &start, Point::new(7.0, 0.0), 1.0, None);
    assert_eq!(frame.working[0].1, Geometry::new(0.0, 0.0, 57.0, 40.0, 0.0));
}

#[test]
fn single_resize_snaps_dragged_edge() {
    let start = [member(100.0, 100.0, 50.0, 40.0, 0.0)];
    let others = [target(160.0, 5000.0, 10.0, 10.0)];
    let frame = resize_frame(
        ResizeAnchor::E,
        ResizeMode::Proportional,
        false,
        &start,
        Point::new(7.0, 0.0),
        1.0,
        Some(&ctx(&others, 10_000.0)),
    );
    assert!(approx_eq(frame.working[0].1.width, 60.0));
    assert_eq!(frame.working[0].1.x, 100.0);
    assert_eq!(frame.guides.len(), 1);
    assert_eq!(frame.guides[0].alignment, Alignment::End);
}

#[test]
fn aspect_locked_resize_does_not_snap() {
    let start = [member(100.0, 100.0, 50.0, 40.0, 0.0)];
    let others = [target(160.0, 5000.0, 10.0, 10.0)];
    let frame = resize_frame(
        ResizeAnchor::E,
        ResizeMode::Proportional,
        true,
        &start,
        Point::new(7.0, 0.0),
        1.0,
        Some(&ctx(&others, 10_000.0)),
    );
    assert!(approx_eq(frame.working[0].1.width, 57.0));
    assert!(approx_eq(frame.working[0].1.height, 45.6));
    assert!(frame.guides.is_empty());
}

#[test]
fn clamped_resize_drops_stale_guide() {
    let start = [member(100.0, 100.0, 50.0, 40.0, 0.0)];
    let others = [target(152.0, 5000.0, 10.0, 10.0)];
    let frame = resize_frame(
        ResizeAnchor::W,
        ResizeMode::Proportional,
        false,
        &start,
        Point::new(60.0, 0.0),
        1.0,
        Some(&ctx(&others, 10_000.0)),
    );
    assert_eq!(frame.working[0].1.width, 1.0);
    assert_eq!(frame.working[0].1.x, 149.0);
    assert!(frame.guides.is_empty());
}

#[test]
fn multi_resize_scales_members() {
    let start = [member(0.0, 0.0, 10.0, 10.0, 0.0), member(90.0, 90.0, 10.0, 10.0, 0.0)];
    let frame = resize_frame(ResizeAnchor::Se, ResizeMode::Proportional, false, &start, Point::new(100.0, 100.0), 1.0, None);
    assert!(approx_eq(frame.working[1].1.x, 180.0));
    assert!(approx_eq(frame.working[1].1.width, 20.0));
}

// =============================================================
// rotate_frame
// =============================================================

#[test]
fn single_rotation_follows_pointer_and_snaps() {
    let start = [member(0.0, 0.0, 100.0, 50.0, 0.0)];
    let pivot = Point::new(50.0, 25.0);
    let start_angle = angle_between(pivot, Point::new(50.0, -100.0));
    let pointer = Point::new(175.0, 30.0);

    let free = rotate_frame(&start, pivot, start_angle, pointer, None);
    assert!(free[0].1.rotation > 92.0 && free[0].1.rotation < 93.0);
    assert_eq!((free[0].1.x, free[0].1.y), (0.0, 0.0));

    let snapped = rotate_frame(&start, pivot, start_angle, pointer, Some(RotationSnap { angles: &ANGLES, threshold: 5.0 }));
    assert_eq!(snapped[0].1.rotation, 90.0);
}

#[test]
fn multi_rotation_orbits_pivot() {
    let start = [member(0.0, 0.0, 10.0, 10.0, 0.0), member(20.0, 0.0, 10.0, 10.0, 10.0)];
    let pivot = Point::new(15.0, 5.0);
    let start_angle = angle_between(pivot, Point::new(25.0, 5.0));
    let out = rotate_frame(&start, pivot, start_angle, Point::new(5.0, 5.0), None);
    assert!(approx_eq(out[0].1.x, 20.0) && approx_eq(out[0].1.y, 0.0));
    assert!(approx_eq(out[1].1.x, 0.0) && approx_eq(out[1].1.y, 0.0));
    assert!(approx_eq(out[0].1.rotation, 180.0));
    assert!(approx_eq(out[1].1.rotation, 190.0));
}

// =============================================================
// geometry_changes
// =============================================================

#[test]
fn changes_skip_untouched_members() {
    let start = [member(0.0, 0.0, 10.0, 10.0, 0.0), member(20.0, 0.0, 10.0, 10.0, 0.0)];
    let mut working = start.to_vec();
    working[0].1.x += 1e-9;
    working[1].1.y += 4.0;
    let changes = geometry_changes(&start, &working);
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].id(), start[1].0);
}

#[test]
fn click_without_motion_yields_nothing() {
    let start = [member(0.0, 0.0, 10.0, 10.0, 0.0)];
    let frame = drag_frame(&start, pointer_delta(Point::new(3.0, 3.0), Point::new(3.0, 3.0)), None);
    assert!(geometry_changes(&start, &frame.working).is_empty());
}
