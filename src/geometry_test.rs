#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// =============================================================
// Vector arithmetic
// =============================================================

#[test]
fn add_subtract_scale() {
    let a = Point::new(1.0, 2.0);
    let b = Point::new(3.0, -4.0);
    assert_eq!(add_points(a, b), Point::new(4.0, -2.0));
    assert_eq!(subtract_points(a, b), Point::new(-2.0, 6.0));
    assert_eq!(scale_point(b, 0.5), Point::new(1.5, -2.0));
}

#[test]
fn distance_is_euclidean() {
    assert_eq!(distance_between(Point::new(0.0, 0.0), Point::new(3.0, 4.0)), 5.0);
}

// =============================================================
// Angles
// =============================================================

#[test]
fn normalize_degrees_wraps() {
    assert_eq!(normalize_degrees(370.0), 10.0);
    assert_eq!(normalize_degrees(-90.0), 270.0);
    assert_eq!(normalize_degrees(360.0), 0.0);
    assert!(normalize_degrees(-1e-20) < 360.0);
}

#[test]
fn angular_distance_takes_short_way() {
    assert_eq!(angular_distance(350.0, 10.0), 20.0);
    assert_eq!(angular_distance(10.0, 350.0), 20.0);
    assert_eq!(angular_distance(0.0, 180.0), 180.0);
}

#[test]
fn angle_between_cardinal_directions() {
    let c = Point::new(10.0, 10.0);
    assert!(approx_eq(angle_between(c, Point::new(20.0, 10.0)), 0.0));
    assert!(approx_eq(angle_between(c, Point::new(10.0, 20.0)), 90.0));
    assert!(approx_eq(angle_between(c, Point::new(0.0, 10.0)), 180.0));
    assert!(approx_eq(angle_between(c, Point::new(10.0, 0.0)), 270.0));
}

#[test]
fn rotate_point_quarter_turn() {
    let r = rotate_point(Point::new(10.0, 0.0), Point::new(0.0, 0.0), 90.0);
    assert!(point_approx_eq(r, Point::new(0.0, 10.0)));
}

#[test]
fn rotate_point_inverse_round_trip() {
    let center = Point::new(-3.5, 12.25);
    for i in 0..36 {
        let theta = f64::from(i) * 17.3 - 200.0;
        let p = Point::new(f64::from(i) * 2.5 - 40.0, 7.0 - f64::from(i));
        let back = rotate_point(rotate_point(p, center, theta), center, -theta);
        assert!(point_approx_eq(back, p), "theta={theta} p={p:?} back={back:?}");
    }
}

// =============================================================
// Bounds
// =============================================================

#[test]
fn bounds_round_trip() {
    let b = create_bounds(10.0, 20.0, 30.0, 40.0);
    let c = get_bounds_center(&b);
    let s = get_bounds_size(&b);
    assert_eq!(s, Size::new(30.0, 40.0));
    assert_eq!(c.x - s.width / 2.0, 10.0);
    assert_eq!(c.y - s.height / 2.0, 20.0);
}

#[test]
fn bounds_from_corners_normalizes() {
    let b = bounds_from_corners(Point::new(10.0, 2.0), Point::new(-4.0, 8.0));
    assert_eq!(b, Bounds { left: -4.0, top: 2.0, right: 10.0, bottom: 8.0 });
}

#[test]
fn intersect_overlapping() {
    let a = create_bounds(0.0, 0.0, 10.0, 10.0);
    let b = create_bounds(5.0, 5.0, 10.0, 10.0);
    assert!(bounds_intersect(&a, &b));
    assert!(bounds_intersect(&b, &a));
}

#[test]
fn intersect_touching_edges_counts() {
    let a = create_bounds(0.0, 0.0, 10.0, 10.0);
    let b = create_bounds(10.0, 0.0, 10.0, 10.0);
    assert!(bounds_intersect(&a, &b));
}

#[test]
fn intersect_disjoint_on_one_axis() {
    let a = create_bounds(0.0, 0.0, 10.0, 10.0);
    let b = create_bounds(5.0, 10.5, 10.0, 10.0);
    assert!(!bounds_intersect(&a, &b));
}

#[test]
fn contains_point_closed() {
    let b = create_bounds(0.0, 0.0, 10.0, 10.0);
    assert!(bounds_contains_point(&b, Point::new(10.0, 10.0)));
    assert!(!bounds_contains_point(&b, Point::new(10.1, 5.0)));
}

#[test]
fn contains_bounds() {
    let outer = create_bounds(0.0, 0.0, 10.0, 10.0);
    assert!(bounds_contains_bounds(&outer, &create_bounds(2.0, 2.0, 8.0, 8.0)));
    assert!(!bounds_contains_bounds(&outer, &create_bounds(2.0, 2.0, 9.0, 8.0)));
}

#[test]
fn union_of_many() {
    let u = bounds_union([create_bounds(0.0, 0.0, 1.0, 1.0), create_bounds(5.0, -2.0, 1.0, 1.0)]).unwrap();
    assert_eq!(u, Bounds { left: 0.0, top: -2.0, right: 6.0, bottom: 1.0 });
    assert!(bounds_union(std::iter::empty()).is_none());
}

#[test]
fn translate_shifts_all_edges() {
    let b = create_bounds(1.0, 2.0, 3.0, 4.0).translate(10.0, -1.0);
    assert_eq!(b, create_bounds(11.0, 1.0, 3.0, 4.0));
}

// =============================================================
// Rotation-aware tests
// =============================================================

#[test]
fn rotated_bounds_quarter_turn_swaps_extent() {
    let b = create_bounds(0.0, 0.0, 100.0, 20.0);
    let r = rotated_bounds(&b, 90.0);
    assert!(approx_eq(r.width(), 20.0));
    assert!(approx_eq(r.height(), 100.0));
    assert!(approx_eq(r.center_x(), 50.0));
    assert!(approx_eq(r.center_y(), 10.0));
}

#[test]
fn rotated_bounds_zero_is_identity() {
    let b = create_bounds(3.0, 4.0, 5.0, 6.0);
    assert_eq!(rotated_bounds(&b, 360.0), b);
}

#[test]
fn point_in_rotated_rect() {
    // 100x20 bar rotated 90° becomes a vertical bar around (50, 10).
    let b = create_bounds(0.0, 0.0, 100.0, 20.0);
    assert!(is_point_in_rotated_rect(Point::new(50.0, 50.0), &b, 90.0));
    assert!(!is_point_in_rotated_rect(Point::new(90.0, 10.0), &b, 90.0));
    assert!(is_point_in_rotated_rect(Point::new(90.0, 10.0), &b, 0.0));
}
