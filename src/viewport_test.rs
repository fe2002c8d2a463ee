#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn point_approx_eq(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON
}

#[test]
fn default_is_identity() {
    let vp = Viewport::default();
    let p = Point::new(12.0, -7.5);
    assert_eq!(vp.screen_to_canvas(p), p);
    assert_eq!(vp.canvas_to_screen(p), p);
}

#[test]
fn screen_to_canvas_with_pan_and_zoom() {
    let vp = Viewport::new(100.0, 50.0, 2.0);
    assert_eq!(vp.screen_to_canvas(Point::new(300.0, 250.0)), Point::new(100.0, 100.0));
}

#[test]
fn round_trip_screen_canvas() {
    let vp = Viewport::new(-33.0, 17.5, 0.75);
    let p = Point::new(123.4, -56.7);
    assert!(point_approx_eq(vp.screen_to_canvas(vp.canvas_to_screen(p)), p));
}

#[test]
fn distance_scales_inverse_to_zoom() {
    assert_eq!(Viewport::new(0.0, 0.0, 2.0).screen_dist_to_canvas(8.0), 4.0);
    assert_eq!(Viewport::new(0.0, 0.0, 0.5).screen_dist_to_canvas(8.0), 16.0);
}

#[test]
fn zoom_is_clamped() {
    assert_eq!(Viewport::new(0.0, 0.0, 0.0).zoom, ZOOM_MIN);
    assert_eq!(Viewport::new(0.0, 0.0, 1e9).zoom, ZOOM_MAX);
    assert_eq!(Viewport::new(0.0, 0.0, f64::NAN).zoom, 1.0);
}
