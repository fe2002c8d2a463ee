//! Geometry kernel: points, sizes, axis-aligned bounds, and rotation math.
//!
//! All functions are pure and operate on plain values. Angles are in degrees;
//! positive angles rotate clockwise on screen (y grows downward), matching how
//! element `rotation` is applied about its bounding-box center.
//!
//! Interval convention: bounds are closed. Touching edges intersect and a point
//! on an edge is contained, so a marquee that merely touches an element selects it.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

/// A point (or vector) in canvas or screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height. Also used for the canvas dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Bounds {
    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    #[must_use]
    pub fn center_x(&self) -> f64 {
        (self.left + self.right) / 2.0
    }

    #[must_use]
    pub fn center_y(&self) -> f64 {
        (self.top + self.bottom) / 2.0
    }

    /// Shift by `(dx, dy)`.
    #[must_use]
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self { left: self.left + dx, top: self.top + dy, right: self.right + dx, bottom: self.bottom + dy }
    }
}

// ── Vector arithmetic ───────────────────────────────────────────

#[must_use]
pub fn add_points(a: Point, b: Point) -> Point {
    Point::new(a.x + b.x, a.y + b.y)
}

#[must_use]
pub fn subtract_points(a: Point, b: Point) -> Point {
    Point::new(a.x - b.x, a.y - b.y)
}

#[must_use]
pub fn scale_point(p: Point, factor: f64) -> Point {
    Point::new(p.x * factor, p.y * factor)
}

#[must_use]
pub fn distance_between(a: Point, b: Point) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

// ── Angles ──────────────────────────────────────────────────────

/// Wrap an angle into `[0, 360)`.
#[must_use]
pub fn normalize_degrees(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Shortest unsigned angular distance between two angles, in `[0, 180]`.
#[must_use]
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let delta = (a - b).abs().rem_euclid(360.0);
    delta.min(360.0 - delta)
}

/// Angle of `p` as seen from `center`, in `[0, 360)`.
#[must_use]
pub fn angle_between(center: Point, p: Point) -> f64 {
    normalize_degrees((p.y - center.y).atan2(p.x - center.x).to_degrees())
}

/// Rotate `p` about `center` by `degrees`.
#[must_use]
pub fn rotate_point(p: Point, center: Point, degrees: f64) -> Point {
    if degrees == 0.0 {
        return p;
    }
    let (sin, cos) = degrees.to_radians().sin_cos();
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    Point::new(center.x + dx * cos - dy * sin, center.y + dx * sin + dy * cos)
}

// ── Bounds ──────────────────────────────────────────────────────

#[must_use]
pub fn create_bounds(x: f64, y: f64, width: f64, height: f64) -> Bounds {
    Bounds { left: x, top: y, right: x + width, bottom: y + height }
}

/// Normalized rectangle spanned by two corner points in any order.
#[must_use]
pub fn bounds_from_corners(a: Point, b: Point) -> Bounds {
    Bounds { left: a.x.min(b.x), top: a.y.min(b.y), right: a.x.max(b.x), bottom: a.y.max(b.y) }
}

#[must_use]
pub fn get_bounds_center(b: &Bounds) -> Point {
    Point::new(b.center_x(), b.center_y())
}

#[must_use]
pub fn get_bounds_size(b: &Bounds) -> Size {
    Size::new(b.width(), b.height())
}

/// True iff the rectangles overlap on both axes (closed intervals).
#[must_use]
pub fn bounds_intersect(a: &Bounds, b: &Bounds) -> bool {
    a.left <= b.right && b.left <= a.right && a.top <= b.bottom && b.top <= a.bottom
}

#[must_use]
pub fn bounds_contains_point(b: &Bounds, p: Point) -> bool {
    p.x >= b.left && p.x <= b.right && p.y >= b.top && p.y <= b.bottom
}

/// True iff `inner` lies entirely within `outer`.
#[must_use]
pub fn bounds_contains_bounds(outer: &Bounds, inner: &Bounds) -> bool {
    inner.left >= outer.left && inner.right <= outer.right && inner.top >= outer.top && inner.bottom <= outer.bottom
}

/// Smallest rectangle containing every input, or `None` for an empty input.
#[must_use]
pub fn bounds_union<I>(items: I) -> Option<Bounds>
where
    I: IntoIterator<Item = Bounds>,
{
    items.into_iter().reduce(|acc, b| Bounds {
        left: acc.left.min(b.left),
        top: acc.top.min(b.top),
        right: acc.right.max(b.right),
        bottom: acc.bottom.max(b.bottom),
    })
}

/// Axis-aligned box enclosing `b` rotated by `degrees` about its center.
#[must_use]
pub fn rotated_bounds(b: &Bounds, degrees: f64) -> Bounds {
    if normalize_degrees(degrees) == 0.0 {
        return *b;
    }
    let center = get_bounds_center(b);
    let corners = [
        Point::new(b.left, b.top),
        Point::new(b.right, b.top),
        Point::new(b.right, b.bottom),
        Point::new(b.left, b.bottom),
    ];
    let rotated = corners.map(|c| rotate_point(c, center, degrees));
    let mut out = bounds_from_corners(rotated[0], rotated[0]);
    for p in &rotated[1..] {
        out.left = out.left.min(p.x);
        out.top = out.top.min(p.y);
        out.right = out.right.max(p.x);
        out.bottom = out.bottom.max(p.y);
    }
    out
}

/// Hit-test `p` against `b` rotated by `degrees` about its center.
///
/// The point is inverse-rotated into the rectangle's local frame and tested
/// against the unrotated bounds.
#[must_use]
pub fn is_point_in_rotated_rect(p: Point, b: &Bounds, degrees: f64) -> bool {
    let local = rotate_point(p, get_bounds_center(b), -degrees);
    bounds_contains_point(b, local)
}
