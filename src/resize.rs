//! Handle-driven resize math for single elements and multi-selections.

#[cfg(test)]
#[path = "resize_test.rs"]
mod resize_test;

use serde::{Deserialize, Serialize};

use crate::doc::{ElementId, Geometry};
use crate::geometry::{Point, add_points, bounds_union, rotate_point};
use crate::hit::ResizeAnchor;

/// How a multi-selection distributes a resize across its members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeMode {
    /// Uniform scale: every member keeps its aspect ratio and relative offset.
    #[default]
    Proportional,
    /// Axes scale independently.
    Free,
}

/// Resize `start` by dragging `anchor` through `delta` (canvas units).
///
/// The delta is taken into the element's local frame, so handles behave the
/// same under rotation, and the opposite handle stays fixed in canvas space.
/// Each dimension clamps to exactly `min_size`. With `aspect_lock` the start
/// ratio is kept: corner handles follow the larger relative change, edge
/// handles drive the other dimension about the fixed edge's midpoint.
#[must_use]
pub fn calculate_resize(anchor: ResizeAnchor, start: &Geometry, delta: Point, aspect_lock: bool, min_size: f64) -> Geometry {
    resize_with_limits(anchor, start, delta, aspect_lock, min_size, min_size)
}

/// Resize a group of elements by dragging a handle of their combined box.
///
/// The box is the union of the members' rotation-aware bounds. It is clamped
/// so no member ends up smaller than `min_size`. Members are repositioned
/// about their centers; in `Free` mode a rotated member's width and height
/// are scaled by the box's x and y factors respectively.
#[must_use]
pub fn calculate_multi_resize(
    anchor: ResizeAnchor,
    members: &[(ElementId, Geometry)],
    delta: Point,
    mode: ResizeMode,
    min_size: f64,
) -> Vec<(ElementId, Geometry)> {
    let Some(group) = bounds_union(members.iter().map(|(_, g)| g.visual_bounds())) else {
        return Vec::new();
    };
    let (gw, gh) = (group.width(), group.height());
    if gw <= 0.0 || gh <= 0.0 {
        return members.to_vec();
    }

    let min_sx = members.iter().map(|(_, g)| min_size / g.width).fold(0.0, f64::max);
    let min_sy = members.iter().map(|(_, g)| min_size / g.height).fold(0.0, f64::max);
    let group_geometry = Geometry::new(group.left, group.top, gw, gh, 0.0);
    let resized = resize_with_limits(
        anchor,
        &group_geometry,
        delta,
        mode == ResizeMode::Proportional,
        gw * min_sx,
        gh * min_sy,
    );
    let sx = resized.width / gw;
    let sy = resized.height / gh;

    members
        .iter()
        .map(|(id, g)| {
            let c = g.center();
            let cx = resized.x + (c.x - group.left) * sx;
            let cy = resized.y + (c.y - group.top) * sy;
            let w = (g.width * sx).max(min_size);
            let h = (g.height * sy).max(min_size);
            (*id, Geometry::new(cx - w / 2.0, cy - h / 2.0, w, h, g.rotation))
        })
        .collect()
}

fn resize_with_limits(
    anchor: ResizeAnchor,
    start: &Geometry,
    delta: Point,
    aspect_lock: bool,
    min_w: f64,
    min_h: f64,
) -> Geometry {
    let (sx, sy) = anchor.signs();
    let local = rotate_point(delta, Point::default(), -start.rotation);

    let mut w = if sx == 0.0 { start.width } else { start.width + sx * local.x };
    let mut h = if sy == 0.0 { start.height } else { start.height + sy * local.y };

    if aspect_lock && start.width > 0.0 && start.height > 0.0 {
        let scale = if anchor.is_corner() {
            (w / start.width).max(h / start.height)
        } else if sx == 0.0 {
            h / start.height
        } else {
            w / start.width
        };
        let scale = scale.max(min_w / start.width).max(min_h / start.height);
        w = start.width * scale;
        h = start.height * scale;
    } else {
        w = w.max(min_w);
        h = h.max(min_h);
    }

    let shift = Point::new(sx * (w - start.width) / 2.0, sy * (h - start.height) / 2.0);
    let center = add_points(start.center(), rotate_point(shift, Point::default(), start.rotation));
    Geometry::new(center.x - w / 2.0, center.y - h / 2.0, w, h, start.rotation)
}
