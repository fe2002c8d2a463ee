//! Working-copy math for drag, resize, and rotate gestures.
//!
//! A gesture follows a seed / apply / commit lifecycle:
//!
//! 1. **Seed**: capture the geometry of every participant at pointer-down.
//! 2. **Apply**: on each processed frame, rebuild the working copy from the
//!    seed and the total pointer delta, then snap it. Nothing is accumulated
//!    frame to frame, so dropped or coalesced moves lose no precision.
//! 3. **Commit**: diff the working copy against the seed and turn whatever
//!    moved into geometry changes for a single command.
//!
//! Everything here is pure; the editor owns the state.

#[cfg(test)]
#[path = "gesture_test.rs"]
mod gesture_test;

use crate::consts::GEOMETRY_EPSILON;
use crate::doc::{ElementId, ElementStore, Geometry};
use crate::geometry::{
    Bounds, Point, Size, add_points, angle_between, bounds_union, get_bounds_center, normalize_degrees, rotate_point,
    subtract_points,
};
use crate::hit::ResizeAnchor;
use crate::history::ElementChange;
use crate::resize::{ResizeMode, calculate_multi_resize, calculate_resize};
use crate::snap::{Alignment, GuideAxis, SnapGuide, SnapOptions, SnapTarget, snap_edges, snap_position, snap_rotation};

/// Everything position snapping needs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct SnapContext<'a> {
    /// Non-participating elements.
    pub others: &'a [SnapTarget],
    pub canvas: Size,
    pub options: SnapOptions,
}

/// Rotation snap targets and threshold, in degrees.
#[derive(Debug, Clone, Copy)]
pub struct RotationSnap<'a> {
    pub angles: &'a [f64],
    pub threshold: f64,
}

/// Result of one processed frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub working: Vec<(ElementId, Geometry)>,
    pub guides: Vec<SnapGuide>,
}

/// Seed geometry for `ids`, skipping ids that are not in the store.
#[must_use]
pub fn seed(store: &ElementStore, ids: &[ElementId]) -> Vec<(ElementId, Geometry)> {
    ids.iter().filter_map(|id| store.get(id)).map(|e| (e.id, e.geometry())).collect()
}

/// Every element not taking part in the gesture, as snap targets.
#[must_use]
pub fn snap_targets(store: &ElementStore, participants: &[ElementId]) -> Vec<SnapTarget> {
    store
        .sorted()
        .into_iter()
        .filter(|e| !participants.contains(&e.id))
        .map(|e| SnapTarget { id: e.id, bounds: e.visual_bounds() })
        .collect()
}

/// Axis-aligned box around every participant's rotated frame.
#[must_use]
pub fn selection_box(members: &[(ElementId, Geometry)]) -> Option<Bounds> {
    bounds_union(members.iter().map(|(_, g)| g.visual_bounds()))
}

/// Rotation pivot: a lone element's center, or the center of the selection box.
#[must_use]
pub fn rotation_pivot(members: &[(ElementId, Geometry)]) -> Option<Point> {
    match members {
        [] => None,
        [(_, only)] => Some(only.center()),
        _ => selection_box(members).map(|b| get_bounds_center(&b)),
    }
}

/// Translate every participant by `delta`, then snap the group box as a unit.
#[must_use]
pub fn drag_frame(start: &[(ElementId, Geometry)], delta: Point, snap: Option<&SnapContext<'_>>) -> Frame {
    let moved: Vec<(ElementId, Geometry)> = start.iter().map(|(id, g)| (*id, translated(g, delta.x, delta.y))).collect();
    let (Some(ctx), Some(group)) = (snap, selection_box(&moved)) else {
        return Frame { working: moved, guides: Vec::new() };
    };
    let snapped = snap_position(&group, ctx.others, ctx.canvas, &ctx.options);
    let (dx, dy) = (snapped.x - group.left, snapped.y - group.top);
    let working = moved.iter().map(|(id, g)| (*id, translated(g, dx, dy))).collect();
    Frame { working, guides: snapped.guides }
}

/// Resize the participants by dragging `anchor` through `delta`.
///
/// One participant resizes in its own frame, honouring `aspect_lock`. Several
/// participants resize through their selection box per `mode`.
///
/// Snapping pulls only the dragged edges and only when the result is
/// unconstrained: an unrotated single element without aspect lock, or a
/// multi-selection in free mode. Guides that no longer sit on an edge after
/// the minimum-size clamp are dropped.
#[must_use]
pub fn resize_frame(
    anchor: ResizeAnchor,
    mode: ResizeMode,
    aspect_lock: bool,
    start: &[(ElementId, Geometry)],
    delta: Point,
    min_size: f64,
    snap: Option<&SnapContext<'_>>,
) -> Frame {
    let resize = |d: Point| -> Vec<(ElementId, Geometry)> {
        match start {
            [(id, only)] => vec![(*id, calculate_resize(anchor, only, d, aspect_lock, min_size))],
            _ => calculate_multi_resize(anchor, start, d, mode, min_size),
        }
    };
    let working = resize(delta);

    let unconstrained = match start {
        [(_, only)] => !aspect_lock && only.rotation == 0.0,
        _ => mode == ResizeMode::Free,
    };
    let (Some(ctx), true, Some(frame_box)) = (snap, unconstrained, selection_box(&working)) else {
        return Frame { working, guides: Vec::new() };
    };

    let (x_lines, y_lines) = dragged_lines(anchor);
    let edge = snap_edges(&frame_box, x_lines, y_lines, ctx.others, ctx.canvas, &ctx.options);
    if edge.dx == 0.0 && edge.dy == 0.0 {
        return Frame { working, guides: edge.guides };
    }
    let working = resize(add_points(delta, Point::new(edge.dx, edge.dy)));
    let guides = match selection_box(&working) {
        Some(b) => edge.guides.into_iter().filter(|g| guide_on_box(g, &b)).collect(),
        None => Vec::new(),
    };
    Frame { working, guides }
}

/// Rotate the participants about `pivot` by the pointer's angular travel.
///
/// A lone element snaps its absolute rotation; a multi-selection snaps the
/// angle delta, treating the group as starting at 0°.
#[must_use]
pub fn rotate_frame(
    start: &[(ElementId, Geometry)],
    pivot: Point,
    start_angle: f64,
    pointer: Point,
    snap: Option<RotationSnap<'_>>,
) -> Vec<(ElementId, Geometry)> {
    let raw = angle_between(pivot, pointer) - start_angle;
    let snapped = |deg: f64| snap.map_or(normalize_degrees(deg), |s| snap_rotation(deg, s.angles, s.threshold));

    if let [(id, only)] = start {
        let rotation = snapped(only.rotation + raw);
        return vec![(*id, Geometry { rotation, ..*only })];
    }

    let delta = snapped(raw);
    start
        .iter()
        .map(|(id, g)| {
            let c = rotate_point(g.center(), pivot, delta);
            let rotation = normalize_degrees(g.rotation + delta);
            (*id, Geometry::new(c.x - g.width / 2.0, c.y - g.height / 2.0, g.width, g.height, rotation))
        })
        .collect()
}

/// Geometry changes for every participant that moved by more than the epsilon.
#[must_use]
pub fn geometry_changes(start: &[(ElementId, Geometry)], working: &[(ElementId, Geometry)]) -> Vec<ElementChange> {
    start
        .iter()
        .filter_map(|(id, before)| {
            let (_, after) = working.iter().find(|(wid, _)| wid == id)?;
            after
                .differs_from(before, GEOMETRY_EPSILON)
                .then_some(ElementChange::Geometry { id: *id, before: *before, after: *after })
        })
        .collect()
}

/// Pointer travel from the gesture origin.
#[must_use]
pub fn pointer_delta(origin: Point, current: Point) -> Point {
    subtract_points(current, origin)
}

fn translated(g: &Geometry, dx: f64, dy: f64) -> Geometry {
    Geometry { x: g.x + dx, y: g.y + dy, ..*g }
}

/// Box lines a handle drags, per axis.
fn dragged_lines(anchor: ResizeAnchor) -> (&'static [Alignment], &'static [Alignment]) {
    let (sx, sy) = anchor.signs();
    (axis_line(sx), axis_line(sy))
}

fn axis_line(sign: f64) -> &'static [Alignment] {
    if sign < 0.0 {
        &[Alignment::Start]
    } else if sign > 0.0 {
        &[Alignment::End]
    } else {
        &[]
    }
}

fn guide_on_box(guide: &SnapGuide, b: &Bounds) -> bool {
    let line = match (guide.axis, guide.alignment) {
        (GuideAxis::Vertical, Alignment::Start) => b.left,
        (GuideAxis::Vertical, Alignment::Center) => b.center_x(),
        (GuideAxis::Vertical, Alignment::End) => b.right,
        (GuideAxis::Horizontal, Alignment::Start) => b.top,
        (GuideAxis::Horizontal, Alignment::Center) => b.center_y(),
        (GuideAxis::Horizontal, Alignment::End) => b.bottom,
    };
    (line - guide.position).abs() <= GEOMETRY_EPSILON
}
