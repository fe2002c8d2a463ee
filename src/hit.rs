#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use serde::{Deserialize, Serialize};

use crate::doc::ElementStore;
use crate::geometry::{
    Bounds, Point, bounds_union, distance_between, get_bounds_center, is_point_in_rotated_rect, rotate_point,
};
use crate::input::PointerTarget;
use crate::selection::Selection;

/// Which part of an element (or of the selection box) was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeAnchor),
    RotateHandle,
}

/// Anchor position for resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeAnchor {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeAnchor {
    /// Corners first so they win over edges on small elements.
    pub const ALL: [Self; 8] = [Self::Nw, Self::Ne, Self::Se, Self::Sw, Self::N, Self::E, Self::S, Self::W];

    /// Direction of the handle from the box center: `-1`, `0`, or `1` per axis.
    #[must_use]
    pub fn signs(self) -> (f64, f64) {
        match self {
            Self::N => (0.0, -1.0),
            Self::Ne => (1.0, -1.0),
            Self::E => (1.0, 0.0),
            Self::Se => (1.0, 1.0),
            Self::S => (0.0, 1.0),
            Self::Sw => (-1.0, 1.0),
            Self::W => (-1.0, 0.0),
            Self::Nw => (-1.0, -1.0),
        }
    }

    #[must_use]
    pub fn is_corner(self) -> bool {
        matches!(self, Self::Ne | Self::Se | Self::Sw | Self::Nw)
    }
}

/// Unrotated position of a resize handle.
#[must_use]
pub fn handle_position(b: &Bounds, anchor: ResizeAnchor) -> Point {
    let (sx, sy) = anchor.signs();
    Point::new(b.center_x() + sx * b.width() / 2.0, b.center_y() + sy * b.height() / 2.0)
}

/// Unrotated position of the rotate handle, `offset` above the top-center.
#[must_use]
pub fn rotate_handle_position(b: &Bounds, offset: f64) -> Point {
    Point::new(b.center_x(), b.top - offset)
}

/// Which handle of a (possibly rotated) box lies under `p`, if any.
///
/// `p` is moved into the box's local frame first so handles follow the
/// rotation. The rotate handle is checked before resize handles.
#[must_use]
pub fn get_handle_at_point(p: Point, b: &Bounds, rotation: f64, handle_size: f64, rotate_offset: f64) -> Option<HitPart> {
    let local = rotate_point(p, get_bounds_center(b), -rotation);
    if distance_between(local, rotate_handle_position(b, rotate_offset)) <= handle_size {
        return Some(HitPart::RotateHandle);
    }
    ResizeAnchor::ALL
        .into_iter()
        .find(|&anchor| distance_between(local, handle_position(b, anchor)) <= handle_size)
        .map(HitPart::ResizeHandle)
}

/// Resolve what lies under canvas point `p`.
///
/// Handles of the current selection take precedence: a single selected element
/// exposes handles on its rotated frame, a multi-selection exposes them on the
/// axis-aligned box around every member. Otherwise the topmost element whose
/// rotated body contains `p` is hit, falling back to the empty canvas.
#[must_use]
pub fn hit_test(p: Point, store: &ElementStore, selection: &Selection, handle_size: f64, rotate_offset: f64) -> PointerTarget {
    let selected: Vec<_> = selection.ids().iter().filter_map(|id| store.get(id)).collect();
    match selected.as_slice() {
        [] => {}
        [only] => {
            if let Some(part) = get_handle_at_point(p, &only.bounds(), only.rotation, handle_size, rotate_offset) {
                return PointerTarget::Handle { id: only.id, part };
            }
        }
        [first, ..] => {
            if let Some(group) = bounds_union(selected.iter().map(|e| e.visual_bounds())) {
                if let Some(part) = get_handle_at_point(p, &group, 0.0, handle_size, rotate_offset) {
                    return PointerTarget::Handle { id: first.id, part };
                }
            }
        }
    }

    store
        .sorted()
        .into_iter()
        .rev()
        .find(|e| is_point_in_rotated_rect(p, &e.bounds(), e.rotation))
        .map_or(PointerTarget::Canvas, |e| PointerTarget::Body(e.id))
}
