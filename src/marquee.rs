//! Rubber-band selection over empty canvas.

#[cfg(test)]
#[path = "marquee_test.rs"]
mod marquee_test;

use crate::doc::{ElementId, ElementStore};
use crate::geometry::{Bounds, Point, bounds_from_corners, bounds_intersect};
use crate::selection::expand_groups;

/// An in-progress marquee, anchored where the pointer went down.
#[derive(Debug, Clone, PartialEq)]
pub struct Marquee {
    /// Canvas-space pointer-down position.
    pub anchor: Point,
    /// Latest processed pointer position.
    pub current: Point,
    /// Shift was held at start: the result is unioned with `prior`.
    pub additive: bool,
    /// Committed selection when the marquee started.
    pub prior: Vec<ElementId>,
}

impl Marquee {
    #[must_use]
    pub fn new(anchor: Point, additive: bool, prior: Vec<ElementId>) -> Self {
        Self { anchor, current: anchor, additive, prior }
    }

    #[must_use]
    pub fn rect(&self) -> Bounds {
        bounds_from_corners(self.anchor, self.current)
    }

    /// The pointer never moved off the anchor: a plain click, not a marquee.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        let r = self.rect();
        r.width() == 0.0 && r.height() == 0.0
    }

    /// Elements whose rotation-aware bounds touch the rectangle, plus their group
    /// mates, in paint order. Empty for a degenerate marquee.
    #[must_use]
    pub fn preview(&self, store: &ElementStore) -> Vec<ElementId> {
        if self.is_degenerate() {
            return Vec::new();
        }
        let rect = self.rect();
        let hits: Vec<ElementId> = store
            .sorted()
            .into_iter()
            .filter(|e| bounds_intersect(&e.visual_bounds(), &rect))
            .map(|e| e.id)
            .collect();
        expand_groups(&hits, store)
    }

    /// Selection to commit on pointer-up, or `None` for a degenerate marquee.
    #[must_use]
    pub fn commit(&self, store: &ElementStore) -> Option<Vec<ElementId>> {
        if self.is_degenerate() {
            return None;
        }
        let preview = self.preview(store);
        if !self.additive {
            return Some(preview);
        }
        let mut ids = self.prior.clone();
        for id in preview {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Some(ids)
    }
}
