//! Document model: canvas elements and the in-memory element collection.
//!
//! This module defines what sits on the canvas (`Element`, `ElementKind`), the
//! geometry subset the engine manipulates (`Geometry`), and the store that owns
//! every live element (`ElementStore`).
//!
//! Data flows into the store from the host (snapshot hydration, remote
//! updates) and from command application. Nothing else writes to it: the store's
//! mutators are crate-private and called only by the command history and the
//! editor's remote-sync entry points.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::SIZE_TOLERANCE;
use crate::error::EngineError;
use crate::geometry::{Bounds, Point, create_bounds, rotated_bounds};
use crate::zorder::ZEntry;

/// Unique identifier for a canvas element.
pub type ElementId = Uuid;

/// The kind of payload an element carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    Image,
    Shape,
}

/// Position, size, and rotation of an element.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Geometry {
    /// Left edge of the unrotated box in canvas coordinates.
    pub x: f64,
    /// Top edge of the unrotated box in canvas coordinates.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Clockwise rotation in degrees about the box center, in `[0, 360)`.
    pub rotation: f64,
}

impl Geometry {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64, rotation: f64) -> Self {
        Self { x, y, width, height, rotation }
    }

    /// Unrotated bounds.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        create_bounds(self.x, self.y, self.width, self.height)
    }

    /// Axis-aligned box enclosing the rotated element.
    #[must_use]
    pub fn visual_bounds(&self) -> Bounds {
        rotated_bounds(&self.bounds(), self.rotation)
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether any field differs from `other` by more than `epsilon`.
    #[must_use]
    pub fn differs_from(&self, other: &Self, epsilon: f64) -> bool {
        (self.x - other.x).abs() > epsilon
            || (self.y - other.y).abs() > epsilon
            || (self.width - other.width).abs() > epsilon
            || (self.height - other.height).abs() > epsilon
            || (self.rotation - other.rotation).abs() > epsilon
    }

    /// Check finiteness, minimum size, and rotation range.
    ///
    /// # Errors
    ///
    /// Returns `Validation` describing the first violated invariant.
    pub fn validate(&self, id: ElementId, min_size: f64) -> Result<(), EngineError> {
        let fields = [self.x, self.y, self.width, self.height, self.rotation];
        if fields.iter().any(|v| !v.is_finite()) {
            return Err(EngineError::validation(id, "geometry contains a non-finite value"));
        }
        if self.width < min_size - SIZE_TOLERANCE {
            return Err(EngineError::validation(id, format!("width {} below minimum {min_size}", self.width)));
        }
        if self.height < min_size - SIZE_TOLERANCE {
            return Err(EngineError::validation(id, format!("height {} below minimum {min_size}", self.height)));
        }
        if !(0.0..360.0).contains(&self.rotation) {
            return Err(EngineError::validation(id, format!("rotation {} outside [0, 360)", self.rotation)));
        }
        Ok(())
    }
}

/// An element as stored in the document and handed to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub kind: ElementKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Clockwise rotation in degrees around the bounding-box center.
    pub rotation: f64,
    /// Paint order; lower values are drawn beneath higher values.
    pub z_index: f64,
    /// Group this element belongs to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<ElementId>,
    /// Kind-specific content (text runs, image source, shape style). Opaque here.
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl Element {
    /// Build an element with a fresh id.
    #[must_use]
    pub fn new(kind: ElementKind, geometry: Geometry, z_index: f64, payload: serde_json::Value) -> Self {
        let mut element = Self {
            id: Uuid::new_v4(),
            kind,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            rotation: 0.0,
            z_index,
            group_id: None,
            payload,
        };
        element.set_geometry(&geometry);
        element
    }

    #[must_use]
    pub fn geometry(&self) -> Geometry {
        Geometry::new(self.x, self.y, self.width, self.height, self.rotation)
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.geometry().bounds()
    }

    /// Rotation-aware axis-aligned bounds.
    #[must_use]
    pub fn visual_bounds(&self) -> Bounds {
        self.geometry().visual_bounds()
    }

    pub(crate) fn set_geometry(&mut self, g: &Geometry) {
        self.x = g.x;
        self.y = g.y;
        self.width = g.width;
        self.height = g.height;
        self.rotation = g.rotation;
    }
}

/// In-memory collection of live elements.
///
/// Each id is stamped with an insertion sequence the first time it is seen.
/// The stamp survives removal so an element restored by undo keeps its place
/// among elements sharing its `z_index`.
#[derive(Debug, Clone, Default)]
pub struct ElementStore {
    elements: HashMap<ElementId, Element>,
    order: HashMap<ElementId, u64>,
    next_seq: u64,
}

impl ElementStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace everything with a host snapshot. Slice order becomes insertion order.
    pub fn load_snapshot(&mut self, elements: Vec<Element>) {
        self.elements.clear();
        self.order.clear();
        self.next_seq = 0;
        for element in elements {
            self.insert(element);
        }
    }

    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &ElementId) -> bool {
        self.elements.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterate elements in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    /// Insertion sequence of an id, if it was ever stored.
    #[must_use]
    pub fn sequence_of(&self, id: &ElementId) -> Option<u64> {
        self.order.get(id).copied()
    }

    /// All elements in paint order: ascending `z_index`, ties by insertion order.
    #[must_use]
    pub fn sorted(&self) -> Vec<&Element> {
        let mut out: Vec<&Element> = self.elements.values().collect();
        out.sort_by(|a, b| {
            a.z_index
                .total_cmp(&b.z_index)
                .then_with(|| self.seq(&a.id).cmp(&self.seq(&b.id)))
        });
        out
    }

    /// Paint-order snapshot for the z-order manager.
    #[must_use]
    pub fn z_entries(&self) -> Vec<ZEntry> {
        self.sorted()
            .into_iter()
            .map(|e| ZEntry { id: e.id, z: e.z_index, seq: self.seq(&e.id) })
            .collect()
    }

    #[must_use]
    pub fn max_z(&self) -> Option<f64> {
        self.elements.values().map(|e| e.z_index).reduce(f64::max)
    }

    #[must_use]
    pub fn min_z(&self) -> Option<f64> {
        self.elements.values().map(|e| e.z_index).reduce(f64::min)
    }

    /// `z_index` for a newly added element: one above the current maximum.
    #[must_use]
    pub fn next_z_index(&self) -> f64 {
        self.max_z().map_or(0.0, |z| z + 1.0)
    }

    /// Members of a group in paint order.
    #[must_use]
    pub fn group_members(&self, group_id: &ElementId) -> Vec<ElementId> {
        self.sorted()
            .into_iter()
            .filter(|e| e.group_id.as_ref() == Some(group_id))
            .map(|e| e.id)
            .collect()
    }

    fn seq(&self, id: &ElementId) -> u64 {
        self.order.get(id).copied().unwrap_or(u64::MAX)
    }

    // --- Crate-private mutation ---

    /// Insert or replace an element.
    pub(crate) fn insert(&mut self, element: Element) {
        if !self.order.contains_key(&element.id) {
            self.order.insert(element.id, self.next_seq);
            self.next_seq += 1;
        }
        self.elements.insert(element.id, element);
    }

    pub(crate) fn remove(&mut self, id: &ElementId) -> Option<Element> {
        self.elements.remove(id)
    }

    pub(crate) fn set_geometry(&mut self, id: &ElementId, geometry: &Geometry) -> bool {
        let Some(element) = self.elements.get_mut(id) else {
            return false;
        };
        element.set_geometry(geometry);
        true
    }

    pub(crate) fn set_z_index(&mut self, id: &ElementId, z: f64) -> bool {
        let Some(element) = self.elements.get_mut(id) else {
            return false;
        };
        element.z_index = z;
        true
    }

    pub(crate) fn set_group(&mut self, id: &ElementId, group_id: Option<ElementId>) -> bool {
        let Some(element) = self.elements.get_mut(id) else {
            return false;
        };
        element.group_id = group_id;
        true
    }

    pub(crate) fn set_payload(&mut self, id: &ElementId, payload: serde_json::Value) -> bool {
        let Some(element) = self.elements.get_mut(id) else {
            return false;
        };
        element.payload = payload;
        true
    }
}
