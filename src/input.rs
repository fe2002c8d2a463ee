//! Input model: modifier keys, buttons, pointer targets, and the gesture state machine.
//!
//! The host reports pointer and keyboard events with these types. `InputState`
//! is the gesture tracked between pointer-down and pointer-up. Every active
//! variant carries the geometry captured at pointer-down plus the working copy
//! rebuilt from it on each frame, so a cancel only has to drop the variant.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::doc::{ElementId, Geometry};
use crate::geometry::Point;
use crate::hit::{HitPart, ResizeAnchor};
use crate::marquee::Marquee;
use crate::resize::ResizeMode;
use crate::snap::SnapGuide;

/// Keyboard modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    /// Alt / Option.
    pub alt: bool,
    /// Meta / Command.
    pub meta: bool,
}

impl Modifiers {
    #[must_use]
    pub fn is_held(self, key: ModifierKey) -> bool {
        match key {
            ModifierKey::Shift => self.shift,
            ModifierKey::Ctrl => self.ctrl,
            ModifierKey::Alt => self.alt,
            ModifierKey::Meta => self.meta,
        }
    }

    /// Platform shortcut modifier: Ctrl or Meta.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// A single modifier, used to bind behaviors in [`EngineConfig`](crate::config::EngineConfig).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierKey {
    Shift,
    Ctrl,
    Alt,
    Meta,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button, pen contact, or single-finger touch.
    Primary,
    Middle,
    Secondary,
}

/// A keyboard key as named by the host (e.g. `"Escape"`, `"ArrowLeft"`, `"z"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// What a pointer-down landed on, resolved by the host or by [`hit_test`](crate::hit::hit_test).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// Empty canvas.
    Canvas,
    /// The body of an element.
    Body(ElementId),
    /// A resize or rotate handle. For a multi-selection `id` is any selected element.
    Handle { id: ElementId, part: HitPart },
}

/// The gesture currently being tracked.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Moving the selection.
    Dragging {
        /// Canvas-space pointer position at pointer-down.
        origin: Point,
        /// Geometry of every participant at pointer-down.
        start: Vec<(ElementId, Geometry)>,
        /// Uncommitted geometry shown while the gesture runs.
        working: Vec<(ElementId, Geometry)>,
        guides: Vec<SnapGuide>,
    },
    /// Dragging one of the eight resize handles.
    Resizing {
        anchor: ResizeAnchor,
        /// How a multi-selection distributes the resize. Ignored for one element.
        mode: ResizeMode,
        origin: Point,
        start: Vec<(ElementId, Geometry)>,
        working: Vec<(ElementId, Geometry)>,
        guides: Vec<SnapGuide>,
    },
    /// Dragging the rotate handle.
    Rotating {
        /// Rotation pivot: the element center, or the selection box center.
        pivot: Point,
        /// Pointer angle around `pivot` at pointer-down, in degrees.
        start_angle: f64,
        start: Vec<(ElementId, Geometry)>,
        working: Vec<(ElementId, Geometry)>,
    },
    /// Rubber-band selection over empty canvas.
    Marquee(Marquee),
}

impl InputState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Ids of the elements the gesture is transforming.
    #[must_use]
    pub fn participants(&self) -> Vec<ElementId> {
        match self {
            Self::Dragging { start, .. } | Self::Resizing { start, .. } | Self::Rotating { start, .. } => {
                start.iter().map(|(id, _)| *id).collect()
            }
            Self::Idle | Self::Marquee(_) => Vec::new(),
        }
    }

    /// Working geometry for `id`, if the gesture is transforming it.
    #[must_use]
    pub fn working_geometry(&self, id: &ElementId) -> Option<Geometry> {
        match self {
            Self::Dragging { working, .. } | Self::Resizing { working, .. } | Self::Rotating { working, .. } => {
                working.iter().find(|(wid, _)| wid == id).map(|(_, g)| *g)
            }
            Self::Idle | Self::Marquee(_) => None,
        }
    }

    /// Guides fired on the last processed frame.
    #[must_use]
    pub fn guides(&self) -> &[SnapGuide] {
        match self {
            Self::Dragging { guides, .. } | Self::Resizing { guides, .. } => guides,
            Self::Idle | Self::Rotating { .. } | Self::Marquee(_) => &[],
        }
    }
}
