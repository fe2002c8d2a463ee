#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use serde::{Deserialize, Serialize};

use crate::consts::{ZOOM_MAX, ZOOM_MIN};
use crate::geometry::Point;

/// Pan/zoom state mapping host client coordinates onto the canvas.
///
/// `pan_x` / `pan_y` are in screen pixels.
/// `zoom` is a scale factor (1.0 = canvas units equal screen pixels).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Viewport {
    /// Build a viewport, clamping zoom into the supported range.
    ///
    /// Non-finite zoom falls back to 1.0.
    #[must_use]
    pub fn new(pan_x: f64, pan_y: f64, zoom: f64) -> Self {
        let zoom = if zoom.is_finite() { zoom.clamp(ZOOM_MIN, ZOOM_MAX) } else { 1.0 };
        Self { pan_x, pan_y, zoom }
    }

    /// Convert a screen-space point (client pixels) to canvas coordinates.
    #[must_use]
    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        Point { x: (screen.x - self.pan_x) / self.zoom, y: (screen.y - self.pan_y) / self.zoom }
    }

    /// Convert a canvas point to screen coordinates.
    #[must_use]
    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        Point { x: canvas.x * self.zoom + self.pan_x, y: canvas.y * self.zoom + self.pan_y }
    }

    /// Convert a screen-space distance to canvas units.
    ///
    /// Snap thresholds and handle sizes go through here so they feel the same
    /// at every zoom level.
    #[must_use]
    pub fn screen_dist_to_canvas(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }
}
