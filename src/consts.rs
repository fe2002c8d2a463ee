//! Shared numeric constants for the engine.

// ── Geometry ────────────────────────────────────────────────────

/// Tolerance used when deciding whether a gesture changed anything.
pub const GEOMETRY_EPSILON: f64 = 1e-6;

/// Slack allowed when validating sizes produced by proportional scaling.
pub const SIZE_TOLERANCE: f64 = 1e-9;

/// Default minimum element width/height in canvas units.
pub const DEFAULT_MIN_SIZE: f64 = 1.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels for resize handles.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// Distance from the bounding box top edge to the rotate handle, in screen pixels.
pub const ROTATE_HANDLE_OFFSET_PX: f64 = 24.0;

// ── Snapping ────────────────────────────────────────────────────

/// Position snap distance in screen pixels at 1:1 zoom.
pub const SNAP_THRESHOLD_PX: f64 = 8.0;

/// Rotation snap distance in degrees.
pub const ROTATION_SNAP_THRESHOLD_DEG: f64 = 5.0;

/// Angular step between the default rotation snap targets.
pub const ROTATION_SNAP_STEP_DEG: f64 = 45.0;

// ── Viewport ────────────────────────────────────────────────────

/// Smallest zoom factor accepted by the viewport.
pub const ZOOM_MIN: f64 = 0.01;

/// Largest zoom factor accepted by the viewport.
pub const ZOOM_MAX: f64 = 100.0;

// ── History ─────────────────────────────────────────────────────

/// Default maximum number of undo entries.
pub const DEFAULT_HISTORY_DEPTH: usize = 100;

/// Default window in which same-key commands coalesce.
pub const DEFAULT_MERGE_WINDOW_MS: f64 = 500.0;

// ── Z-order ─────────────────────────────────────────────────────

/// Fractional reorders allowed before indices are renumbered.
pub const DEFAULT_NORMALIZE_AFTER: u32 = 32;

// ── Keyboard ────────────────────────────────────────────────────

/// Arrow-key nudge distance in canvas units.
pub const NUDGE_STEP: f64 = 1.0;

/// Arrow-key nudge distance with shift held.
pub const NUDGE_STEP_LARGE: f64 = 10.0;
