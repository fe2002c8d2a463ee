//! Engine configuration.
//!
//! Hosts either build an [`EngineConfig`] from JSON (partial documents fall back
//! to defaults field by field) or from `KANVA_*` environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::env::VarError;
use std::num::ParseFloatError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::consts::{
    DEFAULT_HISTORY_DEPTH, DEFAULT_MERGE_WINDOW_MS, DEFAULT_MIN_SIZE, DEFAULT_NORMALIZE_AFTER, HANDLE_RADIUS_PX,
    NUDGE_STEP, NUDGE_STEP_LARGE, ROTATE_HANDLE_OFFSET_PX, ROTATION_SNAP_STEP_DEG, ROTATION_SNAP_THRESHOLD_DEG,
    SNAP_THRESHOLD_PX,
};
use crate::input::ModifierKey;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse engine config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Tunables for snapping, resizing, history, and z-order maintenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum element width and height in canvas units.
    pub min_size: f64,
    /// Snap distance in screen pixels; divided by zoom before use.
    pub snap_threshold_px: f64,
    /// Master switch for position snapping.
    pub snap_enabled: bool,
    /// Grid spacing in canvas units. Values `<= 0` disable the grid.
    pub grid_size: f64,
    /// Rotation angles (degrees) that rotation snaps to.
    pub rotation_snap_angles: Vec<f64>,
    /// Rotation snap distance in degrees.
    pub rotation_snap_threshold_deg: f64,
    /// Handle hit radius in screen pixels.
    pub handle_size_px: f64,
    /// Distance of the rotate handle above the top edge, in screen pixels.
    pub rotate_handle_offset_px: f64,
    /// Maximum undo entries kept.
    pub history_depth: usize,
    /// Window in which commands sharing a merge key coalesce.
    pub merge_window_ms: f64,
    /// Fractional reorders allowed before z-indices are renumbered.
    pub normalize_after: u32,
    /// Arrow-key nudge distance.
    pub nudge_step: f64,
    /// Arrow-key nudge distance with shift held.
    pub nudge_step_large: f64,
    /// Modifier that locks aspect ratio while resizing a single element.
    pub aspect_lock_modifier: ModifierKey,
    /// Modifier that requests free (non-proportional) multi-element resize.
    pub free_resize_modifier: ModifierKey,
    /// Modifier that suppresses snapping for the current frame.
    pub snap_bypass_modifier: ModifierKey,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_size: DEFAULT_MIN_SIZE,
            snap_threshold_px: SNAP_THRESHOLD_PX,
            snap_enabled: true,
            grid_size: 0.0,
            rotation_snap_angles: default_rotation_angles(),
            rotation_snap_threshold_deg: ROTATION_SNAP_THRESHOLD_DEG,
            handle_size_px: HANDLE_RADIUS_PX,
            rotate_handle_offset_px: ROTATE_HANDLE_OFFSET_PX,
            history_depth: DEFAULT_HISTORY_DEPTH,
            merge_window_ms: DEFAULT_MERGE_WINDOW_MS,
            normalize_after: DEFAULT_NORMALIZE_AFTER,
            nudge_step: NUDGE_STEP,
            nudge_step_large: NUDGE_STEP_LARGE,
            aspect_lock_modifier: ModifierKey::Shift,
            free_resize_modifier: ModifierKey::Alt,
            snap_bypass_modifier: ModifierKey::Ctrl,
        }
    }
}

fn default_rotation_angles() -> Vec<f64> {
    (0..8).map(|i| f64::from(i) * ROTATION_SNAP_STEP_DEG).collect()
}

impl EngineConfig {
    /// Parse a (possibly partial) JSON config and validate it.
    ///
    /// # Errors
    ///
    /// Returns `Parse` for malformed JSON and `Invalid` for out-of-range values.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Build config from environment variables.
    ///
    /// Optional (defaults in parentheses):
    /// - `KANVA_MIN_SIZE` (1)
    /// - `KANVA_SNAP_THRESHOLD_PX` (8)
    /// - `KANVA_SNAP_ENABLED` (true)
    /// - `KANVA_GRID_SIZE` (0, disabled)
    /// - `KANVA_ROTATION_SNAP_ANGLES`: comma-separated degrees (every 45°)
    /// - `KANVA_ROTATION_SNAP_THRESHOLD_DEG` (5)
    /// - `KANVA_HISTORY_DEPTH` (100)
    /// - `KANVA_MERGE_WINDOW_MS` (500)
    /// - `KANVA_NORMALIZE_AFTER` (32)
    ///
    /// # Errors
    ///
    /// Returns `Invalid` when the resulting values fail [`EngineConfig::validate`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env_value(key, std::env::var(key)))
    }

    /// Build config from an arbitrary key lookup using the `KANVA_*` names.
    ///
    /// Unparsable values are logged and replaced by the default.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` when the resulting values fail [`EngineConfig::validate`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();
        let rotation_snap_angles = match lookup("KANVA_ROTATION_SNAP_ANGLES") {
            Some(raw) => match parse_angle_list(&raw) {
                Ok(angles) => angles,
                Err(err) => {
                    warn!(key = "KANVA_ROTATION_SNAP_ANGLES", value = %raw, error = %err, "unparsable config value; using default");
                    d.rotation_snap_angles.clone()
                }
            },
            None => d.rotation_snap_angles.clone(),
        };
        let config = Self {
            min_size: lookup_parse(&lookup, "KANVA_MIN_SIZE", d.min_size),
            snap_threshold_px: lookup_parse(&lookup, "KANVA_SNAP_THRESHOLD_PX", d.snap_threshold_px),
            snap_enabled: lookup_parse(&lookup, "KANVA_SNAP_ENABLED", d.snap_enabled),
            grid_size: lookup_parse(&lookup, "KANVA_GRID_SIZE", d.grid_size),
            rotation_snap_angles,
            rotation_snap_threshold_deg: lookup_parse(
                &lookup,
                "KANVA_ROTATION_SNAP_THRESHOLD_DEG",
                d.rotation_snap_threshold_deg,
            ),
            history_depth: lookup_parse(&lookup, "KANVA_HISTORY_DEPTH", d.history_depth),
            merge_window_ms: lookup_parse(&lookup, "KANVA_MERGE_WINDOW_MS", d.merge_window_ms),
            normalize_after: lookup_parse(&lookup, "KANVA_NORMALIZE_AFTER", d.normalize_after),
            ..d
        };
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("min_size", self.min_size)?;
        positive("snap_threshold_px", self.snap_threshold_px)?;
        positive("handle_size_px", self.handle_size_px)?;
        positive("rotate_handle_offset_px", self.rotate_handle_offset_px)?;
        positive("nudge_step", self.nudge_step)?;
        positive("nudge_step_large", self.nudge_step_large)?;
        non_negative("rotation_snap_threshold_deg", self.rotation_snap_threshold_deg)?;
        non_negative("merge_window_ms", self.merge_window_ms)?;
        if !self.grid_size.is_finite() {
            return Err(invalid("grid_size", "must be finite"));
        }
        if self.rotation_snap_angles.iter().any(|a| !a.is_finite()) {
            return Err(invalid("rotation_snap_angles", "all angles must be finite"));
        }
        if self.history_depth == 0 {
            return Err(invalid("history_depth", "must be at least 1"));
        }
        if self.normalize_after == 0 {
            return Err(invalid("normalize_after", "must be at least 1"));
        }
        Ok(())
    }

    /// Whether grid snapping is active.
    #[must_use]
    pub fn grid_enabled(&self) -> bool {
        self.grid_size > 0.0
    }
}

fn lookup_parse<T, F>(lookup: &F, key: &'static str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            warn!(key, value = %raw, "unparsable config value; using default");
            default
        }
    }
}

/// Value of an environment variable; absent and non-unicode both fall back to the default.
fn env_value(key: &str, var: Result<String, VarError>) -> Option<String> {
    match var {
        Ok(value) => Some(value),
        Err(VarError::NotPresent) => None,
        Err(VarError::NotUnicode(raw)) => {
            warn!(key, value = ?raw, "config value is not valid unicode; using default");
            None
        }
    }
}

fn parse_angle_list(raw: &str) -> Result<Vec<f64>, ParseFloatError> {
    raw.split(',').map(str::trim).filter(|part| !part.is_empty()).map(str::parse::<f64>).collect()
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field, reason: reason.to_owned() }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, "must be a positive finite number"))
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, "must be a non-negative finite number"))
    }
}
