//! Snapping engine: pulls a moving box onto canvas, sibling, and grid lines.
//!
//! Per axis, the moving box offers three candidate lines in priority order
//! (start edge, center, end edge). The first candidate that has any target
//! within the threshold wins, and its nearest target decides the offset, which
//! is then applied to the whole box. Matches are never averaged.
//!
//! Equal-distance targets for the same candidate resolve in a fixed order:
//! canvas lines, then siblings in the order supplied, then the grid. Grid
//! matches move the box but never produce a guide.
//!
//! Nothing here fails: empty sibling lists, a zero-size canvas, or NaN input
//! just produce "no snap".

#[cfg(test)]
#[path = "snap_test.rs"]
mod snap_test;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::doc::ElementId;
use crate::geometry::{Bounds, Size, angular_distance, normalize_degrees};
use crate::viewport::Viewport;

/// Orientation of a guide line. A vertical guide marks an x position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideAxis {
    Vertical,
    Horizontal,
}

/// Which line of the moving box matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left or top edge.
    Start,
    /// Horizontal or vertical center line.
    Center,
    /// Right or bottom edge.
    End,
}

impl Alignment {
    pub const PRIORITY: [Self; 3] = [Self::Start, Self::Center, Self::End];
}

/// What the moving box aligned with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuideSource {
    Canvas,
    Element(ElementId),
}

/// A transient alignment line for the host to draw. Recomputed every frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapGuide {
    pub axis: GuideAxis,
    /// x for vertical guides, y for horizontal guides, in canvas units.
    pub position: f64,
    pub alignment: Alignment,
    pub source: GuideSource,
}

/// A sibling that the moving box may align with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapTarget {
    pub id: ElementId,
    pub bounds: Bounds,
}

/// Per-frame snap parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapOptions {
    /// Maximum pull distance in canvas units.
    pub threshold: f64,
    /// Grid spacing, if grid snapping is on.
    pub grid_size: Option<f64>,
}

impl SnapOptions {
    /// Derive options from config, scaling the threshold by the current zoom.
    #[must_use]
    pub fn from_config(config: &EngineConfig, viewport: &Viewport) -> Self {
        Self {
            threshold: viewport.screen_dist_to_canvas(config.snap_threshold_px),
            grid_size: config.grid_enabled().then_some(config.grid_size),
        }
    }
}

/// Resolved top-left position of the moving box plus the guides that fired.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapResult {
    pub x: f64,
    pub y: f64,
    pub guides: Vec<SnapGuide>,
}

/// Offsets produced by [`snap_edges`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EdgeSnap {
    pub dx: f64,
    pub dy: f64,
    /// Which candidate matched on the x axis, if any.
    pub x_alignment: Option<Alignment>,
    /// Which candidate matched on the y axis, if any.
    pub y_alignment: Option<Alignment>,
    pub guides: Vec<SnapGuide>,
}

/// Snap a moving box against the canvas, its siblings, and the grid.
#[must_use]
pub fn snap_position(moving: &Bounds, others: &[SnapTarget], canvas: Size, options: &SnapOptions) -> SnapResult {
    let snap = snap_edges(moving, &Alignment::PRIORITY, &Alignment::PRIORITY, others, canvas, options);
    SnapResult { x: moving.left + snap.dx, y: moving.top + snap.dy, guides: snap.guides }
}

/// Snap only the listed lines of `moving`; used when a resize drags specific edges.
///
/// Candidates are tried in the order given.
#[must_use]
pub fn snap_edges(
    moving: &Bounds,
    x_candidates: &[Alignment],
    y_candidates: &[Alignment],
    others: &[SnapTarget],
    canvas: Size,
    options: &SnapOptions,
) -> EdgeSnap {
    let mut out = EdgeSnap::default();

    let x_lines: Vec<(Alignment, f64)> = x_candidates.iter().map(|&a| (a, x_line(moving, a))).collect();
    let x_targets = axis_targets(canvas.width, others, |b| [b.left, b.center_x(), b.right]);
    let x_grid = options.grid_size.map(|size| (size, canvas.width));
    if let Some(hit) = snap_axis(&x_lines, &x_targets, x_grid, options.threshold) {
        out.dx = hit.offset;
        out.x_alignment = Some(hit.alignment);
        if let Some(source) = hit.source {
            out.guides.push(SnapGuide {
                axis: GuideAxis::Vertical,
                position: hit.target,
                alignment: hit.alignment,
                source,
            });
        }
    }

    let y_lines: Vec<(Alignment, f64)> = y_candidates.iter().map(|&a| (a, y_line(moving, a))).collect();
    let y_targets = axis_targets(canvas.height, others, |b| [b.top, b.center_y(), b.bottom]);
    let y_grid = options.grid_size.map(|size| (size, canvas.height));
    if let Some(hit) = snap_axis(&y_lines, &y_targets, y_grid, options.threshold) {
        out.dy = hit.offset;
        out.y_alignment = Some(hit.alignment);
        if let Some(source) = hit.source {
            out.guides.push(SnapGuide {
                axis: GuideAxis::Horizontal,
                position: hit.target,
                alignment: hit.alignment,
                source,
            });
        }
    }

    out
}

/// Snap an angle to the nearest configured angle within `threshold` degrees.
///
/// Distances wrap around 360°. The result is normalized to `[0, 360)`.
#[must_use]
pub fn snap_rotation(degrees: f64, angles: &[f64], threshold: f64) -> f64 {
    let deg = normalize_degrees(degrees);
    angles
        .iter()
        .map(|&a| (normalize_degrees(a), angular_distance(deg, a)))
        .filter(|&(_, d)| d <= threshold)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map_or(deg, |(a, _)| a)
}

fn x_line(b: &Bounds, alignment: Alignment) -> f64 {
    match alignment {
        Alignment::Start => b.left,
        Alignment::Center => b.center_x(),
        Alignment::End => b.right,
    }
}

fn y_line(b: &Bounds, alignment: Alignment) -> f64 {
    match alignment {
        Alignment::Start => b.top,
        Alignment::Center => b.center_y(),
        Alignment::End => b.bottom,
    }
}

fn axis_targets<F>(extent: f64, others: &[SnapTarget], lines: F) -> Vec<(f64, GuideSource)>
where
    F: Fn(&Bounds) -> [f64; 3],
{
    let mut targets = Vec::with_capacity(3 + others.len() * 3);
    if extent.is_finite() && extent >= 0.0 {
        targets.extend([0.0, extent / 2.0, extent].map(|v| (v, GuideSource::Canvas)));
    }
    for other in others {
        targets.extend(
            lines(&other.bounds)
                .into_iter()
                .filter(|v| v.is_finite())
                .map(|v| (v, GuideSource::Element(other.id))),
        );
    }
    targets
}

struct AxisHit {
    offset: f64,
    target: f64,
    alignment: Alignment,
    /// `None` for grid matches, which stay silent.
    source: Option<GuideSource>,
}

fn snap_axis(
    lines: &[(Alignment, f64)],
    targets: &[(f64, GuideSource)],
    grid: Option<(f64, f64)>,
    threshold: f64,
) -> Option<AxisHit> {
    for &(alignment, line) in lines {
        let mut best: Option<(f64, f64, Option<GuideSource>)> = None;
        for &(target, source) in targets {
            let d = (target - line).abs();
            if d <= threshold && best.is_none_or(|(bd, _, _)| d < bd) {
                best = Some((d, target, Some(source)));
            }
        }
        if let Some((size, extent)) = grid {
            if let Some(target) = nearest_grid_line(line, size, extent) {
                let d = (target - line).abs();
                if d <= threshold && best.is_none_or(|(bd, _, _)| d < bd) {
                    best = Some((d, target, None));
                }
            }
        }
        if let Some((_, target, source)) = best {
            return Some(AxisHit { offset: target - line, target, alignment, source });
        }
    }
    None
}

/// Nearest multiple of `size` within `[0, extent]`.
fn nearest_grid_line(v: f64, size: f64, extent: f64) -> Option<f64> {
    if !(size > 0.0 && size.is_finite() && extent.is_finite() && extent >= 0.0 && v.is_finite()) {
        return None;
    }
    let max_k = (extent / size).floor();
    let k = (v / size).round().clamp(0.0, max_k);
    Some(k * size)
}
