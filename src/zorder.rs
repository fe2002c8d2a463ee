//! Z-order manager.
//!
//! Operates on paint-order snapshots (`ZEntry` lists from
//! [`ElementStore::z_entries`](crate::doc::ElementStore::z_entries)) and returns
//! the new `z_index` values to record in a reorder command. Single steps bisect
//! between neighbours so no other element is renumbered; repeated bisection
//! eventually runs out of float precision, which is what
//! [`normalize_z_indices`] and [`ZRemap`] are for.

#[cfg(test)]
#[path = "zorder_test.rs"]
mod zorder_test;

use crate::doc::ElementId;

/// One element's position in paint order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZEntry {
    pub id: ElementId,
    pub z: f64,
    /// Insertion sequence; breaks ties between equal `z` values.
    pub seq: u64,
}

/// Outcome of a single-step reorder.
#[derive(Debug, Clone, PartialEq)]
pub enum ZStep {
    /// New `z_index` values for the moved elements.
    Moved(Vec<(ElementId, f64)>),
    /// Nothing to do (already at the extreme, or unknown ids).
    Unchanged,
    /// The midpoint is not representable; normalize and retry.
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

/// Move each listed element one step up in paint order.
#[must_use]
pub fn bring_forward(entries: &[ZEntry], ids: &[ElementId]) -> ZStep {
    step_many(entries, ids, Direction::Up)
}

/// Move each listed element one step down in paint order.
#[must_use]
pub fn send_backward(entries: &[ZEntry], ids: &[ElementId]) -> ZStep {
    step_many(entries, ids, Direction::Down)
}

/// Place the listed elements above every other element, keeping their relative order.
#[must_use]
pub fn bring_to_front(entries: &[ZEntry], ids: &[ElementId]) -> ZStep {
    let (moving, others) = partition(entries, ids);
    if moving.is_empty() {
        return ZStep::Unchanged;
    }
    let Some(max_other) = others.iter().map(|e| e.z).reduce(f64::max) else {
        return ZStep::Unchanged;
    };
    if moving.iter().all(|e| e.z > max_other) {
        return ZStep::Unchanged;
    }
    let moved = moving
        .iter()
        .zip(1u32..)
        .map(|(e, k)| (e.id, max_other + f64::from(k)))
        .collect();
    ZStep::Moved(moved)
}

/// Place the listed elements beneath every other element, keeping their relative order.
#[must_use]
pub fn send_to_back(entries: &[ZEntry], ids: &[ElementId]) -> ZStep {
    let (moving, others) = partition(entries, ids);
    if moving.is_empty() {
        return ZStep::Unchanged;
    }
    let Some(min_other) = others.iter().map(|e| e.z).reduce(f64::min) else {
        return ZStep::Unchanged;
    };
    if moving.iter().all(|e| e.z < min_other) {
        return ZStep::Unchanged;
    }
    let moved = moving
        .iter()
        .rev()
        .zip(1u32..)
        .map(|(e, k)| (e.id, min_other - f64::from(k)))
        .collect();
    ZStep::Moved(moved)
}

/// Sequential integers `0..n-1` in current paint order.
#[must_use]
pub fn normalize_z_indices(entries: &[ZEntry]) -> Vec<(ElementId, f64)> {
    entries.iter().zip(0u32..).map(|(e, rank)| (e.id, f64::from(rank))).collect()
}

/// Strictly monotone mapping from pre-normalization `z` values to the
/// normalized scale.
///
/// Values present at normalization time map to their new rank; values between
/// them interpolate linearly; values beyond the ends extend with slope one. Any
/// z recorded in history therefore keeps its order relative to live elements.
#[derive(Debug, Clone, PartialEq)]
pub struct ZRemap {
    points: Vec<(f64, f64)>,
}

impl ZRemap {
    /// Build from a paint-order snapshot taken before normalization.
    #[must_use]
    pub fn from_entries(entries: &[ZEntry]) -> Self {
        let mut points: Vec<(f64, f64)> = Vec::with_capacity(entries.len());
        for (entry, rank) in entries.iter().zip(0u32..) {
            match points.last() {
                Some(&(old, _)) if old == entry.z => {}
                _ => points.push((entry.z, f64::from(rank))),
            }
        }
        Self { points }
    }

    #[must_use]
    pub fn map(&self, z: f64) -> f64 {
        let (Some(&first), Some(&last)) = (self.points.first(), self.points.last()) else {
            return z;
        };
        let idx = self.points.partition_point(|&(old, _)| old < z);
        if idx == 0 {
            return first.1 - (first.0 - z);
        }
        if idx == self.points.len() {
            return last.1 + (z - last.0);
        }
        let (hi_old, hi_new) = self.points[idx];
        if hi_old == z {
            return hi_new;
        }
        let (lo_old, lo_new) = self.points[idx - 1];
        lo_new + (z - lo_old) / (hi_old - lo_old) * (hi_new - lo_new)
    }
}

fn partition(entries: &[ZEntry], ids: &[ElementId]) -> (Vec<ZEntry>, Vec<ZEntry>) {
    entries.iter().copied().partition(|e| ids.contains(&e.id))
}

/// Step every listed element past its neighbour, processing the element
/// nearest the destination first. An element whose neighbour is also listed and
/// did not move stays put, so adjacent selections never swap with each other.
fn step_many(entries: &[ZEntry], ids: &[ElementId], dir: Direction) -> ZStep {
    let mut working: Vec<ZEntry> = entries.to_vec();
    let mut order: Vec<ElementId> = entries.iter().filter(|e| ids.contains(&e.id)).map(|e| e.id).collect();
    if dir == Direction::Up {
        order.reverse();
    }
    let mut moved: Vec<(ElementId, f64)> = Vec::new();
    for id in order {
        let Some(i) = working.iter().position(|e| e.id == id) else {
            continue;
        };
        let target = match dir {
            Direction::Up => step_up(&working, i, ids),
            Direction::Down => step_down(&working, i, ids),
        };
        match target {
            Step::Blocked => {}
            Step::Exhausted => return ZStep::Exhausted,
            Step::To(z) => {
                working[i].z = z;
                working.sort_by(|a, b| a.z.total_cmp(&b.z).then_with(|| a.seq.cmp(&b.seq)));
                moved.push((id, z));
            }
        }
    }
    if moved.is_empty() { ZStep::Unchanged } else { ZStep::Moved(moved) }
}

enum Step {
    To(f64),
    Blocked,
    Exhausted,
}

fn step_up(working: &[ZEntry], i: usize, ids: &[ElementId]) -> Step {
    let Some(next) = working.get(i + 1) else {
        return Step::Blocked;
    };
    if ids.contains(&next.id) {
        return Step::Blocked;
    }
    let beyond = working.get(i + 2);
    // A tie on either side of the neighbour leaves no gap for one step.
    if next.z == working[i].z || beyond.is_some_and(|b| b.z == next.z) {
        return Step::Exhausted;
    }
    match beyond {
        Some(beyond) => midpoint(next.z, beyond.z),
        None => Step::To(next.z + 1.0),
    }
}

fn step_down(working: &[ZEntry], i: usize, ids: &[ElementId]) -> Step {
    if i == 0 {
        return Step::Blocked;
    }
    let prev = working[i - 1];
    if ids.contains(&prev.id) {
        return Step::Blocked;
    }
    let beyond = i.checked_sub(2).map(|j| working[j]);
    if prev.z == working[i].z || beyond.is_some_and(|b| b.z == prev.z) {
        return Step::Exhausted;
    }
    match beyond {
        Some(beyond) => midpoint(beyond.z, prev.z),
        None => Step::To(prev.z - 1.0),
    }
}

fn midpoint(lo: f64, hi: f64) -> Step {
    let mid = lo + (hi - lo) / 2.0;
    if mid > lo && mid < hi { Step::To(mid) } else { Step::Exhausted }
}
