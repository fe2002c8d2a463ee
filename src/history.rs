//! Command history: the only path that mutates the element collection.
//!
//! A `Command` is a list of element-level changes, each carrying the before
//! and after state it needs to be inverted. `CommandHistory::execute` checks a
//! whole command against the store before touching anything, so a rejected
//! command leaves no trace, and undo/redo of multi-element commands is atomic.
//!
//! Rapid same-key commands (typing, arrow nudges) merge into the top entry
//! when they land inside the merge window. The window slides: each merge
//! refreshes the top entry's timestamp.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::doc::{Element, ElementId, ElementStore, Geometry};
use crate::error::EngineError;
use crate::zorder::ZRemap;

/// What a command does, for display and merge matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    Move,
    Resize,
    Rotate,
    Add,
    Delete,
    Group,
    Ungroup,
    Reorder,
    Edit,
    Composite,
}

/// One invertible change to one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ElementChange {
    Geometry { id: ElementId, before: Geometry, after: Geometry },
    ZIndex { id: ElementId, before: f64, after: f64 },
    /// Add the element. Inverse of `Remove`.
    Insert(Element),
    /// Remove the element, keeping its full state for undo.
    Remove(Element),
    Group { id: ElementId, before: Option<ElementId>, after: Option<ElementId> },
    Payload { id: ElementId, before: serde_json::Value, after: serde_json::Value },
}

impl ElementChange {
    #[must_use]
    pub fn id(&self) -> ElementId {
        match self {
            Self::Geometry { id, .. } | Self::ZIndex { id, .. } | Self::Group { id, .. } | Self::Payload { id, .. } => *id,
            Self::Insert(e) | Self::Remove(e) => e.id,
        }
    }

    #[must_use]
    pub fn inverse(&self) -> Self {
        match self {
            Self::Geometry { id, before, after } => Self::Geometry { id: *id, before: *after, after: *before },
            Self::ZIndex { id, before, after } => Self::ZIndex { id: *id, before: *after, after: *before },
            Self::Insert(e) => Self::Remove(e.clone()),
            Self::Remove(e) => Self::Insert(e.clone()),
            Self::Group { id, before, after } => Self::Group { id: *id, before: *after, after: *before },
            Self::Payload { id, before, after } => {
                Self::Payload { id: *id, before: after.clone(), after: before.clone() }
            }
        }
    }

    /// Fold a later change to the same field of the same element into this one.
    ///
    /// Keeps this change's `before` and takes `later`'s `after`. Returns false
    /// (and leaves `self` untouched) when the two changes are not the same shape.
    fn absorb(&mut self, later: &Self) -> bool {
        match (self, later) {
            (Self::Geometry { id, after, .. }, Self::Geometry { id: lid, after: lafter, .. }) if id == lid => {
                *after = *lafter;
                true
            }
            (Self::ZIndex { id, after, .. }, Self::ZIndex { id: lid, after: lafter, .. }) if id == lid => {
                *after = *lafter;
                true
            }
            (Self::Group { id, after, .. }, Self::Group { id: lid, after: lafter, .. }) if id == lid => {
                *after = *lafter;
                true
            }
            (Self::Payload { id, after, .. }, Self::Payload { id: lid, after: lafter, .. }) if id == lid => {
                after.clone_from(lafter);
                true
            }
            _ => false,
        }
    }

    fn remap_z(&mut self, remap: &ZRemap) {
        match self {
            Self::ZIndex { before, after, .. } => {
                *before = remap.map(*before);
                *after = remap.map(*after);
            }
            Self::Insert(e) | Self::Remove(e) => e.z_index = remap.map(e.z_index),
            Self::Geometry { .. } | Self::Group { .. } | Self::Payload { .. } => {}
        }
    }
}

/// An atomic, invertible record of a state change: the unit of undo/redo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub kind: CommandKind,
    pub changes: Vec<ElementChange>,
    /// Commands with equal keys may merge inside the merge window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_key: Option<String>,
    /// Host clock reading when the command was issued, in milliseconds.
    #[serde(default)]
    pub timestamp_ms: f64,
}

impl Command {
    #[must_use]
    pub fn new(kind: CommandKind, changes: Vec<ElementChange>) -> Self {
        Self { kind, changes, merge_key: None, timestamp_ms: 0.0 }
    }

    #[must_use]
    pub fn with_merge_key(mut self, key: impl Into<String>) -> Self {
        self.merge_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn at(mut self, timestamp_ms: f64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }

    /// Bundle several commands into one entry that undoes and redoes as a unit.
    #[must_use]
    pub fn composite(children: Vec<Self>) -> Self {
        let timestamp_ms = children.iter().map(|c| c.timestamp_ms).fold(0.0, f64::max);
        let changes = children.into_iter().flat_map(|c| c.changes).collect();
        Self { kind: CommandKind::Composite, changes, merge_key: None, timestamp_ms }
    }

    /// Affected ids, de-duplicated, in first-touched order.
    #[must_use]
    pub fn ids(&self) -> Vec<ElementId> {
        let mut out: Vec<ElementId> = Vec::new();
        for change in &self.changes {
            let id = change.id();
            if !out.contains(&id) {
                out.push(id);
            }
        }
        out
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// The command that reverts this one.
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self {
            kind: self.kind,
            changes: self.changes.iter().rev().map(ElementChange::inverse).collect(),
            merge_key: self.merge_key.clone(),
            timestamp_ms: self.timestamp_ms,
        }
    }

    fn can_merge_into(&self, top: &Self, window_ms: f64) -> bool {
        let Some(key) = &self.merge_key else {
            return false;
        };
        top.merge_key.as_ref() == Some(key)
            && top.kind == self.kind
            && top.ids() == self.ids()
            && top.changes.len() == self.changes.len()
            && (self.timestamp_ms - top.timestamp_ms).abs() <= window_ms
    }
}

/// Bounded undo/redo stacks for one document.
#[derive(Debug, Clone)]
pub struct CommandHistory {
    undo: VecDeque<Command>,
    redo: Vec<Command>,
    depth: usize,
    merge_window_ms: f64,
    min_size: f64,
}

impl CommandHistory {
    /// `depth` is clamped to at least one entry.
    #[must_use]
    pub fn new(depth: usize, merge_window_ms: f64, min_size: f64) -> Self {
        Self { undo: VecDeque::new(), redo: Vec::new(), depth: depth.max(1), merge_window_ms, min_size }
    }

    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.history_depth, config.merge_window_ms, config.min_size)
    }

    /// Validate and apply `command`, then record it.
    ///
    /// # Errors
    ///
    /// `EmptyCommand`, `NotFound`, `DuplicateId`, or `Validation` when the
    /// command cannot apply in full. Nothing is applied or recorded then.
    pub fn execute(&mut self, store: &mut ElementStore, command: Command) -> Result<(), EngineError> {
        if let Err(err) = check(store, &command.changes, Some(self.min_size)) {
            warn!(kind = ?command.kind, code = err.error_code(), error = %err, "command rejected");
            return Err(err);
        }
        apply(store, &command.changes);
        self.redo.clear();

        if let Some(top) = self.undo.back_mut() {
            if command.can_merge_into(top, self.merge_window_ms) && merge(top, &command) {
                debug!(kind = ?command.kind, changes = command.changes.len(), "command merged");
                return Ok(());
            }
        }

        debug!(kind = ?command.kind, changes = command.changes.len(), "command executed");
        self.push_undo(command);
        Ok(())
    }

    /// Revert the newest entry. `Ok(None)` when there is nothing to undo.
    ///
    /// # Errors
    ///
    /// `NotFound` or `DuplicateId` when the collection moved on underneath the
    /// entry (for example a remote delete). The entry is dropped.
    pub fn undo(&mut self, store: &mut ElementStore) -> Result<Option<Command>, EngineError> {
        let Some(command) = self.undo.pop_back() else {
            return Ok(None);
        };
        let inverse = command.inverse();
        if let Err(err) = check(store, &inverse.changes, None) {
            warn!(kind = ?command.kind, code = err.error_code(), error = %err, "undo entry dropped");
            return Err(err);
        }
        apply(store, &inverse.changes);
        debug!(kind = ?command.kind, changes = command.changes.len(), "undo");
        self.redo.push(command.clone());
        Ok(Some(command))
    }

    /// Re-apply the most recently undone entry. `Ok(None)` when there is nothing to redo.
    ///
    /// # Errors
    ///
    /// As for [`undo`](Self::undo); the entry is dropped.
    pub fn redo(&mut self, store: &mut ElementStore) -> Result<Option<Command>, EngineError> {
        let Some(command) = self.redo.pop() else {
            return Ok(None);
        };
        if let Err(err) = check(store, &command.changes, None) {
            warn!(kind = ?command.kind, code = err.error_code(), error = %err, "redo entry dropped");
            return Err(err);
        }
        apply(store, &command.changes);
        debug!(kind = ?command.kind, changes = command.changes.len(), "redo");
        self.push_undo(command.clone());
        Ok(Some(command))
    }

    /// Rewrite every recorded z value through `remap` after a normalization.
    pub fn remap_z(&mut self, remap: &ZRemap) {
        for command in self.undo.iter_mut().chain(self.redo.iter_mut()) {
            for change in &mut command.changes {
                change.remap_z(remap);
            }
        }
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    #[must_use]
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    #[must_use]
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// The entry `undo` would revert next.
    #[must_use]
    pub fn peek_undo(&self) -> Option<&Command> {
        self.undo.back()
    }

    fn push_undo(&mut self, command: Command) {
        self.undo.push_back(command);
        while self.undo.len() > self.depth {
            if let Some(dropped) = self.undo.pop_front() {
                debug!(kind = ?dropped.kind, depth = self.depth, "oldest history entry dropped");
            }
        }
    }
}

/// Fold `later` into `top` change by change. All-or-nothing.
fn merge(top: &mut Command, later: &Command) -> bool {
    let mut merged = top.changes.clone();
    for (change, next) in merged.iter_mut().zip(&later.changes) {
        if !change.absorb(next) {
            return false;
        }
    }
    top.changes = merged;
    top.timestamp_ms = later.timestamp_ms;
    true
}

/// Walk `changes` against a presence overlay of the store without mutating it.
///
/// `min_size` enables geometry validation of the resulting states; undo and
/// redo skip it because they only restore states that were already accepted.
fn check(store: &ElementStore, changes: &[ElementChange], min_size: Option<f64>) -> Result<(), EngineError> {
    if changes.is_empty() {
        return Err(EngineError::EmptyCommand);
    }
    let mut present: HashMap<ElementId, bool> = HashMap::new();
    let is_present =
        |present: &HashMap<ElementId, bool>, id: &ElementId| present.get(id).copied().unwrap_or_else(|| store.contains(id));

    for change in changes {
        let id = change.id();
        match change {
            ElementChange::Insert(element) => {
                if is_present(&present, &id) {
                    return Err(EngineError::DuplicateId(id));
                }
                if let Some(min) = min_size {
                    element.geometry().validate(id, min)?;
                    if !element.z_index.is_finite() {
                        return Err(EngineError::validation(id, "z_index is not finite"));
                    }
                }
                present.insert(id, true);
            }
            ElementChange::Remove(_) => {
                if !is_present(&present, &id) {
                    return Err(EngineError::NotFound(id));
                }
                present.insert(id, false);
            }
            ElementChange::Geometry { after, .. } => {
                if !is_present(&present, &id) {
                    return Err(EngineError::NotFound(id));
                }
                if let Some(min) = min_size {
                    after.validate(id, min)?;
                }
            }
            ElementChange::ZIndex { after, .. } => {
                if !is_present(&present, &id) {
                    return Err(EngineError::NotFound(id));
                }
                if min_size.is_some() && !after.is_finite() {
                    return Err(EngineError::validation(id, "z_index is not finite"));
                }
            }
            ElementChange::Group { .. } | ElementChange::Payload { .. } => {
                if !is_present(&present, &id) {
                    return Err(EngineError::NotFound(id));
                }
            }
        }
    }
    Ok(())
}

/// Apply changes that already passed [`check`].
fn apply(store: &mut ElementStore, changes: &[ElementChange]) {
    for change in changes {
        match change {
            ElementChange::Geometry { id, after, .. } => {
                store.set_geometry(id, after);
            }
            ElementChange::ZIndex { id, after, .. } => {
                store.set_z_index(id, *after);
            }
            ElementChange::Insert(element) => store.insert(element.clone()),
            ElementChange::Remove(element) => {
                store.remove(&element.id);
            }
            ElementChange::Group { id, after, .. } => {
                store.set_group(id, *after);
            }
            ElementChange::Payload { id, after, .. } => {
                store.set_payload(id, after.clone());
            }
        }
    }
}
