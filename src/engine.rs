//! Editor session: one open document's elements, selection, history, and gesture.
//!
//! The host feeds pointer, keyboard, and animation-frame events in and gets
//! `Action`s back. Every persistent change goes through
//! [`CommandHistory::execute`], so the element collection only ever holds
//! states that also exist in the undo history. The one exception is z
//! normalization, which renumbers paint order without changing it and remaps
//! the history to match.

use std::mem;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::doc::{Element, ElementId, ElementStore, Geometry};
use crate::error::EngineError;
use crate::geometry::{Bounds, Point, Size, angle_between};
use crate::gesture::{
    RotationSnap, SnapContext, drag_frame, geometry_changes, pointer_delta, resize_frame, rotate_frame, rotation_pivot, seed,
    snap_targets,
};
use crate::hit::{HitPart, hit_test};
use crate::history::{Command, CommandHistory, CommandKind, ElementChange};
use crate::input::{Button, InputState, Key, Modifiers, PointerTarget};
use crate::marquee::Marquee;
use crate::resize::ResizeMode;
use crate::selection::{Selection, expand_groups};
use crate::snap::{SnapGuide, SnapOptions};
use crate::viewport::Viewport;
use crate::zorder::{self, ZEntry, ZRemap, ZStep};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Merge key shared by arrow-key nudges so a burst of them undoes as one step.
const NUDGE_MERGE_KEY: &str = "nudge";

/// Actions returned from editor calls for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Render state changed; repaint.
    RenderNeeded,
    /// A pointer move is pending; call `on_animation_frame` on the next frame.
    FrameRequested,
    /// The committed selection is now exactly these ids.
    SelectionChanged(Vec<ElementId>),
    /// A command was applied and recorded. Hand it to persistence.
    Committed(Command),
    /// This command was reverted.
    Undone(Command),
    /// This previously undone command was re-applied.
    Redone(Command),
    /// A command could not be applied. Nothing changed.
    Rejected(EngineError),
}

/// The latest unprocessed pointer move. Later moves overwrite it.
#[derive(Debug, Clone, Copy)]
struct PendingMove {
    screen: Point,
    modifiers: Modifiers,
}

/// Per-document editing session.
#[derive(Debug, Clone)]
pub struct Editor {
    store: ElementStore,
    history: CommandHistory,
    selection: Selection,
    viewport: Viewport,
    canvas: Size,
    config: EngineConfig,
    input: InputState,
    pending: Option<PendingMove>,
    /// Last host clock reading, in milliseconds.
    clock_ms: f64,
    /// Bisecting reorders since the last normalization.
    fractional_ops: u32,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EngineConfig::default(), Size::default())
    }
}

impl Editor {
    #[must_use]
    pub fn new(config: EngineConfig, canvas: Size) -> Self {
        Self {
            store: ElementStore::new(),
            history: CommandHistory::from_config(&config),
            selection: Selection::new(),
            viewport: Viewport::default(),
            canvas,
            config,
            input: InputState::Idle,
            pending: None,
            clock_ms: 0.0,
            fractional_ops: 0,
        }
    }

    // --- Host state ---

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn set_canvas_size(&mut self, canvas: Size) {
        self.canvas = canvas;
    }

    /// Advance the clock used to timestamp commands.
    pub fn set_time(&mut self, now_ms: f64) {
        self.clock_ms = now_ms;
    }

    // --- Hydration and remote sync ---

    /// Replace the document with a host snapshot. History, selection, and any
    /// gesture in progress are discarded.
    pub fn load_snapshot(&mut self, elements: Vec<Element>) -> Vec<Action> {
        let mut actions = Vec::new();
        self.input = InputState::Idle;
        self.pending = None;
        self.fractional_ops = 0;
        self.store.load_snapshot(elements);
        self.history.clear();
        if self.selection.clear() {
            actions.push(Action::SelectionChanged(Vec::new()));
        }
        info!(count = self.store.len(), "snapshot loaded");
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Insert or replace an element from a remote peer, bypassing history.
    pub fn apply_remote_upsert(&mut self, element: Element) -> Vec<Action> {
        self.store.insert(element);
        vec![Action::RenderNeeded]
    }

    /// Remove an element deleted by a remote peer, bypassing history.
    ///
    /// A gesture transforming the element is cancelled.
    pub fn apply_remote_delete(&mut self, id: &ElementId) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.input.participants().contains(id) {
            debug!(%id, "gesture cancelled by remote delete");
            actions.extend(self.cancel_gesture());
        }
        if self.store.remove(id).is_none() {
            return actions;
        }
        if self.selection.remove(id) {
            actions.push(self.selection_changed());
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Pointer input ---

    /// Pointer-down in screen coordinates. The target is found with [`hit_test`].
    pub fn on_pointer_down(&mut self, screen: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        let p = self.viewport.screen_to_canvas(screen);
        let target = hit_test(
            p,
            &self.store,
            &self.selection,
            self.viewport.screen_dist_to_canvas(self.config.handle_size_px),
            self.viewport.screen_dist_to_canvas(self.config.rotate_handle_offset_px),
        );
        self.on_pointer_down_on(target, screen, button, modifiers)
    }

    /// Pointer-down with a target already resolved by the host.
    pub fn on_pointer_down_on(
        &mut self,
        target: PointerTarget,
        screen: Point,
        button: Button,
        modifiers: Modifiers,
    ) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        // One gesture at a time: a down without the previous up aborts the old one.
        let mut actions = self.cancel_gesture();
        let p = self.viewport.screen_to_canvas(screen);

        match target {
            PointerTarget::Canvas => actions.extend(self.start_marquee(p, modifiers)),
            PointerTarget::Body(id) | PointerTarget::Handle { id, part: HitPart::Body } => {
                actions.extend(self.start_drag(id, p, modifiers));
            }
            PointerTarget::Handle { id, part: HitPart::ResizeHandle(anchor) } => {
                let (start, selection_action) = match self.handle_participants(id) {
                    Ok(found) => found,
                    Err(err) => {
                        actions.push(Action::Rejected(err));
                        return actions;
                    }
                };
                actions.extend(selection_action);
                let mode = self.resize_mode(modifiers);
                debug!(count = start.len(), ?anchor, "resize started");
                self.input =
                    InputState::Resizing { anchor, mode, origin: p, working: start.clone(), start, guides: Vec::new() };
                actions.push(Action::RenderNeeded);
            }
            PointerTarget::Handle { id, part: HitPart::RotateHandle } => {
                let (start, selection_action) = match self.handle_participants(id) {
                    Ok(found) => found,
                    Err(err) => {
                        actions.push(Action::Rejected(err));
                        return actions;
                    }
                };
                actions.extend(selection_action);
                let Some(pivot) = rotation_pivot(&start) else {
                    actions.push(Action::Rejected(EngineError::NotFound(id)));
                    return actions;
                };
                debug!(count = start.len(), "rotate started");
                self.input =
                    InputState::Rotating { pivot, start_angle: angle_between(pivot, p), working: start.clone(), start };
                actions.push(Action::RenderNeeded);
            }
        }
        actions
    }

    /// Record a pointer move. Only the latest move per animation frame is processed.
    pub fn on_pointer_move(&mut self, screen: Point, modifiers: Modifiers) -> Vec<Action> {
        if self.input.is_idle() {
            return Vec::new();
        }
        let first = self.pending.is_none();
        self.pending = Some(PendingMove { screen, modifiers });
        if first { vec![Action::FrameRequested] } else { Vec::new() }
    }

    /// Process the pending pointer move, if any.
    pub fn on_animation_frame(&mut self, now_ms: f64) -> Vec<Action> {
        self.clock_ms = now_ms;
        let Some(pending) = self.pending.take() else {
            return Vec::new();
        };
        if self.input.is_idle() {
            return Vec::new();
        }
        self.update_gesture(pending.screen, pending.modifiers);
        vec![Action::RenderNeeded]
    }

    /// Finish the gesture at `screen`, committing at most one command.
    pub fn on_pointer_up(&mut self, screen: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary || self.input.is_idle() {
            return Vec::new();
        }
        self.pending = None;
        self.update_gesture(screen, modifiers);

        let mut actions = Vec::new();
        match mem::take(&mut self.input) {
            InputState::Idle => return actions,
            InputState::Dragging { start, working, .. } => {
                actions.extend(self.commit_gesture(CommandKind::Move, &start, &working));
            }
            InputState::Resizing { start, working, .. } => {
                actions.extend(self.commit_gesture(CommandKind::Resize, &start, &working));
            }
            InputState::Rotating { start, working, .. } => {
                actions.extend(self.commit_gesture(CommandKind::Rotate, &start, &working));
            }
            InputState::Marquee(marquee) => {
                if let Some(ids) = marquee.commit(&self.store) {
                    if self.selection.set(ids) {
                        actions.push(self.selection_changed());
                    }
                }
            }
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Abort the gesture in progress. A no-op when idle.
    pub fn on_pointer_cancel(&mut self) -> Vec<Action> {
        self.cancel_gesture()
    }

    /// The host lost pointer capture; treated as a cancel.
    pub fn on_capture_lost(&mut self) -> Vec<Action> {
        self.cancel_gesture()
    }

    // --- Keyboard input ---

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers, now_ms: f64) -> Vec<Action> {
        self.clock_ms = now_ms;
        if key.as_str() == "Escape" {
            if !self.input.is_idle() {
                return self.cancel_gesture();
            }
            return self.set_selection(Vec::new());
        }
        if !self.input.is_idle() {
            return Vec::new();
        }

        let step = if modifiers.shift { self.config.nudge_step_large } else { self.config.nudge_step };
        match key.as_str() {
            "Delete" | "Backspace" => self.delete_selection(),
            "z" | "Z" if modifiers.command() && modifiers.shift => self.redo(),
            "z" | "Z" if modifiers.command() => self.undo(),
            "y" | "Y" if modifiers.command() => self.redo(),
            "ArrowLeft" => self.nudge(-step, 0.0),
            "ArrowRight" => self.nudge(step, 0.0),
            "ArrowUp" => self.nudge(0.0, -step),
            "ArrowDown" => self.nudge(0.0, step),
            _ => Vec::new(),
        }
    }

    // --- Commands ---

    /// Replace the selection, expanding groups.
    pub fn set_selection(&mut self, ids: Vec<ElementId>) -> Vec<Action> {
        let ids: Vec<ElementId> = ids.into_iter().filter(|id| self.store.contains(id)).collect();
        if self.selection.set(expand_groups(&ids, &self.store)) { vec![self.selection_changed()] } else { Vec::new() }
    }

    /// Add `element` on top of everything else and select it.
    ///
    /// Its `z_index` is replaced with one above the current maximum.
    pub fn add_element(&mut self, mut element: Element) -> Vec<Action> {
        element.z_index = self.store.next_z_index();
        let id = element.id;
        let mut actions = self.execute(Command::new(CommandKind::Add, vec![ElementChange::Insert(element)]));
        if self.store.contains(&id) && self.selection.set(vec![id]) {
            actions.push(self.selection_changed());
        }
        actions
    }

    pub fn delete_selection(&mut self) -> Vec<Action> {
        let changes: Vec<ElementChange> = self
            .selected_in_paint_order()
            .into_iter()
            .map(|e| ElementChange::Remove(e.clone()))
            .collect();
        if changes.is_empty() {
            return Vec::new();
        }
        self.execute(Command::new(CommandKind::Delete, changes))
    }

    /// Put every selected element into one new group. Needs two or more.
    pub fn group_selection(&mut self) -> Vec<Action> {
        let group_id = Uuid::new_v4();
        let changes: Vec<ElementChange> = self
            .selected_in_paint_order()
            .into_iter()
            .map(|e| ElementChange::Group { id: e.id, before: e.group_id, after: Some(group_id) })
            .collect();
        if changes.len() < 2 {
            return Vec::new();
        }
        self.execute(Command::new(CommandKind::Group, changes))
    }

    /// Clear the group of every selected, grouped element.
    pub fn ungroup_selection(&mut self) -> Vec<Action> {
        let changes: Vec<ElementChange> = self
            .selected_in_paint_order()
            .into_iter()
            .filter(|e| e.group_id.is_some())
            .map(|e| ElementChange::Group { id: e.id, before: e.group_id, after: None })
            .collect();
        if changes.is_empty() {
            return Vec::new();
        }
        self.execute(Command::new(CommandKind::Ungroup, changes))
    }

    /// Replace an element's payload. Rapid edits to one element merge.
    pub fn set_payload(&mut self, id: &ElementId, payload: serde_json::Value) -> Vec<Action> {
        let Some(element) = self.store.get(id) else {
            return vec![Action::Rejected(EngineError::NotFound(*id))];
        };
        let change = ElementChange::Payload { id: *id, before: element.payload.clone(), after: payload };
        let command = Command::new(CommandKind::Edit, vec![change]).with_merge_key(format!("edit:{id}")).at(self.clock_ms);
        self.execute(command)
    }

    /// Move the selection by `(dx, dy)` canvas units as a mergeable move.
    pub fn nudge(&mut self, dx: f64, dy: f64) -> Vec<Action> {
        let changes: Vec<ElementChange> = self
            .selection
            .ids()
            .iter()
            .filter_map(|id| self.store.get(id))
            .map(|e| {
                let before = e.geometry();
                ElementChange::Geometry { id: e.id, before, after: Geometry { x: before.x + dx, y: before.y + dy, ..before } }
            })
            .collect();
        if changes.is_empty() {
            return Vec::new();
        }
        self.execute(Command::new(CommandKind::Move, changes).with_merge_key(NUDGE_MERGE_KEY).at(self.clock_ms))
    }

    pub fn bring_forward(&mut self) -> Vec<Action> {
        self.reorder(zorder::bring_forward, true)
    }

    pub fn send_backward(&mut self) -> Vec<Action> {
        self.reorder(zorder::send_backward, true)
    }

    pub fn bring_to_front(&mut self) -> Vec<Action> {
        self.reorder(zorder::bring_to_front, false)
    }

    pub fn send_to_back(&mut self) -> Vec<Action> {
        self.reorder(zorder::send_to_back, false)
    }

    /// Apply and record an arbitrary command.
    pub fn execute(&mut self, command: Command) -> Vec<Action> {
        let mut actions = self.cancel_gesture();
        match self.history.execute(&mut self.store, command.clone()) {
            Ok(()) => {
                actions.push(Action::Committed(command));
                actions.extend(self.after_mutation());
            }
            Err(err) => actions.push(Action::Rejected(err)),
        }
        actions
    }

    pub fn undo(&mut self) -> Vec<Action> {
        let mut actions = self.cancel_gesture();
        match self.history.undo(&mut self.store) {
            Ok(Some(command)) => {
                actions.push(Action::Undone(command));
                actions.extend(self.after_mutation());
            }
            Ok(None) => {}
            Err(err) => actions.push(Action::Rejected(err)),
        }
        actions
    }

    pub fn redo(&mut self) -> Vec<Action> {
        let mut actions = self.cancel_gesture();
        match self.history.redo(&mut self.store) {
            Ok(Some(command)) => {
                actions.push(Action::Redone(command));
                actions.extend(self.after_mutation());
            }
            Ok(None) => {}
            Err(err) => actions.push(Action::Rejected(err)),
        }
        actions
    }

    /// Renumber every `z_index` to `0..n-1` in paint order and remap history.
    pub fn normalize_z_indices(&mut self) -> Vec<Action> {
        let entries = self.store.z_entries();
        let remap = ZRemap::from_entries(&entries);
        for (id, z) in zorder::normalize_z_indices(&entries) {
            self.store.set_z_index(&id, z);
        }
        self.history.remap_z(&remap);
        self.fractional_ops = 0;
        info!(count = entries.len(), "z indices normalized");
        vec![Action::RenderNeeded]
    }

    /// Normalize z order and return every element in paint order for persistence.
    pub fn prepare_save(&mut self) -> Vec<Element> {
        self.normalize_z_indices();
        self.store.sorted().into_iter().cloned().collect()
    }

    // --- Render state ---

    /// Geometry to draw for `id`: the working copy during a gesture, else committed state.
    #[must_use]
    pub fn display_geometry(&self, id: &ElementId) -> Option<Geometry> {
        self.input.working_geometry(id).or_else(|| self.store.get(id).map(Element::geometry))
    }

    /// Guides fired on the last processed frame.
    #[must_use]
    pub fn guides(&self) -> &[SnapGuide] {
        self.input.guides()
    }

    #[must_use]
    pub fn marquee_rect(&self) -> Option<Bounds> {
        match &self.input {
            InputState::Marquee(m) if !m.is_degenerate() => Some(m.rect()),
            _ => None,
        }
    }

    /// Live preview-selection of the marquee in progress.
    #[must_use]
    pub fn marquee_preview(&self) -> Vec<ElementId> {
        match &self.input {
            InputState::Marquee(m) => m.preview(&self.store),
            _ => Vec::new(),
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.input.is_idle()
    }

    // --- Queries ---

    #[must_use]
    pub fn store(&self) -> &ElementStore {
        &self.store
    }

    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.store.get(id)
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn canvas_size(&self) -> Size {
        self.canvas
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn input_state(&self) -> &InputState {
        &self.input
    }

    // --- Internals ---

    fn start_marquee(&mut self, p: Point, modifiers: Modifiers) -> Vec<Action> {
        let mut actions = Vec::new();
        let prior = self.selection.ids().to_vec();
        if !modifiers.shift && self.selection.clear() {
            actions.push(self.selection_changed());
        }
        self.input = InputState::Marquee(Marquee::new(p, modifiers.shift, prior));
        actions.push(Action::RenderNeeded);
        actions
    }

    fn start_drag(&mut self, id: ElementId, p: Point, modifiers: Modifiers) -> Vec<Action> {
        if !self.store.contains(&id) {
            return vec![Action::Rejected(EngineError::NotFound(id))];
        }
        let mut actions = Vec::new();
        let group = expand_groups(&[id], &self.store);
        if modifiers.shift && self.selection.contains(&id) {
            for member in &group {
                self.selection.remove(member);
            }
            actions.push(self.selection_changed());
            actions.push(Action::RenderNeeded);
            return actions;
        }
        let changed = if modifiers.shift {
            self.selection.union(&group)
        } else if self.selection.contains(&id) {
            false
        } else {
            self.selection.set(group)
        };
        if changed {
            actions.push(self.selection_changed());
        }

        let start = seed(&self.store, self.selection.ids());
        debug!(%id, count = start.len(), "drag started");
        self.input = InputState::Dragging { origin: p, working: start.clone(), start, guides: Vec::new() };
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Participants for a handle gesture: the whole selection when the handle
    /// belongs to a multi-selection, otherwise `id` and its group (selected first).
    ///
    /// An unknown `id` leaves the selection untouched.
    fn handle_participants(
        &mut self,
        id: ElementId,
    ) -> Result<(Vec<(ElementId, Geometry)>, Option<Action>), EngineError> {
        if !self.store.contains(&id) {
            return Err(EngineError::NotFound(id));
        }
        if self.selection.contains(&id) && self.selection.len() > 1 {
            return Ok((seed(&self.store, self.selection.ids()), None));
        }
        let group = expand_groups(&[id], &self.store);
        let action = self.selection.set(group).then(|| self.selection_changed());
        Ok((seed(&self.store, self.selection.ids()), action))
    }

    fn resize_mode(&self, modifiers: Modifiers) -> ResizeMode {
        if modifiers.is_held(self.config.free_resize_modifier) { ResizeMode::Free } else { ResizeMode::Proportional }
    }

    /// Rebuild the working copy from the gesture start for a pointer at `screen`.
    fn update_gesture(&mut self, screen: Point, modifiers: Modifiers) {
        let p = self.viewport.screen_to_canvas(screen);
        let snapping = self.config.snap_enabled && !modifiers.is_held(self.config.snap_bypass_modifier);
        let others = if snapping { snap_targets(&self.store, &self.input.participants()) } else { Vec::new() };
        let ctx = SnapContext {
            others: &others,
            canvas: self.canvas,
            options: SnapOptions::from_config(&self.config, &self.viewport),
        };
        let ctx = snapping.then_some(&ctx);
        let mode = self.resize_mode(modifiers);
        let aspect_lock = modifiers.is_held(self.config.aspect_lock_modifier);
        let rotation_snap = (!modifiers.is_held(self.config.snap_bypass_modifier)).then_some(RotationSnap {
            angles: &self.config.rotation_snap_angles,
            threshold: self.config.rotation_snap_threshold_deg,
        });

        match &mut self.input {
            InputState::Idle => {}
            InputState::Dragging { origin, start, working, guides } => {
                let frame = drag_frame(start, pointer_delta(*origin, p), ctx);
                *working = frame.working;
                *guides = frame.guides;
            }
            InputState::Resizing { anchor, mode: current_mode, origin, start, working, guides } => {
                *current_mode = mode;
                let frame =
                    resize_frame(*anchor, mode, aspect_lock, start, pointer_delta(*origin, p), self.config.min_size, ctx);
                *working = frame.working;
                *guides = frame.guides;
            }
            InputState::Rotating { pivot, start_angle, start, working } => {
                *working = rotate_frame(start, *pivot, *start_angle, p, rotation_snap);
            }
            InputState::Marquee(marquee) => marquee.current = p,
        }
    }

    fn commit_gesture(
        &mut self,
        kind: CommandKind,
        start: &[(ElementId, Geometry)],
        working: &[(ElementId, Geometry)],
    ) -> Vec<Action> {
        let changes = geometry_changes(start, working);
        if changes.is_empty() {
            debug!(?kind, "gesture ended without change");
            return Vec::new();
        }
        debug!(?kind, changes = changes.len(), "gesture committed");
        self.execute(Command::new(kind, changes).at(self.clock_ms))
    }

    fn cancel_gesture(&mut self) -> Vec<Action> {
        self.pending = None;
        if self.input.is_idle() {
            return Vec::new();
        }
        self.input = InputState::Idle;
        debug!("gesture cancelled");
        vec![Action::RenderNeeded]
    }

    /// Shared reorder path: retry once after normalizing when bisection runs
    /// out of precision, and normalize after enough fractional steps.
    fn reorder(&mut self, op: fn(&[ZEntry], &[ElementId]) -> ZStep, fractional: bool) -> Vec<Action> {
        let ids = self.selection.ids().to_vec();
        let mut actions = Vec::new();
        let mut step = op(&self.store.z_entries(), &ids);
        if step == ZStep::Exhausted {
            actions.extend(self.normalize_z_indices());
            step = op(&self.store.z_entries(), &ids);
        }
        let moves = match step {
            ZStep::Moved(moves) => moves,
            ZStep::Unchanged => return actions,
            ZStep::Exhausted => {
                warn!(count = ids.len(), "reorder failed after normalization");
                return actions;
            }
        };
        let changes = moves
            .into_iter()
            .filter_map(|(id, z)| {
                let before = self.store.get(&id)?.z_index;
                Some(ElementChange::ZIndex { id, before, after: z })
            })
            .collect();
        let executed = self.execute(Command::new(CommandKind::Reorder, changes).at(self.clock_ms));
        let committed = executed.iter().any(|a| matches!(a, Action::Committed(_)));
        actions.extend(executed);
        if fractional && committed {
            self.fractional_ops += 1;
            if self.fractional_ops >= self.config.normalize_after {
                actions.extend(self.normalize_z_indices());
            }
        }
        actions
    }

    fn selected_in_paint_order(&self) -> Vec<&Element> {
        self.store.sorted().into_iter().filter(|e| self.selection.contains(&e.id)).collect()
    }

    /// Drop selected ids that a command removed.
    fn after_mutation(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.selection.retain_present(&self.store) {
            actions.push(self.selection_changed());
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    fn selection_changed(&self) -> Action {
        Action::SelectionChanged(self.selection.ids().to_vec())
    }
}
