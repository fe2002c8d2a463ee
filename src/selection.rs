//! The committed selection: an ordered, de-duplicated set of element ids.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use crate::doc::{ElementId, ElementStore};

/// Selected element ids in the order they were selected.
///
/// Mutators return whether the set actually changed, so callers know when to
/// emit a selection-changed action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<ElementId>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection. Duplicates in `ids` are dropped.
    pub fn set(&mut self, ids: Vec<ElementId>) -> bool {
        let mut next = Vec::with_capacity(ids.len());
        for id in ids {
            if !next.contains(&id) {
                next.push(id);
            }
        }
        if next == self.ids {
            return false;
        }
        self.ids = next;
        true
    }

    pub fn add(&mut self, id: ElementId) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    pub fn remove(&mut self, id: &ElementId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|x| x != id);
        self.ids.len() != before
    }

    /// Flip membership of `id`. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, id: ElementId) -> bool {
        if self.remove(&id) {
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    pub fn clear(&mut self) -> bool {
        if self.ids.is_empty() {
            return false;
        }
        self.ids.clear();
        true
    }

    /// Append every id not already selected.
    pub fn union(&mut self, ids: &[ElementId]) -> bool {
        let mut changed = false;
        for id in ids {
            changed |= self.add(*id);
        }
        changed
    }

    #[must_use]
    pub fn contains(&self, id: &ElementId) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Drop ids that are no longer in the store.
    pub fn retain_present(&mut self, store: &ElementStore) -> bool {
        let before = self.ids.len();
        self.ids.retain(|id| store.contains(id));
        self.ids.len() != before
    }
}

/// Extend `ids` with every member of each grouped element's group.
///
/// Order is kept; group mates are appended in paint order after the id that
/// pulled them in.
#[must_use]
pub fn expand_groups(ids: &[ElementId], store: &ElementStore) -> Vec<ElementId> {
    let mut out: Vec<ElementId> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(id) {
            out.push(*id);
        }
        let Some(group_id) = store.get(id).and_then(|e| e.group_id) else {
            continue;
        };
        for member in store.group_members(&group_id) {
            if !out.contains(&member) {
                out.push(member);
            }
        }
    }
    out
}
