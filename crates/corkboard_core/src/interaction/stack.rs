//! Stacking order (z-index) management.
//!
//! # Invariants
//! - Issued values strictly increase for the lifetime of a `StackOrder`,
//!   even across deletions, so a value is never handed out twice.
//! - Raising the current top note still issues a fresh value; callers must
//!   reason about ordering, not absolute numbers.

use crate::model::note::{Note, NoteId};

/// Issues unique, monotonically increasing z-indices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StackOrder {
    issued: Option<i64>,
}

impl StackOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest value issued so far, if any.
    pub fn high_water(&self) -> Option<i64> {
        self.issued
    }

    /// Issues the next value above both the high-water mark and `notes`.
    pub fn next_z_index(&mut self, notes: &[Note]) -> i64 {
        let collection_max = notes.iter().map(|note| note.z_index).max();
        let top = match (self.issued, collection_max) {
            (Some(issued), Some(max)) => Some(issued.max(max)),
            (issued, max) => issued.or(max),
        };
        let next = top.map_or(1, |value| value.saturating_add(1));
        self.issued = Some(next);
        next
    }

    /// Returns the raised replacement for `id`, or `None` when it is absent.
    pub fn raise(&mut self, id: NoteId, notes: &[Note]) -> Option<Note> {
        let target = notes.iter().find(|note| note.id == id)?;
        let mut raised = target.clone();
        raised.z_index = self.next_z_index(notes);
        Some(raised)
    }

    /// Reassigns unique values to hydrated notes, keeping their relative order.
    ///
    /// Ties keep the incoming sequence order.
    pub fn renumber(&mut self, notes: &mut [Note]) {
        let mut order: Vec<usize> = (0..notes.len()).collect();
        order.sort_by_key(|index| notes[*index].z_index);
        for index in order {
            let next = self.issued.map_or(1, |value| value.saturating_add(1));
            self.issued = Some(next);
            notes[index].z_index = next;
        }
    }
}

/// Raises `id` above every other note in `notes`, returning the new collection.
///
/// Unknown ids leave the collection unchanged.
pub fn bring_to_front(id: NoteId, notes: &[Note]) -> Vec<Note> {
    let mut order = StackOrder::new();
    let Some(raised) = order.raise(id, notes) else {
        return notes.to_vec();
    };
    notes
        .iter()
        .map(|note| {
            if note.id == id {
                raised.clone()
            } else {
                note.clone()
            }
        })
        .collect()
}
