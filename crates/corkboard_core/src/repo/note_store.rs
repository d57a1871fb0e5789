//! Owned note collection with copy-on-write snapshots.
//!
//! # Responsibility
//! - Hold the live note collection as an arena addressed by `NoteId`.
//! - Hand out immutable snapshots that later mutations never alias.
//!
//! # Invariants
//! - Ids are unique inside the store.
//! - Every mutation replaces a whole entry; a snapshot taken before the
//!   mutation keeps observing the previous value.
//! - Insertion order is preserved (render order falls back to it for ties).

use crate::model::note::{Note, NoteId};
use std::sync::Arc;

/// Immutable view of the collection at one point in time.
pub type NoteSnapshot = Arc<Vec<Note>>;

/// Copy-on-write note arena.
#[derive(Debug, Clone, Default)]
pub struct NoteStore {
    notes: NoteSnapshot,
}

impl NoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from notes, keeping the first entry for duplicate ids.
    pub fn from_notes(notes: Vec<Note>) -> Self {
        let mut unique: Vec<Note> = Vec::with_capacity(notes.len());
        for note in notes {
            if !unique.iter().any(|existing| existing.id == note.id) {
                unique.push(note);
            }
        }
        Self {
            notes: Arc::new(unique),
        }
    }

    /// Cheap shared snapshot of the current collection.
    pub fn snapshot(&self) -> NoteSnapshot {
        Arc::clone(&self.notes)
    }

    pub fn as_slice(&self) -> &[Note] {
        self.notes.as_slice()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn contains(&self, id: NoteId) -> bool {
        self.get(id).is_some()
    }

    /// Appends a note; returns `false` when the id is already present.
    pub fn insert(&mut self, note: Note) -> bool {
        if self.contains(note.id) {
            return false;
        }
        Arc::make_mut(&mut self.notes).push(note);
        true
    }

    /// Replaces the entry with the same id; returns `false` when absent.
    pub fn replace(&mut self, note: Note) -> bool {
        let Some(index) = self.position_of(note.id) else {
            return false;
        };
        Arc::make_mut(&mut self.notes)[index] = note;
        true
    }

    /// Removes one note by id.
    pub fn remove(&mut self, id: NoteId) -> Option<Note> {
        let index = self.position_of(id)?;
        Some(Arc::make_mut(&mut self.notes).remove(index))
    }

    /// Notes sorted back-to-front by `z_index`.
    pub fn render_order(&self) -> Vec<&Note> {
        let mut ordered: Vec<&Note> = self.notes.iter().collect();
        ordered.sort_by_key(|note| note.z_index);
        ordered
    }

    fn position_of(&self, id: NoteId) -> Option<usize> {
        self.notes.iter().position(|note| note.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::NoteStore;
    use crate::model::geometry::Point;
    use crate::model::note::{Note, StyleType};
    use uuid::Uuid;

    fn note(z_index: i64) -> Note {
        Note {
            id: Uuid::new_v4(),
            position: Point::ORIGIN,
            rotation: 0.0,
            shadow_depth: 3,
            z_index,
            color: "#fff59d".to_string(),
            style_type: StyleType::Grid,
            title: "n".to_string(),
            photo: None,
            caption: String::new(),
            rich_content: None,
            rich_text_enabled: true,
        }
    }

    #[test]
    fn snapshot_is_not_aliased_by_later_replace() {
        let mut store = NoteStore::new();
        let original = note(1);
        let id = original.id;
        assert!(store.insert(original.clone()));

        let before = store.snapshot();
        let mut moved = original;
        moved.position = Point::new(40.0, 40.0);
        assert!(store.replace(moved));

        assert_eq!(before[0].position, Point::ORIGIN);
        assert_eq!(
            store.get(id).expect("note should exist").position,
            Point::new(40.0, 40.0)
        );
    }

    #[test]
    fn rejects_duplicate_ids_and_missing_replacements() {
        let mut store = NoteStore::new();
        let first = note(1);
        assert!(store.insert(first.clone()));
        assert!(!store.insert(first.clone()));
        assert!(!store.replace(note(2)));
        assert_eq!(store.len(), 1);

        let deduped = NoteStore::from_notes(vec![first.clone(), first]);
        assert_eq!(deduped.len(), 1);
    }

    #[test]
    fn remove_and_render_order() {
        let low = note(1);
        let high = note(9);
        let mid = note(4);
        let mut store = NoteStore::from_notes(vec![high.clone(), low.clone(), mid.clone()]);

        let order: Vec<i64> = store.render_order().iter().map(|n| n.z_index).collect();
        assert_eq!(order, vec![1, 4, 9]);

        assert_eq!(store.remove(mid.id).map(|n| n.id), Some(mid.id));
        assert!(store.remove(mid.id).is_none());
        assert_eq!(store.len(), 2);
    }
}
