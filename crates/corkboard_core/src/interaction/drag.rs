//! Drag state: pointer movement to clamped note positions.
//!
//! # Invariants
//! - The grab offset is captured once, at pointer-down, in board space.
//! - Every tick clamps against the bounds supplied with that tick.

use crate::interaction::position::clamp;
use crate::model::geometry::{BoardBounds, Point, Size};
use crate::model::note::{Note, NoteId};

/// Part of a note that received a pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// Card surface (title, photo, caption).
    Body,
    DeleteControl,
    EditControl,
    /// Inline editable text region.
    TextRegion,
    /// Formatting toolbar.
    Toolbar,
}

impl PointerTarget {
    /// Only the bare card surface may start a drag.
    pub fn starts_drag(self) -> bool {
        matches!(self, Self::Body)
    }
}

/// Active drag of one note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragController {
    note: NoteId,
    offset: Point,
}

impl DragController {
    /// Captures the grab offset between `pointer` and the note's top-left.
    pub fn begin(note: &Note, pointer: Point) -> Self {
        Self {
            note: note.id,
            offset: pointer - note.position,
        }
    }

    pub fn note(&self) -> NoteId {
        self.note
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Clamped position for the latest pointer location.
    pub fn position_for(&self, pointer: Point, bounds: BoardBounds, footprint: Size) -> Point {
        clamp(pointer - self.offset, bounds, footprint)
    }
}
