//! Delta events emitted by the board for the host to render.

use crate::interaction::edit::TextSelection;
use crate::model::geometry::Point;
use crate::model::note::NoteId;
use crate::model::rich_text::Mark;
use serde::Serialize;

/// One observable change, in the order it happened.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BoardEvent {
    NoteCreated { id: NoteId },
    NoteDeleted { id: NoteId },
    NoteMoved { id: NoteId, position: Point },
    NoteRaised { id: NoteId, z_index: i64 },
    NoteRestyled { id: NoteId },
    DragStarted { id: NoteId },
    DragEnded { id: NoteId },
    EditAffordanceShown { id: NoteId },
    EditAffordanceHidden { id: NoteId },
    OverlapMessageShown { id: NoteId, text: String, anchor: Point },
    OverlapMessageCleared { id: NoteId },
    EditStarted { id: NoteId },
    /// Move focus into the region and restore `selection`.
    FocusRequested { id: NoteId, selection: TextSelection },
    FormatApplied { id: NoteId, mark: Mark, active: bool },
    /// Session closed; the toolbar should be hidden.
    EditCommitted { id: NoteId },
}
