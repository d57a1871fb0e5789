//! Inline rich-text edit session.
//!
//! # Responsibility
//! - Own the working copy of a note's rich content while it is edited.
//! - Keep an explicit selection snapshot that survives focus moving to the
//!   formatting toolbar.
//! - Apply bold/italic/underline strictly within the snapshotted span.
//!
//! # Invariants
//! - The snapshot is always clamped to the working content length.
//! - Losing focus never commits; only `commit` ends the session.
//! - A collapsed selection makes formatting commands a no-op.

use crate::model::note::{Note, NoteId};
use crate::model::rich_text::{Mark, RichText, TextRange};
use serde::{Deserialize, Serialize};

/// Selection inside the edit region, in char offsets.
///
/// `anchor` is where the selection started, `focus` where it ends; they may
/// be in either order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSelection {
    pub anchor: usize,
    pub focus: usize,
}

impl TextSelection {
    pub fn new(anchor: usize, focus: usize) -> Self {
        Self { anchor, focus }
    }

    pub fn caret(at: usize) -> Self {
        Self::new(at, at)
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    pub fn range(&self) -> TextRange {
        TextRange::new(self.anchor, self.focus)
    }

    fn clamped(self, len: usize) -> Self {
        Self::new(self.anchor.min(len), self.focus.min(len))
    }
}

/// Toolbar formatting command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatCommand {
    Bold,
    Italic,
    Underline,
}

impl FormatCommand {
    pub fn mark(self) -> Mark {
        match self {
            Self::Bold => Mark::Bold,
            Self::Italic => Mark::Italic,
            Self::Underline => Mark::Underline,
        }
    }
}

/// Result of a formatting command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatOutcome {
    /// The mark was toggled; `active` tells whether the span now carries it.
    Applied {
        mark: Mark,
        active: bool,
        selection: TextSelection,
    },
    /// The restored selection was collapsed; nothing changed.
    NoSelection,
    /// The target note has no open session.
    NotEditing,
}

/// Working state of one note being edited.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    note: NoteId,
    content: RichText,
    saved_selection: TextSelection,
    focused: bool,
}

impl EditSession {
    /// Opens a session with the caret snapshotted at the end of the content.
    ///
    /// Focus is not captured yet; the caller runs `focus` once the region
    /// has mounted.
    pub fn begin(note: &Note) -> Self {
        let content = note.rich_content.clone().unwrap_or_default();
        let end = content.char_len();
        Self {
            note: note.id,
            content,
            saved_selection: TextSelection::caret(end),
            focused: false,
        }
    }

    pub fn note(&self) -> NoteId {
        self.note
    }

    pub fn content(&self) -> &RichText {
        &self.content
    }

    pub fn saved_selection(&self) -> TextSelection {
        self.saved_selection
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Captures focus and returns the selection to restore into the region.
    pub fn focus(&mut self) -> TextSelection {
        self.focused = true;
        self.saved_selection
    }

    /// Focus moved elsewhere (typically the toolbar); the snapshot is kept.
    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Re-snapshots after pointer-up or key-up inside the region.
    pub fn select(&mut self, selection: TextSelection) -> TextSelection {
        self.saved_selection = selection.clamped(self.content.char_len());
        self.saved_selection
    }

    /// Replaces the selected text with `text` and moves the caret after it.
    pub fn input(&mut self, text: &str) -> TextSelection {
        let caret = self
            .content
            .replace_range(self.saved_selection.range(), text);
        self.saved_selection = TextSelection::caret(caret);
        self.saved_selection
    }

    /// Adopts the region's content as reported by the host after input.
    pub fn sync(&mut self, content: RichText, selection: TextSelection) -> TextSelection {
        self.content = content;
        self.select(selection)
    }

    /// Refocuses, restores the snapshot and toggles `command` inside it.
    pub fn apply_format(&mut self, command: FormatCommand) -> FormatOutcome {
        self.focused = true;
        let selection = self.select(self.saved_selection);
        if selection.is_collapsed() {
            return FormatOutcome::NoSelection;
        }
        let mark = command.mark();
        match self.content.toggle_mark(mark, selection.range()) {
            Some(active) => FormatOutcome::Applied {
                mark,
                active,
                selection: self.select(selection),
            },
            None => FormatOutcome::NoSelection,
        }
    }

    /// Ends the session with its own working content.
    pub fn commit(self) -> RichText {
        self.content
    }
}

#[cfg(test)]
mod tests {
    use super::{EditSession, FormatCommand, FormatOutcome, TextSelection};
    use crate::model::geometry::Point;
    use crate::model::note::{Note, StyleType};
    use crate::model::rich_text::{Mark, RichText, TextRange};
    use uuid::Uuid;

    fn note_with(content: Option<RichText>) -> Note {
        Note {
            id: Uuid::new_v4(),
            position: Point::ORIGIN,
            rotation: 0.0,
            shadow_depth: 2,
            z_index: 1,
            color: "#fff59d".to_string(),
            style_type: StyleType::Plain,
            title: "edit".to_string(),
            photo: None,
            caption: String::new(),
            rich_content: content,
            rich_text_enabled: true,
        }
    }

    #[test]
    fn begins_with_caret_at_end_and_unfocused() {
        let mut session = EditSession::begin(&note_with(Some(RichText::plain("hello"))));
        assert_eq!(session.saved_selection(), TextSelection::caret(5));
        assert!(!session.is_focused());
        assert_eq!(session.focus(), TextSelection::caret(5));
        assert!(session.is_focused());
    }

    #[test]
    fn formatting_restores_snapshot_after_blur() {
        let mut session = EditSession::begin(&note_with(Some(RichText::plain("hello world"))));
        session.focus();
        session.select(TextSelection::new(11, 6));
        session.blur();

        let outcome = session.apply_format(FormatCommand::Bold);
        assert_eq!(
            outcome,
            FormatOutcome::Applied {
                mark: Mark::Bold,
                active: true,
                selection: TextSelection::new(11, 6),
            }
        );
        assert!(session.is_focused());
        assert!(session.content().is_marked(Mark::Bold, TextRange::new(6, 11)));
        assert!(!session.content().marks_at(5).contains(Mark::Bold));

        let outcome = session.apply_format(FormatCommand::Bold);
        assert!(matches!(outcome, FormatOutcome::Applied { active: false, .. }));
        assert!(!session.content().has_marks());
    }

    #[test]
    fn collapsed_selection_is_a_no_op() {
        let mut session = EditSession::begin(&note_with(Some(RichText::plain("abc"))));
        assert_eq!(
            session.apply_format(FormatCommand::Italic),
            FormatOutcome::NoSelection
        );
        assert!(!session.content().has_marks());
    }

    #[test]
    fn selection_is_clamped_and_input_moves_caret() {
        let mut session = EditSession::begin(&note_with(None));
        assert_eq!(session.select(TextSelection::new(3, 9)), TextSelection::caret(0));

        assert_eq!(session.input("note"), TextSelection::caret(4));
        session.select(TextSelection::new(0, 4));
        session.apply_format(FormatCommand::Underline);
        session.select(TextSelection::caret(4));
        session.input("!");
        let content = session.commit();
        assert_eq!(content.text(), "note!");
        assert!(content.is_marked(Mark::Underline, TextRange::new(0, 5)));
    }

    #[test]
    fn sync_adopts_host_content() {
        let mut session = EditSession::begin(&note_with(None));
        let selection = session.sync(RichText::from_markup("<i>hi</i> there"), TextSelection::new(0, 50));
        assert_eq!(selection, TextSelection::new(0, 8));
        assert!(session.content().is_marked(Mark::Italic, TextRange::new(0, 2)));
    }
}
