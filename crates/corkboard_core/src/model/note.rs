//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note card placed on the board.
//! - Define the creation payload handed over by the form collaborator.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - `rotation` and `shadow_depth` are fixed at creation.
//! - `title`, `photo` and `caption` are never edited by the engine.
//! - `rich_content` only carries bold/italic/underline formatting.

use crate::model::geometry::Point;
use crate::model::rich_text::RichText;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid color regex"));

/// Stable identifier for every note on the board.
pub type NoteId = Uuid;

/// Default sticky-note yellow.
pub const DEFAULT_NOTE_COLOR: &str = "#fff59d";

/// Built-in palette offered by the color picker.
pub const NOTE_PALETTE: [&str; 4] = ["#fff59d", "#ffd1dc", "#cce5ff", "#d4f8d4"];

/// Paper background variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleType {
    #[default]
    Plain,
    Lined,
    Grid,
}

/// A positioned card on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    /// Top-left offset from the board origin.
    pub position: Point,
    /// Degrees; small tilt applied at creation.
    pub rotation: f64,
    /// Visual depth cue, independent of stacking order.
    pub shadow_depth: u8,
    /// Unique across the live collection.
    pub z_index: i64,
    pub color: String,
    pub style_type: StyleType,
    pub title: String,
    pub photo: Option<String>,
    pub caption: String,
    pub rich_content: Option<RichText>,
    /// Whether an inline edit session may be opened on this note.
    #[serde(default = "default_rich_text_enabled")]
    pub rich_text_enabled: bool,
}

fn default_rich_text_enabled() -> bool {
    true
}

impl Note {
    /// Returns whether an edit session can target this note.
    pub fn supports_rich_text(&self) -> bool {
        self.rich_text_enabled
    }
}

/// Creation payload produced by the note form collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDraft {
    pub title: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub caption: String,
    /// `#rrggbb`; empty selects `DEFAULT_NOTE_COLOR`.
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub style_type: StyleType,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Validates user content before it reaches the board.
    ///
    /// # Errors
    /// - `EmptyTitle` when the title is blank.
    /// - `InvalidColor` when a non-empty color is not `#rrggbb`.
    pub fn validate(&self) -> Result<(), NoteDraftError> {
        if self.title.trim().is_empty() {
            return Err(NoteDraftError::EmptyTitle);
        }
        let color = self.color.trim();
        if !color.is_empty() && !HEX_COLOR_RE.is_match(color) {
            return Err(NoteDraftError::InvalidColor(color.to_string()));
        }
        Ok(())
    }

    /// Effective color after defaulting.
    pub fn resolved_color(&self) -> String {
        normalize_color(&self.color).unwrap_or_else(|| DEFAULT_NOTE_COLOR.to_string())
    }
}

/// Normalizes a `#rrggbb` color to lowercase; `None` when blank or invalid.
pub fn normalize_color(value: &str) -> Option<String> {
    let trimmed = value.trim();
    HEX_COLOR_RE
        .is_match(trimmed)
        .then(|| trimmed.to_ascii_lowercase())
}

/// Draft validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteDraftError {
    EmptyTitle,
    InvalidColor(String),
}

impl Display for NoteDraftError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "note title must not be empty"),
            Self::InvalidColor(value) => write!(f, "note color must be #rrggbb, got `{value}`"),
        }
    }
}

impl Error for NoteDraftError {}

#[cfg(test)]
mod tests {
    use super::{normalize_color, NoteDraft, NoteDraftError, DEFAULT_NOTE_COLOR};

    #[test]
    fn blank_title_is_rejected() {
        let err = NoteDraft::new("   ").validate().expect_err("blank title must fail");
        assert_eq!(err, NoteDraftError::EmptyTitle);
    }

    #[test]
    fn color_defaults_and_normalizes() {
        let mut draft = NoteDraft::new("lunch");
        assert_eq!(draft.resolved_color(), DEFAULT_NOTE_COLOR);

        draft.color = " #CCE5FF ".to_string();
        draft.validate().expect("hex color should validate");
        assert_eq!(draft.resolved_color(), "#cce5ff");
    }

    #[test]
    fn malformed_color_is_rejected() {
        let mut draft = NoteDraft::new("lunch");
        draft.color = "yellow".to_string();
        let err = draft.validate().expect_err("named color must fail");
        assert_eq!(err, NoteDraftError::InvalidColor("yellow".to_string()));
        assert_eq!(normalize_color("#12345"), None);
    }
}
