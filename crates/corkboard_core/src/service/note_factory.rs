//! Note creation from form drafts.
//!
//! # Responsibility
//! - Turn a validated `NoteDraft` into a fully populated `Note`.
//! - Derive the presentational tilt and shadow once, at creation.
//!
//! # Invariants
//! - `rotation` is in `[-4, 4]` degrees, rounded to two decimals.
//! - `shadow_depth` is in `2..=5`.
//! - The caption is truncated to `max_caption_chars` chars.
//! - The initial position is clamped into the supplied bounds.

use crate::config::InteractionConfig;
use crate::interaction::position::clamp;
use crate::model::geometry::BoardBounds;
use crate::model::note::{Note, NoteDraft, NoteDraftError};
use rand::Rng;
use uuid::Uuid;

const MAX_TILT_DEGREES: f64 = 4.0;
const MIN_SHADOW_DEPTH: u8 = 2;
const MAX_SHADOW_DEPTH: u8 = 5;

/// Builds notes with the board's creation defaults.
pub struct NoteFactory<'a> {
    config: &'a InteractionConfig,
}

impl<'a> NoteFactory<'a> {
    pub fn new(config: &'a InteractionConfig) -> Self {
        Self { config }
    }

    /// Creates a note at the default position with the given stacking value.
    ///
    /// # Errors
    /// - Any `NoteDraft::validate` error.
    pub fn build(
        &self,
        draft: &NoteDraft,
        z_index: i64,
        bounds: BoardBounds,
        rng: &mut impl Rng,
    ) -> Result<Note, NoteDraftError> {
        draft.validate()?;

        let photo = draft
            .photo
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        Ok(Note {
            id: Uuid::new_v4(),
            position: clamp(self.config.default_position, bounds, self.config.footprint),
            rotation: random_tilt(rng),
            shadow_depth: rng.gen_range(MIN_SHADOW_DEPTH..=MAX_SHADOW_DEPTH),
            z_index,
            color: draft.resolved_color(),
            style_type: draft.style_type,
            title: draft.title.trim().to_string(),
            photo,
            caption: truncate_chars(draft.caption.trim(), self.config.max_caption_chars),
            rich_content: None,
            rich_text_enabled: true,
        })
    }
}

fn random_tilt(rng: &mut impl Rng) -> f64 {
    let raw = rng.gen_range(-MAX_TILT_DEGREES..=MAX_TILT_DEGREES);
    (raw * 100.0).round() / 100.0
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}
