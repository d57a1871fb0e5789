//! Interaction tuning values.
//!
//! # Responsibility
//! - Keep dwell thresholds, footprint and creation defaults as named values.
//! - Allow the host to override them from JSON.
//!
//! # Invariants
//! - `footprint` is finite and strictly positive on both axes.
//! - `mostly_covered_ratio` is in `(0, 1]`.

use crate::model::geometry::{Point, Size};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Fixed note width/height used by every geometry calculation.
pub const DEFAULT_FOOTPRINT: Size = Size::new(180.0, 180.0);
/// Coverage at or above which a note counts as mostly covered.
pub const DEFAULT_MOSTLY_COVERED_RATIO: f64 = 0.6;
pub const DEFAULT_AFFORDANCE_DELAY_MS: u64 = 3_000;
pub const DEFAULT_OVERLAP_DELAY_MS: u64 = 5_000;
pub const DEFAULT_MESSAGE_DURATION_MS: u64 = 3_000;
/// Deferred focus runs on the next `advance`, after the region mounts.
pub const DEFAULT_FOCUS_DELAY_MS: u64 = 0;
pub const DEFAULT_NOTE_POSITION: Point = Point::new(50.0, 50.0);
pub const DEFAULT_MAX_CAPTION_CHARS: usize = 180;

/// Engine-wide interaction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub footprint: Size,
    pub mostly_covered_ratio: f64,
    pub affordance_delay_ms: u64,
    pub overlap_delay_ms: u64,
    pub message_duration_ms: u64,
    pub focus_delay_ms: u64,
    pub default_position: Point,
    pub max_caption_chars: usize,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            footprint: DEFAULT_FOOTPRINT,
            mostly_covered_ratio: DEFAULT_MOSTLY_COVERED_RATIO,
            affordance_delay_ms: DEFAULT_AFFORDANCE_DELAY_MS,
            overlap_delay_ms: DEFAULT_OVERLAP_DELAY_MS,
            message_duration_ms: DEFAULT_MESSAGE_DURATION_MS,
            focus_delay_ms: DEFAULT_FOCUS_DELAY_MS,
            default_position: DEFAULT_NOTE_POSITION,
            max_caption_chars: DEFAULT_MAX_CAPTION_CHARS,
        }
    }
}

impl InteractionConfig {
    /// Parses and validates a JSON override; missing fields keep defaults.
    ///
    /// # Errors
    /// - `Parse` when the input is not valid JSON for this shape.
    /// - Any `validate()` error.
    pub fn from_json_str(source: &str) -> Result<Self, InteractionConfigError> {
        let config: Self = serde_json::from_str(source)
            .map_err(|err| InteractionConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the geometric and threshold invariants.
    pub fn validate(&self) -> Result<(), InteractionConfigError> {
        let Size { width, height } = self.footprint;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(InteractionConfigError::InvalidFootprint { width, height });
        }
        let ratio = self.mostly_covered_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(InteractionConfigError::InvalidCoverageRatio(ratio));
        }
        Ok(())
    }

    pub fn affordance_delay(&self) -> Duration {
        Duration::from_millis(self.affordance_delay_ms)
    }

    pub fn overlap_delay(&self) -> Duration {
        Duration::from_millis(self.overlap_delay_ms)
    }

    pub fn message_duration(&self) -> Duration {
        Duration::from_millis(self.message_duration_ms)
    }

    pub fn focus_delay(&self) -> Duration {
        Duration::from_millis(self.focus_delay_ms)
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionConfigError {
    Parse(String),
    InvalidFootprint { width: f64, height: f64 },
    InvalidCoverageRatio(f64),
}

impl Display for InteractionConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(message) => write!(f, "invalid interaction config: {message}"),
            Self::InvalidFootprint { width, height } => {
                write!(f, "footprint must be positive, got {width}x{height}")
            }
            Self::InvalidCoverageRatio(value) => {
                write!(f, "mostly_covered_ratio must be in (0, 1], got {value}")
            }
        }
    }
}

impl Error for InteractionConfigError {}
