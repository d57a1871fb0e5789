//! Interaction engine for a freeform board of sticky notes.
//! Hosts feed pointer, keyboard and clock input; the board answers with
//! snapshots and delta events.

pub mod config;
pub mod interaction;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{InteractionConfig, InteractionConfigError};
pub use interaction::drag::PointerTarget;
pub use interaction::edit::{FormatCommand, FormatOutcome, TextSelection};
pub use interaction::event::BoardEvent;
pub use interaction::overlap::OverlapInfo;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::geometry::{BoardBounds, Point, Size};
pub use model::note::{Note, NoteDraft, NoteDraftError, NoteId, StyleType};
pub use model::rich_text::{Mark, RichText};
pub use repo::note_store::NoteSnapshot;
pub use service::board::{Board, EditEntry, EditRejection, NoteInteraction};

/// Minimal health-check API for host wiring.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
