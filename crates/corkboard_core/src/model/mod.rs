//! Domain model for board notes.
//!
//! # Responsibility
//! - Define canonical note, geometry and rich text values.
//! - Keep every value serializable and free of rendering handles.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - Rich content is an explicit run model, never raw markup.

pub mod geometry;
pub mod markup;
pub mod note;
pub mod rich_text;
