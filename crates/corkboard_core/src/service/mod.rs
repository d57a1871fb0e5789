//! Board-level use cases.
//!
//! # Responsibility
//! - Compose the interaction controllers into the `Board` entry point.
//! - Build new notes from form drafts.

pub mod board;
pub mod note_factory;
