//! In-memory note storage.
//!
//! # Invariants
//! - The store is only mutated through whole-entry replacement by id.

pub mod note_store;
