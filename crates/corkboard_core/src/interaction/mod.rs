//! Note interaction engine building blocks.
//!
//! # Responsibility
//! - Pure geometry (clamping, overlap) and stacking order.
//! - Per-note state machines for drag, hover dwell and inline editing.
//! - The cancelable timer queue those state machines share.
//!
//! # Invariants
//! - Nothing here mutates the note collection; controllers return
//!   replacement values and the board applies them.

pub mod drag;
pub mod edit;
pub mod event;
pub mod hover;
pub mod overlap;
pub mod position;
pub mod stack;
pub mod timer;
