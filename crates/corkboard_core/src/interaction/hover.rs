//! Hover dwell state machine.
//!
//! # Responsibility
//! - Track per-note dwell (`Idle -> Hovering`) and arm the short/long timers.
//! - Decide, once the long dwell elapses, between raising the note and
//!   reporting that it is obstructed.
//!
//! # Invariants
//! - A note absent from the controller is `Idle`.
//! - Leaving cancels the affordance, overlap and message timers together;
//!   re-entering always restarts from zero.
//! - The affordance and the overlap evaluation fire independently.

use crate::config::InteractionConfig;
use crate::interaction::overlap::{overlapping_message, OverlapInfo};
use crate::interaction::timer::{TimerKey, TimerKind, TimerQueue};
use crate::model::geometry::Point;
use crate::model::note::NoteId;
use std::collections::BTreeMap;
use std::time::Duration;

/// Transient obstruction message anchored near the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapMessage {
    pub text: String,
    pub anchor: Point,
    pub shown_at: Duration,
}

/// Live dwell on one note.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverDwell {
    pub started_at: Duration,
    /// Latest pointer location over the note.
    pub pointer: Point,
    pub affordance_visible: bool,
    pub overlap_evaluated: bool,
    pub message: Option<OverlapMessage>,
}

/// Outcome of the long-dwell evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DwellVerdict {
    /// Coverage is below the threshold; the note should come to the front.
    Raise,
    /// The note is mostly covered by `count` siblings.
    Obstructed { count: usize },
}

/// What was visible when a dwell ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HoverCleared {
    pub affordance_was_visible: bool,
    pub message_was_visible: bool,
}

/// Per-note dwell controller sharing the board timer queue.
#[derive(Debug, Default)]
pub struct HoverController {
    dwells: BTreeMap<NoteId, HoverDwell>,
}

impl HoverController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dwell(&self, note: NoteId) -> Option<&HoverDwell> {
        self.dwells.get(&note)
    }

    /// Starts a dwell and arms both timers relative to `now`.
    ///
    /// Returns `false` (and keeps the running timers) when the note is
    /// already hovered.
    pub fn enter(
        &mut self,
        note: NoteId,
        pointer: Point,
        now: Duration,
        timers: &mut TimerQueue,
        config: &InteractionConfig,
    ) -> bool {
        if self.dwells.contains_key(&note) {
            return false;
        }
        timers.schedule(
            TimerKey::new(note, TimerKind::HoverAffordance),
            now + config.affordance_delay(),
        );
        timers.schedule(
            TimerKey::new(note, TimerKind::HoverOverlap),
            now + config.overlap_delay(),
        );
        self.dwells.insert(
            note,
            HoverDwell {
                started_at: now,
                pointer,
                affordance_visible: false,
                overlap_evaluated: false,
                message: None,
            },
        );
        true
    }

    /// Records the latest pointer location for a hovered note.
    pub fn track(&mut self, note: NoteId, pointer: Point) {
        if let Some(dwell) = self.dwells.get_mut(&note) {
            dwell.pointer = pointer;
        }
    }

    /// Records the latest pointer location for every hovered note.
    pub fn track_all(&mut self, pointer: Point) {
        for dwell in self.dwells.values_mut() {
            dwell.pointer = pointer;
        }
    }

    /// Ends the dwell, canceling every hover-owned timer.
    pub fn leave(&mut self, note: NoteId, timers: &mut TimerQueue) -> Option<HoverCleared> {
        timers.cancel(TimerKey::new(note, TimerKind::HoverAffordance));
        timers.cancel(TimerKey::new(note, TimerKind::HoverOverlap));
        timers.cancel(TimerKey::new(note, TimerKind::MessageExpiry));
        let dwell = self.dwells.remove(&note)?;
        Some(HoverCleared {
            affordance_was_visible: dwell.affordance_visible,
            message_was_visible: dwell.message.is_some(),
        })
    }

    /// Short dwell elapsed; returns `true` when the affordance became visible.
    pub fn affordance_due(&mut self, note: NoteId) -> bool {
        match self.dwells.get_mut(&note) {
            Some(dwell) if !dwell.affordance_visible => {
                dwell.affordance_visible = true;
                true
            }
            _ => false,
        }
    }

    /// Long dwell elapsed; classifies the coverage computed by the caller.
    pub fn overlap_due(
        &mut self,
        note: NoteId,
        info: OverlapInfo,
        config: &InteractionConfig,
    ) -> Option<DwellVerdict> {
        let dwell = self.dwells.get_mut(&note)?;
        dwell.overlap_evaluated = true;
        if info.is_mostly_covered(config.mostly_covered_ratio) {
            Some(DwellVerdict::Obstructed {
                count: info.overlapping_count,
            })
        } else {
            Some(DwellVerdict::Raise)
        }
    }

    /// Shows the obstruction message at the latest pointer and arms its expiry.
    pub fn show_message(
        &mut self,
        note: NoteId,
        count: usize,
        now: Duration,
        timers: &mut TimerQueue,
        config: &InteractionConfig,
    ) -> Option<OverlapMessage> {
        let dwell = self.dwells.get_mut(&note)?;
        let message = OverlapMessage {
            text: overlapping_message(count),
            anchor: dwell.pointer,
            shown_at: now,
        };
        dwell.message = Some(message.clone());
        timers.schedule(
            TimerKey::new(note, TimerKind::MessageExpiry),
            now + config.message_duration(),
        );
        Some(message)
    }

    /// Clears an expired message; returns `true` when one was visible.
    pub fn message_expired(&mut self, note: NoteId) -> bool {
        self.dwells
            .get_mut(&note)
            .and_then(|dwell| dwell.message.take())
            .is_some()
    }

    /// Drops all state for a deleted note.
    pub fn forget(&mut self, note: NoteId) {
        self.dwells.remove(&note);
    }
}
