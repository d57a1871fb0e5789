//! Cancelable timers keyed by note.
//!
//! # Responsibility
//! - Replace ad hoc deferred callbacks with explicit, inspectable entries.
//! - Fire due entries in due-time order when the host advances the clock.
//!
//! # Invariants
//! - At most one pending entry per `(note, kind)`; rescheduling replaces it.
//! - Canceling one kind never touches another kind of the same note.
//! - Entries due at the same instant fire in scheduling order.

use crate::model::note::NoteId;
use std::collections::BTreeMap;
use std::time::Duration;

/// What a timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimerKind {
    /// Reveal the edit affordance after the short dwell.
    HoverAffordance,
    /// Evaluate overlap after the long dwell.
    HoverOverlap,
    /// Clear the obstruction message.
    MessageExpiry,
    /// Focus the edit region once it has mounted.
    EditFocus,
}

/// Identity of one pending timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerKey {
    pub note: NoteId,
    pub kind: TimerKind,
}

impl TimerKey {
    pub fn new(note: NoteId, kind: TimerKind) -> Self {
        Self { note, kind }
    }
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    due: Duration,
    seq: u64,
}

/// Pending timers on the host's monotonic clock.
#[derive(Debug, Default)]
pub struct TimerQueue {
    pending: BTreeMap<TimerKey, Pending>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms `key` to fire at `due`, replacing any pending entry for it.
    pub fn schedule(&mut self, key: TimerKey, due: Duration) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.insert(key, Pending { due, seq });
    }

    /// Cancels one timer; returns whether it was pending.
    pub fn cancel(&mut self, key: TimerKey) -> bool {
        self.pending.remove(&key).is_some()
    }

    /// Cancels every timer owned by `note`; returns how many were dropped.
    pub fn cancel_note(&mut self, note: NoteId) -> usize {
        let before = self.pending.len();
        self.pending.retain(|key, _| key.note != note);
        before - self.pending.len()
    }

    pub fn is_pending(&self, key: TimerKey) -> bool {
        self.pending.contains_key(&key)
    }

    pub fn due_at(&self, key: TimerKey) -> Option<Duration> {
        self.pending.get(&key).map(|pending| pending.due)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest pending due time, for hosts that sleep until the next tick.
    pub fn next_due(&self) -> Option<Duration> {
        self.pending.values().map(|pending| pending.due).min()
    }

    /// Removes and returns the earliest entry due at or before `now`.
    ///
    /// Popping one entry at a time lets the caller cancel or schedule
    /// timers between firings.
    pub fn pop_due(&mut self, now: Duration) -> Option<(TimerKey, Duration)> {
        let (key, pending) = self
            .pending
            .iter()
            .filter(|(_, pending)| pending.due <= now)
            .min_by_key(|(_, pending)| (pending.due, pending.seq))
            .map(|(key, pending)| (*key, *pending))?;
        self.pending.remove(&key);
        Some((key, pending.due))
    }
}
