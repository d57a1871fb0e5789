//! Board composition root.
//!
//! # Responsibility
//! - Own the note collection and be its only mutator.
//! - Route pointer, keyboard and timer input to the drag, hover and edit
//!   controllers and apply their results through one replace-by-id path.
//! - Queue delta events for the host renderer.
//!
//! # Invariants
//! - Every note position satisfies the clamp invariant for the bounds that
//!   were current when it was last written.
//! - z-indices are pairwise distinct and never reissued.
//! - At most one edit session and one drag exist; they never target the
//!   same note.
//! - Conflicting or stale requests are no-ops, never errors.

use crate::config::{InteractionConfig, InteractionConfigError};
use crate::interaction::drag::{DragController, PointerTarget};
use crate::interaction::edit::{EditSession, FormatCommand, FormatOutcome, TextSelection};
use crate::interaction::event::BoardEvent;
use crate::interaction::hover::{DwellVerdict, HoverCleared, HoverController};
use crate::interaction::overlap::{overlap_info, OverlapInfo};
use crate::interaction::position::{clamp, is_within};
use crate::interaction::stack::StackOrder;
use crate::interaction::timer::{TimerKey, TimerKind, TimerQueue};
use crate::model::geometry::{BoardBounds, Point};
use crate::model::note::{normalize_color, Note, NoteDraft, NoteDraftError, NoteId, StyleType};
use crate::model::rich_text::RichText;
use crate::repo::note_store::{NoteSnapshot, NoteStore};
use crate::service::note_factory::NoteFactory;
use log::{debug, info};
use rand::Rng;
use std::time::Duration;

/// Why an edit request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditRejection {
    UnknownNote,
    NoRichText,
    AlreadyEditing(NoteId),
    Dragging,
}

/// Result of `enter_edit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditEntry {
    Started,
    Rejected(EditRejection),
}

/// Render-facing interaction state of one note.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NoteInteraction {
    pub dragging: bool,
    pub editing: bool,
    pub hovering: bool,
    pub affordance_visible: bool,
    /// Obstruction message text and its anchor, while displayed.
    pub message: Option<(String, Point)>,
    /// Formatting toolbar is shown for the whole edit session.
    pub toolbar_visible: bool,
}

/// Freeform board of notes.
#[derive(Debug)]
pub struct Board {
    config: InteractionConfig,
    store: NoteStore,
    stack: StackOrder,
    timers: TimerQueue,
    hover: HoverController,
    drag: Option<DragController>,
    edit: Option<EditSession>,
    events: Vec<BoardEvent>,
    now: Duration,
}

impl Default for Board {
    fn default() -> Self {
        Self::with_config(InteractionConfig::default())
    }
}

impl Board {
    /// Builds an empty board after checking `config`.
    ///
    /// # Errors
    /// - Any `InteractionConfig::validate()` error.
    pub fn new(config: InteractionConfig) -> Result<Self, InteractionConfigError> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: InteractionConfig) -> Self {
        Self {
            config,
            store: NoteStore::new(),
            stack: StackOrder::new(),
            timers: TimerQueue::new(),
            hover: HoverController::new(),
            drag: None,
            edit: None,
            events: Vec::new(),
            now: Duration::ZERO,
        }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    /// Shared snapshot of the collection; later mutations never alias it.
    pub fn notes(&self) -> NoteSnapshot {
        self.store.snapshot()
    }

    pub fn note(&self, id: NoteId) -> Option<&Note> {
        self.store.get(id)
    }

    /// Notes back-to-front.
    pub fn render_order(&self) -> Vec<&Note> {
        self.store.render_order()
    }

    /// Drains queued delta events in emission order.
    pub fn take_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }

    /// Earliest pending timer, so the host knows when to call `advance`.
    pub fn next_timer_due(&self) -> Option<Duration> {
        self.timers.next_due()
    }

    pub fn editing_note(&self) -> Option<NoteId> {
        self.edit.as_ref().map(EditSession::note)
    }

    pub fn dragging_note(&self) -> Option<NoteId> {
        self.drag.as_ref().map(DragController::note)
    }

    pub fn is_editing(&self, id: NoteId) -> bool {
        self.editing_note() == Some(id)
    }

    pub fn is_dragging(&self, id: NoteId) -> bool {
        self.dragging_note() == Some(id)
    }

    /// Active edit session, if any.
    pub fn edit_session(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    pub fn interaction(&self, id: NoteId) -> Option<NoteInteraction> {
        self.store.get(id)?;
        let dwell = self.hover.dwell(id);
        Some(NoteInteraction {
            dragging: self.is_dragging(id),
            editing: self.is_editing(id),
            hovering: dwell.is_some(),
            affordance_visible: dwell.is_some_and(|d| d.affordance_visible),
            message: dwell
                .and_then(|d| d.message.as_ref())
                .map(|m| (m.text.clone(), m.anchor)),
            toolbar_visible: self.is_editing(id),
        })
    }

    // --- Collection lifecycle ---

    /// Creates a note from a form draft at the default position.
    ///
    /// # Errors
    /// - Any `NoteDraft::validate` error; the board is unchanged.
    pub fn add_note(
        &mut self,
        draft: &NoteDraft,
        bounds: BoardBounds,
        rng: &mut impl Rng,
    ) -> Result<NoteId, NoteDraftError> {
        let mut order = self.stack;
        let z_index = order.next_z_index(self.store.as_slice());
        let note = NoteFactory::new(&self.config).build(draft, z_index, bounds, rng)?;
        self.stack = order;

        let id = note.id;
        self.store.insert(note);
        info!(
            "event=note_create module=board status=ok z_index={} count={}",
            z_index,
            self.store.len()
        );
        self.events.push(BoardEvent::NoteCreated { id });
        Ok(id)
    }

    /// Replaces the collection with notes supplied by the persistence
    /// collaborator, clamping positions and renumbering z-indices.
    ///
    /// Any transient interaction state is dropped.
    pub fn load_notes(&mut self, notes: Vec<Note>, bounds: BoardBounds) -> NoteSnapshot {
        self.timers = TimerQueue::new();
        self.hover = HoverController::new();
        self.drag = None;
        self.edit = None;

        let footprint = self.config.footprint;
        let mut notes = NoteStore::from_notes(notes).as_slice().to_vec();
        let mut clamped = 0;
        for note in &mut notes {
            if !is_within(note.position, bounds, footprint) {
                note.position = clamp(note.position, bounds, footprint);
                clamped += 1;
            }
        }
        self.stack.renumber(&mut notes);
        self.store = NoteStore::from_notes(notes);
        info!(
            "event=notes_load module=board status=ok count={} clamped={}",
            self.store.len(),
            clamped
        );
        self.store.snapshot()
    }

    /// Applies the style picker's choice.
    ///
    /// Returns `Ok(false)` when the note does not exist.
    ///
    /// # Errors
    /// - `InvalidColor` when `color` is not `#rrggbb`.
    pub fn restyle_note(
        &mut self,
        id: NoteId,
        color: &str,
        style_type: StyleType,
    ) -> Result<bool, NoteDraftError> {
        let color = normalize_color(color)
            .ok_or_else(|| NoteDraftError::InvalidColor(color.trim().to_string()))?;
        let Some(mut note) = self.store.get(id).cloned() else {
            return Ok(false);
        };
        note.color = color;
        note.style_type = style_type;
        self.store.replace(note);
        self.events.push(BoardEvent::NoteRestyled { id });
        Ok(true)
    }

    /// Removes a note, canceling its timers and any drag or edit on it.
    pub fn delete_note(&mut self, id: NoteId) -> NoteSnapshot {
        let cancelled = self.timers.cancel_note(id);
        self.hover.forget(id);
        if self.is_dragging(id) {
            self.drag = None;
        }
        if self.is_editing(id) {
            self.edit = None;
        }
        if self.store.remove(id).is_some() {
            info!(
                "event=note_delete module=board status=ok timers_cancelled={} count={}",
                cancelled,
                self.store.len()
            );
            self.events.push(BoardEvent::NoteDeleted { id });
        } else {
            debug!("event=note_delete module=board status=skipped reason=unknown_note");
        }
        self.store.snapshot()
    }

    // --- Stacking and overlap ---

    /// Raises a note above all others.
    pub fn request_bring_to_front(&mut self, id: NoteId) -> NoteSnapshot {
        self.raise(id);
        self.store.snapshot()
    }

    /// Coverage of a note by its siblings at their current positions.
    pub fn compute_overlap(&self, id: NoteId) -> Option<OverlapInfo> {
        let target = self.store.get(id)?;
        Some(overlap_info(
            target,
            self.store.as_slice(),
            self.config.footprint,
        ))
    }

    fn raise(&mut self, id: NoteId) {
        let Some(raised) = self.stack.raise(id, self.store.as_slice()) else {
            return;
        };
        let z_index = raised.z_index;
        self.store.replace(raised);
        debug!("event=note_raise module=board status=ok z_index={}", z_index);
        self.events.push(BoardEvent::NoteRaised { id, z_index });
    }

    // --- Pointer input ---

    /// Pointer entered a note; starts a dwell unless it is dragged or edited.
    pub fn pointer_enter(&mut self, id: NoteId, pointer: Point, now: Duration) {
        self.observe(now);
        if !self.store.contains(id) || self.is_dragging(id) || self.is_editing(id) {
            return;
        }
        self.hover
            .enter(id, pointer, self.now, &mut self.timers, &self.config);
    }

    /// Pointer left a note; ends its dwell.
    pub fn pointer_leave(&mut self, id: NoteId) {
        self.end_hover(id);
    }

    /// Pointer-down on part of a note.
    ///
    /// Returns whether a drag started. Controls, the text region and the
    /// toolbar never start a drag, nor does any part of a note being edited.
    pub fn pointer_down(&mut self, id: NoteId, pointer: Point, target: PointerTarget) -> bool {
        if !target.starts_drag() {
            return false;
        }
        if self.is_editing(id) {
            debug!("event=drag_start module=board status=suppressed reason=editing");
            return false;
        }
        if self.drag.is_some() {
            debug!("event=drag_start module=board status=suppressed reason=drag_active");
            return false;
        }
        let Some(note) = self.store.get(id) else {
            return false;
        };

        self.drag = Some(DragController::begin(note, pointer));
        self.end_hover(id);
        self.events.push(BoardEvent::DragStarted { id });
        true
    }

    /// Pointer moved over the board surface.
    ///
    /// Tracks the pointer for every hovered note, then drives the active
    /// drag (clamping against `bounds`, read fresh on every tick).
    pub fn pointer_move(&mut self, pointer: Point, bounds: Option<BoardBounds>) -> NoteSnapshot {
        self.hover.track_all(pointer);
        match self.dragging_note() {
            Some(id) => self.apply_drag(id, pointer, bounds),
            None => self.store.snapshot(),
        }
    }

    /// Pointer moved over a specific hovered note.
    pub fn pointer_over(&mut self, id: NoteId, pointer: Point) {
        self.hover.track(id, pointer);
    }

    /// One drag tick for `id`; ignored unless `id` is the dragged note.
    pub fn apply_drag(
        &mut self,
        id: NoteId,
        pointer: Point,
        bounds: Option<BoardBounds>,
    ) -> NoteSnapshot {
        let Some(drag) = self.drag.filter(|drag| drag.note() == id) else {
            return self.store.snapshot();
        };
        let Some(mut note) = self.store.get(id).cloned() else {
            self.drag = None;
            return self.store.snapshot();
        };

        let position = drag.position_for(
            pointer,
            BoardBounds::or_missing(bounds),
            self.config.footprint,
        );
        if note.position != position {
            note.position = position;
            self.store.replace(note);
            self.events.push(BoardEvent::NoteMoved { id, position });
        }
        self.store.snapshot()
    }

    /// Pointer released; ends any drag.
    pub fn pointer_up(&mut self) {
        self.end_drag();
    }

    /// Pointer left the tracked surface; ends any drag.
    pub fn pointer_leave_surface(&mut self) {
        self.end_drag();
    }

    fn end_drag(&mut self) {
        if let Some(drag) = self.drag.take() {
            self.events.push(BoardEvent::DragEnded { id: drag.note() });
        }
    }

    fn end_hover(&mut self, id: NoteId) {
        let Some(cleared) = self.hover.leave(id, &mut self.timers) else {
            return;
        };
        self.push_hover_cleared(id, cleared);
    }

    fn push_hover_cleared(&mut self, id: NoteId, cleared: HoverCleared) {
        if cleared.affordance_was_visible {
            self.events.push(BoardEvent::EditAffordanceHidden { id });
        }
        if cleared.message_was_visible {
            self.events.push(BoardEvent::OverlapMessageCleared { id });
        }
    }

    // --- Edit session ---

    /// Opens the inline editor on a note.
    ///
    /// Refused when another note is being edited, when the note is being
    /// dragged, or when it has no rich-text capability.
    pub fn enter_edit(&mut self, id: NoteId, now: Duration) -> EditEntry {
        self.observe(now);
        let rejection = match (self.store.get(id), self.editing_note()) {
            (None, _) => Some(EditRejection::UnknownNote),
            (Some(_), Some(current)) => Some(EditRejection::AlreadyEditing(current)),
            (Some(_), None) if self.is_dragging(id) => Some(EditRejection::Dragging),
            (Some(note), None) if !note.supports_rich_text() => Some(EditRejection::NoRichText),
            _ => None,
        };
        if let Some(reason) = rejection {
            debug!("event=edit_enter module=board status=rejected reason={reason:?}");
            return EditEntry::Rejected(reason);
        }
        let Some(note) = self.store.get(id) else {
            return EditEntry::Rejected(EditRejection::UnknownNote);
        };

        self.edit = Some(EditSession::begin(note));
        self.end_hover(id);
        self.timers.schedule(
            TimerKey::new(id, TimerKind::EditFocus),
            self.now + self.config.focus_delay(),
        );
        debug!("event=edit_enter module=board status=ok");
        self.events.push(BoardEvent::EditStarted { id });
        EditEntry::Started
    }

    /// Focus left the edit region (e.g. toolbar click); never commits.
    pub fn edit_blur(&mut self, id: NoteId) {
        if let Some(session) = self.session_mut(id) {
            session.blur();
        }
    }

    /// Selection changed inside the region (pointer-up, key-up).
    pub fn select_text(&mut self, id: NoteId, selection: TextSelection) -> Option<TextSelection> {
        self.session_mut(id).map(|session| session.select(selection))
    }

    /// Typed text replacing the current selection.
    pub fn input_text(&mut self, id: NoteId, text: &str) -> Option<TextSelection> {
        self.session_mut(id).map(|session| session.input(text))
    }

    /// Region content and selection as reported by the host after input.
    pub fn sync_edit_content(
        &mut self,
        id: NoteId,
        content: RichText,
        selection: TextSelection,
    ) -> Option<TextSelection> {
        self.session_mut(id)
            .map(|session| session.sync(content, selection))
    }

    /// Toolbar formatting command for the note being edited.
    pub fn apply_format(&mut self, id: NoteId, command: FormatCommand) -> FormatOutcome {
        let Some(session) = self.session_mut(id) else {
            return FormatOutcome::NotEditing;
        };
        let outcome = session.apply_format(command);
        if let FormatOutcome::Applied {
            mark,
            active,
            selection,
        } = outcome
        {
            self.events
                .push(BoardEvent::FocusRequested { id, selection });
            self.events
                .push(BoardEvent::FormatApplied { id, mark, active });
        }
        outcome
    }

    /// Explicit "done": stores the region content and closes the session.
    ///
    /// `content` is the read-back region content; `None` commits the
    /// session's own working copy. Returns whether a session was closed.
    pub fn commit_edit(&mut self, id: NoteId, content: Option<RichText>) -> bool {
        if !self.is_editing(id) {
            return false;
        }
        let Some(session) = self.edit.take() else {
            return false;
        };
        self.timers.cancel(TimerKey::new(id, TimerKind::EditFocus));

        let content = content.unwrap_or_else(|| session.commit());
        let Some(mut note) = self.store.get(id).cloned() else {
            return false;
        };
        note.rich_content = if content.is_empty() {
            None
        } else {
            Some(content)
        };
        self.store.replace(note);
        info!("event=edit_commit module=board status=ok");
        self.events.push(BoardEvent::EditCommitted { id });
        true
    }

    /// Same as `commit_edit` with markup read back from the region.
    pub fn commit_edit_markup(&mut self, id: NoteId, markup: &str) -> bool {
        self.commit_edit(id, Some(RichText::from_markup(markup)))
    }

    fn session_mut(&mut self, id: NoteId) -> Option<&mut EditSession> {
        self.edit.as_mut().filter(|session| session.note() == id)
    }

    // --- Time ---

    /// Advances the host clock, firing due timers in due order.
    ///
    /// Time never moves backwards; an earlier `now` is treated as the
    /// latest observed time.
    pub fn advance(&mut self, now: Duration) {
        self.observe(now);
        while let Some((key, due)) = self.timers.pop_due(self.now) {
            if !self.store.contains(key.note) {
                debug!(
                    "event=timer_fire module=board status=stale kind={:?}",
                    key.kind
                );
                continue;
            }
            match key.kind {
                TimerKind::HoverAffordance => self.on_affordance_due(key.note),
                TimerKind::HoverOverlap => self.on_overlap_due(key.note, due),
                TimerKind::MessageExpiry => {
                    if self.hover.message_expired(key.note) {
                        self.events
                            .push(BoardEvent::OverlapMessageCleared { id: key.note });
                    }
                }
                TimerKind::EditFocus => {
                    if let Some(session) = self.session_mut(key.note) {
                        let selection = session.focus();
                        self.events.push(BoardEvent::FocusRequested {
                            id: key.note,
                            selection,
                        });
                    }
                }
            }
        }
    }

    fn observe(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    fn on_affordance_due(&mut self, id: NoteId) {
        if self.is_dragging(id) || self.is_editing(id) {
            return;
        }
        if self
            .store
            .get(id)
            .is_some_and(|note| !note.supports_rich_text())
        {
            return;
        }
        if self.hover.affordance_due(id) {
            self.events.push(BoardEvent::EditAffordanceShown { id });
        }
    }

    fn on_overlap_due(&mut self, id: NoteId, due: Duration) {
        if self.is_dragging(id) || self.is_editing(id) {
            return;
        }
        let Some(info) = self.compute_overlap(id) else {
            return;
        };
        match self.hover.overlap_due(id, info, &self.config) {
            Some(DwellVerdict::Raise) => self.raise(id),
            Some(DwellVerdict::Obstructed { count }) => {
                let shown = self
                    .hover
                    .show_message(id, count, due, &mut self.timers, &self.config);
                if let Some(message) = shown {
                    debug!(
                        "event=overlap_message module=board status=shown overlapping={}",
                        count
                    );
                    self.events.push(BoardEvent::OverlapMessageShown {
                        id,
                        text: message.text,
                        anchor: message.anchor,
                    });
                }
            }
            None => {}
        }
    }
}
