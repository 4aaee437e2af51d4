//! Single-consumer event loop for a fill session.
//!
//! Host input and resolver outcomes arrive on one channel and are applied
//! strictly one at a time. The loop never waits on a resolver: a parameter
//! that is still loading simply stays `Loading` while other events flow.

use super::{CursorMove, FillSession, ResolutionState, ResolverMessage};
use crate::journal::{Journal, JournalAction, JournalEntry};
use crate::resolver::ResolverSettings;
use serde_json::json;
use std::sync::mpsc::{self, Receiver, Sender};
use tracing::{debug, warn};

/// Host input, already decoded from whatever the UI reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Focus the next parameter.
    Next,
    /// Focus the previous parameter.
    Prev,
    /// Move the focused list's cursor backward.
    Up,
    /// Move the focused list's cursor forward.
    Down,
    /// Jump the focused list's cursor to an option index.
    Choose(usize),
    /// `Choose`, then `Enter` only if the choice was accepted.
    ChooseAndConfirm(usize),
    /// Type a character into the focused free-text parameter.
    Char(char),
    /// Delete the last character of the focused free-text parameter.
    Backspace,
    /// Replace the focused free-text parameter's value.
    SetText(String),
    /// `SetText`, then `Enter` only if the edit was accepted.
    SetTextAndConfirm(String),
    /// Confirm: submit when ready, otherwise advance focus.
    Enter,
    /// Abandon the session.
    Cancel,
}

/// Everything the loop consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Input(InputEvent),
    Resolved(ResolverMessage),
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FillOutcome {
    Submitted(String),
    Cancelled,
}

/// Owns a session and the receiving end of its event channel.
pub struct SessionLoop {
    session: FillSession,
    events: Receiver<SessionEvent>,
    journal: Option<Journal>,
}

impl SessionLoop {
    /// Start a session for `template`, spawn its resolver workers, and return
    /// the loop together with the sender the host posts input on.
    pub fn start(template: &str, settings: &ResolverSettings) -> (Self, Sender<SessionEvent>) {
        let (session, jobs) = FillSession::start(template);
        let (tx, rx) = mpsc::channel();

        for job in jobs {
            job.spawn(settings.clone(), tx.clone());
        }

        (Self::from_parts(session, rx), tx)
    }

    /// Drive an existing session from an existing channel.
    pub fn from_parts(session: FillSession, events: Receiver<SessionEvent>) -> Self {
        Self {
            session,
            events,
            journal: None,
        }
    }

    /// Record session activity to `journal`.
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        let entry = JournalEntry::new(JournalAction::SessionStart, self.session.id().as_u64())
            .with_details(json!({
                "template": self.session.template(),
                "params": self.session.len(),
                "pending": self.session.pending(),
            }));
        self.record(entry);
        self
    }

    pub fn session(&self) -> &FillSession {
        &self.session
    }

    /// Process events until the session is submitted or cancelled.
    pub fn run(self) -> FillOutcome {
        self.run_with(|_, _| {})
    }

    /// Like [`run`](Self::run), calling `observe` after every applied event so
    /// the host can redraw.
    pub fn run_with<F>(mut self, mut observe: F) -> FillOutcome
    where
        F: FnMut(&FillSession, &SessionEvent),
    {
        loop {
            let Ok(event) = self.events.recv() else {
                // Every sender is gone: the host stopped producing input.
                return self.finish(FillOutcome::Cancelled);
            };

            if let Some(outcome) = self.step(&event) {
                return self.finish(outcome);
            }
            observe(&self.session, &event);
        }
    }

    /// Apply one event. Returns the outcome if it ended the session.
    pub fn step(&mut self, event: &SessionEvent) -> Option<FillOutcome> {
        match event {
            SessionEvent::Resolved(message) => {
                self.apply_resolved(message.clone());
                None
            }
            SessionEvent::Input(input) => self.apply_input(input),
        }
    }

    fn apply_resolved(&mut self, message: ResolverMessage) {
        let session_id = self.session.id().as_u64();

        if message.session != self.session.id() {
            self.record(
                JournalEntry::new(JournalAction::StaleDiscarded, session_id)
                    .with_details(json!({"from_session": message.session.as_u64()})),
            );
        }

        let index = message.index;
        if !self.session.apply_resolver_outcome(message) {
            return;
        }

        let Some(name) = self.session.descriptor(index).map(|d| d.name.clone()) else {
            return;
        };
        let entry = match self.session.state(index) {
            Some(ResolutionState::Resolved { options, .. }) => {
                JournalEntry::new(JournalAction::ResolveOk, session_id)
                    .with_param(name)
                    .with_details(json!({"options": options.len()}))
            }
            Some(ResolutionState::Failed { failure }) => {
                JournalEntry::new(JournalAction::ResolveFailed, session_id)
                    .with_param(name)
                    .with_details(json!({"reason": failure.to_string()}))
            }
            _ => return,
        };
        self.record(entry);
    }

    fn apply_input(&mut self, input: &InputEvent) -> Option<FillOutcome> {
        let focused = self.session.focused();
        let (result, confirm) = match input {
            InputEvent::Next => {
                self.session.focus_next();
                (Ok(()), false)
            }
            InputEvent::Prev => {
                self.session.focus_prev();
                (Ok(()), false)
            }
            InputEvent::Up => (self.session.move_cursor(focused, CursorMove::Prev), false),
            InputEvent::Down => (self.session.move_cursor(focused, CursorMove::Next), false),
            InputEvent::Choose(option) => (self.session.select(focused, *option), false),
            InputEvent::ChooseAndConfirm(option) => (self.session.select(focused, *option), true),
            InputEvent::Char(c) => (self.session.push_char(focused, *c), false),
            InputEvent::Backspace => (self.session.pop_char(focused), false),
            InputEvent::SetText(text) => (self.session.set_text(focused, text.clone()), false),
            InputEvent::SetTextAndConfirm(text) => {
                (self.session.set_text(focused, text.clone()), true)
            }
            InputEvent::Enter => (Ok(()), true),
            InputEvent::Cancel => return Some(FillOutcome::Cancelled),
        };

        // A rejected mutation never goes on to confirm.
        if let Err(e) = result {
            debug!(session = %self.session.id(), error = %e, "input rejected");
            return None;
        }
        if confirm {
            return self.confirm();
        }
        None
    }

    /// Submit when ready, otherwise advance focus.
    fn confirm(&mut self) -> Option<FillOutcome> {
        if self.session.ready_to_submit() {
            return Some(FillOutcome::Submitted(self.session.preview()));
        }
        self.session.focus_next();
        None
    }

    fn finish(self, outcome: FillOutcome) -> FillOutcome {
        let session_id = self.session.id().as_u64();
        let entry = match &outcome {
            FillOutcome::Submitted(command) => JournalEntry::new(JournalAction::Submit, session_id)
                .with_details(json!({"command": command})),
            FillOutcome::Cancelled => JournalEntry::new(JournalAction::Cancel, session_id)
                .with_details(json!({"pending": self.session.pending()})),
        };
        self.record(entry);

        match &outcome {
            FillOutcome::Submitted(_) => {
                self.session.submit();
            }
            FillOutcome::Cancelled => self.session.cancel(),
        }
        outcome
    }

    fn record(&self, entry: JournalEntry) {
        let Some(journal) = &self.journal else {
            return;
        };
        if let Err(e) = journal.append(&entry) {
            warn!(path = %journal.path().display(), error = %e, "failed to write session journal");
        }
    }
}
