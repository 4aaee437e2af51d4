//! Interactive fill sessions.
//!
//! A [`FillSession`] owns one state machine per template parameter:
//!
//! ```text
//! Text / Enum : AwaitingInput                       (never changes)
//! Dynamic     : Loading ──ok──▶ Resolved{options, cursor}
//!                       └─err─▶ Failed  (free text from here on)
//! ```
//!
//! Starting a session yields the [`ResolverJob`]s for its dynamic
//! parameters. Each job reports one [`ResolverMessage`] tagged with the
//! session id and parameter index; messages for another session, or for a
//! parameter that is no longer `Loading`, are ignored.
//!
//! [`SessionLoop`] is the single consumer that applies host input and
//! resolver messages one at a time.

mod event_loop;
mod state;


pub use event_loop::{FillOutcome, InputEvent, SessionEvent, SessionLoop};
pub use state::{CursorMove, OptionWindow, ResolutionState};

use crate::error::MutationError;
use crate::resolver::{ResolveOutcome, ResolverSettings, spawn_resolver};
use crate::template::{ParamDescriptor, ParamKind, parse, render};
use state::ParamSlot;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::thread::JoinHandle;
use tracing::debug;

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a fill session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    fn next() -> Self {
        Self(NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Work order for resolving one dynamic parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverJob {
    pub session: SessionId,
    pub index: usize,
    pub name: String,
    pub command: String,
}

impl ResolverJob {
    /// Run the job on a worker thread that posts its outcome to `events`.
    ///
    /// If the receiving side is gone by then the outcome is dropped.
    pub fn spawn(self, settings: ResolverSettings, events: Sender<SessionEvent>) -> JoinHandle<()> {
        let ResolverJob {
            session,
            index,
            name,
            command,
        } = self;

        spawn_resolver(command, settings, move |outcome| {
            let message = ResolverMessage {
                session,
                index,
                outcome,
            };
            if events.send(SessionEvent::Resolved(message)).is_err() {
                debug!(%session, param = %name, "session ended before resolver finished");
            }
        })
    }

    /// Outcome message for this job, for hosts that resolve some other way.
    pub fn message(&self, outcome: ResolveOutcome) -> ResolverMessage {
        ResolverMessage {
            session: self.session,
            index: self.index,
            outcome,
        }
    }
}

/// The single outcome of a resolver job, addressed to a session parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverMessage {
    pub session: SessionId,
    pub index: usize,
    pub outcome: ResolveOutcome,
}

/// The live state of filling in one template.
#[derive(Debug, Clone)]
pub struct FillSession {
    id: SessionId,
    template: String,
    slots: Vec<ParamSlot>,
    focused: usize,
}

impl FillSession {
    /// Parse `template` and start a session over its parameters.
    pub fn start(template: impl Into<String>) -> (Self, Vec<ResolverJob>) {
        let template = template.into();
        let params = parse(&template);
        Self::with_params(template, params)
    }

    /// Start a session over already-parsed descriptors.
    ///
    /// Dynamic parameters begin `Loading`; one job per dynamic parameter is
    /// returned for the host to schedule.
    pub fn with_params(
        template: impl Into<String>,
        params: Vec<ParamDescriptor>,
    ) -> (Self, Vec<ResolverJob>) {
        let id = SessionId::next();
        let slots: Vec<ParamSlot> = params.into_iter().map(ParamSlot::new).collect();

        let jobs = slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.descriptor.kind == ParamKind::Dynamic)
            .map(|(index, slot)| ResolverJob {
                session: id,
                index,
                name: slot.descriptor.name.clone(),
                command: slot.descriptor.dynamic_cmd.clone(),
            })
            .collect();

        let session = Self {
            id,
            template: template.into(),
            slots,
            focused: 0,
        };
        debug!(session = %id, params = session.len(), "fill session started");
        (session, jobs)
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Index of the parameter called `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.slots.iter().position(|slot| slot.name() == name)
    }

    pub fn descriptor(&self, index: usize) -> Option<&ParamDescriptor> {
        self.slots.get(index).map(|slot| &slot.descriptor)
    }

    pub fn kind(&self, index: usize) -> Option<ParamKind> {
        self.slots.get(index).map(|slot| slot.descriptor.kind)
    }

    pub fn state(&self, index: usize) -> Option<&ResolutionState> {
        self.slots.get(index).map(|slot| &slot.state)
    }

    /// The value currently staged for a parameter.
    pub fn value(&self, index: usize) -> Option<&str> {
        self.slots.get(index).map(|slot| slot.value.as_str())
    }

    /// True for enums, and for dynamic parameters once resolved.
    pub fn is_list_selectable(&self, index: usize) -> bool {
        self.slots
            .get(index)
            .is_some_and(ParamSlot::is_list_selectable)
    }

    /// Option list of a list-selectable parameter.
    pub fn options(&self, index: usize) -> Option<&[String]> {
        self.slots.get(index).and_then(ParamSlot::options)
    }

    /// Cursor of a list-selectable parameter.
    pub fn cursor(&self, index: usize) -> Option<usize> {
        self.slots.get(index).and_then(ParamSlot::cursor)
    }

    /// Visible slice of a list parameter's options, at most `max_visible` long.
    pub fn option_window(&self, index: usize, max_visible: usize) -> Option<OptionWindow> {
        let total = self.options(index)?.len();
        let cursor = self.cursor(index)?;
        Some(OptionWindow::new(cursor, total, max_visible))
    }

    /// Number of dynamic parameters still loading.
    pub fn pending(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.state == ResolutionState::Loading)
            .count()
    }

    /// Apply a resolver message.
    ///
    /// Returns `false` without changing anything when the message belongs to
    /// another session, names no parameter, or the parameter already left
    /// `Loading`.
    pub fn apply_resolver_outcome(&mut self, message: ResolverMessage) -> bool {
        if message.session != self.id {
            debug!(
                session = %self.id,
                stale = %message.session,
                "discarding resolver message for another session"
            );
            return false;
        }

        let Some(slot) = self.slots.get_mut(message.index) else {
            debug!(
                session = %self.id,
                index = message.index,
                "resolver message for unknown parameter"
            );
            return false;
        };

        let applied = slot.apply_outcome(message.outcome);
        if applied {
            debug!(
                session = %self.id,
                param = slot.name(),
                state = slot.state.label(),
                "parameter resolved"
            );
        }
        applied
    }

    /// Move a list parameter's cursor one step, wrapping around.
    pub fn move_cursor(&mut self, index: usize, mv: CursorMove) -> Result<(), MutationError> {
        self.slot_mut(index)?.move_cursor(mv)
    }

    /// Jump a list parameter's cursor to `option`.
    pub fn select(&mut self, index: usize, option: usize) -> Result<(), MutationError> {
        self.slot_mut(index)?.select(option)
    }

    /// Replace a free-text parameter's value.
    pub fn set_text(&mut self, index: usize, text: impl Into<String>) -> Result<(), MutationError> {
        let text = text.into();
        self.slot_mut(index)?.edit_text(|value| *value = text)
    }

    /// Append a character to a free-text parameter's value.
    pub fn push_char(&mut self, index: usize, c: char) -> Result<(), MutationError> {
        self.slot_mut(index)?.edit_text(|value| value.push(c))
    }

    /// Remove the last character of a free-text parameter's value.
    pub fn pop_char(&mut self, index: usize) -> Result<(), MutationError> {
        self.slot_mut(index)?.edit_text(|value| {
            value.pop();
        })
    }

    fn slot_mut(&mut self, index: usize) -> Result<&mut ParamSlot, MutationError> {
        self.slots
            .get_mut(index)
            .ok_or(MutationError::UnknownParam { index })
    }

    /// Index of the focused parameter.
    pub fn focused(&self) -> usize {
        self.focused
    }

    pub fn focus_next(&mut self) {
        if !self.slots.is_empty() {
            self.focused = (self.focused + 1) % self.slots.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.slots.is_empty() {
            self.focused = (self.focused + self.slots.len() - 1) % self.slots.len();
        }
    }

    /// Whether confirming now should submit rather than advance: the last
    /// parameter has focus or every value is filled.
    pub fn ready_to_submit(&self) -> bool {
        self.slots.is_empty()
            || self.focused + 1 == self.slots.len()
            || self.slots.iter().all(|slot| !slot.value.is_empty())
    }

    /// Non-empty staged values by parameter name.
    pub fn values(&self) -> HashMap<String, String> {
        self.slots
            .iter()
            .filter(|slot| !slot.value.is_empty())
            .map(|slot| (slot.descriptor.name.clone(), slot.value.clone()))
            .collect()
    }

    /// The template rendered with the values staged so far.
    pub fn preview(&self) -> String {
        render(&self.template, &self.values())
    }

    /// End the session and produce the final command.
    pub fn submit(self) -> String {
        let command = self.preview();
        debug!(session = %self.id, "fill session submitted");
        command
    }

    /// End the session without producing a command.
    pub fn cancel(self) {
        debug!(session = %self.id, pending = self.pending(), "fill session cancelled");
    }
}
