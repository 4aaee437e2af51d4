//! Per-parameter resolution state.

use crate::error::MutationError;
use crate::resolver::{ResolveFailure, ResolveOutcome};
use crate::template::{ParamDescriptor, ParamKind};

/// Live resolution state of one parameter during a fill session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionState {
    /// Text or enum parameter; usable immediately.
    AwaitingInput,
    /// Dynamic parameter whose backing command is still running.
    Loading,
    /// Dynamic parameter with a resolved option list.
    Resolved { options: Vec<String>, cursor: usize },
    /// Dynamic parameter whose command failed; behaves as free text.
    Failed { failure: ResolveFailure },
}

impl ResolutionState {
    /// Short lowercase name, used in logs and the journal.
    pub fn label(&self) -> &'static str {
        match self {
            ResolutionState::AwaitingInput => "awaiting_input",
            ResolutionState::Loading => "loading",
            ResolutionState::Resolved { .. } => "resolved",
            ResolutionState::Failed { .. } => "failed",
        }
    }
}

/// Direction of a cyclic cursor move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    Next,
    Prev,
}

impl CursorMove {
    /// New cursor position, wrapping at both ends. `len` must be non-zero.
    pub fn apply(self, cursor: usize, len: usize) -> usize {
        match self {
            CursorMove::Next => (cursor + 1) % len,
            CursorMove::Prev => (cursor + len - 1) % len,
        }
    }
}

/// A scrolling window over an option list, centred on the cursor where
/// possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionWindow {
    /// First visible option index.
    pub start: usize,
    /// One past the last visible option index.
    pub end: usize,
    /// Cursor position within the full list.
    pub cursor: usize,
    /// Total number of options.
    pub total: usize,
}

impl OptionWindow {
    pub fn new(cursor: usize, total: usize, max_visible: usize) -> Self {
        let max_visible = max_visible.max(1);
        let mut start = 0;
        if total > max_visible {
            start = cursor.saturating_sub(max_visible / 2);
            if start + max_visible > total {
                start = total - max_visible;
            }
        }
        let end = (start + max_visible).min(total);
        Self {
            start,
            end,
            cursor,
            total,
        }
    }

    /// Whether some options fall outside the window.
    pub fn is_scrolling(&self) -> bool {
        self.end - self.start < self.total
    }
}

/// One parameter's descriptor, state, and staged value.
#[derive(Debug, Clone)]
pub(crate) struct ParamSlot {
    pub(crate) descriptor: ParamDescriptor,
    pub(crate) state: ResolutionState,
    pub(crate) value: String,
    /// Cursor into `descriptor.options`; only meaningful for enums.
    enum_cursor: usize,
}

impl ParamSlot {
    pub(crate) fn new(descriptor: ParamDescriptor) -> Self {
        let mut slot = Self {
            state: ResolutionState::AwaitingInput,
            value: String::new(),
            enum_cursor: 0,
            descriptor,
        };

        match slot.descriptor.kind {
            ParamKind::Text => slot.value = slot.descriptor.default.clone(),
            ParamKind::Enum => {
                let options = &slot.descriptor.options;
                slot.enum_cursor = slot.descriptor.default_index_in(options).unwrap_or(0);
                slot.value = options.get(slot.enum_cursor).cloned().unwrap_or_default();
            }
            ParamKind::Dynamic => slot.state = ResolutionState::Loading,
        }
        slot
    }

    pub(crate) fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub(crate) fn is_list_selectable(&self) -> bool {
        self.descriptor.kind == ParamKind::Enum
            || matches!(self.state, ResolutionState::Resolved { .. })
    }

    pub(crate) fn options(&self) -> Option<&[String]> {
        match &self.state {
            ResolutionState::Resolved { options, .. } => Some(options.as_slice()),
            _ if self.descriptor.kind == ParamKind::Enum => {
                Some(self.descriptor.options.as_slice())
            }
            _ => None,
        }
    }

    pub(crate) fn cursor(&self) -> Option<usize> {
        match &self.state {
            ResolutionState::Resolved { cursor, .. } => Some(*cursor),
            _ if self.descriptor.kind == ParamKind::Enum => Some(self.enum_cursor),
            _ => None,
        }
    }

    /// Apply a resolver outcome. Only a `Loading` slot transitions, once.
    pub(crate) fn apply_outcome(&mut self, outcome: ResolveOutcome) -> bool {
        if self.state != ResolutionState::Loading {
            return false;
        }

        match outcome {
            ResolveOutcome::Resolved(options) if !options.is_empty() => {
                let cursor = self.descriptor.default_index_in(&options).unwrap_or(0);
                self.value = options[cursor].clone();
                self.state = ResolutionState::Resolved { options, cursor };
            }
            ResolveOutcome::Resolved(_) => {
                self.value = self.descriptor.default.clone();
                self.state = ResolutionState::Failed {
                    failure: ResolveFailure::EmptyOutput,
                };
            }
            ResolveOutcome::Failed(failure) => {
                self.value = self.descriptor.default.clone();
                self.state = ResolutionState::Failed { failure };
            }
        }
        true
    }

    pub(crate) fn move_cursor(&mut self, mv: CursorMove) -> Result<(), MutationError> {
        let len = self.list_len()?;
        let next = mv.apply(self.cursor().unwrap_or(0), len);
        self.set_cursor(next);
        Ok(())
    }

    pub(crate) fn select(&mut self, option: usize) -> Result<(), MutationError> {
        let len = self.list_len()?;
        if option >= len {
            return Err(MutationError::OptionOutOfRange {
                name: self.name().to_string(),
                option,
                len,
            });
        }
        self.set_cursor(option);
        Ok(())
    }

    pub(crate) fn edit_text<F>(&mut self, edit: F) -> Result<(), MutationError>
    where
        F: FnOnce(&mut String),
    {
        if self.is_list_selectable() {
            return Err(MutationError::ListSelectable {
                name: self.name().to_string(),
            });
        }
        if self.state == ResolutionState::Loading {
            return Err(MutationError::StillLoading {
                name: self.name().to_string(),
            });
        }
        edit(&mut self.value);
        Ok(())
    }

    fn list_len(&self) -> Result<usize, MutationError> {
        let name = || self.name().to_string();
        match self.options() {
            None if self.state == ResolutionState::Loading => {
                Err(MutationError::StillLoading { name: name() })
            }
            None => Err(MutationError::NotSelectable { name: name() }),
            Some([]) => Err(MutationError::NoOptions { name: name() }),
            Some(options) => Ok(options.len()),
        }
    }

    fn set_cursor(&mut self, next: usize) {
        match &mut self.state {
            ResolutionState::Resolved { options, cursor } => {
                *cursor = next;
                self.value = options[next].clone();
            }
            _ => {
                self.enum_cursor = next;
                self.value = self.descriptor.options[next].clone();
            }
        }
    }
}
