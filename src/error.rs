//! Error types for cmdfill.
//!
//! Uses thiserror for derive macros. `CmdfillError` covers failures that end a
//! command; `MutationError` covers host contract violations against a live
//! fill session, which are rejected without touching session state.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for cmdfill operations.
#[derive(Error, Debug)]
pub enum CmdfillError {
    /// User provided invalid arguments or input.
    #[error("{0}")]
    UserError(String),

    /// Configuration file could not be read, parsed, or validated.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Reading or writing a file or stream failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// The interactive fill was cancelled.
    #[error("cancelled")]
    Cancelled,
}

impl CmdfillError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            CmdfillError::UserError(_) => exit_codes::USER_ERROR,
            CmdfillError::ConfigError(_) => exit_codes::CONFIG_ERROR,
            CmdfillError::Io(_) => exit_codes::USER_ERROR,
            CmdfillError::Cancelled => exit_codes::CANCELLED,
        }
    }
}

/// Result type alias for cmdfill operations.
pub type Result<T> = std::result::Result<T, CmdfillError>;

/// A rejected state mutation on a fill session parameter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    /// No parameter exists at the given index.
    #[error("no parameter at index {index}")]
    UnknownParam { index: usize },

    /// Free text was typed into a parameter that is a selectable list.
    #[error("parameter '{name}' is a selectable list; move the cursor instead")]
    ListSelectable { name: String },

    /// A cursor move was attempted on a parameter without an option list.
    #[error("parameter '{name}' is not a selectable list")]
    NotSelectable { name: String },

    /// A cursor move was attempted on a list with no options.
    #[error("parameter '{name}' has no options to select")]
    NoOptions { name: String },

    /// A direct selection pointed past the end of the option list.
    #[error("parameter '{name}' has {len} options; {option} is out of range")]
    OptionOutOfRange {
        name: String,
        option: usize,
        len: usize,
    },

    /// The parameter's backing command has not reported yet.
    #[error("parameter '{name}' is still loading")]
    StillLoading { name: String },
}
