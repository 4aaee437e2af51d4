//! Append-only session journal.
//!
//! Fill sessions can record what happened to them (start, each resolver
//! outcome, stale messages, submit or cancel) as NDJSON, one JSON object per
//! line, in a file chosen by configuration.
//!
//! # Entry Format
//!
//! - `ts`: RFC3339 timestamp
//! - `action`: `session_start`, `resolve_ok`, `resolve_failed`,
//!   `stale_discarded`, `submit`, or `cancel`
//! - `session`: numeric session id
//! - `param`: parameter name, for per-parameter entries
//! - `details`: freeform object with action-specific details
//!
//! ```no_run
//! use cmdfill::journal::{Journal, JournalAction, JournalEntry};
//! use serde_json::json;
//!
//! let journal = Journal::new("/tmp/cmdfill.ndjson");
//! let entry = JournalEntry::new(JournalAction::Submit, 1)
//!     .with_details(json!({"command": "ssh prod"}));
//! journal.append(&entry)?;
//! # Ok::<(), cmdfill::error::CmdfillError>(())
//! ```

use crate::error::{CmdfillError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Actions that can be recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalAction {
    /// A fill session started
    SessionStart,
    /// A dynamic parameter resolved to options
    ResolveOk,
    /// A dynamic parameter fell back to free text
    ResolveFailed,
    /// A resolver message for another session was dropped
    StaleDiscarded,
    /// The session was submitted
    Submit,
    /// The session was cancelled
    Cancel,
}

impl std::fmt::Display for JournalAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JournalAction::SessionStart => write!(f, "session_start"),
            JournalAction::ResolveOk => write!(f, "resolve_ok"),
            JournalAction::ResolveFailed => write!(f, "resolve_failed"),
            JournalAction::StaleDiscarded => write!(f, "stale_discarded"),
            JournalAction::Submit => write!(f, "submit"),
            JournalAction::Cancel => write!(f, "cancel"),
        }
    }
}

/// A single journal line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// When the entry was recorded.
    pub ts: DateTime<Utc>,

    /// What happened.
    pub action: JournalAction,

    /// The session the entry belongs to.
    pub session: u64,

    /// Parameter name for per-parameter entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,

    /// Freeform action-specific details.
    pub details: Value,
}

impl JournalEntry {
    /// Create an entry stamped with the current time.
    pub fn new(action: JournalAction, session: u64) -> Self {
        Self {
            ts: Utc::now(),
            action,
            session,
            param: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    /// Set the parameter name.
    pub fn with_param(mut self, name: impl Into<String>) -> Self {
        self.param = Some(name.into());
        self
    }

    /// Set the details object.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| CmdfillError::Io(format!("failed to serialize journal entry: {}", e)))
    }
}

/// An NDJSON journal file.
#[derive(Debug, Clone)]
pub struct Journal {
    path: PathBuf,
}

impl Journal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry, creating the file and its directory if needed.
    pub fn append(&self, entry: &JournalEntry) -> Result<()> {
        let json_line = entry.to_ndjson_line()?;

        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
            && !dir.exists()
        {
            fs::create_dir_all(dir).map_err(|e| {
                CmdfillError::Io(format!(
                    "failed to create journal directory '{}': {}",
                    dir.display(),
                    e
                ))
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                CmdfillError::Io(format!(
                    "failed to open journal '{}': {}",
                    self.path.display(),
                    e
                ))
            })?;

        writeln!(file, "{}", json_line).map_err(|e| {
            CmdfillError::Io(format!(
                "failed to write journal entry to '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Read all entries back, skipping lines that fail to parse.
    pub fn read_entries(&self) -> Result<Vec<JournalEntry>> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            CmdfillError::Io(format!(
                "failed to read journal '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(content
            .lines()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect())
    }
}
