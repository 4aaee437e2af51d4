//! Config struct definition and default implementation.

use crate::resolver::default_shell;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Configuration for cmdfill.
///
/// Unknown fields in the YAML are retained in `extra` so a config written by
/// a newer version still loads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Resolver settings
    // =========================================================================
    /// Seconds a dynamic parameter's command may run before it is killed.
    /// At most 5.
    #[serde(default = "default_resolve_timeout_secs")]
    pub resolve_timeout_secs: u64,

    /// Program used to run dynamic commands.
    #[serde(default = "default_shell_program")]
    pub shell: String,

    /// Arguments placed before the command string.
    #[serde(default = "default_shell_args")]
    pub shell_args: Vec<String>,

    // =========================================================================
    // Display settings
    // =========================================================================
    /// Height of the option window shown for list parameters.
    #[serde(default = "default_max_visible_options")]
    pub max_visible_options: usize,

    // =========================================================================
    // Journal
    // =========================================================================
    /// NDJSON session journal; disabled when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal_path: Option<PathBuf>,

    /// Fields this version does not know about.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resolve_timeout_secs: default_resolve_timeout_secs(),
            shell: default_shell_program(),
            shell_args: default_shell_args(),
            max_visible_options: default_max_visible_options(),
            journal_path: None,
            extra: BTreeMap::new(),
        }
    }
}

pub(crate) fn default_resolve_timeout_secs() -> u64 {
    5
}

pub(crate) fn default_shell_program() -> String {
    default_shell().0.to_string()
}

pub(crate) fn default_shell_args() -> Vec<String> {
    default_shell().1.iter().map(|s| s.to_string()).collect()
}

pub(crate) fn default_max_visible_options() -> usize {
    5
}
