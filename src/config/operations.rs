//! Config loading, validation, and utility operations.

use super::model::Config;
use crate::error::{CmdfillError, Result};
use crate::resolver::{MAX_RESOLVE_TIMEOUT, ResolverSettings};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Default config location: `$XDG_CONFIG_HOME/cmdfill/config.yaml`, falling
/// back to `$HOME/.config/cmdfill/config.yaml`.
///
/// Returns `None` when neither variable is set.
pub fn default_path() -> Option<PathBuf> {
    let base = env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            env::var_os("HOME")
                .filter(|v| !v.is_empty())
                .map(|home| PathBuf::from(home).join(".config"))
        })?;
    Some(base.join("cmdfill").join("config.yaml"))
}

impl Config {
    /// Load config from a YAML file.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(CmdfillError::ConfigError)` - Read error, parse error, or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            CmdfillError::ConfigError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content).map_err(|e| match e {
            CmdfillError::ConfigError(msg) => {
                CmdfillError::ConfigError(format!("{} ({})", msg, path.display()))
            }
            other => other,
        })
    }

    /// Load config from `path` if the file exists, otherwise use defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Load the config named on the command line, or the one at the default
    /// location.
    ///
    /// An explicitly named file must exist; a missing default file means
    /// defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => match default_path() {
                Some(path) => Self::load_or_default(path),
                None => Ok(Self::default()),
            },
        }
    }

    /// Parse config from a YAML string.
    ///
    /// Unknown fields are kept in `extra` for forward compatibility.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml).map_err(|e| {
            CmdfillError::ConfigError(format!("failed to parse config YAML: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            CmdfillError::ConfigError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `resolve_timeout_secs` must be positive and at most 5
    /// - `max_visible_options` must be positive
    /// - `shell` must be non-empty
    pub fn validate(&self) -> Result<()> {
        if self.resolve_timeout_secs == 0 {
            return Err(CmdfillError::ConfigError(
                "config validation failed: resolve_timeout_secs must be greater than 0"
                    .to_string(),
            ));
        }

        if self.resolve_timeout_secs > MAX_RESOLVE_TIMEOUT.as_secs() {
            return Err(CmdfillError::ConfigError(format!(
                "config validation failed: resolve_timeout_secs must be at most {} (found {})",
                MAX_RESOLVE_TIMEOUT.as_secs(),
                self.resolve_timeout_secs
            )));
        }

        if self.max_visible_options == 0 {
            return Err(CmdfillError::ConfigError(
                "config validation failed: max_visible_options must be greater than 0".to_string(),
            ));
        }

        if self.shell.trim().is_empty() {
            return Err(CmdfillError::ConfigError(
                "config validation failed: shell must be non-empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Resolver settings derived from this config.
    pub fn resolver_settings(&self) -> ResolverSettings {
        ResolverSettings {
            timeout: Duration::from_secs(self.resolve_timeout_secs).min(MAX_RESOLVE_TIMEOUT),
            shell: self.shell.clone(),
            shell_args: self.shell_args.clone(),
        }
    }
}
