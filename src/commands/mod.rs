//! Command implementations for cmdfill.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, plus argument helpers shared between commands.

mod convert;
mod fill;
mod params;
mod render;
mod resolve;

use crate::cli::Command;
use cmdfill::config::Config;
use cmdfill::error::{CmdfillError, Result};
use std::collections::HashMap;

/// Dispatch a command to its implementation.
///
/// This is the main entry point for command execution. Each command
/// is routed to its handler function.
pub fn dispatch(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Params(args) => params::cmd_params(args),
        Command::Render(args) => render::cmd_render(args),
        Command::Resolve(args) => resolve::cmd_resolve(args, config),
        Command::Fill(args) => fill::cmd_fill(args, config),
        Command::Convert(args) => convert::cmd_convert(args),
    }
}

/// Parse repeated `NAME=VALUE` arguments.
///
/// The value may contain further `=` characters; the name may not be empty.
/// A later assignment to the same name replaces an earlier one.
pub(crate) fn parse_assignments(pairs: &[String]) -> Result<HashMap<String, String>> {
    let mut values = HashMap::new();

    for pair in pairs {
        let (name, value) = pair.split_once('=').ok_or_else(|| {
            CmdfillError::UserError(format!(
                "invalid value '{}': expected NAME=VALUE",
                pair
            ))
        })?;
        if name.is_empty() {
            return Err(CmdfillError::UserError(format!(
                "invalid value '{}': parameter name is empty",
                pair
            )));
        }
        values.insert(name.to_string(), value.to_string());
    }

    Ok(values)
}
