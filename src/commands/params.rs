//! Implementation of the `cmdfill params` command.
//!
//! Prints the template's parameter descriptors in the same shape a workflow
//! file stores them under `args`.

use crate::cli::{OutputFormat, ParamsArgs};
use cmdfill::error::{CmdfillError, Result};
use cmdfill::template::ParsedTemplate;

/// Print the parsed descriptors; redeclaration warnings go to stderr.
pub fn cmd_params(args: ParamsArgs) -> Result<()> {
    let parsed = ParsedTemplate::parse(&args.template);

    for redeclaration in parsed.redeclarations() {
        eprintln!("Warning: {}", redeclaration);
    }

    let output = format_params(&parsed, args.format)?;
    print!("{}", output);
    Ok(())
}

fn format_params(parsed: &ParsedTemplate, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => serde_yaml::to_string(parsed.params()).map_err(|e| {
            CmdfillError::Io(format!("failed to serialize parameters to YAML: {}", e))
        }),
        OutputFormat::Json => serde_json::to_string_pretty(parsed.params())
            .map(|json| json + "\n")
            .map_err(|e| {
                CmdfillError::Io(format!("failed to serialize parameters to JSON: {}", e))
            }),
    }
}
