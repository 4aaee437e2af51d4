//! Implementation of the `cmdfill resolve` command.
//!
//! Runs every dynamic parameter's backing command concurrently and prints
//! what each produced. Useful for checking a template's commands before
//! filling it in.

use crate::cli::ResolveArgs;
use cmdfill::config::Config;
use cmdfill::error::Result;
use cmdfill::resolver::{ResolveOutcome, resolve_all};
use cmdfill::template::{ParamDescriptor, ParamKind, parse};
use std::fmt::Write;
use std::time::Instant;
use tracing::info;

/// Resolve and print every dynamic parameter of the template.
pub fn cmd_resolve(args: ResolveArgs, config: &Config) -> Result<()> {
    let dynamic: Vec<ParamDescriptor> = parse(&args.template)
        .into_iter()
        .filter(|p| p.kind == ParamKind::Dynamic)
        .collect();

    if dynamic.is_empty() {
        eprintln!("Template has no dynamic parameters.");
        return Ok(());
    }

    let commands: Vec<&str> = dynamic.iter().map(|p| p.dynamic_cmd.as_str()).collect();
    let started = Instant::now();
    let outcomes = resolve_all(&commands[..], &config.resolver_settings());
    info!(
        count = commands.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "resolved dynamic parameters"
    );

    print!("{}", format_outcomes(&dynamic, &outcomes));
    Ok(())
}

fn format_outcomes(params: &[ParamDescriptor], outcomes: &[ResolveOutcome]) -> String {
    let mut out = String::new();

    for (param, outcome) in params.iter().zip(outcomes) {
        match outcome {
            ResolveOutcome::Resolved(options) => {
                let _ = writeln!(out, "{}: {} option(s)", param.name, options.len());
                for option in options {
                    let marker = if *option == param.default { "*" } else { " " };
                    let _ = writeln!(out, "  {} {}", marker, option);
                }
            }
            ResolveOutcome::Failed(failure) => {
                let _ = writeln!(out, "{}: failed ({})", param.name, failure);
            }
        }
    }

    out
}
