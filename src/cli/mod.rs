//! CLI argument parsing for cmdfill.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// cmdfill: fill in parameterized shell command templates.
///
/// Placeholders use `{{...}}`:
/// - `{{name}}` / `{{name:default}}` free text
/// - `{{name|a|*b|c}}` choice from a fixed list (`*` marks the default)
/// - `{{name!command}}` choice from the output lines of a shell command
#[derive(Parser, Debug)]
#[command(name = "cmdfill")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/cmdfill/config.yaml).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for cmdfill.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List a template's parameters.
    ///
    /// Prints one descriptor per distinct parameter name, in order of first
    /// appearance, followed by any redeclaration warnings on stderr.
    Params(ParamsArgs),

    /// Render a template with the given values.
    ///
    /// Parameters without a value fall back to their default; parameters
    /// with neither are left as written.
    Render(RenderArgs),

    /// Run every dynamic parameter's command and print the options.
    ///
    /// Commands run concurrently, each bounded by the resolve timeout.
    Resolve(ResolveArgs),

    /// Fill in a template interactively, line by line on stdin.
    ///
    /// Prints the final command on stdout. Exits 130 when cancelled.
    Fill(FillArgs),

    /// Convert `<name=default>` snippet parameters to `{{name:default}}`.
    Convert(ConvertArgs),
}

/// Output format for `params`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// Arguments for the `params` command.
#[derive(Parser, Debug)]
pub struct ParamsArgs {
    /// Command template.
    pub template: String,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,
}

/// Arguments for the `render` command.
#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Command template.
    pub template: String,

    /// Parameter value, repeatable.
    #[arg(long = "set", value_name = "NAME=VALUE")]
    pub values: Vec<String>,
}

/// Arguments for the `resolve` command.
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Command template.
    pub template: String,
}

/// Arguments for the `fill` command.
#[derive(Parser, Debug)]
pub struct FillArgs {
    /// Command template.
    pub template: String,

    /// Pre-filled free-text value, repeatable.
    #[arg(long = "set", value_name = "NAME=VALUE")]
    pub values: Vec<String>,

    /// Session journal file (overrides `journal_path` from config).
    #[arg(long, value_name = "PATH")]
    pub journal: Option<PathBuf>,
}

/// Arguments for the `convert` command.
#[derive(Parser, Debug)]
pub struct ConvertArgs {
    /// Command using `<name>` / `<name=default>` parameters.
    pub command: String,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
