//! Implementation of the `cmdfill fill` command.
//!
//! A line-oriented host for a fill session. Stdin lines become
//! [`InputEvent`]s posted on the same channel the resolver workers report
//! on, so typing never waits for a slow command. After every event the
//! focused parameter and a live preview are printed to stderr; the final
//! command goes to stdout.
//!
//! # Input
//!
//! - empty line: confirm (submit when ready, otherwise next parameter)
//! - `:n` / `:next`, `:p` / `:prev`: move focus
//! - `:j` / `:down`, `:k` / `:up`: move the list cursor
//! - `:N`: pick option N of the focused list and confirm; an option that
//!   does not exist is rejected and nothing is confirmed
//! - `:bs`: delete the last character
//! - `:q` / `:quit`: cancel
//! - `::text`: the literal text `:text`
//! - anything else: set the focused value and confirm; text typed on a list
//!   parameter is rejected and nothing is confirmed

use super::parse_assignments;
use crate::cli::FillArgs;
use anyhow::Context;
use cmdfill::config::Config;
use cmdfill::error::{CmdfillError, Result};
use cmdfill::journal::Journal;
use cmdfill::session::{
    FillOutcome, FillSession, InputEvent, ResolutionState, SessionEvent, SessionLoop,
};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::io::{self, BufRead};
use std::sync::mpsc::{self, Sender};
use std::thread;
use tracing::{debug, warn};

/// Run an interactive fill session and print the resulting command.
pub fn cmd_fill(args: FillArgs, config: &Config) -> Result<()> {
    let values = parse_assignments(&args.values)?;

    let (mut session, jobs) = FillSession::start(args.template);
    prefill(&mut session, &values)?;

    let (tx, rx) = mpsc::channel();
    let settings = config.resolver_settings();
    for job in jobs {
        job.spawn(settings.clone(), tx.clone());
    }

    let mut looper = SessionLoop::from_parts(session, rx);
    if let Some(path) = args.journal.or_else(|| config.journal_path.clone()) {
        looper = looper.with_journal(Journal::new(path));
    }

    spawn_input_reader(tx);

    let max_visible = config.max_visible_options;
    eprint!("{}", describe(looper.session(), max_visible));
    let outcome = looper.run_with(|session, _| eprint!("{}", describe(session, max_visible)));

    match outcome {
        FillOutcome::Submitted(command) => {
            println!("{}", command);
            Ok(())
        }
        FillOutcome::Cancelled => Err(CmdfillError::Cancelled),
    }
}

/// Apply `--set` values before the session starts taking input.
///
/// Free-text parameters take the value as is; list parameters take it only
/// if it names one of their options.
fn prefill(session: &mut FillSession, values: &HashMap<String, String>) -> Result<()> {
    for (name, value) in values {
        let index = session.index_of(name).ok_or_else(|| {
            CmdfillError::UserError(format!("template has no parameter '{}'", name))
        })?;

        let result = if session.is_list_selectable(index) {
            let option = session
                .options(index)
                .and_then(|options| options.iter().position(|o| o == value))
                .ok_or_else(|| {
                    CmdfillError::UserError(format!(
                        "'{}' is not one of the options of parameter '{}'",
                        value, name
                    ))
                })?;
            session.select(index, option)
        } else {
            session.set_text(index, value.clone())
        };

        result.map_err(|e| CmdfillError::UserError(format!("cannot pre-fill: {}", e)))?;
    }
    Ok(())
}

/// Read stdin on its own thread; end of input cancels the session.
fn spawn_input_reader(events: Sender<SessionEvent>) {
    thread::spawn(move || {
        if let Err(e) = forward_input(io::stdin().lock(), &events) {
            warn!(error = %format!("{:#}", e), "stopped reading input");
        }
        let _ = events.send(SessionEvent::Input(InputEvent::Cancel));
    });
}

fn forward_input<R: BufRead>(reader: R, events: &Sender<SessionEvent>) -> anyhow::Result<()> {
    for (n, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read input line {}", n + 1))?;

        let decoded = parse_input_line(&line);
        if decoded.is_empty() {
            eprintln!("unrecognized command '{}'", line.trim_end());
            continue;
        }
        for event in decoded {
            if events.send(SessionEvent::Input(event)).is_err() {
                debug!("session ended, ignoring remaining input");
                return Ok(());
            }
        }
    }
    Ok(())
}

/// Decode one input line. Returns no events for an unrecognized command.
fn parse_input_line(line: &str) -> Vec<InputEvent> {
    let line = line.trim_end_matches(['\r', '\n']);

    let Some(command) = line.strip_prefix(':') else {
        if line.is_empty() {
            return vec![InputEvent::Enter];
        }
        return vec![InputEvent::SetTextAndConfirm(line.to_string())];
    };

    if command.starts_with(':') {
        return vec![InputEvent::SetTextAndConfirm(command.to_string())];
    }

    match command.trim() {
        "n" | "next" => vec![InputEvent::Next],
        "p" | "prev" => vec![InputEvent::Prev],
        "j" | "down" => vec![InputEvent::Down],
        "k" | "up" => vec![InputEvent::Up],
        "bs" => vec![InputEvent::Backspace],
        "q" | "quit" => vec![InputEvent::Cancel],
        other => match other.parse::<usize>() {
            Ok(n) if n >= 1 => vec![InputEvent::ChooseAndConfirm(n - 1)],
            _ => Vec::new(),
        },
    }
}

/// The focused parameter and the live preview, for stderr.
fn describe(session: &FillSession, max_visible: usize) -> String {
    let mut out = String::new();
    let index = session.focused();

    if let (Some(descriptor), Some(state)) = (session.descriptor(index), session.state(index)) {
        let _ = write!(
            out,
            "[{}/{}] {} ({})",
            index + 1,
            session.len(),
            descriptor.name,
            descriptor.kind
        );
        let value = session.value(index).unwrap_or_default();

        match state {
            ResolutionState::Loading => {
                let _ = writeln!(out, ": loading...");
            }
            ResolutionState::Failed { failure } => {
                let _ = writeln!(out, " [{}]: {}", failure, value);
            }
            _ if session.is_list_selectable(index) => {
                let _ = writeln!(out);
                let options = session.options(index).unwrap_or_default();
                if options.is_empty() {
                    let _ = writeln!(out, "    (no options)");
                }
                if let Some(window) = session.option_window(index, max_visible) {
                    for (i, option) in options[window.start..window.end].iter().enumerate() {
                        let position = window.start + i;
                        let marker = if position == window.cursor { ">" } else { " " };
                        let _ = writeln!(out, "  {} {:>2}  {}", marker, position + 1, option);
                    }
                    if window.is_scrolling() {
                        let _ = writeln!(out, "    ({} of {})", window.cursor + 1, window.total);
                    }
                }
            }
            _ => {
                let _ = writeln!(out, ": {}", value);
            }
        }
    }

    let _ = writeln!(out, "preview: {}", session.preview());
    out
}
