//! Backing command executor.
//!
//! Runs a dynamic parameter's command through the platform shell with a
//! wall-clock bound, captures stdout, and turns it into an option list.

use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

/// Upper bound on how long a backing command may run.
pub const DEFAULT_RESOLVE_TIMEOUT: Duration = Duration::from_secs(5);

/// No backing command runs longer than this, whatever the settings ask for.
pub const MAX_RESOLVE_TIMEOUT: Duration = DEFAULT_RESOLVE_TIMEOUT;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// How backing commands are executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverSettings {
    /// Wall-clock bound per command.
    pub timeout: Duration,
    /// Shell program (e.g. `sh`).
    pub shell: String,
    /// Arguments placed before the command string (e.g. `-c`).
    pub shell_args: Vec<String>,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        let (shell, args) = default_shell();
        Self {
            timeout: DEFAULT_RESOLVE_TIMEOUT,
            shell: shell.to_string(),
            shell_args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl ResolverSettings {
    /// Same settings with a different timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// The platform command shell and the flag that introduces a command string.
pub fn default_shell() -> (&'static str, &'static [&'static str]) {
    if cfg!(windows) {
        ("cmd", &["/C"])
    } else {
        ("sh", &["-c"])
    }
}

/// Why a backing command produced no options.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveFailure {
    #[error("failed to start command: {0}")]
    Spawn(String),

    #[error("command exited with status {0}")]
    Exit(i32),

    #[error("command was terminated by a signal")]
    Signal,

    #[error("command timed out after {}s", .0.as_secs_f64())]
    TimedOut(Duration),

    #[error("command produced no output")]
    EmptyOutput,

    #[error("failed to read command output: {0}")]
    Io(String),
}

/// The single outcome of resolving one dynamic parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// Trimmed, non-blank stdout lines in order; never empty.
    Resolved(Vec<String>),
    /// The command failed, timed out, or printed nothing usable.
    Failed(ResolveFailure),
}

impl ResolveOutcome {
    /// Whether the command produced options.
    pub fn is_resolved(&self) -> bool {
        matches!(self, ResolveOutcome::Resolved(_))
    }
}

/// Run `command` and convert its stdout into options.
///
/// Never blocks past `settings.timeout` (capped at [`MAX_RESOLVE_TIMEOUT`])
/// plus polling overhead. On timeout the command's whole process group is
/// killed and the stdout reader is abandoned, so a grandchild that keeps the
/// pipe open cannot stretch the bound.
pub fn resolve(command: &str, settings: &ResolverSettings) -> ResolveOutcome {
    let start = Instant::now();
    let timeout = settings.timeout.min(MAX_RESOLVE_TIMEOUT);
    debug!(command, ?timeout, "resolving dynamic options");

    let outcome = run(command, settings, timeout, start);
    match &outcome {
        ResolveOutcome::Resolved(options) => debug!(
            command,
            options = options.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "dynamic options resolved"
        ),
        ResolveOutcome::Failed(failure) => warn!(
            command,
            %failure,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "dynamic options unavailable"
        ),
    }
    outcome
}

fn run(
    command: &str,
    settings: &ResolverSettings,
    timeout: Duration,
    start: Instant,
) -> ResolveOutcome {
    let mut cmd = Command::new(&settings.shell);
    cmd.args(&settings.shell_args)
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null());

    // Own process group, so a timeout takes the command's children down too.
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            return ResolveOutcome::Failed(ResolveFailure::Spawn(format!(
                "{} {}: {}",
                settings.shell,
                settings.shell_args.join(" "),
                e
            )));
        }
    };

    let Some(mut stdout) = child.stdout.take() else {
        kill_process(&mut child);
        return ResolveOutcome::Failed(ResolveFailure::Io("stdout was not captured".to_string()));
    };

    // Drain stdout concurrently so a chatty command cannot fill the pipe and stall.
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let result = stdout.read_to_end(&mut buf).map(|_| buf);
        let _ = tx.send(result);
    });

    let status = match wait_with_timeout(&mut child, timeout) {
        Ok(Some(status)) => status,
        Ok(None) => return ResolveOutcome::Failed(ResolveFailure::TimedOut(timeout)),
        Err(e) => {
            kill_process(&mut child);
            return ResolveOutcome::Failed(ResolveFailure::Io(e.to_string()));
        }
    };

    if !status.success() {
        return ResolveOutcome::Failed(match status.code() {
            Some(code) => ResolveFailure::Exit(code),
            None => ResolveFailure::Signal,
        });
    }

    // A background process may still hold stdout; it shares the same budget.
    let remaining = timeout.saturating_sub(start.elapsed());
    match rx.recv_timeout(remaining) {
        Ok(Ok(bytes)) => options_from_output(&String::from_utf8_lossy(&bytes)),
        Ok(Err(e)) => ResolveOutcome::Failed(ResolveFailure::Io(e.to_string())),
        Err(_) => {
            kill_group(child.id());
            ResolveOutcome::Failed(ResolveFailure::TimedOut(timeout))
        }
    }
}

/// Split output into trimmed, non-blank lines.
pub fn options_from_output(output: &str) -> ResolveOutcome {
    let options: Vec<String> = output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if options.is_empty() {
        ResolveOutcome::Failed(ResolveFailure::EmptyOutput)
    } else {
        ResolveOutcome::Resolved(options)
    }
}

/// Wait for a child process with timeout.
///
/// Returns `None` if the deadline passed; the process has been killed.
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> io::Result<Option<ExitStatus>> {
    let start = Instant::now();

    loop {
        match child.try_wait()? {
            Some(status) => return Ok(Some(status)),
            None => {
                let elapsed = start.elapsed();
                if elapsed >= timeout {
                    kill_process(child);
                    return Ok(None);
                }
                thread::sleep(POLL_INTERVAL.min(timeout - elapsed));
            }
        }
    }
}

/// Kill a process, along with its process group on Unix, and reap it.
fn kill_process(child: &mut Child) {
    kill_group(child.id());
    // On Unix this is SIGKILL; on Windows it is TerminateProcess.
    let _ = child.kill();
    let _ = child.wait();
}

/// SIGKILL every process in the group led by `pid`.
#[cfg(unix)]
fn kill_group(pid: u32) {
    let status = Command::new("kill")
        .args(["-KILL", "--", &format!("-{}", pid)])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    if let Err(e) = status {
        debug!(pid, error = %e, "could not signal process group");
    }
}

#[cfg(not(unix))]
fn kill_group(_pid: u32) {}
