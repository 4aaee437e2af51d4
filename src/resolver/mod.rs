//! Dynamic option resolution.
//!
//! Each dynamic parameter's backing command runs on its own worker thread,
//! so resolving several parameters takes as long as the slowest one rather
//! than the sum. Workers report exactly one [`ResolveOutcome`] each.

mod executor;

pub use executor::{
    DEFAULT_RESOLVE_TIMEOUT, MAX_RESOLVE_TIMEOUT, ResolveFailure, ResolveOutcome,
    ResolverSettings, default_shell, options_from_output, resolve,
};

use std::thread::{self, JoinHandle};

/// Resolve `command` on a new worker thread and hand the outcome to `on_done`.
///
/// The caller decides where the outcome goes; a session passes a closure
/// that posts onto its event channel.
pub fn spawn_resolver<F>(command: String, settings: ResolverSettings, on_done: F) -> JoinHandle<()>
where
    F: FnOnce(ResolveOutcome) + Send + 'static,
{
    thread::spawn(move || {
        let outcome = resolve(&command, &settings);
        on_done(outcome);
    })
}

/// Resolve several commands concurrently, returning outcomes in input order.
pub fn resolve_all<S: AsRef<str> + Sync>(
    commands: &[S],
    settings: &ResolverSettings,
) -> Vec<ResolveOutcome> {
    thread::scope(|scope| {
        let handles: Vec<_> = commands
            .iter()
            .map(|command| scope.spawn(move || resolve(command.as_ref(), settings)))
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle.join().unwrap_or_else(|_| {
                    let reason = "resolver thread panicked".to_string();
                    ResolveOutcome::Failed(ResolveFailure::Io(reason))
                })
            })
            .collect()
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::{Duration, Instant};

    #[test]
    fn test_spawn_resolver_reports_once() {
        let (tx, rx) = mpsc::channel();
        let handle = spawn_resolver(
            "echo one; echo two".to_string(),
            ResolverSettings::default(),
            move |outcome| {
                let _ = tx.send(outcome);
            },
        );
        handle.join().unwrap();

        let outcomes: Vec<_> = rx.iter().collect();
        assert_eq!(
            outcomes,
            vec![ResolveOutcome::Resolved(vec![
                "one".to_string(),
                "two".to_string()
            ])]
        );
    }

    #[test]
    fn test_resolve_all_runs_concurrently() {
        let settings = ResolverSettings::default().with_timeout(Duration::from_secs(3));
        let commands = ["sleep 1; echo a", "sleep 1; echo b", "sleep 1; echo c"];

        let start = Instant::now();
        let outcomes = resolve_all(&commands[..], &settings);
        let elapsed = start.elapsed();

        assert_eq!(
            outcomes,
            vec![
                ResolveOutcome::Resolved(vec!["a".to_string()]),
                ResolveOutcome::Resolved(vec!["b".to_string()]),
                ResolveOutcome::Resolved(vec!["c".to_string()]),
            ]
        );
        assert!(elapsed < Duration::from_millis(2500), "took {:?}", elapsed);
    }

    #[test]
    fn test_resolve_all_mixed_outcomes_keep_order() {
        let settings = ResolverSettings::default().with_timeout(Duration::from_millis(500));
        let outcomes = resolve_all(&["exit 1", "sleep 5", "echo ok"][..], &settings);

        assert_eq!(outcomes[0], ResolveOutcome::Failed(ResolveFailure::Exit(1)));
        assert!(matches!(
            outcomes[1],
            ResolveOutcome::Failed(ResolveFailure::TimedOut(_))
        ));
        assert_eq!(outcomes[2], ResolveOutcome::Resolved(vec!["ok".to_string()]));
    }
}
