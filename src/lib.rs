//! cmdfill: parameterized shell command templates.
//!
//! A template such as `kubectl -n {{ns|dev|*prod}} logs {{pod!kubectl get po -o name}}`
//! declares free-text, enumerated, and dynamic parameters. The engine parses
//! the template ([`template`]), runs dynamic parameters' commands
//! concurrently with a time bound ([`resolver`]), tracks each parameter's
//! state while the user fills it in ([`session`]), and renders the final
//! command string.

pub mod config;
pub mod error;
pub mod exit_codes;
pub mod journal;
pub mod resolver;
pub mod session;
pub mod template;
