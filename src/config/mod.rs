//! Configuration model for cmdfill.
//!
//! This module defines the Config struct that represents
//! `$XDG_CONFIG_HOME/cmdfill/config.yaml`. Parsing is forward-compatible
//! (unknown fields are kept but otherwise ignored), every field has a
//! default, and values are validated after load.

mod model;
mod operations;


// Re-export public API
pub use model::Config;
pub use operations::default_path;
