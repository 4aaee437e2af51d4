//! Command template grammar.
//!
//! Templates are shell command strings with `{{...}}` placeholders:
//!
//! ```text
//! ssh {{user:root}}@{{host}}                  text, with and without default
//! kubectl -n {{env|dev|staging|*prod}} get po  enum, `*` marks the default
//! git checkout {{branch!git branch --list}}    dynamic, options from a command
//! ```
//!
//! - **Parser**: ordered, deduplicated [`ParamDescriptor`]s
//! - **Renderer**: substitution of chosen values or defaults
//! - **Convert**: `<name=default>` snippet syntax to `{{name:default}}`
//!
//! Exactly one level of placeholders is resolved per pass; substituted
//! values are never re-scanned.

mod convert;
mod parser;
mod render;
mod types;

#[cfg(test)]
mod tests;

pub use convert::convert_angle_params;
pub use parser::{ParsedTemplate, parse};
pub use render::{render, render_defaults};
pub use types::{ParamDescriptor, ParamKind, Redeclaration};
