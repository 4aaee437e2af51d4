//! Placeholder scanning and body classification.
//!
//! A placeholder is `{{body}}` where `body` is one or more characters other
//! than `}`. The body is classified by the first rule whose trigger is present:
//!
//! 1. `!` - dynamic: `name!shell command` (the command is kept verbatim,
//!    pipes and colons included)
//! 2. `|` - enum: `name|opt|*default|opt`
//! 3. `:` - default: `name:default`, split on the first colon only
//! 4. otherwise plain: `name`
//!
//! Parsing is total. Bodies that yield an empty name are not parameters.

use super::types::{ParamDescriptor, ParamKind, Redeclaration};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{([^}]+)\}\}").expect("placeholder pattern is valid")
});

/// Compiled placeholder pattern shared with the renderer.
pub(crate) fn placeholder_pattern() -> &'static Regex {
    &PLACEHOLDER
}

/// Classify a placeholder body into a descriptor.
///
/// Returns `None` when the derived name is empty.
pub(crate) fn classify(body: &str) -> Option<ParamDescriptor> {
    let descriptor = if let Some((name, command)) = body.split_once('!') {
        ParamDescriptor {
            name: name.to_string(),
            kind: ParamKind::Dynamic,
            dynamic_cmd: command.to_string(),
            ..Default::default()
        }
    } else if body.contains('|') {
        let mut segments = body.split('|');
        let name = segments.next().unwrap_or_default();
        let mut options = Vec::new();
        let mut default = String::new();

        for segment in segments {
            let (option, starred) = match segment.strip_prefix('*') {
                Some(rest) => (rest, true),
                None => (segment, false),
            };
            if option.is_empty() {
                continue;
            }
            if starred && default.is_empty() {
                default = option.to_string();
            }
            options.push(option.to_string());
        }

        ParamDescriptor {
            name: name.to_string(),
            kind: ParamKind::Enum,
            default,
            options,
            ..Default::default()
        }
    } else if let Some((name, default)) = body.split_once(':') {
        ParamDescriptor {
            name: name.to_string(),
            default: default.to_string(),
            ..Default::default()
        }
    } else {
        ParamDescriptor::text(body)
    };

    if descriptor.name.is_empty() {
        None
    } else {
        Some(descriptor)
    }
}

/// The result of parsing a template: ordered, deduplicated descriptors plus
/// any conflicting redeclarations that were ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTemplate {
    params: Vec<ParamDescriptor>,
    redeclarations: Vec<Redeclaration>,
}

impl ParsedTemplate {
    /// Parse a command template.
    ///
    /// Descriptors appear in first-appearance order. A repeated name with a
    /// non-empty default overwrites the stored default (last one wins). The
    /// kind, options and backing command of the first occurrence are kept;
    /// a later occurrence that declares something different is recorded as
    /// a [`Redeclaration`].
    pub fn parse(template: &str) -> Self {
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut params: Vec<ParamDescriptor> = Vec::new();
        let mut redeclarations = Vec::new();

        for caps in placeholder_pattern().captures_iter(template) {
            let Some(descriptor) = classify(&caps[1]) else {
                continue;
            };

            match seen.get(&descriptor.name) {
                Some(&idx) => {
                    let existing = &mut params[idx];
                    if conflicts(existing, &descriptor) {
                        redeclarations.push(Redeclaration {
                            name: descriptor.name.clone(),
                            first: existing.kind,
                            later: descriptor.kind,
                        });
                    }
                    if descriptor.has_default() {
                        existing.default = descriptor.default;
                    }
                }
                None => {
                    seen.insert(descriptor.name.clone(), params.len());
                    params.push(descriptor);
                }
            }
        }

        Self {
            params,
            redeclarations,
        }
    }

    /// Descriptors in first-appearance order.
    pub fn params(&self) -> &[ParamDescriptor] {
        &self.params
    }

    /// Conflicting redeclarations, in the order they were encountered.
    pub fn redeclarations(&self) -> &[Redeclaration] {
        &self.redeclarations
    }

    /// Consume and return the descriptors.
    pub fn into_params(self) -> Vec<ParamDescriptor> {
        self.params
    }
}

/// A plain reference (`{{name}}` or `{{name:default}}`) never conflicts; a
/// later enum or dynamic declaration conflicts unless it repeats the first.
fn conflicts(first: &ParamDescriptor, later: &ParamDescriptor) -> bool {
    match later.kind {
        ParamKind::Text => false,
        ParamKind::Enum => first.kind != ParamKind::Enum || first.options != later.options,
        ParamKind::Dynamic => {
            first.kind != ParamKind::Dynamic || first.dynamic_cmd != later.dynamic_cmd
        }
    }
}

/// Parse a template into its ordered, deduplicated parameter descriptors.
///
/// # Examples
///
/// ```
/// use cmdfill::template::{ParamKind, parse};
///
/// let params = parse("git checkout {{branch!git branch | grep feature}}");
/// assert_eq!(params.len(), 1);
/// assert_eq!(params[0].kind, ParamKind::Dynamic);
/// assert_eq!(params[0].dynamic_cmd, "git branch | grep feature");
/// ```
pub fn parse(template: &str) -> Vec<ParamDescriptor> {
    ParsedTemplate::parse(template).into_params()
}
