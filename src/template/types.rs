//! Parameter descriptor types produced by the template parser.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of a template parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    /// Free text, optionally with a default (`{{name}}`, `{{name:default}}`).
    #[default]
    Text,
    /// A static option list (`{{name|a|*b|c}}`).
    Enum,
    /// Options produced by a shell command (`{{name!command}}`).
    Dynamic,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKind::Text => write!(f, "text"),
            ParamKind::Enum => write!(f, "enum"),
            ParamKind::Dynamic => write!(f, "dynamic"),
        }
    }
}

/// One named parameter found in a template.
///
/// Serializes to the same shape a workflow file stores under `args`:
/// empty fields are omitted and the kind is written as `type`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParamDescriptor {
    /// Text before the first disambiguating delimiter.
    pub name: String,

    /// Parameter kind.
    #[serde(rename = "type", default)]
    pub kind: ParamKind,

    /// Default value; empty means no default.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default: String,

    /// Static options for `Enum`; empty for other kinds.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,

    /// Backing shell command for `Dynamic`; empty for other kinds.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dynamic_cmd: String,
}

impl ParamDescriptor {
    /// Create a plain text descriptor with no default.
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Whether a non-empty default is present.
    pub fn has_default(&self) -> bool {
        !self.default.is_empty()
    }

    /// Index of the default within `options`, first match by equality.
    pub fn default_index_in(&self, options: &[String]) -> Option<usize> {
        if !self.has_default() {
            return None;
        }
        options.iter().position(|opt| *opt == self.default)
    }
}

/// A name that was declared again with a different kind, option list, or
/// backing command. The first declaration is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redeclaration {
    /// The parameter name.
    pub name: String,
    /// Kind established by the first occurrence (the one in effect).
    pub first: ParamKind,
    /// Kind declared by the ignored later occurrence.
    pub later: ParamKind,
}

impl fmt::Display for Redeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.first == self.later {
            write!(
                f,
                "parameter '{}' redeclared with a different {} definition; keeping the first",
                self.name, self.first
            )
        } else {
            write!(
                f,
                "parameter '{}' redeclared as {} (first declared as {}); keeping the first",
                self.name, self.later, self.first
            )
        }
    }
}
