//! Conversion of angle-bracket snippet parameters into `{{...}}` syntax.
//!
//! Other snippet managers write parameters as `<name>` or `<name=default>`.
//! Converting them lets imported commands go through the same parser.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static ANGLE_PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<([A-Za-z0-9_.-]+)(?:=([^>]*))?>").expect("angle parameter pattern is valid")
});

/// Rewrite `<name>` as `{{name}}` and `<name=default>` as `{{name:default}}`.
///
/// Names are restricted to word characters, dots and dashes so that shell
/// redirections such as `sort < in.txt > out.txt` are left alone.
pub fn convert_angle_params(command: &str) -> String {
    ANGLE_PARAM
        .replace_all(command, |caps: &Captures<'_>| match caps.get(2) {
            Some(default) => format!("{{{{{}:{}}}}}", &caps[1], default.as_str()),
            None => format!("{{{{{}}}}}", &caps[1]),
        })
        .into_owned()
}
