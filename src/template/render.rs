//! Placeholder substitution.

use super::parser::{classify, placeholder_pattern};
use regex::Captures;
use std::collections::HashMap;

/// Render a template by substituting placeholder values.
///
/// Each placeholder is re-classified with the parser's rules. A non-empty
/// value for its name wins, then its own default; otherwise the placeholder
/// text is left untouched.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use cmdfill::template::render;
///
/// let mut values = HashMap::new();
/// values.insert("host".to_string(), "prod".to_string());
///
/// let out = render("ssh {{host}} -p {{port:22}} {{user}}", &values);
/// assert_eq!(out, "ssh prod -p 22 {{user}}");
/// ```
pub fn render(template: &str, values: &HashMap<String, String>) -> String {
    placeholder_pattern()
        .replace_all(template, |caps: &Captures<'_>| {
            let original = &caps[0];
            let Some(descriptor) = classify(&caps[1]) else {
                return original.to_string();
            };

            match values.get(&descriptor.name) {
                Some(value) if !value.is_empty() => value.clone(),
                _ if descriptor.has_default() => descriptor.default,
                _ => original.to_string(),
            }
        })
        .into_owned()
}

/// Render a template using only the defaults written into it.
pub fn render_defaults(template: &str) -> String {
    render(template, &HashMap::new())
}
