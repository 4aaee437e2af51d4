//! Implementation of the `cmdfill render` command.

use super::parse_assignments;
use crate::cli::RenderArgs;
use cmdfill::error::Result;
use cmdfill::template::{self, ParsedTemplate};
use tracing::warn;

/// Render the template with the `--set` values and print it.
pub fn cmd_render(args: RenderArgs) -> Result<()> {
    println!("{}", render_output(&args)?);
    Ok(())
}

fn render_output(args: &RenderArgs) -> Result<String> {
    let values = parse_assignments(&args.values)?;

    let parsed = ParsedTemplate::parse(&args.template);
    for name in values.keys() {
        if !parsed.params().iter().any(|p| &p.name == name) {
            warn!(param = %name, "value given for a parameter the template does not use");
        }
    }

    Ok(template::render(&args.template, &values))
}
