//! Implementation of the `cmdfill convert` command.

use crate::cli::ConvertArgs;
use cmdfill::error::Result;
use cmdfill::template::convert_angle_params;

/// Print the command with `<name=default>` parameters rewritten.
pub fn cmd_convert(args: ConvertArgs) -> Result<()> {
    println!("{}", convert_angle_params(&args.command));
    Ok(())
}
