//! `goforge vet` command.

use anyhow::Result;

use goforge::ops::{self, GoCommand};
use goforge::Config;

use crate::cli::VetArgs;
use crate::commands::print_tool_output;

pub fn execute(config: &Config, args: VetArgs) -> Result<()> {
    let mut command = GoCommand::new("vet");
    command.tail_args = args.packages;

    let outcome = ops::execute(config, &command)?;
    print_tool_output(&outcome);
    Ok(())
}
