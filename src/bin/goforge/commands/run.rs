//! `goforge run` command - arbitrary go tool verbs.

use anyhow::Result;

use goforge::ops::{self, GoCommand};
use goforge::Config;

use crate::cli::RunArgs;
use crate::commands::print_tool_output;

pub fn execute(config: &Config, args: RunArgs) -> Result<()> {
    let mut command = GoCommand::new(args.verb);
    command.tail_args = args.args;

    let outcome = ops::execute(config, &command)?;
    print_tool_output(&outcome);
    Ok(())
}
