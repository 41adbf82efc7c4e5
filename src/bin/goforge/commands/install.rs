//! `goforge install` command.

use anyhow::Result;

use goforge::ops::{self, GoCommand};
use goforge::Config;

use crate::cli::InstallArgs;
use crate::commands::{packages_or_default, print_tool_output};

pub fn execute(config: &Config, args: InstallArgs) -> Result<()> {
    let mut command = GoCommand::new("install");
    command.tail_args = packages_or_default(args.packages);

    let outcome = ops::execute(config, &command)?;
    print_tool_output(&outcome);
    Ok(())
}
