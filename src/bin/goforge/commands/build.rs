//! `goforge build` command.

use anyhow::Result;

use goforge::ops::{self, GoCommand};
use goforge::Config;

use crate::cli::BuildArgs;
use crate::commands::packages_or_default;

pub fn execute(config: &Config, args: BuildArgs) -> Result<()> {
    let mut flags = Vec::new();
    if let Some(output) = args.output {
        flags.push("-o".to_string());
        flags.push(output);
    }

    let mut command = GoCommand::new("build");
    command.command_flags = flags;
    command.tail_args = packages_or_default(args.packages);

    ops::execute(config, &command)?;
    Ok(())
}
