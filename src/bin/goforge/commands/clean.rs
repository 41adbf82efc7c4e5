//! `goforge clean` command.

use anyhow::{Context, Result};

use goforge::Config;

use crate::cli::CleanArgs;

pub fn execute(config: &Config, args: CleanArgs) -> Result<()> {
    let deps_root = config.deps_temp_root();
    if deps_root.exists() {
        std::fs::remove_dir_all(&deps_root)
            .with_context(|| format!("failed to remove {}", deps_root.display()))?;
        tracing::info!("removed unpacked dependencies: {}", deps_root.display());
    }

    if args.sdk {
        let store_root = config.store_root();
        if store_root.exists() {
            std::fs::remove_dir_all(&store_root)
                .with_context(|| format!("failed to remove {}", store_root.display()))?;
            tracing::info!("removed SDK store: {}", store_root.display());
        }
    }

    Ok(())
}
