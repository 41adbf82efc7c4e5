//! goforge CLI - A Cargo-like build helper for Go projects

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use goforge::util::config::CONFIG_FILE_NAME;
use goforge::Config;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("goforge=debug")
    } else {
        EnvFilter::new("goforge=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    // Load configuration: project file first, CLI flags on top
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(Path::new(CONFIG_FILE_NAME)),
    };
    config.merge(cli.overrides.to_config());

    // Execute command
    match cli.command {
        Commands::Build(args) => commands::build::execute(&config, args),
        Commands::Install(args) => commands::install::execute(&config, args),
        Commands::Test(args) => commands::test::execute(&config, args),
        Commands::Vet(args) => commands::vet::execute(&config, args),
        Commands::Run(args) => commands::run::execute(&config, args),
        Commands::Clean(args) => commands::clean::execute(&config, args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
