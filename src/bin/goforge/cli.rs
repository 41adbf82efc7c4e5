//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use goforge::Config;

/// goforge - A Cargo-like build helper for Go projects
#[derive(Parser)]
#[command(name = "goforge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the project configuration file (goforge.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: ConfigOverrides,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile packages with the resolved Go toolchain
    Build(BuildArgs),

    /// Compile and install packages
    Install(InstallArgs),

    /// Run package tests
    Test(TestArgs),

    /// Run the vet checker over packages
    Vet(VetArgs),

    /// Run an arbitrary go tool command
    Run(RunArgs),

    /// Remove unpacked dependencies and, optionally, cached SDKs
    Clean(CleanArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Configuration overrides shared by all subcommands; each one shadows the
/// matching `goforge.toml` entry.
#[derive(Args)]
pub struct ConfigOverrides {
    /// Go SDK version to resolve when no toolchain root is set
    #[arg(long, global = true)]
    pub go_version: Option<String>,

    /// Explicit Go toolchain root folder
    #[arg(long, global = true)]
    pub go_root: Option<PathBuf>,

    /// Bootstrap toolchain root exported as GOROOT_BOOTSTRAP
    #[arg(long, global = true)]
    pub go_root_bootstrap: Option<PathBuf>,

    /// Folder keeping downloaded archives and unpacked SDKs
    #[arg(long, global = true)]
    pub store_root: Option<PathBuf>,

    /// Distribution OS for SDK name synthesis
    #[arg(long, global = true)]
    pub os: Option<String>,

    /// Distribution architecture for SDK name synthesis
    #[arg(long, global = true)]
    pub arch: Option<String>,

    /// OSX sub-version for darwin SDK names
    #[arg(long, global = true)]
    pub osx_version: Option<String>,

    /// Directly defined SDK archive name, bypassing listing lookup
    #[arg(long, global = true)]
    pub archive_name: Option<String>,

    /// Fail instead of downloading when the SDK is not cached
    #[arg(long, global = true)]
    pub disable_sdk_fetch: bool,

    /// Keep the downloaded SDK archive after unpacking
    #[arg(long, global = true)]
    pub keep_sdk_archive: bool,

    /// Keep a wrongly unpacked SDK folder for inspection
    #[arg(long, global = true)]
    pub keep_unpacked_on_error: bool,

    /// Go project sources folder
    #[arg(long, global = true)]
    pub sources: Option<PathBuf>,

    /// GOPATH folder
    #[arg(long, global = true)]
    pub go_path: Option<PathBuf>,

    /// Tool inside the SDK to call instead of bin/go
    #[arg(long, global = true)]
    pub use_go_tool: Option<String>,

    /// Target OS exported as GOOS
    #[arg(long, global = true)]
    pub target_os: Option<String>,

    /// Target architecture exported as GOARCH
    #[arg(long, global = true)]
    pub target_arch: Option<String>,

    /// Extra build flag inserted on every call (repeatable)
    #[arg(long = "build-flag", global = true)]
    pub build_flags: Vec<String>,

    /// Extra environment variable as KEY=VALUE (repeatable)
    #[arg(long = "env", value_parser = parse_key_val, global = true)]
    pub env: Vec<(String, String)>,

    /// Don't consult GOROOT/GOPATH/GOOS/GOARCH for configuration values
    #[arg(long, global = true)]
    pub dont_use_env_vars: bool,

    /// Don't scan dependency archives for workspace artifacts
    #[arg(long, global = true)]
    pub no_scan_deps: bool,

    /// Include test-scoped dependencies outside the test phase
    #[arg(long, global = true)]
    pub include_test_scope: bool,

    /// Folder where workspace artifacts are unpacked
    #[arg(long, global = true)]
    pub deps_temp_root: Option<PathBuf>,
}

impl ConfigOverrides {
    /// Build a configuration overlay for merging over the project file.
    pub fn to_config(&self) -> Config {
        let mut config = Config::default();

        if let Some(version) = &self.go_version {
            config.sdk.go_version = version.clone();
        }
        config.sdk.go_root = self.go_root.clone();
        config.sdk.go_root_bootstrap = self.go_root_bootstrap.clone();
        config.sdk.store_root = self.store_root.clone();
        config.sdk.os = self.os.clone();
        config.sdk.arch = self.arch.clone();
        config.sdk.osx_version = self.osx_version.clone();
        config.sdk.archive_name = self.archive_name.clone();
        config.sdk.disable_fetch = self.disable_sdk_fetch;
        config.sdk.keep_archive = self.keep_sdk_archive;
        config.sdk.keep_unpacked_on_error = self.keep_unpacked_on_error;

        config.run.sources = self.sources.clone();
        config.run.go_path = self.go_path.clone();
        config.run.use_go_tool = self.use_go_tool.clone();
        config.run.target_os = self.target_os.clone();
        config.run.target_arch = self.target_arch.clone();
        config.run.build_flags = self.build_flags.clone();
        config.run.env = self.env.iter().cloned().collect();
        config.run.dont_use_env_vars = self.dont_use_env_vars;

        if self.no_scan_deps {
            config.deps.scan = false;
        }
        config.deps.include_test_scope = self.include_test_scope;
        config.deps.temp_root = self.deps_temp_root.clone();

        config
    }
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}

#[derive(Args)]
pub struct BuildArgs {
    /// Packages to build (defaults to ./...)
    pub packages: Vec<String>,

    /// Output file name passed to the tool as -o
    #[arg(short, long)]
    pub output: Option<String>,
}

#[derive(Args)]
pub struct InstallArgs {
    /// Packages to install (defaults to ./...)
    pub packages: Vec<String>,
}

#[derive(Args)]
pub struct TestArgs {
    /// Packages to test (defaults to ./...)
    pub packages: Vec<String>,

    /// Test binary flag appended after the packages (repeatable)
    #[arg(long = "test-flag")]
    pub test_flags: Vec<String>,

    /// Report success even when tests fail
    #[arg(long, env = "GOFORGE_TEST_IGNORE")]
    pub ignore_failures: bool,
}

#[derive(Args)]
pub struct VetArgs {
    /// Packages to check
    pub packages: Vec<String>,
}

#[derive(Args)]
pub struct RunArgs {
    /// Command verb passed to the go tool
    pub verb: String,

    /// Arguments passed through after the verb
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[derive(Args)]
pub struct CleanArgs {
    /// Also remove cached SDK distributions from the store root
    #[arg(long)]
    pub sdk: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
