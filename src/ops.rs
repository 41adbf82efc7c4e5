//! High-level operations: resolve the toolchain, prepare the workspace,
//! run the tool.
//!
//! Each CLI subcommand contributes a [`GoCommand`] value (verb, flags, tail
//! arguments); this module turns it into a full invocation against the
//! resolved toolchain and executes it.

use std::path::{Path, PathBuf};

use crate::core::{BuildPhase, CommandInvocation};
use crate::error::{Result, ToolError};
use crate::runner::{EnvironmentAssembler, ExecOutcome, RetryPolicy, Runner, SingleAttempt};
use crate::sdk::SdkCache;
use crate::util::Config;
use crate::workspace;

/// One Go tool command to run, as contributed by a subcommand.
#[derive(Debug, Clone)]
pub struct GoCommand {
    /// Command verb, e.g. `build` or `test`.
    pub verb: String,

    /// Command-specific flags placed right after the verb.
    pub command_flags: Vec<String>,

    /// Tail arguments, usually package selectors.
    pub tail_args: Vec<String>,

    /// Optional extra tail arguments appended last.
    pub extra_tail_args: Vec<String>,

    /// Build phase this command runs in; gates test-scoped dependencies.
    pub phase: BuildPhase,

    /// Tolerate non-zero tool exit codes.
    pub ignore_error_exit_code: bool,
}

impl GoCommand {
    /// A plain command with only a verb.
    pub fn new(verb: impl Into<String>) -> Self {
        GoCommand {
            verb: verb.into(),
            command_flags: Vec::new(),
            tail_args: Vec::new(),
            extra_tail_args: Vec::new(),
            phase: BuildPhase::Main,
            ignore_error_exit_code: false,
        }
    }
}

/// Execute `command` with the default single-attempt policy.
pub fn execute(config: &Config, command: &GoCommand) -> Result<ExecOutcome> {
    execute_with_policy(config, command, &SingleAttempt)
}

/// Execute `command`, deciding retries through `policy`.
pub fn execute_with_policy(
    config: &Config,
    command: &GoCommand,
    policy: &dyn RetryPolicy,
) -> Result<ExecOutcome> {
    // An explicitly configured root wins; otherwise resolve through the
    // cache, downloading on a miss.
    let go_root = match config.go_root() {
        Some(root) => root,
        None => {
            let cache = SdkCache::new(config.store_root());
            cache.resolve(&config.sdk_descriptor(), &config.resolve_options())?
        }
    };

    let workspace_folders = if config.deps.scan {
        let context = config.project_context();
        let found = workspace::scan_workspace_artifacts(
            &context,
            command.phase,
            config.deps.include_test_scope,
        )?;
        if found.is_empty() {
            tracing::debug!("no workspace dependencies found");
            Vec::new()
        } else {
            tracing::debug!("found workspace dependencies: {:?}", found);
            workspace::unpack_workspace_artifacts(&found, &config.deps_temp_root())?
        }
    } else {
        tracing::info!("dependency scanning is off");
        Vec::new()
    };

    let sources = config.sources_dir();
    if !sources.is_dir() {
        return Err(ToolError::Config(format!(
            "can't find project sources: {}",
            sources.display()
        )));
    }
    tracing::debug!("project sources folder: {}", sources.display());

    let executable = resolve_executable(config, &go_root);
    let invocation = CommandInvocation::new(executable, &command.verb)
        .command_flags(command.command_flags.clone())
        .build_flags(config.run.build_flags.clone())
        .tail_args(command.tail_args.clone())
        .extra_tail_args(command.extra_tail_args.clone());

    let environment = EnvironmentAssembler::new(go_root, config.go_path())
        .workspace_folders(workspace_folders)
        .target_os(config.target_os())
        .target_arch(config.target_arch())
        .go_root_bootstrap(config.go_root_bootstrap())
        .explicit_vars(config.run.env.clone());

    let runner = Runner {
        working_dir: sources,
        ignore_error_exit_code: command.ignore_error_exit_code,
    };
    runner.execute(&invocation, &environment, policy)
}

/// Path of the tool binary inside the resolved toolchain root.
fn resolve_executable(config: &Config, go_root: &Path) -> PathBuf {
    match &config.run.use_go_tool {
        Some(tool) => go_root.join(tool),
        None => go_root.join("bin").join(adapt_exec_name("go")),
    }
}

/// Append the platform executable suffix.
fn adapt_exec_name(name: &str) -> String {
    if cfg!(windows) {
        format!("{}.exe", name)
    } else {
        name.to_string()
    }
}
