//! Tool invocation loop.
//!
//! One invocation runs PREPARE -> EXECUTE -> EVALUATE: the executable is
//! validated, the subprocess runs to completion with captured output, then a
//! caller-supplied retry policy decides whether another attempt is needed.
//! Output buffers and the environment override set are rebuilt fresh for
//! every attempt; nothing accumulates across retries.

use std::path::PathBuf;

use crate::core::CommandInvocation;
use crate::error::{Result, ToolError};
use crate::runner::env::EnvironmentAssembler;
use crate::util::ProcessBuilder;

/// Retries past this count are treated as a policy defect.
pub const MAX_RETRY_ITERATIONS: u32 = 10;

/// Captured result of one finished attempt.
#[derive(Debug, Clone)]
pub struct ExecOutcome {
    /// Exit code; `None` when the process died to an external signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ExecOutcome {
    /// Whether the process finished with exit code zero.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Whether the process was stopped externally before producing an exit
    /// code.
    pub fn interrupted(&self) -> bool {
        self.exit_code.is_none()
    }
}

/// Decides, after a finished attempt, whether another one should be made.
pub trait RetryPolicy {
    /// Default: never retry.
    fn needs_another_attempt(&self, outcome: &ExecOutcome) -> Result<bool> {
        let _ = outcome;
        Ok(false)
    }
}

/// The default single-attempt policy.
pub struct SingleAttempt;

impl RetryPolicy for SingleAttempt {}

/// Executes tool invocations in a working directory.
#[derive(Debug, Clone)]
pub struct Runner {
    /// Working directory of the spawned tool.
    pub working_dir: PathBuf,

    /// Tolerate non-zero exit codes instead of failing.
    pub ignore_error_exit_code: bool,
}

impl Runner {
    /// Run `invocation` under the retry loop.
    ///
    /// A process stopped by an external signal ends the loop without an
    /// error and without further attempts. Exceeding
    /// [`MAX_RETRY_ITERATIONS`] retries is fatal regardless of
    /// `ignore_error_exit_code`.
    pub fn execute(
        &self,
        invocation: &CommandInvocation,
        environment: &EnvironmentAssembler,
        policy: &dyn RetryPolicy,
    ) -> Result<ExecOutcome> {
        let executable = invocation.executable();
        if !executable.is_file() {
            return Err(ToolError::MissingExecutable(executable.to_path_buf()));
        }
        tracing::debug!("command line: {}", invocation.display_command());

        let mut iterations: u32 = 0;
        loop {
            let vars = environment.assemble()?;
            let output = ProcessBuilder::new(executable)
                .args(invocation.args())
                .cwd(&self.working_dir)
                .envs(vars)
                .exec()?;
            iterations += 1;

            let outcome = ExecOutcome {
                exit_code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            };

            if !outcome.stdout.is_empty() {
                tracing::debug!("tool output:\n{}", outcome.stdout);
            }
            if !outcome.stderr.is_empty() {
                tracing::error!("tool error output:\n{}", outcome.stderr);
            }

            if outcome.interrupted() {
                tracing::warn!("tool process was interrupted");
                return Ok(outcome);
            }

            if policy.needs_another_attempt(&outcome)? {
                if iterations > MAX_RETRY_ITERATIONS {
                    return Err(ToolError::TooManyIterations(iterations));
                }
                tracing::warn!("making one more attempt...");
                continue;
            }

            return match outcome.exit_code {
                Some(0) | None => Ok(outcome),
                Some(code) if self.ignore_error_exit_code => {
                    tracing::warn!("ignoring process exit code {}", code);
                    Ok(outcome)
                }
                Some(code) => Err(ToolError::ExitCode { code }),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tempfile::TempDir;

    fn assembler(tmp: &TempDir) -> EnvironmentAssembler {
        EnvironmentAssembler::new(tmp.path(), tmp.path().join("gopath"))
    }

    #[cfg(unix)]
    fn fake_tool(tmp: &TempDir, script_body: &str) -> std::path::PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = tmp.path().join("tool.sh");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", script_body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_missing_executable_fails_before_spawn() {
        let tmp = TempDir::new().unwrap();
        let invocation = CommandInvocation::new(tmp.path().join("absent"), "build");
        let runner = Runner {
            working_dir: tmp.path().to_path_buf(),
            ignore_error_exit_code: false,
        };

        let err = runner
            .execute(&invocation, &assembler(&tmp), &SingleAttempt)
            .unwrap_err();
        assert!(matches!(err, ToolError::MissingExecutable(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_run_captures_stdout() {
        let tmp = TempDir::new().unwrap();
        let tool = fake_tool(&tmp, "echo ok: $1");
        let invocation = CommandInvocation::new(&tool, "version");
        let runner = Runner {
            working_dir: tmp.path().to_path_buf(),
            ignore_error_exit_code: false,
        };

        let outcome = runner
            .execute(&invocation, &assembler(&tmp), &SingleAttempt)
            .unwrap();
        assert!(outcome.success());
        assert_eq!(outcome.stdout.trim(), "ok: version");
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_failure_unless_ignored() {
        let tmp = TempDir::new().unwrap();
        let tool = fake_tool(&tmp, "exit 3");
        let invocation = CommandInvocation::new(&tool, "build");

        let strict = Runner {
            working_dir: tmp.path().to_path_buf(),
            ignore_error_exit_code: false,
        };
        let err = strict
            .execute(&invocation, &assembler(&tmp), &SingleAttempt)
            .unwrap_err();
        assert!(matches!(err, ToolError::ExitCode { code: 3 }));

        let tolerant = Runner {
            working_dir: tmp.path().to_path_buf(),
            ignore_error_exit_code: true,
        };
        let outcome = tolerant
            .execute(&invocation, &assembler(&tmp), &SingleAttempt)
            .unwrap();
        assert_eq!(outcome.exit_code, Some(3));
    }

    #[cfg(unix)]
    #[test]
    fn test_retry_until_policy_is_satisfied() {
        struct RetryTwice {
            seen: AtomicU32,
        }
        impl RetryPolicy for RetryTwice {
            fn needs_another_attempt(&self, _outcome: &ExecOutcome) -> Result<bool> {
                Ok(self.seen.fetch_add(1, Ordering::SeqCst) < 2)
            }
        }

        let tmp = TempDir::new().unwrap();
        let marker = tmp.path().join("attempts");
        let tool = fake_tool(&tmp, &format!("echo x >> {}", marker.display()));
        let invocation = CommandInvocation::new(&tool, "build");
        let runner = Runner {
            working_dir: tmp.path().to_path_buf(),
            ignore_error_exit_code: false,
        };

        let policy = RetryTwice {
            seen: AtomicU32::new(0),
        };
        runner
            .execute(&invocation, &assembler(&tmp), &policy)
            .unwrap();

        let attempts = std::fs::read_to_string(&marker).unwrap().lines().count();
        assert_eq!(attempts, 3);
    }

    #[cfg(unix)]
    #[test]
    fn test_runaway_policy_hits_iteration_cap() {
        struct AlwaysRetry;
        impl RetryPolicy for AlwaysRetry {
            fn needs_another_attempt(&self, _outcome: &ExecOutcome) -> Result<bool> {
                Ok(true)
            }
        }

        let tmp = TempDir::new().unwrap();
        let marker = tmp.path().join("attempts");
        let tool = fake_tool(&tmp, &format!("echo x >> {}", marker.display()));
        let invocation = CommandInvocation::new(&tool, "build");
        let runner = Runner {
            working_dir: tmp.path().to_path_buf(),
            ignore_error_exit_code: false,
        };

        let err = runner
            .execute(&invocation, &assembler(&tmp), &AlwaysRetry)
            .unwrap_err();
        assert!(matches!(err, ToolError::TooManyIterations(11)));

        // The initial attempt plus exactly ten retries, never an eleventh.
        let attempts = std::fs::read_to_string(&marker).unwrap().lines().count();
        assert_eq!(attempts, 11);
    }

    #[cfg(unix)]
    #[test]
    fn test_explicit_env_wins_over_computed_in_child() {
        let tmp = TempDir::new().unwrap();
        let tool = fake_tool(&tmp, "printf %s \"$GOROOT\"");
        let invocation = CommandInvocation::new(&tool, "env");

        // The assembler computes GOROOT=/y; the explicit entry must shadow
        // it all the way into the child process.
        let mut explicit = BTreeMap::new();
        explicit.insert("GOROOT".to_string(), "/x".to_string());
        let environment = EnvironmentAssembler::new("/y", tmp.path().join("gopath"))
            .explicit_vars(explicit);

        let runner = Runner {
            working_dir: tmp.path().to_path_buf(),
            ignore_error_exit_code: false,
        };
        let outcome = runner
            .execute(&invocation, &environment, &SingleAttempt)
            .unwrap();

        assert_eq!(outcome.stdout, "/x");
    }
}
