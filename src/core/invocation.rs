//! Command invocation values.

use std::path::{Path, PathBuf};

/// One fully assembled tool invocation.
///
/// Immutable once built; the same invocation may be executed several times
/// across retry attempts. Argument order on the command line is fixed:
/// verb, command flags, build flags, tail arguments, extra tail arguments.
#[derive(Debug, Clone)]
pub struct CommandInvocation {
    executable: PathBuf,
    verb: String,
    command_flags: Vec<String>,
    build_flags: Vec<String>,
    tail_args: Vec<String>,
    extra_tail_args: Vec<String>,
}

impl CommandInvocation {
    /// Create an invocation of `executable` with the given command verb.
    pub fn new(executable: impl Into<PathBuf>, verb: impl Into<String>) -> Self {
        CommandInvocation {
            executable: executable.into(),
            verb: verb.into(),
            command_flags: Vec::new(),
            build_flags: Vec::new(),
            tail_args: Vec::new(),
            extra_tail_args: Vec::new(),
        }
    }

    /// Set the command-specific flags.
    pub fn command_flags(mut self, flags: Vec<String>) -> Self {
        self.command_flags = flags;
        self
    }

    /// Set the shared build flags.
    pub fn build_flags(mut self, flags: Vec<String>) -> Self {
        self.build_flags = flags;
        self
    }

    /// Set the tail arguments (usually package selectors).
    pub fn tail_args(mut self, args: Vec<String>) -> Self {
        self.tail_args = args;
        self
    }

    /// Set the optional extra tail arguments appended last.
    pub fn extra_tail_args(mut self, args: Vec<String>) -> Self {
        self.extra_tail_args = args;
        self
    }

    /// The resolved executable.
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// The command verb.
    pub fn verb(&self) -> &str {
        &self.verb
    }

    /// Everything after the executable, in command-line order.
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(
            1 + self.command_flags.len()
                + self.build_flags.len()
                + self.tail_args.len()
                + self.extra_tail_args.len(),
        );
        args.push(self.verb.clone());
        args.extend(self.command_flags.iter().cloned());
        args.extend(self.build_flags.iter().cloned());
        args.extend(self.tail_args.iter().cloned());
        args.extend(self.extra_tail_args.iter().cloned());
        args
    }

    /// Display the full command line for log messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.executable.display().to_string()];
        parts.extend(self.args());
        parts.join(" ")
    }
}
