//! goforge - A Cargo-like build helper for Go projects
//!
//! This crate provides the core library functionality for goforge:
//! resolving and caching versioned Go SDK distributions, merging workspace
//! dependency archives into the GOPATH search path, and invoking the `go`
//! tool as a subprocess with a bounded retry loop.

pub mod archive;
pub mod core;
pub mod error;
pub mod ops;
pub mod runner;
pub mod sdk;
pub mod util;
pub mod workspace;

pub use crate::core::{
    BuildPhase, CommandInvocation, Coordinates, DependencyArtifact, ProjectContext, Scope,
    SdkDescriptor,
};
pub use crate::error::ToolError;
pub use crate::runner::{ExecOutcome, RetryPolicy, Runner, SingleAttempt};
pub use crate::sdk::{ResolveOptions, SdkCache};
pub use crate::util::Config;
