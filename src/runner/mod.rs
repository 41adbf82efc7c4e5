//! Environment assembly and subprocess invocation.

pub mod env;
pub mod exec;

pub use env::EnvironmentAssembler;
pub use exec::{ExecOutcome, RetryPolicy, Runner, SingleAttempt, MAX_RETRY_ITERATIONS};
