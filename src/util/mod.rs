//! Shared utilities

pub mod config;
pub mod fs;
pub mod paths;
pub mod process;

pub use config::Config;
pub use paths::merge_paths;
pub use process::ProcessBuilder;
