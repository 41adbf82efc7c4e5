//! Core data model.

pub mod dependency;
pub mod descriptor;
pub mod invocation;

pub use dependency::{BuildPhase, Coordinates, DependencyArtifact, ProjectContext, Scope};
pub use descriptor::SdkDescriptor;
pub use invocation::CommandInvocation;
