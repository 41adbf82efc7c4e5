//! Dependency artifacts and project context chains.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Group/name/version coordinates of a dependency artifact.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Coordinates {
    pub group: String,
    pub name: String,
    pub version: String,
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)
    }
}

/// Dependency scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    #[default]
    Compile,
    Runtime,
    Provided,
    Test,
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compile" => Ok(Scope::Compile),
            "runtime" => Ok(Scope::Runtime),
            "provided" => Ok(Scope::Provided),
            "test" => Ok(Scope::Test),
            _ => Err(format!("unknown dependency scope '{}'", s)),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Scope::Compile => "compile",
            Scope::Runtime => "runtime",
            Scope::Provided => "provided",
            Scope::Test => "test",
        };
        f.write_str(text)
    }
}

/// One resolved dependency artifact.
#[derive(Debug, Clone)]
pub struct DependencyArtifact {
    pub coords: Coordinates,
    /// Packaging kind, e.g. `zip` or `jar`.
    pub kind: String,
    pub scope: Scope,
    /// Resolved local file.
    pub file: PathBuf,
}

/// Build phase the tool is running in; test-scoped dependencies are only
/// visible during [`BuildPhase::Test`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildPhase {
    Main,
    Test,
}

/// A project context with its resolved dependency artifacts and an optional
/// parent context (aggregator builds contribute dependencies to their
/// modules).
#[derive(Debug, Clone, Default)]
pub struct ProjectContext {
    artifacts: Vec<DependencyArtifact>,
    parent: Option<Box<ProjectContext>>,
}

impl ProjectContext {
    /// Create a context from its resolved dependency artifacts.
    pub fn new(artifacts: Vec<DependencyArtifact>) -> Self {
        ProjectContext {
            artifacts,
            parent: None,
        }
    }

    /// Attach a parent context.
    pub fn with_parent(mut self, parent: ProjectContext) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    /// This context's own dependency artifacts.
    pub fn artifacts(&self) -> &[DependencyArtifact] {
        &self.artifacts
    }

    /// Iterate this context and every ancestor, nearest first.
    pub fn chain(&self) -> impl Iterator<Item = &ProjectContext> {
        std::iter::successors(Some(self), |ctx| ctx.parent.as_deref())
    }
}
