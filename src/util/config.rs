//! Configuration file support for goforge.
//!
//! Configuration comes from three layers, highest precedence first:
//!
//! 1. CLI flags (merged in as an overlay by the binary)
//! 2. Project file `goforge.toml`
//! 3. Built-in defaults
//!
//! Environment variables (`GOROOT`, `GOROOT_BOOTSTRAP`, `GOPATH`, `GOOS`,
//! `GOARCH`) fill in values that are still unset, unless
//! `dont_use_env_vars` is set. That switch only affects configuration
//! lookup; the spawned tool always inherits the ambient process
//! environment.

use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::{Coordinates, DependencyArtifact, ProjectContext, Scope, SdkDescriptor};
use crate::error::{Result, ToolError};
use crate::sdk::cache::ResolveOptions;

/// Project configuration file name.
pub const CONFIG_FILE_NAME: &str = "goforge.toml";

/// goforge configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SDK resolution settings
    pub sdk: SdkConfig,

    /// Tool invocation settings
    pub run: RunConfig,

    /// Workspace dependency settings
    pub deps: DepsConfig,
}

/// SDK resolution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkConfig {
    /// Go SDK version; only consulted when `go_root` is undefined.
    pub go_version: String,

    /// Explicit toolchain root; set it to skip SDK resolution entirely.
    pub go_root: Option<PathBuf>,

    /// Bootstrap toolchain root, exported as GOROOT_BOOTSTRAP.
    pub go_root_bootstrap: Option<PathBuf>,

    /// Folder keeping downloaded archives and unpacked SDKs.
    pub store_root: Option<PathBuf>,

    /// Overrides for distribution name synthesis; host-detected when unset.
    pub os: Option<String>,
    pub arch: Option<String>,
    pub osx_version: Option<String>,

    /// Directly defined SDK archive name, bypassing listing lookup.
    pub archive_name: Option<String>,

    /// Fail instead of downloading when the SDK is not cached.
    pub disable_fetch: bool,

    /// Keep the downloaded archive after a successful unpack.
    pub keep_archive: bool,

    /// Keep a wrongly unpacked SDK folder for inspection.
    pub keep_unpacked_on_error: bool,
}

impl Default for SdkConfig {
    fn default() -> Self {
        SdkConfig {
            go_version: "1.6".to_string(),
            go_root: None,
            go_root_bootstrap: None,
            store_root: None,
            os: None,
            arch: None,
            osx_version: None,
            archive_name: None,
            disable_fetch: false,
            keep_archive: false,
            keep_unpacked_on_error: false,
        }
    }
}

/// Tool invocation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Go project sources folder, the working directory of the tool.
    pub sources: Option<PathBuf>,

    /// GOPATH folder. A GOPATH environment variable wins over this value
    /// unless `dont_use_env_vars` is set.
    pub go_path: Option<PathBuf>,

    /// Relative path of a tool inside the SDK to call instead of `bin/go`.
    pub use_go_tool: Option<String>,

    /// Cross-compilation target, exported as GOOS / GOARCH.
    pub target_os: Option<String>,
    pub target_arch: Option<String>,

    /// Extra flags inserted between command flags and tail arguments.
    pub build_flags: Vec<String>,

    /// Extra environment variables for the started tool; these win over
    /// every computed value.
    pub env: BTreeMap<String, String>,

    /// Don't consult GOROOT/GOPATH/GOOS/GOARCH/GOROOT_BOOTSTRAP when
    /// resolving configuration values.
    pub dont_use_env_vars: bool,
}

/// Workspace dependency settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DepsConfig {
    /// Scan dependency archives for workspace artifacts.
    pub scan: bool,

    /// Include test-scoped dependencies outside the test phase.
    pub include_test_scope: bool,

    /// Folder where recognized workspace artifacts are unpacked.
    pub temp_root: Option<PathBuf>,

    /// Dependency archives contributed by the surrounding build.
    pub archives: Vec<DepArchive>,
}

impl Default for DepsConfig {
    fn default() -> Self {
        DepsConfig {
            scan: true,
            include_test_scope: false,
            temp_root: None,
            archives: Vec::new(),
        }
    }
}

/// One declared dependency archive: either a bare path or a table carrying
/// a scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DepArchive {
    Plain(PathBuf),
    Detailed {
        path: PathBuf,
        #[serde(default = "default_scope")]
        scope: String,
    },
}

fn default_scope() -> String {
    "compile".to_string()
}

impl DepArchive {
    pub fn path(&self) -> &Path {
        match self {
            DepArchive::Plain(path) => path,
            DepArchive::Detailed { path, .. } => path,
        }
    }

    pub fn scope(&self) -> Scope {
        match self {
            DepArchive::Plain(_) => Scope::Compile,
            DepArchive::Detailed { scope, .. } => {
                scope.parse().unwrap_or(Scope::Compile)
            }
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ToolError::Config(format!(
                "failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&contents).map_err(|e| {
            ToolError::Config(format!(
                "failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Load configuration with fallback to defaults if the file doesn't
    /// exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("failed to load config from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.sdk.go_version != SdkConfig::default().go_version {
            self.sdk.go_version = other.sdk.go_version;
        }
        if other.sdk.go_root.is_some() {
            self.sdk.go_root = other.sdk.go_root;
        }
        if other.sdk.go_root_bootstrap.is_some() {
            self.sdk.go_root_bootstrap = other.sdk.go_root_bootstrap;
        }
        if other.sdk.store_root.is_some() {
            self.sdk.store_root = other.sdk.store_root;
        }
        if other.sdk.os.is_some() {
            self.sdk.os = other.sdk.os;
        }
        if other.sdk.arch.is_some() {
            self.sdk.arch = other.sdk.arch;
        }
        if other.sdk.osx_version.is_some() {
            self.sdk.osx_version = other.sdk.osx_version;
        }
        if other.sdk.archive_name.is_some() {
            self.sdk.archive_name = other.sdk.archive_name;
        }
        if other.sdk.disable_fetch {
            self.sdk.disable_fetch = true;
        }
        if other.sdk.keep_archive {
            self.sdk.keep_archive = true;
        }
        if other.sdk.keep_unpacked_on_error {
            self.sdk.keep_unpacked_on_error = true;
        }

        if other.run.sources.is_some() {
            self.run.sources = other.run.sources;
        }
        if other.run.go_path.is_some() {
            self.run.go_path = other.run.go_path;
        }
        if other.run.use_go_tool.is_some() {
            self.run.use_go_tool = other.run.use_go_tool;
        }
        if other.run.target_os.is_some() {
            self.run.target_os = other.run.target_os;
        }
        if other.run.target_arch.is_some() {
            self.run.target_arch = other.run.target_arch;
        }
        if !other.run.build_flags.is_empty() {
            self.run.build_flags = other.run.build_flags;
        }
        if !other.run.env.is_empty() {
            self.run.env.extend(other.run.env);
        }
        if other.run.dont_use_env_vars {
            self.run.dont_use_env_vars = true;
        }

        if !other.deps.scan {
            self.deps.scan = false;
        }
        if other.deps.include_test_scope {
            self.deps.include_test_scope = true;
        }
        if other.deps.temp_root.is_some() {
            self.deps.temp_root = other.deps.temp_root;
        }
        if !other.deps.archives.is_empty() {
            self.deps.archives = other.deps.archives;
        }
    }

    fn env_lookup(&self, key: &str) -> Option<String> {
        if self.run.dont_use_env_vars {
            return None;
        }
        env::var(key).ok().filter(|value| !value.is_empty())
    }

    /// Explicit toolchain root, falling back to the GOROOT environment
    /// variable.
    pub fn go_root(&self) -> Option<PathBuf> {
        self.sdk
            .go_root
            .clone()
            .or_else(|| self.env_lookup("GOROOT").map(PathBuf::from))
    }

    /// Bootstrap toolchain root, falling back to GOROOT_BOOTSTRAP.
    pub fn go_root_bootstrap(&self) -> Option<PathBuf> {
        self.sdk
            .go_root_bootstrap
            .clone()
            .or_else(|| self.env_lookup("GOROOT_BOOTSTRAP").map(PathBuf::from))
    }

    /// GOPATH folder. The GOPATH environment variable wins over the
    /// configured value; the default lives under the store root.
    pub fn go_path(&self) -> PathBuf {
        if let Some(found) = self.env_lookup("GOPATH") {
            return PathBuf::from(found);
        }
        self.run
            .go_path
            .clone()
            .unwrap_or_else(|| self.store_root().join(".go_path"))
    }

    /// Cross-compilation target OS, falling back to GOOS.
    pub fn target_os(&self) -> Option<String> {
        self.run
            .target_os
            .clone()
            .or_else(|| self.env_lookup("GOOS"))
    }

    /// Cross-compilation target architecture, falling back to GOARCH.
    pub fn target_arch(&self) -> Option<String> {
        self.run
            .target_arch
            .clone()
            .or_else(|| self.env_lookup("GOARCH"))
    }

    /// Folder keeping downloaded archives and unpacked SDKs
    /// (`~/.goforge` by default).
    pub fn store_root(&self) -> PathBuf {
        if let Some(root) = &self.sdk.store_root {
            return root.clone();
        }
        directories::BaseDirs::new()
            .map(|b| b.home_dir().join(".goforge"))
            .unwrap_or_else(|| PathBuf::from(".goforge"))
    }

    /// Go project sources folder (`src/golang` by default).
    pub fn sources_dir(&self) -> PathBuf {
        self.run
            .sources
            .clone()
            .unwrap_or_else(|| PathBuf::from("src").join("golang"))
    }

    /// Folder where workspace artifacts are unpacked
    /// (`target/.deps` by default).
    pub fn deps_temp_root(&self) -> PathBuf {
        self.deps
            .temp_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("target").join(".deps"))
    }

    /// Distribution descriptor for the configured SDK.
    pub fn sdk_descriptor(&self) -> SdkDescriptor {
        SdkDescriptor {
            version: self.sdk.go_version.clone(),
            os: self.sdk.os.clone(),
            arch: self.sdk.arch.clone(),
            osx_version: self.sdk.osx_version.clone(),
        }
    }

    /// Cache resolution options for the configured SDK.
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            disable_fetch: self.sdk.disable_fetch,
            keep_archive: self.sdk.keep_archive,
            keep_unpacked_on_error: self.sdk.keep_unpacked_on_error,
            archive_name: self.sdk.archive_name.clone(),
        }
    }

    /// Project context built from the declared dependency archives.
    ///
    /// Archives declared by bare path get placeholder coordinates derived
    /// from the file name; coordinates only matter for log messages.
    pub fn project_context(&self) -> ProjectContext {
        let artifacts = self
            .deps
            .archives
            .iter()
            .map(|dep| {
                let path = dep.path();
                let stem = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "unknown".to_string());
                DependencyArtifact {
                    coords: Coordinates {
                        group: "project".to_string(),
                        name: stem,
                        version: "0".to_string(),
                    },
                    kind: "zip".to_string(),
                    scope: dep.scope(),
                    file: path.to_path_buf(),
                }
            })
            .collect();
        ProjectContext::new(artifacts)
    }
}
