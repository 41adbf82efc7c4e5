//! Execution environment assembly.
//!
//! The spawned tool inherits the full ambient process environment; what gets
//! assembled here is the override set layered on top. Precedence, highest
//! first: explicit per-key configuration, computed values (GOROOT, GOPATH,
//! GOOS, GOARCH, GOROOT_BOOTSTRAP), inherited variables.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::{Result, ToolError};
use crate::util::fs as fs_util;
use crate::util::merge_paths;

/// Assembles the environment override set for one tool invocation.
///
/// The set is recomputed fresh for every invocation attempt.
#[derive(Debug, Clone)]
pub struct EnvironmentAssembler {
    go_root: PathBuf,
    go_path: PathBuf,
    workspace_folders: Vec<PathBuf>,
    target_os: Option<String>,
    target_arch: Option<String>,
    go_root_bootstrap: Option<PathBuf>,
    explicit: BTreeMap<String, String>,
}

impl EnvironmentAssembler {
    /// Create an assembler for the resolved toolchain root and GOPATH
    /// folder.
    pub fn new(go_root: impl Into<PathBuf>, go_path: impl Into<PathBuf>) -> Self {
        EnvironmentAssembler {
            go_root: go_root.into(),
            go_path: go_path.into(),
            workspace_folders: Vec::new(),
            target_os: None,
            target_arch: None,
            go_root_bootstrap: None,
            explicit: BTreeMap::new(),
        }
    }

    /// Unpacked workspace folders prepended to GOPATH.
    pub fn workspace_folders(mut self, folders: Vec<PathBuf>) -> Self {
        self.workspace_folders = folders;
        self
    }

    /// Cross-compilation target OS exported as GOOS.
    pub fn target_os(mut self, os: Option<String>) -> Self {
        self.target_os = os;
        self
    }

    /// Cross-compilation target architecture exported as GOARCH.
    pub fn target_arch(mut self, arch: Option<String>) -> Self {
        self.target_arch = arch;
        self
    }

    /// Bootstrap toolchain root exported as GOROOT_BOOTSTRAP.
    pub fn go_root_bootstrap(mut self, root: Option<PathBuf>) -> Self {
        self.go_root_bootstrap = root;
        self
    }

    /// Explicit variables; every key here wins outright.
    pub fn explicit_vars(mut self, vars: BTreeMap<String, String>) -> Self {
        self.explicit = vars;
        self
    }

    /// Compute the override set. The GOPATH folder is created when missing;
    /// a configured bootstrap root must already exist.
    pub fn assemble(&self) -> Result<Vec<(String, String)>> {
        let mut vars: Vec<(String, String)> = Vec::new();

        let go_root = fs_util::normalize_path(&self.go_root);
        set(&mut vars, "GOROOT", go_root.to_string_lossy());

        fs_util::ensure_dir(&self.go_path)?;
        let go_path_value = merge_paths(
            self.workspace_folders
                .iter()
                .chain(std::iter::once(&self.go_path)),
        );
        set(&mut vars, "GOPATH", go_path_value);

        if let Some(os) = &self.target_os {
            set(&mut vars, "GOOS", os);
        }
        if let Some(arch) = &self.target_arch {
            set(&mut vars, "GOARCH", arch);
        }

        if let Some(bootstrap) = &self.go_root_bootstrap {
            if !bootstrap.is_dir() {
                return Err(ToolError::Config(format!(
                    "can't find folder for GOROOT_BOOTSTRAP: {}",
                    bootstrap.display()
                )));
            }
            set(
                &mut vars,
                "GOROOT_BOOTSTRAP",
                fs_util::normalize_path(bootstrap).to_string_lossy(),
            );
        }

        for (key, value) in &self.explicit {
            set(&mut vars, key, value);
        }

        Ok(vars)
    }
}

fn set(vars: &mut Vec<(String, String)>, key: &str, value: impl Into<String>) {
    let value = value.into();
    tracing::debug!(" ${} = {}", key, value);
    if let Some(existing) = vars.iter_mut().find(|(k, _)| k == key) {
        existing.1 = value;
    } else {
        vars.push((key.to_string(), value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    use crate::util::paths::PATH_LIST_SEPARATOR;

    fn lookup<'a>(vars: &'a [(String, String)], key: &str) -> Option<&'a str> {
        vars.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_computed_values_present() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("sdk");
        std::fs::create_dir_all(&root).unwrap();

        let assembler = EnvironmentAssembler::new(&root, tmp.path().join("gopath"));
        let vars = assembler.assemble().unwrap();

        assert!(lookup(&vars, "GOROOT").is_some());
        assert!(lookup(&vars, "GOPATH").is_some());
        assert!(lookup(&vars, "GOOS").is_none());
        // GOPATH folder was created on demand.
        assert!(tmp.path().join("gopath").is_dir());
    }

    #[test]
    fn test_explicit_wins_over_computed() {
        let tmp = TempDir::new().unwrap();
        let mut explicit = BTreeMap::new();
        explicit.insert("GOROOT".to_string(), "/x".to_string());

        let assembler = EnvironmentAssembler::new("/y", tmp.path().join("gopath"))
            .explicit_vars(explicit);
        let vars = assembler.assemble().unwrap();

        assert_eq!(lookup(&vars, "GOROOT"), Some("/x"));
        // No duplicate GOROOT entries linger.
        assert_eq!(vars.iter().filter(|(k, _)| k == "GOROOT").count(), 1);
    }

    #[test]
    fn test_workspace_folders_prepend_gopath() {
        let tmp = TempDir::new().unwrap();
        let gopath = tmp.path().join("gopath");

        let assembler = EnvironmentAssembler::new("/sdk", &gopath).workspace_folders(vec![
            PathBuf::from("/deps/a"),
            PathBuf::from("/deps/b"),
        ]);
        let vars = assembler.assemble().unwrap();

        let expected = format!(
            "/deps/a{sep}/deps/b{sep}{}",
            gopath.display(),
            sep = PATH_LIST_SEPARATOR
        );
        assert_eq!(lookup(&vars, "GOPATH"), Some(expected.as_str()));
    }

    #[test]
    fn test_target_os_and_arch_exported() {
        let tmp = TempDir::new().unwrap();
        let assembler = EnvironmentAssembler::new("/sdk", tmp.path().join("gopath"))
            .target_os(Some("windows".to_string()))
            .target_arch(Some("386".to_string()));
        let vars = assembler.assemble().unwrap();

        assert_eq!(lookup(&vars, "GOOS"), Some("windows"));
        assert_eq!(lookup(&vars, "GOARCH"), Some("386"));
    }

    #[test]
    fn test_missing_bootstrap_root_is_config_error() {
        let tmp = TempDir::new().unwrap();
        let assembler = EnvironmentAssembler::new("/sdk", tmp.path().join("gopath"))
            .go_root_bootstrap(Some(tmp.path().join("absent")));

        let err = assembler.assemble().unwrap_err();
        assert!(matches!(err, ToolError::Config(_)));
    }
}
