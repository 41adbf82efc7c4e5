//! SDK distribution descriptors.
//!
//! A descriptor pins a Go SDK distribution by version, OS and architecture.
//! The canonical base name follows the upstream naming scheme
//! `go<version>.<os>-<arch>[-<osxversion>]`, all lower-cased, e.g.
//! `go1.6.linux-amd64` or `go1.6.darwin-amd64-osx10.6`.

use std::env::consts;

/// Identifies one Go SDK distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkDescriptor {
    /// SDK version, e.g. `1.6` or `1.7.4`.
    pub version: String,

    /// Distribution OS; host-detected when unset.
    pub os: Option<String>,

    /// Distribution architecture; host-detected when unset.
    pub arch: Option<String>,

    /// OSX sub-version used in darwin distribution names.
    pub osx_version: Option<String>,
}

impl SdkDescriptor {
    /// Create a descriptor for the given version with host-detected OS and
    /// architecture.
    pub fn new(version: impl Into<String>) -> Self {
        SdkDescriptor {
            version: version.into(),
            os: None,
            arch: None,
            osx_version: None,
        }
    }

    /// Distribution OS, host-detected when not set explicitly.
    pub fn effective_os(&self) -> String {
        self.os
            .clone()
            .unwrap_or_else(|| detect_os().to_string())
    }

    /// Distribution architecture, host-detected when not set explicitly.
    pub fn effective_arch(&self) -> String {
        self.arch
            .clone()
            .unwrap_or_else(|| detect_arch().to_string())
    }

    /// OSX sub-version participating in the name. Only darwin distributions
    /// carry one; a macOS host defaults it to `osx10.6`.
    pub fn effective_osx_version(&self) -> Option<String> {
        if self.effective_os() != "darwin" {
            return None;
        }
        self.osx_version.clone().or_else(|| {
            if cfg!(target_os = "macos") {
                Some("osx10.6".to_string())
            } else {
                None
            }
        })
    }

    /// Canonical, deterministic identifier for the distribution.
    pub fn base_name(&self) -> String {
        let variant = self
            .effective_osx_version()
            .map(|v| format!("-{}", v.to_lowercase()))
            .unwrap_or_default();

        format!(
            "go{}.{}-{}{}",
            self.version.to_lowercase(),
            self.effective_os().to_lowercase(),
            self.effective_arch().to_lowercase(),
            variant
        )
    }
}

fn detect_os() -> &'static str {
    match consts::OS {
        "windows" => "windows",
        "linux" => "linux",
        "freebsd" => "freebsd",
        _ => "darwin",
    }
}

fn detect_arch() -> &'static str {
    match consts::ARCH {
        "x86" => "386",
        arch if arch.starts_with("arm") => "arm",
        _ => "amd64",
    }
}
