//! Workspace dependency archives.
//!
//! Builds can depend on archives produced by goforge itself; those carry a
//! marker entry inside the archive and optionally a folder-list manifest.
//! Recognized archives are unpacked under a per-artifact folder and the
//! resulting folders are merged into GOPATH as an extra search-path
//! fragment.

pub mod scanner;
pub mod unpack;

/// Entry marking an archive as a goforge workspace artifact. Plain zip
/// dependencies without it are never treated as workspace content.
pub const WORKSPACE_MARKER_ENTRY: &str = ".goforge";

/// Entry listing the build folders packed into a workspace artifact, one
/// folder name per line.
pub const BUILD_FOLDERS_ENTRY: &str = ".goforge-folders";

pub use scanner::scan_workspace_artifacts;
pub use unpack::unpack_workspace_artifacts;
