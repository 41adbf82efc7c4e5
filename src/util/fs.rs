//! Filesystem utilities.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.is_dir() {
        fs::create_dir_all(path).map_err(|e| {
            io::Error::new(
                e.kind(),
                format!("can't create folder {}: {}", path.display(), e),
            )
        })?;
    }
    Ok(())
}

/// Best-effort removal of a directory tree.
///
/// Cleanup failures are logged but never allowed to mask the error that
/// triggered the cleanup.
pub fn remove_dir_quietly(path: &Path) {
    if path.exists() {
        if let Err(e) = fs::remove_dir_all(path) {
            tracing::warn!("can't delete folder {}: {}", path.display(), e);
        }
    }
}

/// Best-effort removal of a single file.
pub fn remove_file_quietly(path: &Path) {
    if path.is_file() {
        if let Err(e) = fs::remove_file(path) {
            tracing::warn!("can't delete file {}: {}", path.display(), e);
        }
    }
}

/// Canonicalize a path, falling back to the path as given when the walk
/// fails (e.g. the path does not exist yet).
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
