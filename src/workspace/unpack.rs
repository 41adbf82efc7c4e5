//! Unpack workspace artifacts into per-artifact folders.

use std::path::{Path, PathBuf};

use crate::archive;
use crate::error::{Result, ToolError};
use crate::util::fs as fs_util;
use crate::workspace::BUILD_FOLDERS_ENTRY;

/// Unpack each archive into `temp_root/<archive_stem>/`, skipping folders
/// that already exist. Returns the folders in input order; these become the
/// extra GOPATH fragment.
///
/// Archives carrying the build-folders manifest get a source-only unpack:
/// the listed folders are flattened into `<archive_stem>/src/` with their
/// prefixes stripped. Everything else is unpacked whole.
pub fn unpack_workspace_artifacts<'a, I>(archives: I, temp_root: &Path) -> Result<Vec<PathBuf>>
where
    I: IntoIterator<Item = &'a PathBuf>,
{
    fs_util::ensure_dir(temp_root)?;

    let mut folders = Vec::new();
    for archive_path in archives {
        let stem = archive_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| {
                ToolError::Config(format!(
                    "dependency archive without a file name: {}",
                    archive_path.display()
                ))
            })?;

        let out_dir = temp_root.join(stem);
        if out_dir.is_dir() {
            tracing::debug!("dependency already unpacked: {}", out_dir.display());
            folders.push(out_dir);
            continue;
        }

        tracing::debug!("unpacking dependency archive: {}", archive_path.display());
        match read_build_folders(archive_path)? {
            Some(listed) => {
                let src_dir = out_dir.join("src");
                archive::unpack_listed_folders(archive_path, &listed, &src_dir)?;
            }
            None => {
                archive::unpack_all(archive_path, &out_dir)?;
            }
        }
        folders.push(out_dir);
    }

    Ok(folders)
}

fn read_build_folders(archive_path: &Path) -> Result<Option<Vec<String>>> {
    let Some(raw) = archive::read_entry(archive_path, BUILD_FOLDERS_ENTRY)? else {
        return Ok(None);
    };
    let text = String::from_utf8_lossy(&raw);
    let folders = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    Ok(Some(folders))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    use crate::workspace::WORKSPACE_MARKER_ENTRY;

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::FileOptions::default();
        for (name, content) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn test_whole_unpack_without_manifest() {
        let tmp = TempDir::new().unwrap();
        let artifact = tmp.path().join("dep-1.0.zip");
        write_zip(
            &artifact,
            &[(WORKSPACE_MARKER_ENTRY, ""), ("src/pkg/a.go", "package pkg")],
        );

        let temp_root = tmp.path().join("deps");
        let folders =
            unpack_workspace_artifacts([&artifact], &temp_root)
                .unwrap();

        assert_eq!(folders, vec![temp_root.join("dep-1.0")]);
        assert!(temp_root.join("dep-1.0/src/pkg/a.go").is_file());
    }

    #[test]
    fn test_manifest_driven_source_only_unpack() {
        let tmp = TempDir::new().unwrap();
        let artifact = tmp.path().join("dep-2.0.zip");
        write_zip(
            &artifact,
            &[
                (WORKSPACE_MARKER_ENTRY, ""),
                (BUILD_FOLDERS_ENTRY, "foo\nbar\n\n"),
                ("foo/a.go", "package a"),
                ("bar/sub/b.go", "package b"),
                ("docs/readme.txt", "ignored"),
            ],
        );

        let temp_root = tmp.path().join("deps");
        let folders =
            unpack_workspace_artifacts([&artifact], &temp_root)
                .unwrap();

        let out = temp_root.join("dep-2.0");
        assert_eq!(folders, vec![out.clone()]);
        // Both listed folders are flattened under src/ with prefixes stripped.
        assert!(out.join("src/a.go").is_file());
        assert!(out.join("src/sub/b.go").is_file());
        assert!(!out.join("src/docs").exists());
        assert!(!out.join("src/readme.txt").exists());
    }

    #[test]
    fn test_existing_folder_is_not_reextracted() {
        let tmp = TempDir::new().unwrap();
        let artifact = tmp.path().join("dep-3.0.zip");
        write_zip(&artifact, &[("src/a.go", "package a")]);

        let temp_root = tmp.path().join("deps");
        let existing = temp_root.join("dep-3.0");
        fs::create_dir_all(&existing).unwrap();
        fs::write(existing.join("sentinel"), "untouched").unwrap();

        let folders =
            unpack_workspace_artifacts([&artifact], &temp_root)
                .unwrap();

        assert_eq!(folders, vec![existing.clone()]);
        assert!(existing.join("sentinel").is_file());
        assert!(!existing.join("src").exists());
    }

    #[test]
    fn test_manifest_with_no_matching_entries_fails() {
        let tmp = TempDir::new().unwrap();
        let artifact = tmp.path().join("dep-4.0.zip");
        write_zip(
            &artifact,
            &[(BUILD_FOLDERS_ENTRY, "renamed"), ("old/a.go", "package a")],
        );

        let temp_root = tmp.path().join("deps");
        let err =
            unpack_workspace_artifacts([&artifact], &temp_root)
                .unwrap_err();
        assert!(matches!(err, ToolError::EmptyUnpack { .. }));
    }
}
