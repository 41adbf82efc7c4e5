//! Archive unpack engine.
//!
//! Go SDK distributions and workspace artifacts come in two formats,
//! `.tar.gz`/`.tgz` and `.zip`, handled behind one interface. Three unpack
//! modes exist:
//!
//! - whole-archive: every entry is written below the destination;
//! - sub-tree: only entries under a named folder, with the folder prefix
//!   stripped (`go/bin/go` -> `bin/go`);
//! - listed folders: entries under any of several folder prefixes, each
//!   prefix stripped, flattened into a single destination tree.
//!
//! Extracting zero entries is always a hard failure, never a silent no-op:
//! it almost always means a wrong archive or a renamed internal layout.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;

use crate::error::{Result, ToolError};

/// Supported archive formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    TarGz,
    Zip,
}

/// Detect the archive format from the file name.
pub fn detect_kind(path: &Path) -> Result<ArchiveKind> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        Ok(ArchiveKind::TarGz)
    } else if name.ends_with(".zip") {
        Ok(ArchiveKind::Zip)
    } else {
        Err(ToolError::UnsupportedArchive(path.to_path_buf()))
    }
}

/// Unpack every entry of `archive` below `dest`. Returns the number of
/// extracted entries.
pub fn unpack_all(archive: &Path, dest: &Path) -> Result<usize> {
    let count = unpack_mapped(archive, dest, |name| Some(name.to_string()))?;
    if count == 0 {
        return Err(ToolError::EmptyUnpack {
            archive: archive.to_path_buf(),
        });
    }
    Ok(count)
}

/// Unpack only entries under `folder/`, stripping the prefix.
pub fn unpack_subtree(archive: &Path, folder: &str, dest: &Path) -> Result<usize> {
    let prefix = format!("{}/", folder.trim_end_matches('/'));
    let count = unpack_mapped(archive, dest, |name| {
        name.strip_prefix(prefix.as_str())
            .filter(|rest| !rest.is_empty())
            .map(str::to_string)
    })?;
    if count == 0 {
        return Err(ToolError::MissingArchiveFolder {
            archive: archive.to_path_buf(),
            folder: folder.to_string(),
        });
    }
    Ok(count)
}

/// Unpack entries under any of the listed folders, each prefix stripped,
/// flattened into `dest`. Entries outside every listed folder are ignored.
pub fn unpack_listed_folders(archive: &Path, folders: &[String], dest: &Path) -> Result<usize> {
    let prefixes: Vec<String> = folders
        .iter()
        .map(|f| format!("{}/", f.trim_end_matches('/')))
        .collect();

    let count = unpack_mapped(archive, dest, |name| {
        prefixes
            .iter()
            .find_map(|p| name.strip_prefix(p.as_str()))
            .filter(|rest| !rest.is_empty())
            .map(str::to_string)
    })?;
    if count == 0 {
        return Err(ToolError::EmptyUnpack {
            archive: archive.to_path_buf(),
        });
    }
    Ok(count)
}

/// Read one entry fully into memory, or `None` when the archive has no such
/// entry.
pub fn read_entry(archive: &Path, entry: &str) -> Result<Option<Vec<u8>>> {
    match detect_kind(archive)? {
        ArchiveKind::TarGz => {
            let file = File::open(archive)?;
            let mut tar = tar::Archive::new(GzDecoder::new(file));
            for item in tar.entries()? {
                let mut item = item?;
                let name = item.path()?.to_string_lossy().replace('\\', "/");
                if name == entry {
                    let mut buffer = Vec::new();
                    item.read_to_end(&mut buffer)?;
                    return Ok(Some(buffer));
                }
            }
            Ok(None)
        }
        ArchiveKind::Zip => {
            let file = File::open(archive)?;
            let mut zip = zip::ZipArchive::new(file)?;
            let result = match zip.by_name(entry) {
                Ok(mut item) => {
                    let mut buffer = Vec::new();
                    item.read_to_end(&mut buffer)?;
                    Ok(Some(buffer))
                }
                Err(zip::result::ZipError::FileNotFound) => Ok(None),
                Err(e) => Err(e.into()),
            };
            result
        }
    }
}

/// Whether the archive contains the exact entry name.
pub fn contains_entry(archive: &Path, entry: &str) -> Result<bool> {
    Ok(read_entry(archive, entry)?.is_some())
}

fn unpack_mapped<F>(archive: &Path, dest: &Path, map: F) -> Result<usize>
where
    F: Fn(&str) -> Option<String>,
{
    fs::create_dir_all(dest)?;
    match detect_kind(archive)? {
        ArchiveKind::TarGz => unpack_tar(archive, dest, map),
        ArchiveKind::Zip => unpack_zip(archive, dest, map),
    }
}

fn unpack_tar<F>(archive: &Path, dest: &Path, map: F) -> Result<usize>
where
    F: Fn(&str) -> Option<String>,
{
    let file = File::open(archive)?;
    let mut tar = tar::Archive::new(GzDecoder::new(file));
    let mut count = 0usize;

    for entry in tar.entries()? {
        let mut entry = entry?;
        let name = entry.path()?.to_string_lossy().replace('\\', "/");
        let Some(mapped) = map(&name) else {
            continue;
        };
        let output_path = safe_join(dest, &mapped)?;

        let entry_type = entry.header().entry_type();
        match entry_type {
            tar::EntryType::Directory => {
                fs::create_dir_all(&output_path)?;
            }
            tar::EntryType::Regular | tar::EntryType::Continuous | tar::EntryType::Link => {
                if let Some(parent) = output_path.parent() {
                    fs::create_dir_all(parent)?;
                }
                entry.unpack(&output_path)?;
                count += 1;
            }
            tar::EntryType::Symlink => {
                #[cfg(unix)]
                {
                    if let Ok(Some(target)) = entry.link_name() {
                        if let Some(parent) = output_path.parent() {
                            fs::create_dir_all(parent)?;
                        }
                        let _ = fs::remove_file(&output_path);
                        std::os::unix::fs::symlink(target.as_ref(), &output_path)?;
                        count += 1;
                    }
                }
                #[cfg(not(unix))]
                {
                    tracing::debug!("skipping symlink entry: {}", name);
                }
            }
            _ => {
                tracing::debug!("skipping entry type {:?}: {}", entry_type, name);
            }
        }
    }

    Ok(count)
}

fn unpack_zip<F>(archive: &Path, dest: &Path, map: F) -> Result<usize>
where
    F: Fn(&str) -> Option<String>,
{
    let file = File::open(archive)?;
    let mut zip = zip::ZipArchive::new(file)?;
    let mut count = 0usize;

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index)?;
        let name = entry.name().replace('\\', "/");
        let Some(mapped) = map(&name) else {
            continue;
        };
        let output_path = safe_join(dest, &mapped)?;

        if entry.is_dir() {
            fs::create_dir_all(&output_path)?;
            continue;
        }

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut output = File::create(&output_path)?;
        io::copy(&mut entry, &mut output)?;
        count += 1;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                fs::set_permissions(&output_path, fs::Permissions::from_mode(mode))?;
            }
        }
    }

    Ok(count)
}

fn safe_join(dest: &Path, relative: &str) -> Result<PathBuf> {
    let rel = Path::new(relative);
    let escapes = rel.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes {
        return Err(ToolError::UnsafeArchiveEntry {
            entry: relative.to_string(),
        });
    }
    Ok(dest.join(rel))
}
