//! Scan a dependency closure for workspace artifacts.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::archive;
use crate::core::{BuildPhase, ProjectContext, Scope};
use crate::error::{Result, ToolError};
use crate::workspace::WORKSPACE_MARKER_ENTRY;

/// Packaging kind the scanner considers.
const ARCHIVE_KIND: &str = "zip";

/// Walk `context` and every ancestor context for zip dependencies carrying
/// the workspace marker entry, returning their resolved files as a set.
///
/// Test-scoped dependencies are skipped unless the build runs a test phase
/// or `include_test_scope` is set. Duplicate resolved files across different
/// coordinate declarations collapse to one entry.
pub fn scan_workspace_artifacts(
    context: &ProjectContext,
    phase: BuildPhase,
    include_test_scope: bool,
) -> Result<BTreeSet<PathBuf>> {
    let mut found = BTreeSet::new();

    for current in context.chain() {
        for artifact in current.artifacts() {
            if artifact.kind != ARCHIVE_KIND {
                continue;
            }
            if artifact.scope == Scope::Test
                && phase != BuildPhase::Test
                && !include_test_scope
            {
                tracing::debug!("skipping test-scoped dependency: {}", artifact.coords);
                continue;
            }
            if !artifact.file.is_file() {
                return Err(ToolError::Config(format!(
                    "can't resolve dependency artifact {}: missing file {}",
                    artifact.coords,
                    artifact.file.display()
                )));
            }

            if archive::contains_entry(&artifact.file, WORKSPACE_MARKER_ENTRY)? {
                tracing::debug!(
                    "detected workspace marker inside zip dependency: {}",
                    artifact.coords
                );
                found.insert(artifact.file.clone());
            } else {
                tracing::warn!(
                    "zip dependency without a workspace marker entry: {}",
                    artifact.coords
                );
            }
        }
    }

    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::path::Path;
    use tempfile::TempDir;

    use crate::core::{Coordinates, DependencyArtifact};

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

    fn artifact(name: &str, scope: Scope, kind: &str, file: &Path) -> DependencyArtifact {
        DependencyArtifact {
            coords: Coordinates {
                group: "com.example".to_string(),
                name: name.to_string(),
                version: "1.0".to_string(),
            },
            kind: kind.to_string(),
            scope,
            file: file.to_path_buf(),
        }
    }

    #[test]
    fn test_only_marked_zip_dependencies_are_kept() {
        let tmp = TempDir::new().unwrap();
        let marked = tmp.path().join("marked.zip");
        let plain = tmp.path().join("plain.zip");
        write_zip(&marked, &[(WORKSPACE_MARKER_ENTRY, ""), ("src/a.go", "a")]);
        write_zip(&plain, &[("src/b.go", "b")]);

        let context = ProjectContext::new(vec![
            artifact("marked", Scope::Compile, "zip", &marked),
            artifact("plain", Scope::Compile, "zip", &plain),
        ]);

        let found =
            scan_workspace_artifacts(&context, BuildPhase::Main, false).unwrap();
        assert_eq!(found.len(), 1);
        assert!(found.contains(&marked));
    }

    #[test]
    fn test_duplicate_files_collapse() {
        let tmp = TempDir::new().unwrap();
        let shared = tmp.path().join("shared.zip");
        write_zip(&shared, &[(WORKSPACE_MARKER_ENTRY, "")]);

        let context = ProjectContext::new(vec![
            artifact("first", Scope::Compile, "zip", &shared),
            artifact("second", Scope::Compile, "zip", &shared),
        ]);

        let found =
            scan_workspace_artifacts(&context, BuildPhase::Main, false).unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_test_scope_needs_test_phase_or_flag() {
        let tmp = TempDir::new().unwrap();
        let archive_file = tmp.path().join("testdep.zip");
        write_zip(&archive_file, &[(WORKSPACE_MARKER_ENTRY, "")]);

        let context = ProjectContext::new(vec![artifact(
            "testdep",
            Scope::Test,
            "zip",
            &archive_file,
        )]);

        let skipped =
            scan_workspace_artifacts(&context, BuildPhase::Main, false).unwrap();
        assert!(skipped.is_empty());

        let in_test_phase =
            scan_workspace_artifacts(&context, BuildPhase::Test, false).unwrap();
        assert_eq!(in_test_phase.len(), 1);

        let included =
            scan_workspace_artifacts(&context, BuildPhase::Main, true).unwrap();
        assert_eq!(included.len(), 1);
    }

    #[test]
    fn test_non_zip_kinds_are_ignored() {
        let tmp = TempDir::new().unwrap();
        let jar = tmp.path().join("lib.jar");
        std::fs::write(&jar, "not a workspace").unwrap();

        let context =
            ProjectContext::new(vec![artifact("lib", Scope::Compile, "jar", &jar)]);

        let found =
            scan_workspace_artifacts(&context, BuildPhase::Main, false).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_parent_context_is_scanned() {
        let tmp = TempDir::new().unwrap();
        let inherited = tmp.path().join("inherited.zip");
        write_zip(&inherited, &[(WORKSPACE_MARKER_ENTRY, "")]);

        let parent = ProjectContext::new(vec![artifact(
            "inherited",
            Scope::Compile,
            "zip",
            &inherited,
        )]);
        let child = ProjectContext::new(Vec::new()).with_parent(parent);

        let found = scan_workspace_artifacts(&child, BuildPhase::Main, false).unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let tmp = TempDir::new().unwrap();
        let absent = tmp.path().join("gone.zip");

        let context =
            ProjectContext::new(vec![artifact("gone", Scope::Compile, "zip", &absent)]);

        let err = scan_workspace_artifacts(&context, BuildPhase::Main, false).unwrap_err();
        assert!(matches!(err, ToolError::Config(_)));
    }
}
