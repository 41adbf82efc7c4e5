//! Search-path assembly helpers.

use std::collections::HashSet;
use std::path::Path;

/// Separator between entries of a path-list variable (`:` on unix, `;` on
/// windows). This is the list separator, not the directory separator.
pub const PATH_LIST_SEPARATOR: char = if cfg!(windows) { ';' } else { ':' };

/// Merge filesystem paths into a single OS path-list string.
///
/// Order-preserving and duplicate-free: the first occurrence of a path wins,
/// later repeats and empty segments are dropped.
pub fn merge_paths<I, P>(paths: I) -> String
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut seen = HashSet::new();
    let mut result = String::new();

    for path in paths {
        let text = path.as_ref().to_string_lossy().into_owned();
        if text.is_empty() || !seen.insert(text.clone()) {
            continue;
        }
        if !result.is_empty() {
            result.push(PATH_LIST_SEPARATOR);
        }
        result.push_str(&text);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_merge_preserves_first_seen_order() {
        let merged = merge_paths(["/a", "/b", "/a", "/c", "/b"]);
        assert_eq!(
            merged,
            format!("/a{sep}/b{sep}/c", sep = PATH_LIST_SEPARATOR)
        );
    }

    #[test]
    fn test_merge_skips_empty_segments() {
        let merged = merge_paths(["", "/x", "", "/y"]);
        assert_eq!(merged, format!("/x{}/y", PATH_LIST_SEPARATOR));
    }

    #[test]
    fn test_merge_single_path_has_no_separator() {
        let merged = merge_paths([PathBuf::from("/only")]);
        assert_eq!(merged, "/only");
    }

    #[test]
    fn test_merge_empty_input() {
        let merged = merge_paths(Vec::<PathBuf>::new());
        assert_eq!(merged, "");
    }
}
