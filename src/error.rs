//! Failure taxonomy for toolchain resolution and invocation.
//!
//! Everything here is terminal for the build that triggered it. The variants
//! exist so callers can tell a configuration mistake apart from a transfer
//! problem, a broken archive, or a misbehaving subprocess; the messages are
//! what the user sees at the top level.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Terminal failure during SDK resolution, workspace preparation or tool
/// invocation.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Required configuration is missing or unusable without network access.
    #[error("{0}")]
    Config(String),

    /// Transport-level HTTP failure (connect, TLS, read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered, but not with 200.
    #[error("unexpected status code {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    /// Downloaded SDK archive carried a content type outside the allow-list.
    #[error("unsupported content type `{content_type}` for {url}")]
    UnsupportedContentType { url: String, content_type: String },

    /// The listing document was not a bucket listing at all.
    #[error("not a bucket listing document, root element is `{found}`")]
    ListingFormat { found: String },

    /// The listing document was not well-formed XML.
    #[error("can't parse listing document: {0}")]
    ListingParse(#[from] roxmltree::Error),

    /// No listed key matched the requested distribution; every observed key
    /// is enumerated to make manual correction possible.
    #[error("can't find SDK `{}` in the remote listing; listed entries:\n{}", .base_name, .listed.join("\n"))]
    SdkNotListed {
        base_name: String,
        listed: Vec<String>,
    },

    /// The archive extension is not one of the known formats.
    #[error("unsupported archive format: {}", .0.display())]
    UnsupportedArchive(PathBuf),

    /// An entry path would land outside the destination folder.
    #[error("archive entry escapes destination folder: {entry}")]
    UnsafeArchiveEntry { entry: String },

    /// A sub-tree unpack matched nothing, which almost always means a wrong
    /// archive or a renamed internal layout.
    #[error("couldn't find folder `{folder}` in archive {} or the archive is empty", .archive.display())]
    MissingArchiveFolder { archive: PathBuf, folder: String },

    /// A whole-archive or manifest-driven unpack produced zero entries.
    #[error("no entries were extracted from archive {}", .archive.display())]
    EmptyUnpack { archive: PathBuf },

    /// The resolved tool binary does not exist as a regular file.
    #[error("can't find executable file: {}", .0.display())]
    MissingExecutable(PathBuf),

    /// The retry policy kept asking for more attempts; this is a policy
    /// defect, not a subprocess failure, and ignore-flags do not apply.
    #[error("too many invocation attempts ({0}), the retry policy looks defective")]
    TooManyIterations(u32),

    /// Subprocess finished with a non-zero exit code.
    #[error("process exit code: {code}")]
    ExitCode { code: i32 },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sdk_not_listed_enumerates_keys() {
        let err = ToolError::SdkNotListed {
            base_name: "go1.6.linux-amd64".to_string(),
            listed: vec![
                "go1.5.linux-amd64.tar.gz".to_string(),
                "go1.5.windows-386.zip".to_string(),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("go1.6.linux-amd64"));
        assert!(msg.contains("go1.5.linux-amd64.tar.gz"));
        assert!(msg.contains("go1.5.windows-386.zip"));
    }

    #[test]
    fn test_exit_code_message() {
        let err = ToolError::ExitCode { code: 2 };
        assert_eq!(err.to_string(), "process exit code: 2");
    }
}
