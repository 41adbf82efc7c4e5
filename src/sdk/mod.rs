//! Go SDK acquisition: remote listing, archive download, local cache.

pub mod cache;
pub mod download;
pub mod listing;

pub use cache::{ResolveOptions, SdkCache};
pub use listing::{SDK_ARCHIVE_EXTENSIONS, SDK_BASE_URL};
