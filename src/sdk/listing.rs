//! Remote SDK listing: fetch, parse, select.
//!
//! The distribution host exposes an S3-style bucket listing: an XML document
//! with a `ListBucketResult` root holding repeated `Contents` elements, each
//! carrying a `Key` with an archive file name. The listing is fetched fresh
//! for every resolution attempt and never cached.

use std::collections::HashSet;

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;

use crate::error::{Result, ToolError};

/// Base URL of the Go SDK distribution bucket.
pub const SDK_BASE_URL: &str = "https://storage.googleapis.com/golang/";

/// Archive extensions an SDK distribution may be published under. Tried as a
/// set, not in priority order: only one listing entry is expected to match.
pub const SDK_ARCHIVE_EXTENSIONS: &[&str] = &["tar.gz", "zip"];

const LISTING_ROOT_TAG: &str = "ListBucketResult";

/// Fetch the raw bucket listing from the distribution host.
pub fn fetch_listing(client: &Client, base_url: &str) -> Result<String> {
    tracing::warn!("loading list of available SDKs from {}", base_url);

    let response = client
        .get(base_url)
        .header(ACCEPT, "application/xml")
        .send()?;

    let status = response.status();
    if !status.is_success() {
        return Err(ToolError::HttpStatus {
            url: base_url.to_string(),
            status: status.as_u16(),
        });
    }

    let text = response.text()?;
    tracing::debug!("SDK list loaded, {} bytes", text.len());
    Ok(text)
}

/// Select the listing key matching `base_name` plus one of the allowed
/// extensions. The first matching entry in document order wins; when nothing
/// matches, the error enumerates every observed key to aid diagnosis.
pub fn select_sdk_file(
    listing: &str,
    base_name: &str,
    allowed_extensions: &[&str],
) -> Result<String> {
    let document = roxmltree::Document::parse(listing)?;
    let root = document.root_element();

    if root.tag_name().name() != LISTING_ROOT_TAG {
        return Err(ToolError::ListingFormat {
            found: root.tag_name().name().to_string(),
        });
    }

    let wanted: HashSet<String> = allowed_extensions
        .iter()
        .map(|ext| format!("{}.{}", base_name, ext))
        .collect();

    let mut listed = Vec::new();
    for contents in root
        .descendants()
        .filter(|node| node.is_element() && node.tag_name().name() == "Contents")
    {
        let Some(key) = contents
            .children()
            .find(|node| node.is_element() && node.tag_name().name() == "Key")
            .and_then(|node| node.text())
        else {
            continue;
        };

        if wanted.contains(key) {
            tracing::debug!("detected compatible SDK in the listing: {}", key);
            return Ok(key.to_string());
        }
        listed.push(key.to_string());
    }

    Err(ToolError::SdkNotListed {
        base_name: base_name.to_string(),
        listed,
    })
}
