//! SDK archive download.

use std::fs::File;
use std::io;
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::error::{Result, ToolError};

/// Content types an SDK archive download may legitimately carry.
pub const ALLOWED_ARCHIVE_CONTENT_TYPES: &[&str] = &[
    "application/octet-stream",
    "application/zip",
    "application/x-tar",
];

/// Download `file_name` from the distribution host into `dest`.
///
/// Redirects are followed; the response content type must be on the
/// allow-list. The caller owns cleanup of a partially written `dest` on
/// error.
pub fn download_archive(
    client: &Client,
    base_url: &str,
    file_name: &str,
    dest: &Path,
) -> Result<()> {
    let url = Url::parse(base_url)
        .and_then(|base| base.join(file_name))
        .map_err(|e| ToolError::Config(format!("invalid SDK URL for `{}`: {}", file_name, e)))?;

    tracing::warn!("loading SDK archive from {}", url);

    let response = client.get(url.clone()).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(ToolError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string();
    if !ALLOWED_ARCHIVE_CONTENT_TYPES.contains(&content_type.as_str()) {
        return Err(ToolError::UnsupportedContentType {
            url: url.to_string(),
            content_type,
        });
    }

    let progress = make_progress(file_name, response.content_length());
    let mut reader = progress.wrap_read(response);
    let mut output = File::create(dest)?;
    let written = io::copy(&mut reader, &mut output)?;
    progress.finish_and_clear();

    tracing::info!("SDK archive downloaded, size is {} Kb", written / 1024);
    Ok(())
}

fn make_progress(file_name: &str, total: Option<u64>) -> ProgressBar {
    let progress = match total {
        Some(length) => {
            let bar = ProgressBar::new(length);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes}")
                    .unwrap()
                    .progress_chars("#>-"),
            );
            bar
        }
        None => ProgressBar::new_spinner(),
    };
    progress.set_message(file_name.to_string());
    progress
}
