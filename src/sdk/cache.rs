//! SDK cache: local lookup and population.
//!
//! Cached SDKs live under `store_root/<base_name>/`; a present directory is
//! trusted as-is, no integrity re-check happens on reuse. A miss fetches the
//! bucket listing, downloads the matching archive into the store root and
//! unpacks the `go` sub-tree.
//!
//! Population of one base name is serialized through a keyed mutex so that
//! concurrent builds never download or unpack the same distribution twice;
//! distinct distributions resolve in parallel. The lock is per-process only:
//! separate processes sharing a store root remain a known risk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, Mutex};

use reqwest::blocking::Client;

use crate::archive;
use crate::core::SdkDescriptor;
use crate::error::{Result, ToolError};
use crate::sdk::{download, listing};
use crate::util::fs as fs_util;

/// Folder inside SDK archives holding the toolchain root.
const SDK_ARCHIVE_ROOT_FOLDER: &str = "go";

/// Flags steering one cache resolution.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Fail instead of going to the network on a cache miss.
    pub disable_fetch: bool,

    /// Keep the downloaded archive after a successful unpack.
    pub keep_archive: bool,

    /// Keep the destination folder when unpacking fails.
    pub keep_unpacked_on_error: bool,

    /// Directly defined archive name, bypassing listing selection.
    pub archive_name: Option<String>,
}

static RESOLUTION_LOCKS: LazyLock<Mutex<HashMap<String, Arc<Mutex<()>>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

fn resolution_lock(base_name: &str) -> Arc<Mutex<()>> {
    let mut locks = RESOLUTION_LOCKS
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    locks.entry(base_name.to_string()).or_default().clone()
}

/// Local store of downloaded and unpacked SDK distributions.
#[derive(Debug, Clone)]
pub struct SdkCache {
    store_root: PathBuf,
    base_url: String,
}

impl SdkCache {
    /// Create a cache over the given store root, talking to the default
    /// distribution host.
    pub fn new(store_root: impl Into<PathBuf>) -> Self {
        SdkCache {
            store_root: store_root.into(),
            base_url: listing::SDK_BASE_URL.to_string(),
        }
    }

    /// Override the distribution host base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// The store root folder.
    pub fn store_root(&self) -> &Path {
        &self.store_root
    }

    /// Resolve the toolchain root for `descriptor`, populating the cache on
    /// a miss.
    pub fn resolve(&self, descriptor: &SdkDescriptor, options: &ResolveOptions) -> Result<PathBuf> {
        let base_name = descriptor.base_name();

        // Serialize population per distribution; losers of the race block
        // here, then hit the re-checked cache below.
        let lock = resolution_lock(&base_name);
        let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        fs_util::ensure_dir(&self.store_root)?;

        let sdk_folder = self.store_root.join(&base_name);
        if sdk_folder.is_dir() {
            tracing::debug!("cached SDK detected: {}", sdk_folder.display());
            return Ok(sdk_folder);
        }

        if options.disable_fetch {
            return Err(ToolError::Config(format!(
                "can't find `{}` in the cache but SDK fetch is disabled",
                base_name
            )));
        }

        let client = http_client()?;
        let raw_listing = listing::fetch_listing(&client, &self.base_url)?;
        let file_name = match &options.archive_name {
            Some(name) => {
                tracing::warn!("detected predefined archive name: {}", name);
                name.clone()
            }
            None => listing::select_sdk_file(
                &raw_listing,
                &base_name,
                listing::SDK_ARCHIVE_EXTENSIONS,
            )?,
        };

        self.fetch_and_unpack(&client, &file_name, &sdk_folder, options)
    }

    fn fetch_and_unpack(
        &self,
        client: &Client,
        file_name: &str,
        sdk_folder: &Path,
        options: &ResolveOptions,
    ) -> Result<PathBuf> {
        let archive_file = self.store_root.join(file_name);

        let result = self.populate(client, file_name, &archive_file, sdk_folder, options);

        // A failed download or unpack must never leave an archive behind to
        // be mistaken for a cached one on the next run; the keep flag only
        // applies to clean completions.
        if result.is_err() || !options.keep_archive {
            tracing::debug!("deleting archive: {}", archive_file.display());
            fs_util::remove_file_quietly(&archive_file);
        } else {
            tracing::debug!("archive file is kept: {}", archive_file.display());
        }

        result
    }

    fn populate(
        &self,
        client: &Client,
        file_name: &str,
        archive_file: &Path,
        sdk_folder: &Path,
        options: &ResolveOptions,
    ) -> Result<PathBuf> {
        if archive_file.is_file() {
            tracing::info!(
                "SDK archive found in the cache: {}",
                archive_file.display()
            );
        } else {
            download::download_archive(client, &self.base_url, file_name, archive_file)?;
        }

        tracing::info!(
            "unpacking archive {} to folder {}",
            file_name,
            sdk_folder.display()
        );
        match archive::unpack_subtree(archive_file, SDK_ARCHIVE_ROOT_FOLDER, sdk_folder) {
            Ok(count) => {
                tracing::info!("unpacked {} file(s)", count);
                Ok(sdk_folder.to_path_buf())
            }
            Err(err) => {
                if options.keep_unpacked_on_error {
                    tracing::debug!(
                        "keeping folder after failed unpack: {}",
                        sdk_folder.display()
                    );
                } else {
                    tracing::debug!(
                        "deleting folder because of failed unpack: {}",
                        sdk_folder.display()
                    );
                    fs_util::remove_dir_quietly(sdk_folder);
                }
                Err(err)
            }
        }
    }
}

fn http_client() -> Result<Client> {
    Ok(Client::builder().build()?)
}
