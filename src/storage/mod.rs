//! Object storage for source photos and thumbnails.
//!
//! Objects are keyed by file name. [`build_store`] picks a backend from
//! config: [`OfflineStore`] when uploads are disabled, [`HttpStore`] otherwise.

mod http;
mod offline;

pub use http::HttpStore;
pub use offline::OfflineStore;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use gallery_core::{Error, Result};

use crate::config::StorageConfig;

/// A bucket that accepts whole-object writes.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Short backend identifier used in logs.
    fn name(&self) -> &'static str;

    /// Store `body` under `key`, replacing any existing object.
    async fn put_object(&self, key: &str, body: Bytes) -> Result<()>;
}

/// Totals for a batch of uploads.
#[derive(Debug, Default)]
pub struct UploadReport {
    pub uploaded: usize,
    pub failed: Vec<(PathBuf, String)>,
}

impl UploadReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Object key for a local file: its file name.
pub fn object_key(path: &Path) -> Result<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| Error::validation(format!("no file name in {}", path.display())))
}

/// Upload `files` one after another. Failures are logged and counted.
pub async fn upload_files(store: &dyn ObjectStore, files: &[PathBuf]) -> UploadReport {
    let mut report = UploadReport::default();

    for file in files {
        match upload_file(store, file).await {
            Ok(()) => report.uploaded += 1,
            Err(e) => {
                tracing::error!("Upload of {} failed: {}", file.display(), e);
                report.failed.push((file.clone(), e.to_string()));
            }
        }
    }

    tracing::info!(
        "Completed uploading {} of {} files to {}",
        report.uploaded,
        files.len(),
        store.name()
    );
    report
}

async fn upload_file(store: &dyn ObjectStore, file: &Path) -> Result<()> {
    let key = object_key(file)?;
    let body = tokio::fs::read(file).await?;
    store.put_object(&key, Bytes::from(body)).await
}

/// Build the store for a run.
///
/// Offline runs never touch the network. Otherwise both endpoint and bucket
/// must be configured.
pub fn build_store(config: &StorageConfig, offline: bool) -> Result<Arc<dyn ObjectStore>> {
    if offline {
        return Ok(Arc::new(OfflineStore));
    }

    let endpoint = config
        .endpoint
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| Error::validation("storage endpoint is not configured"))?;
    let bucket = config
        .bucket
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| Error::validation("storage bucket is not configured"))?;

    let store = HttpStore::new(endpoint, bucket, config.token.clone(), config.timeout_secs)?;
    Ok(Arc::new(store))
}
