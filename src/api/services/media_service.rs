//! Blob storage for uploaded component files.
//!
//! Uploads land in a media directory that is served statically; saving
//! returns the derived name, resolvable URL and byte size recorded on the
//! attachment row.

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;
use uuid::Uuid;

use crate::storage::StorageError;

/// Result of persisting one uploaded payload.
#[derive(Debug, Clone)]
pub struct StoredBlob {
    /// Basename of the upload, path components stripped.
    pub name: String,
    /// URL the stored payload resolves at.
    pub url: String,
    /// Payload size in bytes.
    pub size: i64,
}

/// Blob storage backend for uploaded files.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Persist `bytes` under a name derived from `suggested_name`.
    async fn save(&self, bytes: &[u8], suggested_name: &str) -> Result<StoredBlob, StorageError>;
}

/// Media store writing to a local directory.
pub struct DiskMediaStore {
    root: PathBuf,
    base_url: String,
}

impl DiskMediaStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            root: root.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

/// Strip any path components from an uploaded filename; empty names fall back
/// to `upload`.
pub fn sanitize_file_name(suggested: &str) -> String {
    let base = suggested.rsplit(['/', '\\']).next().unwrap_or("").trim();
    if base.is_empty() {
        "upload".to_string()
    } else {
        base.to_string()
    }
}

#[async_trait]
impl MediaStore for DiskMediaStore {
    async fn save(&self, bytes: &[u8], suggested_name: &str) -> Result<StoredBlob, StorageError> {
        let name = sanitize_file_name(suggested_name);
        // Stored paths get a UUID prefix so equal basenames never collide.
        let stored_name = format!("{}_{}", Uuid::new_v4(), name);

        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            StorageError::Media(format!(
                "Failed to create media root {:?}: {}",
                self.root, e
            ))
        })?;

        let path = self.root.join(&stored_name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| StorageError::Media(format!("Failed to write {:?}: {}", path, e)))?;

        info!("[Media] Stored {} ({} bytes)", stored_name, bytes.len());

        Ok(StoredBlob {
            name,
            url: format!("{}/{}", self.base_url, stored_name),
            size: bytes.len() as i64,
        })
    }
}
