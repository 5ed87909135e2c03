//! Application state management.
//!
//! Defines the AppState struct holding the component store and the media
//! store shared across all route handlers.

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::services::{DiskMediaStore, MediaStore};
use crate::storage::{ComponentStore, StorageError};

/// Application state shared across all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// SQLite store for components and their attachments
    pub component_store: Arc<Mutex<ComponentStore>>,
    /// Blob storage for uploaded files
    pub media_store: Arc<dyn MediaStore>,
}

impl AppState {
    /// Build state from environment configuration.
    ///
    /// `COMPONENTS_DB` selects the SQLite file, `MEDIA_ROOT` the upload
    /// directory and `MEDIA_URL` the public prefix uploads resolve under.
    pub fn from_env() -> Result<Self, StorageError> {
        let db_path =
            std::env::var("COMPONENTS_DB").unwrap_or_else(|_| "components.db".to_string());
        let media_root = std::env::var("MEDIA_ROOT").unwrap_or_else(|_| "media".to_string());
        let media_url = std::env::var("MEDIA_URL").unwrap_or_else(|_| "/media".to_string());

        let store = ComponentStore::open(&db_path)?;
        let media_store = Arc::new(DiskMediaStore::new(media_root, media_url));

        Ok(Self::with_stores(store, media_store))
    }

    /// Build state from explicit stores; tests inject in-memory and temp-dir
    /// backends here.
    pub fn with_stores(component_store: ComponentStore, media_store: Arc<dyn MediaStore>) -> Self {
        Self {
            component_store: Arc::new(Mutex::new(component_store)),
            media_store,
        }
    }
}
