//! Service layer for the API.

pub mod media_service;

pub use media_service::{sanitize_file_name, DiskMediaStore, MediaStore, StoredBlob};
