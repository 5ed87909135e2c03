//! Storage module for the API.
//!
//! Provides the SQLite-backed store for components and their attachments.

pub mod error;
pub mod sqlite;

pub use error::StorageError;
pub use sqlite::ComponentStore;
