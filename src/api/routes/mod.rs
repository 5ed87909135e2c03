//! API routes module - organizes all route handlers.

pub mod app_state;
pub mod components;
pub mod error;
pub mod openapi;
pub mod pages;

use axum::Router;

pub use app_state::AppState;

/// Create the main API router combining all route modules
pub fn create_api_router() -> Router<AppState> {
    components::components_router().merge(openapi::openapi_router())
    // Note: State is applied by callers who need it (e.g., TestServer)
    // For production use, call .with_state(app_state) after creating the router.
}

/// Create the application state from environment configuration.
pub fn create_app_state() -> Result<AppState, crate::storage::StorageError> {
    AppState::from_env()
}
