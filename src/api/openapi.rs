//! OpenAPI specification definition.
//!
//! Aggregates all route handlers and schemas for OpenAPI documentation generation.

use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Components
        crate::routes::components::list_components,
        crate::routes::components::create_component,
        crate::routes::components::get_component,
        crate::routes::components::update_component,
        crate::routes::components::delete_component,
        crate::routes::components::upload_component_files,
        // OpenAPI
        crate::routes::openapi::serve_openapi_json,
    ),
    components(schemas(
        crate::models::ComponentView,
        crate::models::FileView,
        crate::models::ComponentStatus,
        crate::routes::components::CreateComponentRequest,
        crate::routes::components::UpdateComponentRequest,
    )),
    modifiers(&VersionSync),
    tags(
        (name = "Components", description = "Component CRUD operations and attachment uploads"),
        (name = "OpenAPI", description = "OpenAPI specification"),
    ),
    info(
        title = "Component Library API",
        description = "REST API for managing reusable UI code snippets and their attachments",
        version = "1.0.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;

struct VersionSync;

impl Modify for VersionSync {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        // Keep the served version in step with Cargo.toml.
        openapi.info.version = env!("CARGO_PKG_VERSION").to_string();
    }
}
