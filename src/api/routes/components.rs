//! Component routes: CRUD plus file attachment uploads.
//!
//! POST /components/ accepts either a structured JSON body or a multipart
//! form. The multipart form may carry the snippet body as a plain field
//! (`code_text`) or an uploaded file (`code_file`), and any number of extra
//! attachments under `files`.

use axum::{
    extract::{multipart::Field, DefaultBodyLimit, FromRequest, Multipart, Path, Request, State},
    http::{header, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use super::app_state::AppState;
use super::error::ApiError;
use crate::models::{
    join_tags, Component, ComponentPatch, ComponentStatus, ComponentView, NewComponent,
};

/// Bodies are buffered in full before persistence; anything larger is
/// rejected up front.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Create the components router
pub fn components_router() -> Router<AppState> {
    Router::new()
        .route("/components/", get(list_components).post(create_component))
        .route(
            "/components/{component_id}/",
            get(get_component)
                .patch(update_component)
                .delete(delete_component),
        )
        .route(
            "/components/{component_id}/files/",
            post(upload_component_files),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}

/// Request body for creating a component (structured encoding).
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct CreateComponentRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub status: Option<ComponentStatus>,
}

/// Request body for a partial update (structured encoding only).
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct UpdateComponentRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub status: Option<ComponentStatus>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default, rename = "dateISO")]
    pub date_iso: Option<String>,
}

/// GET /components/ - All components, newest first
#[utoipa::path(
    get,
    path = "/components/",
    tag = "Components",
    responses(
        (status = 200, description = "Ordered components wrapped in a results envelope")
    )
)]
pub async fn list_components(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let store = state.component_store.lock().await;
    let components = store.list()?;
    let results: Vec<ComponentView> = components.iter().map(Component::to_view).collect();

    Ok(Json(json!({ "results": results })))
}

/// POST /components/ - Create a component from a JSON or multipart body
#[utoipa::path(
    post,
    path = "/components/",
    tag = "Components",
    request_body = CreateComponentRequest,
    responses(
        (status = 201, description = "Component created", body = ComponentView),
        (status = 400, description = "Undecodable body or missing code")
    )
)]
pub async fn create_component(
    State(state): State<AppState>,
    request: Request,
) -> Result<(StatusCode, Json<ComponentView>), ApiError> {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("multipart/form-data"))
        .unwrap_or(false);

    if is_multipart {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|_| ApiError::bad_request("Invalid form data"))?;
        create_component_multipart(state, multipart).await
    } else {
        let bytes = axum::body::to_bytes(request.into_body(), MAX_BODY_BYTES)
            .await
            .map_err(|_| ApiError::bad_request("Invalid JSON"))?;
        let payload: CreateComponentRequest =
            serde_json::from_slice(&bytes).map_err(|_| ApiError::bad_request("Invalid JSON"))?;
        create_component_json(state, payload).await
    }
}

async fn create_component_json(
    state: AppState,
    payload: CreateComponentRequest,
) -> Result<(StatusCode, Json<ComponentView>), ApiError> {
    let code = payload.code.unwrap_or_default().trim().to_string();
    if code.is_empty() {
        return Err(ApiError::bad_request("Code is required."));
    }

    let fields = NewComponent {
        name: resolve_name(payload.name.as_deref()),
        section: payload.section.unwrap_or_default().trim().to_string(),
        tags: join_tags(payload.tags.unwrap_or_default()),
        code,
        description: payload.description.unwrap_or_default(),
        notes: payload.notes.unwrap_or_default(),
        instructions: payload.instructions.unwrap_or_default(),
        status: payload.status.unwrap_or_default(),
    };

    let store = state.component_store.lock().await;
    let component = store.create(fields)?;
    info!("[Components] Created {} ({})", component.name, component.id);

    Ok((StatusCode::CREATED, Json(component.to_view())))
}

/// Text fields plus binary payloads collected from a multipart create.
#[derive(Default)]
struct MultipartCreateForm {
    name: String,
    section: String,
    tags: String,
    description: String,
    notes: String,
    instructions: String,
    status: String,
    code_text: String,
    code_file: Option<Vec<u8>>,
    files: Vec<(String, Vec<u8>)>,
}

async fn read_create_form(mut multipart: Multipart) -> Result<MultipartCreateForm, ApiError> {
    let mut form = MultipartCreateForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::bad_request("Invalid form data"))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "name" => form.name = read_text(field).await?,
            "section" => form.section = read_text(field).await?,
            "tags" => form.tags = read_text(field).await?,
            "description" => form.description = read_text(field).await?,
            "notes" => form.notes = read_text(field).await?,
            "instructions" => form.instructions = read_text(field).await?,
            "status" => form.status = read_text(field).await?,
            "code_text" => form.code_text = read_text(field).await?,
            "code_file" => form.code_file = Some(read_bytes(field).await?),
            "files" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                form.files.push((file_name, read_bytes(field).await?));
            }
            _ => {
                // Unknown parts are drained and ignored.
                let _ = field.bytes().await;
            }
        }
    }

    Ok(form)
}

async fn read_text(field: Field<'_>) -> Result<String, ApiError> {
    Ok(field
        .text()
        .await
        .map_err(|_| ApiError::bad_request("Invalid form data"))?
        .trim()
        .to_string())
}

async fn read_bytes(field: Field<'_>) -> Result<Vec<u8>, ApiError> {
    let bytes = field
        .bytes()
        .await
        .map_err(|_| ApiError::bad_request("Invalid form data"))?;
    Ok(bytes.to_vec())
}

async fn create_component_multipart(
    state: AppState,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ComponentView>), ApiError> {
    let form = read_create_form(multipart).await?;

    let status = if form.status.is_empty() {
        ComponentStatus::default()
    } else {
        ComponentStatus::parse(&form.status)
            .ok_or_else(|| ApiError::bad_request("Invalid status."))?
    };

    // The snippet body comes from the text field when given, else from the
    // uploaded file decoded as UTF-8 with invalid byte sequences dropped.
    let mut code = form.code_text.clone();
    if code.is_empty() {
        if let Some(bytes) = &form.code_file {
            code = decode_lossy(bytes);
        }
    }
    if code.trim().is_empty() {
        return Err(ApiError::bad_request("Code is required."));
    }

    let fields = NewComponent {
        name: resolve_name(Some(&form.name)),
        section: form.section.clone(),
        tags: join_tags(form.tags.split(',')),
        code,
        description: form.description.clone(),
        notes: form.notes.clone(),
        instructions: form.instructions.clone(),
        status,
    };

    let store = state.component_store.lock().await;
    let component = store.create(fields)?;
    info!(
        "[Components] Created {} ({}) via form upload",
        component.name, component.id
    );

    // Attachments are persisted after the component row commits; a failure
    // partway leaves the component with the attachments stored so far.
    for (file_name, bytes) in &form.files {
        let blob = state.media_store.save(bytes, file_name).await?;
        store.add_file(component.id, &blob.name, &blob.url, blob.size)?;
    }

    Ok((StatusCode::CREATED, Json(component.to_view())))
}

/// GET /components/{component_id}/ - Component detail with attachments
#[utoipa::path(
    get,
    path = "/components/{component_id}/",
    tag = "Components",
    params(("component_id" = String, Path, description = "Component id")),
    responses(
        (status = 200, description = "Component detail with embedded files", body = ComponentView),
        (status = 404, description = "Component not found")
    )
)]
pub async fn get_component(
    State(state): State<AppState>,
    Path(component_id): Path<String>,
) -> Result<Json<ComponentView>, ApiError> {
    let id = parse_component_id(&component_id)?;

    let store = state.component_store.lock().await;
    let component = store.get(id)?;
    let files = store.files_for(id)?;

    Ok(Json(component.to_detail_view(&files)))
}

/// PATCH /components/{component_id}/ - Partial update
#[utoipa::path(
    patch,
    path = "/components/{component_id}/",
    tag = "Components",
    params(("component_id" = String, Path, description = "Component id")),
    request_body = UpdateComponentRequest,
    responses(
        (status = 200, description = "Updated component", body = ComponentView),
        (status = 400, description = "Undecodable body"),
        (status = 404, description = "Component not found")
    )
)]
pub async fn update_component(
    State(state): State<AppState>,
    Path(component_id): Path<String>,
    request: Request,
) -> Result<Json<ComponentView>, ApiError> {
    let id = parse_component_id(&component_id)?;

    let bytes = axum::body::to_bytes(request.into_body(), MAX_BODY_BYTES)
        .await
        .map_err(|_| ApiError::bad_request("Invalid JSON"))?;
    let payload: UpdateComponentRequest =
        serde_json::from_slice(&bytes).map_err(|_| ApiError::bad_request("Invalid JSON"))?;

    let mut patch = ComponentPatch {
        name: payload.name,
        section: payload.section,
        description: payload.description,
        notes: payload.notes,
        instructions: payload.instructions,
        code: payload.code,
        status: payload.status,
        tags: payload.tags.map(|tags| join_tags(tags)),
        date_added: None,
    };

    // An unparseable date override is dropped rather than rejected.
    if let Some(raw) = payload.date_iso.as_deref() {
        match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(date) => patch.date_added = Some(date),
            Err(_) => warn!("[Components] Ignoring unparseable date override {:?}", raw),
        }
    }

    let store = state.component_store.lock().await;
    let component = store.update(id, patch)?;

    Ok(Json(component.to_view()))
}

/// DELETE /components/{component_id}/ - Delete a component and its attachments
#[utoipa::path(
    delete,
    path = "/components/{component_id}/",
    tag = "Components",
    params(("component_id" = String, Path, description = "Component id")),
    responses(
        (status = 200, description = "Deletion acknowledged"),
        (status = 404, description = "Component not found")
    )
)]
pub async fn delete_component(
    State(state): State<AppState>,
    Path(component_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_component_id(&component_id)?;

    let store = state.component_store.lock().await;
    store.delete(id)?;
    info!("[Components] Deleted {}", id);

    Ok(Json(json!({ "ok": true })))
}

/// POST /components/{component_id}/files/ - Attach uploaded files
#[utoipa::path(
    post,
    path = "/components/{component_id}/files/",
    tag = "Components",
    params(("component_id" = String, Path, description = "Component id")),
    responses(
        (status = 201, description = "Created attachments"),
        (status = 404, description = "Component not found")
    )
)]
pub async fn upload_component_files(
    State(state): State<AppState>,
    Path(component_id): Path<String>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let id = parse_component_id(&component_id)?;

    let mut uploads: Vec<(String, Vec<u8>)> = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::bad_request("Invalid form data"))?
    {
        if field.name() == Some("files") {
            let file_name = field.file_name().unwrap_or("").to_string();
            uploads.push((file_name, read_bytes(field).await?));
        } else {
            let _ = field.bytes().await;
        }
    }

    let store = state.component_store.lock().await;
    // Owner check up front so nothing is written for a dead id.
    store.get(id)?;

    let mut created = Vec::new();
    for (file_name, bytes) in &uploads {
        let blob = state.media_store.save(bytes, file_name).await?;
        let file = store.add_file(id, &blob.name, &blob.url, blob.size)?;
        created.push(file.to_view());
    }
    info!("[Components] Attached {} file(s) to {}", created.len(), id);

    Ok((StatusCode::CREATED, Json(json!({ "files": created }))))
}

/// Missing or blank names fall back to "Untitled".
fn resolve_name(name: Option<&str>) -> String {
    let trimmed = name.unwrap_or("").trim();
    if trimmed.is_empty() {
        "Untitled".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Ids that do not parse as UUIDs name no component.
fn parse_component_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found())
}

/// Decode bytes as UTF-8, dropping invalid sequences.
fn decode_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).replace('\u{FFFD}', "")
}
