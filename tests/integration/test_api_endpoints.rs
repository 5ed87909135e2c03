//! API endpoint tests for the component CRUD surface.

use axum::http::StatusCode;
use axum_test::TestServer;
use component_library_api::routes::{create_api_router, AppState};
use component_library_api::services::DiskMediaStore;
use component_library_api::storage::ComponentStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

fn create_test_server() -> (TestServer, TempDir) {
    let media_dir = TempDir::new().expect("temp media dir");
    let media_store = Arc::new(DiskMediaStore::new(media_dir.path(), "/media"));
    let state = AppState::with_stores(ComponentStore::in_memory().unwrap(), media_store);
    let router = create_api_router().with_state(state);
    (TestServer::new(router).unwrap(), media_dir)
}

fn today() -> String {
    chrono::Utc::now().date_naive().to_string()
}

#[tokio::test]
async fn create_component_returns_tags_and_todays_date() {
    let (server, _media) = create_test_server();

    let response = server
        .post("/components/")
        .json(&json!({
            "name": "Card A",
            "tags": ["widget", "table"],
            "code": "<div>Hello A</div>"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["name"], "Card A");
    assert_eq!(body["tags"], json!(["widget", "table"]));
    assert_eq!(body["dateISO"], json!(today()));
    assert_eq!(body["code"], "<div>Hello A</div>");
    assert_eq!(body["status"], "not_started");
    // The create response carries no files sequence.
    assert!(body.get("files").is_none());
}

#[tokio::test]
async fn create_without_code_is_rejected_and_not_persisted() {
    let (server, _media) = create_test_server();

    for body in [json!({ "name": "Card" }), json!({ "code": "   " })] {
        let response = server.post("/components/").json(&body).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(response.text(), "Code is required.");
    }

    let list: Value = server.get("/components/").await.json();
    assert_eq!(list["results"], json!([]));
}

#[tokio::test]
async fn create_defaults_blank_name_to_untitled() {
    let (server, _media) = create_test_server();

    let response = server
        .post("/components/")
        .json(&json!({ "name": "   ", "code": "<div/>" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["name"], "Untitled");
}

#[tokio::test]
async fn create_normalizes_tag_whitespace_and_drops_empties() {
    let (server, _media) = create_test_server();

    let response = server
        .post("/components/")
        .json(&json!({
            "code": "<div/>",
            "tags": ["  widget ", "", " table"]
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["tags"], json!(["widget", "table"]));
}

#[tokio::test]
async fn create_with_undecodable_body_is_rejected() {
    let (server, _media) = create_test_server();

    let response = server.post("/components/").text("{not json").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "Invalid JSON");
}

#[tokio::test]
async fn list_wraps_results_and_orders_equal_dates_by_name() {
    let (server, _media) = create_test_server();

    // Created in the order Bravo then Alpha; both pinned to the same date.
    for name in ["Bravo", "Alpha"] {
        let created: Value = server
            .post("/components/")
            .json(&json!({ "name": name, "code": "<div/>" }))
            .await
            .json();
        let patch = server
            .patch(&format!("/components/{}/", created["id"].as_str().unwrap()))
            .json(&json!({ "dateISO": "2024-06-01" }))
            .await;
        assert_eq!(patch.status_code(), StatusCode::OK);
    }

    let list: Value = server.get("/components/").await.json();
    let names: Vec<&str> = list["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Alpha", "Bravo"]);
}

#[tokio::test]
async fn detail_includes_empty_files_sequence() {
    let (server, _media) = create_test_server();

    let created: Value = server
        .post("/components/")
        .json(&json!({ "name": "Card", "code": "<div/>" }))
        .await
        .json();

    let detail: Value = server
        .get(&format!("/components/{}/", created["id"].as_str().unwrap()))
        .await
        .json();
    assert_eq!(detail["files"], json!([]));
    assert_eq!(detail["name"], "Card");
}

#[tokio::test]
async fn unknown_and_malformed_ids_return_not_found() {
    let (server, _media) = create_test_server();

    let missing = format!("/components/{}/", uuid::Uuid::new_v4());
    assert_eq!(server.get(&missing).await.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(
        server.get("/components/not-a-uuid/").await.status_code(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        server
            .patch(&missing)
            .json(&json!({ "notes": "x" }))
            .await
            .status_code(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(server.delete(&missing).await.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patch_updates_tags_and_date_override() {
    let (server, _media) = create_test_server();

    let created: Value = server
        .post("/components/")
        .json(&json!({ "name": "Card", "code": "<div/>" }))
        .await
        .json();
    let path = format!("/components/{}/", created["id"].as_str().unwrap());

    let response = server
        .patch(&path)
        .json(&json!({ "tags": ["a", "b", "c"], "dateISO": "2024-01-15" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["tags"], json!(["a", "b", "c"]));
    assert_eq!(body["dateISO"], "2024-01-15");
}

#[tokio::test]
async fn patch_with_unparseable_date_is_silently_ignored() {
    let (server, _media) = create_test_server();

    let created: Value = server
        .post("/components/")
        .json(&json!({ "name": "Card", "code": "<div/>" }))
        .await
        .json();
    let path = format!("/components/{}/", created["id"].as_str().unwrap());

    let response = server
        .patch(&path)
        .json(&json!({ "dateISO": "not-a-date" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["dateISO"], created["dateISO"]);
}

#[tokio::test]
async fn patch_touches_only_supplied_fields() {
    let (server, _media) = create_test_server();

    let created: Value = server
        .post("/components/")
        .json(&json!({
            "name": "Card",
            "section": "Landing",
            "tags": ["widget"],
            "code": "<div/>",
            "status": "in_progress"
        }))
        .await
        .json();
    let path = format!("/components/{}/", created["id"].as_str().unwrap());

    let body: Value = server
        .patch(&path)
        .json(&json!({ "notes": "only the notes" }))
        .await
        .json();

    assert_eq!(body["notes"], "only the notes");
    assert_eq!(body["name"], "Card");
    assert_eq!(body["section"], "Landing");
    assert_eq!(body["tags"], json!(["widget"]));
    assert_eq!(body["code"], "<div/>");
    assert_eq!(body["status"], "in_progress");
}

#[tokio::test]
async fn patch_overwrites_fields_verbatim() {
    let (server, _media) = create_test_server();

    let created: Value = server
        .post("/components/")
        .json(&json!({ "name": "Card", "code": "<div/>" }))
        .await
        .json();
    let path = format!("/components/{}/", created["id"].as_str().unwrap());

    // Unlike create, update applies values without trimming or defaulting.
    let body: Value = server
        .patch(&path)
        .json(&json!({ "name": "  spaced  ", "status": "completed" }))
        .await
        .json();

    assert_eq!(body["name"], "  spaced  ");
    assert_eq!(body["status"], "completed");
}

#[tokio::test]
async fn delete_acknowledges_then_detail_is_gone() {
    let (server, _media) = create_test_server();

    let created: Value = server
        .post("/components/")
        .json(&json!({ "name": "Card", "code": "<div/>" }))
        .await
        .json();
    let path = format!("/components/{}/", created["id"].as_str().unwrap());

    let response = server.delete(&path).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>(), json!({ "ok": true }));

    assert_eq!(server.get(&path).await.status_code(), StatusCode::NOT_FOUND);
    // Deleting twice is not idempotent.
    assert_eq!(server.delete(&path).await.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn openapi_spec_is_served() {
    let (server, _media) = create_test_server();

    let response = server.get("/openapi.json").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert!(body["paths"].get("/components/").is_some());
}
