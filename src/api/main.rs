use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;

use component_library_api::routes::{self, pages};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG environment variable controls log level (default: info)
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("Application starting...");

    let app_state = routes::create_app_state()?;

    // Uploaded files are served statically from the media root.
    let media_root = std::env::var("MEDIA_ROOT").unwrap_or_else(|_| "media".to_string());
    let media_url = std::env::var("MEDIA_URL").unwrap_or_else(|_| "/media".to_string());

    let app = Router::new()
        .route("/", get(pages::home))
        .route("/health", get(health_check))
        .merge(routes::create_api_router())
        .nest_service(media_url.as_str(), ServeDir::new(&media_root))
        .with_state(app_state);

    let app = app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    // Run server on configurable port (default 8081 for API)
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8081);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Server listening on {}", addr);
    info!("Health check available at http://{}/health", addr);
    info!("Uploads served from {} at {}", media_root, media_url);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "component-library-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
