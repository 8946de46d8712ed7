//! Router configuration for the Web API.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers::{upload_video, AppState};
use super::middleware::create_cors_layer;

/// Create the main router.
///
/// - `POST /api/video` uploads a video
/// - `GET /uploads/<filename>` serves stored videos from the upload dir
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    // The upload handler enforces its own streamed size limit.
    let api_routes = Router::new().route(
        "/video",
        post(upload_video).layer(DefaultBodyLimit::disable()),
    );

    let uploads = ServeDir::new(app_state.storage.base_path());

    Router::new()
        .nest("/api", api_routes)
        .nest_service("/uploads", uploads)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
