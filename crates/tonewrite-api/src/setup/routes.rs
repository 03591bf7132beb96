//! Route configuration and setup

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use tonewrite_core::constants::DOWNLOAD_PATH_PREFIX;
use tonewrite_infra::request_id_middleware;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::api_doc::get_openapi_spec;
use crate::constants::{CONVERT_TONE_PATH, HEALTH_PATH, OPENAPI_PATH};
use crate::handlers;
use crate::state::AppState;

/// Setup all application routes
pub fn setup_routes(state: Arc<AppState>) -> Router<()> {
    let config = state.config.clone();

    tracing::info!(
        http_concurrency_limit = config.http_concurrency_limit,
        max_upload_size_bytes = config.max_upload_size_bytes,
        "HTTP limits configured"
    );

    let download_path = format!("{}{{file_name}}", DOWNLOAD_PATH_PREFIX);

    Router::new()
        .route(CONVERT_TONE_PATH, post(handlers::convert::convert_tone))
        .route(&download_path, get(handlers::download::download_file))
        .route(HEALTH_PATH, get(handlers::health::liveness_check))
        .route(OPENAPI_PATH, get(|| async { Json(get_openapi_spec()) }))
        .layer(ConcurrencyLimitLayer::new(config.http_concurrency_limit))
        // Multipart reads honour DefaultBodyLimit; the tower layer caps everything else.
        .layer(DefaultBodyLimit::max(config.max_upload_size_bytes))
        .layer(RequestBodyLimitLayer::new(config.max_upload_size_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state)
}
