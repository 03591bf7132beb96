use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, Response, StatusCode},
    response::IntoResponse,
};
use futures::StreamExt;
use tonewrite_core::constants::DOCX_CONTENT_TYPE;
use tonewrite_core::models::ErrorResponse;
use tonewrite_core::AppError;

use crate::error::HttpAppError;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/files/download/{file_name}",
    tag = "files",
    params(
        ("file_name" = String, Path, description = "Stored name from a downloadLink")
    ),
    responses(
        (status = 200, description = "Generated document", content_type = "application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        (status = 400, description = "Invalid file name", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "download_file"))]
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path(file_name): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let content_length = state.storage.size(&file_name).await?;
    let stream = state.storage.open_stream(&file_name).await?;

    tracing::debug!(key = %file_name, size_bytes = content_length, "Streaming output document");

    let body_stream = stream.map(|result| {
        result.map_err(|e| std::io::Error::other(format!("Storage stream error: {}", e)))
    });

    let content_disposition = format!("attachment; filename=\"{}\"", file_name);

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, DOCX_CONTENT_TYPE)
        .header(header::CONTENT_LENGTH, content_length)
        .header(header::CONTENT_DISPOSITION, content_disposition.as_str())
        .header(header::CACHE_CONTROL, "private, max-age=3600, immutable")
        .body(Body::from_stream(body_stream))
        .map_err(|e| AppError::Unexpected(format!("Failed to build response: {}", e)))?;

    Ok(response)
}
