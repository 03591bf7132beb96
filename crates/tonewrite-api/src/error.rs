//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Any `AppError` (or type
//! convertible into one) renders as `{"error": <client message>}` with the variant's
//! status; the full error only ever reaches the logs.

use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tonewrite_core::error::UPLOAD_ERROR_MESSAGE;
use tonewrite_core::models::ResponsePayload;
use tonewrite_core::{AppError, ErrorMetadata, LogLevel, UploadRejection};
use tonewrite_llm::GenerationError;
use tonewrite_storage::StorageError;

use crate::constants::NOT_MULTIPART_MESSAGE;

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from tonewrite-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::from(err))
    }
}

impl From<UploadRejection> for HttpAppError {
    fn from(err: UploadRejection) -> Self {
        HttpAppError(AppError::UploadRejected(err))
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(err.into())
    }
}

impl From<GenerationError> for HttpAppError {
    fn from(err: GenerationError) -> Self {
        HttpAppError(err.into())
    }
}

/// A body that is not multipart at all.
impl From<MultipartRejection> for HttpAppError {
    fn from(rejection: MultipartRejection) -> Self {
        tracing::debug!(rejection = %rejection.body_text(), "Multipart extraction rejected");
        HttpAppError(AppError::BadRequest(NOT_MULTIPART_MESSAGE.to_string()))
    }
}

/// A multipart body that breaks off or is malformed mid-stream.
impl From<MultipartError> for HttpAppError {
    fn from(err: MultipartError) -> Self {
        tracing::debug!(error = %err.body_text(), status = %err.status(), "Multipart read failed");
        HttpAppError(AppError::BadRequest(UPLOAD_ERROR_MESSAGE.to_string()))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(
                error = %error,
                error_type = error_type,
                details = %error.detailed_message(),
                "Error occurred"
            );
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let body = Json(ResponsePayload::failure(app_error));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use tonewrite_core::error::{INVALID_FORMAT_MESSAGE, PROCESSING_ERROR_MESSAGE};
    use tonewrite_core::FileRole;

    async fn render(err: HttpAppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_rejection_renders_400_with_reason() {
        let (status, body) = render(
            UploadRejection::MissingOrEmpty {
                role: FileRole::Tone,
            }
            .into(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({"error": "Tone file is missing or empty."}));
    }

    #[tokio::test]
    async fn test_internal_detail_never_reaches_body() {
        let (status, body) = render(HttpAppError(AppError::Backend(
            "HTTP 401 from upstream: invalid x-api-key sk-live".to_string(),
        )))
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], PROCESSING_ERROR_MESSAGE);
        assert!(!body.to_string().contains("sk-live"));
        assert_eq!(body.as_object().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_document_is_invalid_format() {
        let (status, body) =
            render(HttpAppError(AppError::CorruptDocument("bad zip".to_string()))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], INVALID_FORMAT_MESSAGE);
    }

    #[tokio::test]
    async fn test_storage_not_found_is_404() {
        let (status, _) = render(StorageError::NotFound("x.docx".to_string()).into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
