use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tonewrite_core::models::{AcceptedResponse, ConversionResponse, ErrorResponse};

use crate::error::HttpAppError;
use crate::extract::ConversionUpload;
use crate::services::ConversionReply;
use crate::state::AppState;

/// Rewrite the content document in the tone of the tone document.
///
/// In synchronous mode the response carries the download locator; in asynchronous
/// mode it only acknowledges that processing started.
#[utoipa::path(
    post,
    path = "/api/convert-tone",
    tag = "conversion",
    request_body(content = inline(Object), content_type = "multipart/form-data",
        description = "Parts `toneFile` and `contentFile`, each a .docx of at least 1024 bytes"),
    responses(
        (status = 200, description = "Document converted", body = ConversionResponse),
        (status = 202, description = "Processing started asynchronously", body = AcceptedResponse),
        (status = 400, description = "Upload rejected or invalid file format", body = ErrorResponse),
        (status = 500, description = "Processing error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, upload),
    fields(
        tone_bytes = upload.tone.declared_size,
        content_bytes = upload.content.declared_size,
        operation = "convert_tone"
    )
)]
pub async fn convert_tone(
    State(state): State<Arc<AppState>>,
    upload: ConversionUpload,
) -> Result<impl IntoResponse, HttpAppError> {
    let reply = state
        .conversion
        .convert(&upload.tone, &upload.content)
        .await?;

    let status = match &reply {
        ConversionReply::Completed(_) => StatusCode::OK,
        ConversionReply::Accepted(stored) => {
            // The client gets no locator; the stored name is only in the log.
            tracing::info!(key = %stored.key, "Conversion acknowledged without download link");
            StatusCode::ACCEPTED
        }
    };

    Ok((status, Json(reply.payload())))
}
