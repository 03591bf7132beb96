//! Multipart admission gate for tone conversion requests.
//!
//! Reads the `toneFile` and `contentFile` parts and runs the admission policy
//! before the handler body executes, so a rejected upload costs no extraction or
//! generation work. Unknown parts are drained and ignored; a repeated part keeps
//! its first occurrence.

use std::sync::Arc;

use axum::extract::{FromRequest, Multipart, Request};
use tonewrite_core::{AppError, FileRole, UploadRejection, UploadedFile};

use crate::error::HttpAppError;
use crate::state::AppState;

/// Both uploads of a conversion request, already admitted.
#[derive(Debug, Clone)]
pub struct ConversionUpload {
    pub tone: UploadedFile,
    pub content: UploadedFile,
}

impl FromRequest<Arc<AppState>> for ConversionUpload {
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state).await?;

        let mut tone: Option<UploadedFile> = None;
        let mut content: Option<UploadedFile> = None;

        while let Some(field) = multipart.next_field().await? {
            let Some(role) = field.name().and_then(FileRole::from_field_name) else {
                tracing::debug!(field = ?field.name(), "Ignoring unexpected multipart field");
                continue;
            };

            let content_type = field.content_type().map(str::to_string);
            let filename = field.file_name().map(str::to_string);
            let data = field.bytes().await?;

            let slot = match role {
                FileRole::Tone => &mut tone,
                FileRole::Content => &mut content,
            };
            if slot.is_some() {
                tracing::debug!(role = %role, "Ignoring repeated multipart field");
                continue;
            }

            let mut file = UploadedFile::new(role, data, content_type);
            if let Some(filename) = filename {
                file = file.with_filename(filename);
            }

            tracing::debug!(
                role = %role,
                size_bytes = file.declared_size,
                content_type = %file.media_type(),
                "Received upload"
            );
            *slot = Some(file);
        }

        state.admission.admit(tone.as_ref(), content.as_ref())?;

        match (tone, content) {
            (Some(tone), Some(content)) => Ok(ConversionUpload { tone, content }),
            (None, _) => Err(missing(FileRole::Tone)),
            (_, None) => Err(missing(FileRole::Content)),
        }
    }
}

fn missing(role: FileRole) -> HttpAppError {
    HttpAppError(AppError::UploadRejected(UploadRejection::MissingOrEmpty { role }))
}
