use std::path::Path;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::constants::DOWNLOAD_PATH_PREFIX;
use crate::error::ErrorMetadata;

pub const SUCCESS_MESSAGE: &str =
    "File successfully uploaded, processing completed (or check in target folder).";
pub const ACCEPTED_MESSAGE: &str = "Processing started asynchronously.";

/// Returned when a conversion completed synchronously
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ConversionResponse {
    pub message: String,
    /// Locator for `GET /api/files/download/{file_name}`
    #[serde(rename = "downloadLink")]
    pub download_link: String,
}

/// Returned when the conversion runs in asynchronous mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AcceptedResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Exactly one outbound shape per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponsePayload {
    Success(ConversionResponse),
    Accepted(AcceptedResponse),
    Failure(ErrorResponse),
}

/// Download locator for a stored file name. Never includes directories.
pub fn download_link(file_name: &str) -> String {
    format!("{}{}", DOWNLOAD_PATH_PREFIX, file_name)
}

impl ResponsePayload {
    /// Build the success payload from wherever the document was stored; only the
    /// base name reaches the client.
    pub fn success(stored: impl AsRef<Path>) -> Self {
        let file_name = stored
            .as_ref()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        ResponsePayload::Success(ConversionResponse {
            message: SUCCESS_MESSAGE.to_string(),
            download_link: download_link(&file_name),
        })
    }

    pub fn accepted() -> Self {
        ResponsePayload::Accepted(AcceptedResponse {
            message: ACCEPTED_MESSAGE.to_string(),
        })
    }

    pub fn failure(err: &impl ErrorMetadata) -> Self {
        ResponsePayload::Failure(ErrorResponse {
            error: err.client_message(),
        })
    }
}
