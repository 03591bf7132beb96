//! Error types module
//!
//! All pipeline failures are unified under the `AppError` enum. Each stage crate
//! keeps its own `thiserror` enum and converts into `AppError` at the boundary;
//! `ErrorMetadata` then tells the HTTP layer how to present the failure without
//! leaking internal detail.

use std::io;

use crate::validation::UploadRejection;

/// Client-facing category messages.
pub const INVALID_FORMAT_MESSAGE: &str = "Invalid file format.";
pub const PROCESSING_ERROR_MESSAGE: &str = "File processing error.";
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred.";
pub const UPLOAD_ERROR_MESSAGE: &str = "File upload error.";
pub const NOT_FOUND_MESSAGE: &str = "File not found.";

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for client-caused failures worth noticing
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "BACKEND_ERROR")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details must stay out of responses
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Upload rejected: {0}")]
    UploadRejected(#[from] UploadRejection),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Corrupt document: {0}")]
    CorruptDocument(String),

    #[error("Generation backend error: {0}")]
    Backend(String),

    #[error("Generation cancelled")]
    Cancelled,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),

    #[error("Unexpected error with source: {message}")]
    UnexpectedWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::UnexpectedWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Storage(format!("IO error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, sensitive, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, LogLevel) {
    match err {
        AppError::UploadRejected(_) => (400, "UPLOAD_REJECTED", false, LogLevel::Debug),
        AppError::BadRequest(_) => (400, "BAD_REQUEST", false, LogLevel::Debug),
        AppError::CorruptDocument(_) => (400, "INVALID_FILE_FORMAT", true, LogLevel::Warn),
        AppError::Backend(_) => (500, "BACKEND_ERROR", true, LogLevel::Error),
        AppError::Cancelled => (500, "GENERATION_CANCELLED", true, LogLevel::Warn),
        AppError::Storage(_) => (500, "STORAGE_ERROR", true, LogLevel::Error),
        AppError::NotFound(_) => (404, "NOT_FOUND", false, LogLevel::Debug),
        AppError::Unexpected(_) => (500, "UNEXPECTED_ERROR", true, LogLevel::Error),
        AppError::UnexpectedWithSource { .. } => (500, "UNEXPECTED_ERROR", true, LogLevel::Error),
    }
}

impl AppError {
    /// Get the error type name for log records
    pub fn error_type(&self) -> &str {
        match self {
            AppError::UploadRejected(_) => "UploadRejected",
            AppError::BadRequest(_) => "BadRequest",
            AppError::CorruptDocument(_) => "CorruptDocument",
            AppError::Backend(_) => "Backend",
            AppError::Cancelled => "Cancelled",
            AppError::Storage(_) => "Storage",
            AppError::NotFound(_) => "NotFound",
            AppError::Unexpected(_) => "Unexpected",
            AppError::UnexpectedWithSource { .. } => "Unexpected",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            AppError::UploadRejected(ref rejection) => rejection.to_string(),
            AppError::BadRequest(ref msg) => msg.clone(),
            AppError::CorruptDocument(_) => INVALID_FORMAT_MESSAGE.to_string(),
            AppError::Backend(_) | AppError::Cancelled | AppError::Storage(_) => {
                PROCESSING_ERROR_MESSAGE.to_string()
            }
            AppError::NotFound(_) => NOT_FOUND_MESSAGE.to_string(),
            AppError::Unexpected(_) | AppError::UnexpectedWithSource { .. } => {
                UNEXPECTED_ERROR_MESSAGE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FileRole;

    #[test]
    fn test_error_metadata_upload_rejected() {
        let err = AppError::from(UploadRejection::TooSmall {
            role: FileRole::Content,
            size: 500,
            min_size: 1024,
        });
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "UPLOAD_REJECTED");
        assert_eq!(
            err.client_message(),
            "Content file is too small. Minimum size is 1024 bytes."
        );
        assert!(!err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_corrupt_document_hides_parser_detail() {
        let err = AppError::CorruptDocument("invalid Zip archive: EOCD not found".to_string());
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.client_message(), "Invalid file format.");
        assert!(!err.client_message().contains("Zip"));
    }

    #[test]
    fn test_processing_failures_share_category() {
        for err in [
            AppError::Backend("429 rate limited".to_string()),
            AppError::Cancelled,
            AppError::Storage("permission denied".to_string()),
        ] {
            assert_eq!(err.http_status_code(), 500);
            assert_eq!(err.client_message(), "File processing error.");
            assert!(err.is_sensitive());
        }
    }

    #[test]
    fn test_anyhow_maps_to_unexpected() {
        let err = AppError::from(anyhow::anyhow!("task panicked"));
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_type(), "Unexpected");
        assert_eq!(err.client_message(), "An unexpected error occurred.");
        assert!(err.detailed_message().contains("task panicked"));
    }

    #[test]
    fn test_io_error_maps_to_storage() {
        let err = AppError::from(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        assert_eq!(err.error_code(), "STORAGE_ERROR");
        assert_eq!(err.client_message(), "File processing error.");
    }

    #[test]
    fn test_not_found_message() {
        let err = AppError::NotFound("abc_output_document.docx".to_string());
        assert_eq!(err.http_status_code(), 404);
        assert_eq!(err.client_message(), "File not found.");
    }
}
