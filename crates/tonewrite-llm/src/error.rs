use tonewrite_core::AppError;

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Generation backend error: {0}")]
    Backend(String),

    #[error("Generation backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Generation backend returned no text")]
    EmptyResponse,

    #[error("Generation cancelled")]
    Cancelled,

    #[error("Generation backend misconfigured: {0}")]
    Config(String),
}

pub type GenerationResult<T> = Result<T, GenerationError>;

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::Cancelled => AppError::Cancelled,
            other => AppError::Backend(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonewrite_core::ErrorMetadata;

    #[test]
    fn test_generation_errors_map_to_processing_error() {
        let err: AppError = GenerationError::Status {
            status: 529,
            body: "overloaded".to_string(),
        }
        .into();
        assert_eq!(err.error_code(), "BACKEND_ERROR");
        assert_eq!(err.client_message(), "File processing error.");

        let err: AppError = GenerationError::Cancelled.into();
        assert_eq!(err.error_code(), "GENERATION_CANCELLED");
        assert_eq!(err.http_status_code(), 500);
    }
}
