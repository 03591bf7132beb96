use std::sync::Arc;

use tonewrite_core::GenerationConfig;

use crate::{AnthropicBackend, GenerationBackend, GenerationError, GenerationResult};

/// Create the configured generation backend.
pub fn create_backend(config: &GenerationConfig) -> GenerationResult<Arc<dyn GenerationBackend>> {
    match config.backend.as_str() {
        "anthropic" => Ok(Arc::new(AnthropicBackend::new(config)?)),
        other => Err(GenerationError::Config(format!(
            "Unsupported generation backend: {}",
            other
        ))),
    }
}
