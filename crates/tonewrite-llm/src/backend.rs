//! Generation backend abstraction

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use tokio::runtime::Handle;

use crate::error::{GenerationError, GenerationResult};

/// One prompt for a backend, with the optional deadline the backend should honour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub deadline: Option<Duration>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }
}

/// A text-generation capability: `generate(prompt) -> text`.
#[async_trait]
pub trait GenerationBackend: Send + Sync + Debug {
    /// Backend identifier for logs
    fn name(&self) -> &str;

    /// Non-blocking entry point. Dropping the future abandons the call.
    async fn generate(&self, request: &GenerationRequest) -> GenerationResult<String>;

    /// Blocking entry point.
    ///
    /// Blocks the calling thread until the backend answers. Call it from
    /// `spawn_blocking`, never from an async worker thread.
    fn generate_blocking(&self, request: &GenerationRequest) -> GenerationResult<String> {
        let handle = Handle::try_current()
            .map_err(|e| GenerationError::Config(format!("No async runtime available: {}", e)))?;
        handle.block_on(self.generate(request))
    }
}
