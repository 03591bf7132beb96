//! Generation dispatcher
//!
//! Invokes the backend through its blocking or non-blocking entry point according
//! to the processing mode. Both paths yield the generated text to the caller; the
//! mode only selects how the backend is driven.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tonewrite_core::ProcessingMode;

use crate::backend::{GenerationBackend, GenerationRequest};
use crate::error::{GenerationError, GenerationResult};

/// Handle to a generation running on its own task.
///
/// Awaiting it yields the generated text. Dropping it aborts the task, and with it
/// the in-flight backend call, so an abandoned request leaves no background work.
#[derive(Debug)]
pub struct GenerationHandle {
    task: JoinHandle<GenerationResult<String>>,
}

impl GenerationHandle {
    /// Abort the generation; awaiting the handle afterwards yields `Cancelled`.
    pub fn cancel(&self) {
        self.task.abort();
    }
}

impl Future for GenerationHandle {
    type Output = GenerationResult<String>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.task).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(e)) if e.is_cancelled() => Poll::Ready(Err(GenerationError::Cancelled)),
            Poll::Ready(Err(e)) => Poll::Ready(Err(GenerationError::Backend(format!(
                "Generation task failed: {}",
                e
            )))),
        }
    }
}

impl Drop for GenerationHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[derive(Clone)]
pub struct GenerationDispatcher {
    backend: Arc<dyn GenerationBackend>,
    deadline: Option<Duration>,
}

impl GenerationDispatcher {
    /// `deadline` is forwarded to the backend with every request; the dispatcher
    /// itself enforces no timeout.
    pub fn new(backend: Arc<dyn GenerationBackend>, deadline: Option<Duration>) -> Self {
        Self { backend, deadline }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    fn request(&self, prompt: String) -> GenerationRequest {
        GenerationRequest::new(prompt).with_deadline(self.deadline)
    }

    pub async fn generate(&self, prompt: String, mode: ProcessingMode) -> GenerationResult<String> {
        let start = Instant::now();
        let prompt_chars = prompt.chars().count();

        tracing::info!(
            backend = %self.backend.name(),
            mode = %mode,
            prompt_chars,
            "Dispatching generation"
        );

        let result = match mode {
            ProcessingMode::Synchronous => self.generate_blocking(prompt).await,
            ProcessingMode::Asynchronous => self.submit(prompt).await,
        };

        match &result {
            Ok(text) => tracing::info!(
                backend = %self.backend.name(),
                mode = %mode,
                text_chars = text.chars().count(),
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Generation completed"
            ),
            Err(e) => tracing::warn!(
                backend = %self.backend.name(),
                mode = %mode,
                error = %e,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Generation failed"
            ),
        }

        result
    }

    /// Run the backend's blocking entry point on the blocking pool and wait for it.
    ///
    /// The wait cannot be interrupted; the forwarded deadline bounds it.
    pub async fn generate_blocking(&self, prompt: String) -> GenerationResult<String> {
        let backend = self.backend.clone();
        let request = self.request(prompt);

        tokio::task::spawn_blocking(move || backend.generate_blocking(&request))
            .await
            .map_err(|e| GenerationError::Backend(format!("Blocking generation task failed: {}", e)))?
    }

    /// Start the backend's non-blocking entry point on its own task.
    pub fn submit(&self, prompt: String) -> GenerationHandle {
        let backend = self.backend.clone();
        let request = self.request(prompt);

        let task = tokio::spawn(async move { backend.generate(&request).await });
        GenerationHandle { task }
    }
}
