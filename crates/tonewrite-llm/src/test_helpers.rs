//! Scripted generation backends for tests
//!
//! `RecordingBackend` answers every prompt with a fixed reply (or a fixed failure)
//! and records what it was asked and through which entry point.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::backend::{GenerationBackend, GenerationRequest};
use crate::error::{GenerationError, GenerationResult};

#[derive(Debug, Default)]
struct Counters {
    async_calls: AtomicUsize,
    blocking_calls: AtomicUsize,
    completed: AtomicUsize,
}

#[derive(Debug, Clone)]
pub struct RecordingBackend {
    reply: Result<String, String>,
    delay: Option<Duration>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
    counters: Arc<Counters>,
}

impl RecordingBackend {
    /// Backend that answers every prompt with `reply`.
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: Ok(reply.into()),
            delay: None,
            requests: Arc::new(Mutex::new(Vec::new())),
            counters: Arc::new(Counters::default()),
        }
    }

    /// Backend whose every call fails with `GenerationError::Backend(message)`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
            ..Self::new("")
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.prompt).collect()
    }

    /// Calls through either entry point.
    pub fn call_count(&self) -> usize {
        self.async_calls() + self.blocking_calls()
    }

    pub fn async_calls(&self) -> usize {
        self.counters.async_calls.load(Ordering::SeqCst)
    }

    pub fn blocking_calls(&self) -> usize {
        self.counters.blocking_calls.load(Ordering::SeqCst)
    }

    /// Calls that ran to the end, successfully or not.
    pub fn completed_calls(&self) -> usize {
        self.counters.completed.load(Ordering::SeqCst)
    }

    fn record(&self, request: &GenerationRequest) {
        self.requests.lock().unwrap().push(request.clone());
    }

    fn answer(&self) -> GenerationResult<String> {
        self.counters.completed.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().map_err(GenerationError::Backend)
    }
}

#[async_trait]
impl GenerationBackend for RecordingBackend {
    fn name(&self) -> &str {
        "recording"
    }

    async fn generate(&self, request: &GenerationRequest) -> GenerationResult<String> {
        self.counters.async_calls.fetch_add(1, Ordering::SeqCst);
        self.record(request);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.answer()
    }

    fn generate_blocking(&self, request: &GenerationRequest) -> GenerationResult<String> {
        self.counters.blocking_calls.fetch_add(1, Ordering::SeqCst);
        self.record(request);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        self.answer()
    }
}
