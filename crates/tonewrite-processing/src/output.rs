//! Output document writer
//!
//! Renders generated text into a `.docx` package and stores it under a fresh
//! `<uuid>_output_document.docx` name.

use std::sync::Arc;
use std::time::Instant;

use tonewrite_core::AppError;
use tonewrite_storage::{generate_output_filename, Storage};

use crate::document::render_document;

/// Reference to a fully written output document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    /// Storage key; also the base file name used in the download locator
    pub key: String,
    pub size_bytes: usize,
}

#[derive(Clone)]
pub struct OutputDocumentWriter {
    storage: Arc<dyn Storage>,
}

impl OutputDocumentWriter {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn write(&self, generated_text: &str) -> Result<StoredDocument, AppError> {
        let text = generated_text.to_string();
        let start = Instant::now();

        let bytes = tokio::task::spawn_blocking(move || render_document(&text))
            .await
            .map_err(|e| AppError::Unexpected(format!("Document render task failed: {}", e)))??;

        let size_bytes = bytes.len();
        let filename = generate_output_filename();
        let key = self.storage.store(&filename, bytes).await?;

        tracing::info!(
            key = %key,
            size_bytes,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Output document written"
        );

        Ok(StoredDocument { key, size_bytes })
    }
}
