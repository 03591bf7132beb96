//! Tone conversion pipeline
//!
//! Runs admission, extraction, prompt composition, generation and output writing in
//! that order; the first failing stage aborts the request. The processing mode only
//! picks how the backend is driven and what the caller is told at the end: both
//! modes finish the whole chain before replying, so an asynchronous acknowledgement
//! is sent once the document is already on disk.

use std::time::Instant;

use tonewrite_core::{AdmissionPolicy, AppError, ProcessingMode, ResponsePayload, UploadedFile};
use tonewrite_llm::GenerationDispatcher;
use tonewrite_processing::{DocumentExtractor, OutputDocumentWriter, PromptComposer, StoredDocument};

/// Outcome of a successful pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionReply {
    /// Synchronous mode: the caller receives the download locator.
    Completed(StoredDocument),
    /// Asynchronous mode: the caller receives an acknowledgement only.
    Accepted(StoredDocument),
}

impl ConversionReply {
    pub fn payload(&self) -> ResponsePayload {
        match self {
            ConversionReply::Completed(stored) => ResponsePayload::success(&stored.key),
            ConversionReply::Accepted(_) => ResponsePayload::accepted(),
        }
    }
}

#[derive(Clone)]
pub struct ToneConversionService {
    admission: AdmissionPolicy,
    extractor: DocumentExtractor,
    composer: PromptComposer,
    dispatcher: GenerationDispatcher,
    writer: OutputDocumentWriter,
    mode: ProcessingMode,
}

impl ToneConversionService {
    pub fn new(
        admission: AdmissionPolicy,
        dispatcher: GenerationDispatcher,
        writer: OutputDocumentWriter,
        mode: ProcessingMode,
    ) -> Self {
        Self {
            admission,
            extractor: DocumentExtractor::new(),
            composer: PromptComposer::new(),
            dispatcher,
            writer,
            mode,
        }
    }

    pub fn mode(&self) -> ProcessingMode {
        self.mode
    }

    pub async fn convert(
        &self,
        tone: &UploadedFile,
        content: &UploadedFile,
    ) -> Result<ConversionReply, AppError> {
        let start = Instant::now();

        // Same rules as the multipart gate; callers outside HTTP get them too.
        self.admission.admit(Some(tone), Some(content))?;
        tracing::debug!(
            tone_bytes = tone.declared_size,
            content_bytes = content.declared_size,
            "Uploads admitted"
        );

        let tone_text = self.extractor.extract(tone).await?;
        let content_text = self.extractor.extract(content).await?;
        tracing::debug!(
            tone_chars = tone_text.chars().count(),
            content_chars = content_text.chars().count(),
            "Text extracted"
        );

        let prompt = self.composer.build_prompt(&tone_text, &content_text);
        let generated = self.dispatcher.generate(prompt, self.mode).await?;
        let stored = self.writer.write(&generated).await?;

        tracing::info!(
            mode = %self.mode,
            backend = self.dispatcher.backend_name(),
            key = %stored.key,
            size_bytes = stored.size_bytes,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Tone conversion completed"
        );

        Ok(match self.mode {
            ProcessingMode::Synchronous => ConversionReply::Completed(stored),
            ProcessingMode::Asynchronous => ConversionReply::Accepted(stored),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::{tempdir, TempDir};
    use tonewrite_core::constants::{DOCX_CONTENT_TYPE, MIN_UPLOAD_SIZE_BYTES};
    use tonewrite_core::{AdmissionRule, FileRole};
    use tonewrite_llm::test_helpers::RecordingBackend;
    use tonewrite_storage::{LocalStorage, Storage};

    async fn service(
        backend: &RecordingBackend,
        mode: ProcessingMode,
    ) -> (ToneConversionService, TempDir) {
        let dir = tempdir().unwrap();
        let storage: Arc<dyn Storage> = Arc::new(LocalStorage::new(dir.path()).await.unwrap());
        let admission = AdmissionPolicy::uniform(AdmissionRule::new(
            MIN_UPLOAD_SIZE_BYTES,
            &[DOCX_CONTENT_TYPE.to_string()],
        ));
        let dispatcher = GenerationDispatcher::new(Arc::new(backend.clone()), None);
        let service =
            ToneConversionService::new(admission, dispatcher, OutputDocumentWriter::new(storage), mode);
        (service, dir)
    }

    fn upload(role: FileRole, size: usize) -> UploadedFile {
        UploadedFile::new(role, vec![0u8; size], Some(DOCX_CONTENT_TYPE.to_string()))
    }

    #[tokio::test]
    async fn test_small_upload_never_reaches_backend() {
        let backend = RecordingBackend::new("unused");
        let (service, dir) = service(&backend, ProcessingMode::Synchronous).await;

        let err = service
            .convert(&upload(FileRole::Tone, 2000), &upload(FileRole::Content, 500))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::UploadRejected(_)));
        assert_eq!(backend.call_count(), 0);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_unparseable_upload_is_corrupt_document() {
        let backend = RecordingBackend::new("unused");
        let (service, _dir) = service(&backend, ProcessingMode::Synchronous).await;

        let err = service
            .convert(&upload(FileRole::Tone, 2000), &upload(FileRole::Content, 2000))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::CorruptDocument(_)));
        assert_eq!(backend.call_count(), 0);
    }

    #[test]
    fn test_reply_payload_shapes() {
        let stored = StoredDocument {
            key: "abc_output_document.docx".to_string(),
            size_bytes: 10,
        };

        let completed = serde_json::to_value(ConversionReply::Completed(stored.clone()).payload()).unwrap();
        assert_eq!(
            completed["downloadLink"],
            "/api/files/download/abc_output_document.docx"
        );

        let accepted = serde_json::to_value(ConversionReply::Accepted(stored).payload()).unwrap();
        assert!(accepted.get("downloadLink").is_none());
        assert_eq!(accepted["message"], "Processing started asynchronously.");
    }
}
