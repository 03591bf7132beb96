//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p tonewrite-api`. Each app gets its own
//! temporary output directory and a recording backend instead of a live LLM.

#![allow(dead_code)]

pub mod fixtures;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use tempfile::TempDir;
use tonewrite_api::setup::{build_state, routes};
use tonewrite_core::constants::DOCX_CONTENT_TYPE;
use tonewrite_core::{Config, ProcessingMode};
use tonewrite_llm::test_helpers::RecordingBackend;
use tonewrite_storage::{LocalStorage, Storage};

pub const CONVERT_PATH: &str = "/api/convert-tone";

/// Text the recording backend answers with.
pub const GENERATED_TEXT: &str = "Hey folks!\nHeads-up: quarterly review is on Friday.\nCheers";

/// Test application: server, backend spy, and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub backend: RecordingBackend,
    pub output_dir: PathBuf,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Names of the files currently in the output directory, sorted.
    pub fn output_files(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.output_dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

pub async fn setup_test_app(mode: ProcessingMode) -> TestApp {
    setup_test_app_with(mode, RecordingBackend::new(GENERATED_TEXT)).await
}

/// Setup test app with an isolated output directory and the given backend.
pub async fn setup_test_app_with(mode: ProcessingMode, backend: RecordingBackend) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let output_dir = temp_dir.path().join("output");

    let config = Config {
        processing_mode: mode,
        output_dir: output_dir.clone(),
        ..Config::default()
    };

    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(&output_dir)
            .await
            .expect("Failed to create local storage"),
    );

    let state = build_state(config, storage, Arc::new(backend.clone()));
    let app = routes::setup_routes(state);

    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        backend,
        output_dir,
        _temp_dir: temp_dir,
    }
}

pub fn docx_part(bytes: Vec<u8>, file_name: &str) -> Part {
    Part::bytes(bytes::Bytes::from(bytes))
        .file_name(file_name.to_string())
        .mime_type(DOCX_CONTENT_TYPE)
}

/// Multipart body with both uploads present.
pub fn conversion_form(tone: Vec<u8>, content: Vec<u8>) -> MultipartForm {
    MultipartForm::new()
        .add_part("toneFile", docx_part(tone, "tone.docx"))
        .add_part("contentFile", docx_part(content, "content.docx"))
}
