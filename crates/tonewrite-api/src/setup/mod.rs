//! Application setup and initialization
//!
//! Builds every collaborator explicitly from `Config` and hands them to the
//! conversion service; nothing is looked up from a global registry.

pub mod routes;
pub mod server;

use std::sync::Arc;

use anyhow::{Context, Result};
use tonewrite_core::{AdmissionPolicy, Config};
use tonewrite_infra::{init_telemetry, LogFormat};
use tonewrite_llm::{create_backend, GenerationBackend, GenerationDispatcher};
use tonewrite_processing::OutputDocumentWriter;
use tonewrite_storage::{create_storage, Storage};

use crate::services::ToneConversionService;
use crate::state::AppState;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    init_telemetry(LogFormat::parse(&config.log_format))
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment,
        processing_mode = %config.processing_mode(),
        output_dir = %config.output_dir().display(),
        backend = %config.generation.backend,
        "Configuration loaded and validated successfully"
    );

    let storage = create_storage(&config)
        .await
        .context("Failed to initialize output storage")?;

    let backend =
        create_backend(&config.generation).context("Failed to initialize generation backend")?;

    let state = build_state(config, storage, backend);
    let router = routes::setup_routes(state.clone());

    Ok((state, router))
}

/// Wire the conversion pipeline from already constructed collaborators.
pub fn build_state(
    config: Config,
    storage: Arc<dyn Storage>,
    backend: Arc<dyn GenerationBackend>,
) -> Arc<AppState> {
    let admission = AdmissionPolicy::from_config(&config);
    let dispatcher = GenerationDispatcher::new(backend, config.generation.timeout);
    let writer = OutputDocumentWriter::new(storage.clone());

    let conversion = ToneConversionService::new(
        admission.clone(),
        dispatcher,
        writer,
        config.processing_mode(),
    );

    Arc::new(AppState {
        config: Arc::new(config),
        storage,
        admission,
        conversion,
    })
}
