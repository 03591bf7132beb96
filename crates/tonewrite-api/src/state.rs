//! Application state shared by every handler.
//!
//! Everything here is read-only after startup; requests share no mutable state.

use std::sync::Arc;

use tonewrite_core::{AdmissionPolicy, Config};
use tonewrite_storage::Storage;

use crate::services::ToneConversionService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Storage holding generated documents; also serves downloads.
    pub storage: Arc<dyn Storage>,
    /// Admission rules applied by the multipart gate before any handler runs.
    pub admission: AdmissionPolicy,
    pub conversion: ToneConversionService,
}
