//! Tonewrite Core Library
//!
//! This crate provides the domain models, error taxonomy, configuration and upload
//! admission rules shared by every Tonewrite component.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::{Config, GenerationConfig, ProcessingMode};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{FileRole, ResponsePayload, UploadedFile};
pub use validation::{validate_upload, AdmissionPolicy, AdmissionRule, UploadRejection};
