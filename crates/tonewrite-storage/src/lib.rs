//! Tonewrite Storage Library
//!
//! Storage abstraction for generated output documents and its local filesystem
//! implementation.
//!
//! # Storage key format
//!
//! Keys are flat file names directly under the storage root, e.g.
//! `3f2c..._output_document.docx`. They never contain path separators, `..`, or a
//! leading `/`. Name generation lives in the `keys` module.

pub mod factory;
pub mod keys;
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::generate_output_filename;
pub use local::LocalStorage;
pub use traits::{ByteStream, Storage, StorageError, StorageResult};
