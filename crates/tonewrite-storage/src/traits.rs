//! Storage abstraction for generated documents.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use thiserror::Error;
use tonewrite_core::AppError;

#[derive(Debug, Error)]
pub enum StorageError {
    /// The storage root could not be created.
    #[error("Storage root unavailable: {0}")]
    RootUnavailable(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("No stored document named {0}")]
    NotFound(String),

    /// The name is not a single plain file name under the root.
    #[error("Invalid document name: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Chunked document contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(key) => AppError::NotFound(key),
            StorageError::InvalidKey(key) => {
                AppError::BadRequest(format!("Invalid file name: {}", key))
            }
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Where output documents live.
///
/// The writer only needs "store bytes under a fresh name, get a reference back";
/// the download route only needs "read by that reference". Retention is left to
/// whoever operates the storage root.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store `data` under `name` and return the key to read it back with.
    ///
    /// The storage root is (re)created if absent before every write.
    async fn store(&self, name: &str, data: Vec<u8>) -> StorageResult<String>;

    /// Stream a stored document in chunks.
    async fn open_stream(&self, key: &str) -> StorageResult<ByteStream>;

    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Size in bytes of a stored document.
    async fn size(&self, key: &str) -> StorageResult<u64>;
}
