use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

use async_trait::async_trait;
use futures::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;

use crate::keys::validate_key;
use crate::traits::{ByteStream, Storage, StorageError, StorageResult};

/// Documents stored as plain files directly under one root directory.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    /// Open (and create if needed) the storage root, e.g. `./output`.
    pub async fn new(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let storage = LocalStorage { root: root.into() };
        storage.ensure_root().await?;
        Ok(storage)
    }

    async fn ensure_root(&self) -> StorageResult<()> {
        fs::create_dir_all(&self.root).await.map_err(|e| {
            StorageError::RootUnavailable(format!("{}: {}", self.root.display(), e))
        })
    }

    /// Resolve a key to its file, refusing anything that could land outside the root.
    fn resolve(&self, key: &str) -> StorageResult<PathBuf> {
        if !validate_key(key) {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        let path = self.root.join(key);

        // A symlinked entry must still point inside the root.
        if let (Ok(target), Ok(root)) = (path.canonicalize(), self.root.canonicalize()) {
            if !target.starts_with(&root) {
                return Err(StorageError::InvalidKey(key.to_string()));
            }
        }

        Ok(path)
    }

    /// Write and sync one file. The handle is released when this returns, on
    /// success and failure alike.
    async fn write_file(path: &Path, data: &[u8]) -> std::io::Result<()> {
        let mut file = fs::File::create(path).await?;
        file.write_all(data).await?;
        file.sync_all().await
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn store(&self, name: &str, data: Vec<u8>) -> StorageResult<String> {
        let path = self.resolve(name)?;
        self.ensure_root().await?;

        let start = Instant::now();
        if let Err(e) = Self::write_file(&path, &data).await {
            // No truncated document may stay behind under a name a client could get.
            let _ = fs::remove_file(&path).await;
            tracing::error!(path = %path.display(), error = %e, "Failed to write document");
            return Err(StorageError::WriteFailed(format!("{}: {}", path.display(), e)));
        }

        tracing::debug!(
            path = %path.display(),
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Document stored"
        );

        Ok(name.to_string())
    }

    async fn open_stream(&self, key: &str) -> StorageResult<ByteStream> {
        let path = self.resolve(key)?;

        let file = match fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => return Err(StorageError::ReadFailed(format!("{}: {}", path.display(), e))),
        };

        let key = key.to_string();
        let stream = ReaderStream::new(file).map(move |chunk| {
            chunk.map_err(|e| {
                tracing::error!(key = %key, error = %e, "Document stream interrupted");
                StorageError::ReadFailed(e.to_string())
            })
        });

        Ok(Box::pin(stream))
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let path = self.resolve(key)?;
        Ok(fs::try_exists(&path).await?)
    }

    async fn size(&self, key: &str) -> StorageResult<u64> {
        let path = self.resolve(key)?;
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(meta.len()),
            Ok(_) => Err(StorageError::NotFound(key.to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound(key.to_string())),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}
