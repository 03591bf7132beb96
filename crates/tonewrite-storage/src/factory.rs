use std::sync::Arc;

use tonewrite_core::Config;

use crate::{LocalStorage, Storage, StorageResult};

/// Create the storage backend for generated documents, rooted at `OUTPUT_DIR`.
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    let storage = LocalStorage::new(config.output_dir()).await?;
    Ok(Arc::new(storage))
}
