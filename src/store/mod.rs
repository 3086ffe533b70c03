//! Persistent store: durable whole-collection storage for sessions, mood
//! entries and the user profile.

pub mod collections;
pub mod file;
pub mod in_memory;
pub mod traits;

pub use collections::Collections;
pub use file::FileCollectionStore;
pub use in_memory::InMemoryCollectionStore;
pub use traits::{CollectionStore, MOOD_ENTRIES_KEY, PROFILE_KEY, SESSIONS_KEY};

use crate::config::StorageConfig;
use anyhow::{bail, Result};
use std::path::Path;
use std::sync::Arc;

/// Factory: create the configured store backend.
pub fn create_store(config: &StorageConfig, data_dir: &Path) -> Result<Arc<dyn CollectionStore>> {
    match config.backend.trim().to_ascii_lowercase().as_str() {
        "file" => Ok(Arc::new(FileCollectionStore::new(data_dir))),
        "memory" => Ok(Arc::new(InMemoryCollectionStore::new())),
        other => bail!("unknown storage backend: {other}"),
    }
}
