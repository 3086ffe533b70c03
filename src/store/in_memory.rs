//! In-memory collection store implementation.

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

use super::traits::CollectionStore;

/// An in-memory collection store backed by a mutex-protected hash map.
pub struct InMemoryCollectionStore {
    collections: Mutex<HashMap<String, String>>,
}

impl InMemoryCollectionStore {
    pub fn new() -> Self {
        Self {
            collections: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryCollectionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CollectionStore for InMemoryCollectionStore {
    async fn read_collection(&self, key: &str) -> Result<Option<String>> {
        Ok(self.collections.lock().get(key).cloned())
    }

    async fn write_collection(&self, key: &str, raw: &str) -> Result<()> {
        self.collections
            .lock()
            .insert(key.to_string(), raw.to_string());
        Ok(())
    }

    fn name(&self) -> &str {
        "in_memory"
    }
}
