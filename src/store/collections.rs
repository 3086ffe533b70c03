//! Typed access to whole-collection storage with per-key write serialization.

use anyhow::{Context, Result};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use super::traits::CollectionStore;

/// Typed view over a [`CollectionStore`].
///
/// Every read-modify-write of a key runs under that key's async lock, so two
/// tasks appending to the same collection can never lose each other's update.
/// Different keys do not contend.
pub struct Collections {
    store: Arc<dyn CollectionStore>,
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl Collections {
    pub fn new(store: Arc<dyn CollectionStore>) -> Self {
        Self {
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// The underlying raw store.
    pub fn store(&self) -> &dyn CollectionStore {
        self.store.as_ref()
    }

    fn lock_for(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        self.locks
            .lock()
            .entry(key.to_string())
            .or_default()
            .clone()
    }

    /// Load a collection for display or aggregation.
    ///
    /// Never fails: an absent key, an unreadable store or unparseable contents
    /// all produce an empty collection (the last two are logged). Individual
    /// records that do not decode are skipped with a warning.
    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        match self.store.read_collection(key).await {
            Ok(raw) => decode_or_empty(key, raw),
            Err(error) => {
                tracing::warn!(key, "Collection read failed, treating as empty: {error:#}");
                Vec::new()
            }
        }
    }

    /// Read-modify-write a collection under its lock.
    ///
    /// `apply` returns whether it changed the collection; nothing is written
    /// when it returns `false`. Corrupt contents are treated as empty and
    /// undecodable records are dropped, but a failed read aborts the update so
    /// a transient store error can never clobber previously persisted data.
    pub async fn update<T, F>(&self, key: &str, apply: F) -> Result<bool>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut Vec<T>) -> bool,
    {
        let lock = self.lock_for(key);
        let _guard = lock.lock().await;

        let raw = self
            .store
            .read_collection(key)
            .await
            .with_context(|| format!("Failed to read collection '{key}' before update"))?;
        let mut items: Vec<T> = decode_or_empty(key, raw);

        if !apply(&mut items) {
            return Ok(false);
        }

        let encoded = serde_json::to_string(&items)
            .with_context(|| format!("Failed to serialize collection '{key}'"))?;
        self.store.write_collection(key, &encoded).await?;
        tracing::debug!(key, len = items.len(), "Collection written");
        Ok(true)
    }
}

fn decode_or_empty<T: DeserializeOwned>(key: &str, raw: Option<String>) -> Vec<T> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    if raw.trim().is_empty() {
        return Vec::new();
    }
    let values: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
        Ok(values) => values,
        Err(error) => {
            tracing::warn!(key, "Collection is corrupt, treating as empty: {error}");
            return Vec::new();
        }
    };

    // One bad record must not cost the rest of the collection.
    let mut items = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value(value) {
            Ok(item) => items.push(item),
            Err(error) => tracing::warn!(key, index, "Skipping undecodable record: {error}"),
        }
    }
    items
}
