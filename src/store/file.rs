//! File-backed collection store.
//!
//! Each collection lives in `<dir>/<key>.json` and is replaced atomically
//! on every write; a crash mid-write never leaves a half-written collection.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::traits::CollectionStore;
use crate::util::write_atomic;

/// Local filesystem collection store rooted at a data directory.
pub struct FileCollectionStore {
    dir: PathBuf,
}

impl FileCollectionStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn collection_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            bail!("invalid collection key: {key:?}");
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl CollectionStore for FileCollectionStore {
    async fn read_collection(&self, key: &str) -> Result<Option<String>> {
        let path = self.collection_path(key)?;
        match fs::read_to_string(&path).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to read collection: {}", path.display())),
        }
    }

    async fn write_collection(&self, key: &str, raw: &str) -> Result<()> {
        let path = self.collection_path(key)?;

        fs::create_dir_all(&self.dir).await.with_context(|| {
            format!("Failed to create data directory: {}", self.dir.display())
        })?;

        write_atomic(&path, raw.as_bytes())
            .await
            .with_context(|| format!("Failed to write collection '{key}'"))
    }

    fn name(&self) -> &str {
        "file"
    }
}
