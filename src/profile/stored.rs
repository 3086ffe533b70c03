//! Display name kept in the client's own collection store.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::traits::NameStore;
use crate::store::{CollectionStore, PROFILE_KEY};

/// Longest display name accepted, in characters.
const MAX_NAME_CHARS: usize = 64;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Profile {
    #[serde(default)]
    display_name: Option<String>,
}

pub struct StoredNameStore {
    store: Arc<dyn CollectionStore>,
}

impl StoredNameStore {
    pub fn new(store: Arc<dyn CollectionStore>) -> Self {
        Self { store }
    }
}

/// Trim and bound a submitted name. `None` for a blank submission.
pub fn normalize_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(MAX_NAME_CHARS).collect())
}

#[async_trait]
impl NameStore for StoredNameStore {
    async fn get_stored_name(&self) -> Result<Option<String>> {
        let Some(raw) = self.store.read_collection(PROFILE_KEY).await? else {
            return Ok(None);
        };
        let profile: Profile = serde_json::from_str(&raw).context("Profile is corrupt")?;
        Ok(profile.display_name.as_deref().and_then(normalize_name))
    }

    async fn set_stored_name(&self, name: &str) -> Result<String> {
        let Some(name) = normalize_name(name) else {
            bail!("display name must not be empty");
        };
        let profile = Profile {
            display_name: Some(name.clone()),
        };
        let raw = serde_json::to_string(&profile).context("Failed to serialize profile")?;
        self.store.write_collection(PROFILE_KEY, &raw).await?;
        Ok(name)
    }
}
