use anyhow::Result;
use async_trait::async_trait;

/// Resolves and stores the user's display name.
///
/// The engine treats any failure here as "no name known".
#[async_trait]
pub trait NameStore: Send + Sync {
    /// The stored display name, if onboarding has completed.
    async fn get_stored_name(&self) -> Result<Option<String>>;

    /// Persist a display name and return the name as stored.
    async fn set_stored_name(&self, name: &str) -> Result<String>;
}
