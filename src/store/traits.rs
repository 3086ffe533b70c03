//! Persistent collection storage traits.

use anyhow::Result;
use async_trait::async_trait;

/// Collection key holding the serialized session array.
pub const SESSIONS_KEY: &str = "sessions";

/// Collection key holding the serialized mood entry array.
pub const MOOD_ENTRIES_KEY: &str = "mood_entries";

/// Collection key holding the user profile (display name).
pub const PROFILE_KEY: &str = "profile";

/// Durable key-value store scoped to this client.
///
/// Each key holds one whole serialized collection. There are no partial
/// updates: callers read the raw value, decode, modify and write the whole
/// value back.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// Read the raw serialized value for `key`, or `None` if never written.
    async fn read_collection(&self, key: &str) -> Result<Option<String>>;

    /// Replace the raw serialized value for `key`.
    async fn write_collection(&self, key: &str, raw: &str) -> Result<()>;

    /// The name of this store implementation.
    fn name(&self) -> &str;
}
