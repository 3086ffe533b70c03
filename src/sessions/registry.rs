//! Read path over stored sessions.

use anyhow::Result;
use parking_lot::RwLock;
use std::sync::Arc;

use super::types::Session;
use crate::store::{Collections, SESSIONS_KEY};

/// Lists and deletes stored sessions.
///
/// Keeps a most-recent-first snapshot of the collection. The snapshot is a
/// derived view only: it is rebuilt from the store on every `list` and after
/// every mutation.
pub struct SessionRegistry {
    collections: Arc<Collections>,
    cache: RwLock<Vec<Session>>,
}

impl SessionRegistry {
    pub fn new(collections: Arc<Collections>) -> Self {
        Self {
            collections,
            cache: RwLock::new(Vec::new()),
        }
    }

    /// All stored sessions, most recent first. Empty if never written.
    pub async fn list(&self) -> Vec<Session> {
        let mut sessions: Vec<Session> = self.collections.load(SESSIONS_KEY).await;
        sessions.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        *self.cache.write() = sessions.clone();
        sessions
    }

    pub async fn get(&self, session_id: &str) -> Option<Session> {
        self.list().await.into_iter().find(|s| s.id == session_id)
    }

    /// Delete a session by id.
    ///
    /// Returns `Ok(false)` for an unknown id; the stored collection is left
    /// untouched in that case.
    pub async fn delete(&self, session_id: &str) -> Result<bool> {
        let removed = self
            .collections
            .update(SESSIONS_KEY, |sessions: &mut Vec<Session>| {
                let before = sessions.len();
                sessions.retain(|s| s.id != session_id);
                sessions.len() != before
            })
            .await?;

        if removed {
            tracing::info!(session_id, "Session deleted");
        } else {
            tracing::debug!(session_id, "Delete requested for unknown session");
        }
        self.list().await;
        Ok(removed)
    }

    /// Snapshot from the most recent `list` or mutation.
    pub fn cached(&self) -> Vec<Session> {
        self.cache.read().clone()
    }

    pub fn count(&self) -> usize {
        self.cache.read().len()
    }
}
