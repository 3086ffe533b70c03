//! Idempotent recorder of one mood entry per classified message.

use anyhow::Result;
use chrono::Local;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

use super::types::MoodEntry;
use crate::conversation::Message;
use crate::store::{Collections, MOOD_ENTRIES_KEY};

/// Records mood entries and remembers which messages already produced one.
///
/// The recorded-id set lives on the instance. Build one ledger per process
/// and hand it to collaborators as an `Arc<MoodLedger>`.
pub struct MoodLedger {
    collections: Arc<Collections>,
    recorded: Mutex<HashSet<String>>,
}

impl MoodLedger {
    pub fn new(collections: Arc<Collections>) -> Self {
        Self {
            collections,
            recorded: Mutex::new(HashSet::new()),
        }
    }

    /// Create a ledger whose recorded set is seeded from the message ids
    /// already present in the store.
    pub async fn hydrate(collections: Arc<Collections>) -> Self {
        let entries: Vec<MoodEntry> = collections.load(MOOD_ENTRIES_KEY).await;
        let recorded: HashSet<String> = entries.into_iter().filter_map(|e| e.message_id).collect();
        tracing::debug!(seeded = recorded.len(), "Mood ledger hydrated");
        Self {
            collections,
            recorded: Mutex::new(recorded),
        }
    }

    /// Record the message's sentiment once.
    ///
    /// Returns `Ok(true)` when an entry was written, `Ok(false)` when the
    /// message carries no sentiment or was already recorded.
    pub async fn record(&self, message: &Message) -> Result<bool> {
        let Some(sentiment) = message.sentiment.clone() else {
            return Ok(false);
        };

        // Claim the id before writing so a concurrent retry cannot also write.
        if !self.recorded.lock().insert(message.id.clone()) {
            tracing::debug!(message_id = %message.id, "Mood already recorded, skipping");
            return Ok(false);
        }

        let entry = MoodEntry {
            day: message.created_at.with_timezone(&Local).date_naive(),
            sentiment,
            occurrence_count: 1,
            observed_at: message.created_at,
            message_id: Some(message.id.clone()),
        };

        let id = message.id.clone();
        let result = self
            .collections
            .update(MOOD_ENTRIES_KEY, move |entries: &mut Vec<MoodEntry>| {
                // A write that failed after reaching disk leaves the entry behind.
                if entries
                    .iter()
                    .any(|e| e.message_id.as_deref() == Some(id.as_str()))
                {
                    return false;
                }
                entries.push(entry);
                true
            })
            .await;

        match result {
            Ok(true) => {
                tracing::info!(message_id = %message.id, "Mood entry recorded");
                Ok(true)
            }
            Ok(false) => {
                tracing::debug!(message_id = %message.id, "Mood entry already stored, skipping");
                Ok(false)
            }
            Err(error) => {
                // Release the claim so the message can be recorded on retry.
                self.recorded.lock().remove(&message.id);
                Err(error)
            }
        }
    }

    /// All recorded mood entries, oldest first.
    pub async fn entries(&self) -> Vec<MoodEntry> {
        self.collections.load(MOOD_ENTRIES_KEY).await
    }

    pub fn has_recorded(&self, message_id: &str) -> bool {
        self.recorded.lock().contains(message_id)
    }

    pub fn recorded_count(&self) -> usize {
        self.recorded.lock().len()
    }
}
