//! Finalized conversation sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::conversation::Message;
use crate::mood::Sentiment;

/// One finalized, immutable conversation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub messages: Vec<Message>,
    pub dominant_sentiment: Sentiment,
    pub message_count: usize,
}

impl Session {
    /// Length of the conversation.
    pub fn duration(&self) -> chrono::Duration {
        self.ended_at - self.started_at
    }

    /// First user message, used as a short preview in listings.
    pub fn preview(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == crate::conversation::Role::User)
            .map(|m| m.text.as_str())
    }
}
