use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mood::Sentiment;

/// Reserved id of the synthetic greeting that opens every conversation.
pub const GREETING_ID: &str = "greeting";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message of a conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_crisis: Option<bool>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    fn fresh_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    pub fn user(text: &str) -> Self {
        Self {
            id: Self::fresh_id(),
            role: Role::User,
            text: text.to_string(),
            sentiment: None,
            is_crisis: None,
            created_at: Utc::now(),
        }
    }

    pub fn assistant(text: String, sentiment: Option<Sentiment>, is_crisis: Option<bool>) -> Self {
        Self {
            id: Self::fresh_id(),
            role: Role::Assistant,
            text,
            sentiment,
            is_crisis,
            created_at: Utc::now(),
        }
    }

    /// The synthetic greeting. Carries no sentiment and is never sent to the
    /// classifier.
    pub fn greeting(text: String) -> Self {
        Self {
            id: GREETING_ID.to_string(),
            role: Role::Assistant,
            text,
            sentiment: None,
            is_crisis: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_greeting(&self) -> bool {
        self.id == GREETING_ID
    }

    pub fn is_crisis(&self) -> bool {
        self.is_crisis.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_assign_unique_ids() {
        let a = Message::user("hello");
        let b = Message::user("hello");
        assert_ne!(a.id, b.id);
        assert_eq!(a.role, Role::User);
    }

    #[test]
    fn greeting_uses_reserved_id() {
        let g = Message::greeting("Hi there".into());
        assert!(g.is_greeting());
        assert!(g.sentiment.is_none());
        assert!(!Message::user("x").is_greeting());
    }

    #[test]
    fn serialized_form_is_camel_case() {
        let m = Message::assistant("ok".into(), Some(Sentiment::Stress), Some(false));
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["sentiment"], "Stress");
        assert_eq!(json["isCrisis"], false);
        assert!(json["createdAt"].is_string());

        let back: Message = serde_json::from_value(json).unwrap();
        assert_eq!(back, m);
    }
}
