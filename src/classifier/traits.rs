//! Remote classification/response service contract.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::conversation::Role;

/// One prior exchange as the service expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryTurn {
    pub role: Role,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifierRequest {
    pub message: String,
    pub conversation_history: Vec<HistoryTurn>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifierResponse {
    pub response: String,
    #[serde(default)]
    pub sentiment: Option<String>,
    #[serde(default)]
    pub is_crisis: bool,
}

/// Produces the assistant reply and a sentiment label for a user message.
///
/// Implementations are opaque to the engine; any error is treated as a
/// connectivity failure.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, request: &ClassifierRequest) -> Result<ClassifierResponse>;

    /// The name of this classifier implementation.
    fn name(&self) -> &str;
}
