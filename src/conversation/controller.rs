//! Drives one conversation end to end: send round-trips, onboarding, and the
//! single end-of-conversation path.

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use super::assembler::ConversationAssembler;
use super::message::Message;
use crate::classifier::Classifier;
use crate::mood::MoodLedger;
use crate::profile::{normalize_name, resolve_name, NameStore};
use crate::sessions::{Session, SessionRecorder};

/// Failures of a send round-trip. Both are retryable and leave stored data
/// untouched.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("could not reach the assistant: {0}")]
    Connectivity(String),

    #[error("the assistant did not answer within {0}s")]
    Timeout(u64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// The assistant replied; the reply is now part of the conversation.
    Replied(Message),
    /// Blank input or a send already in flight.
    Ignored,
}

#[derive(Debug, Clone, Copy)]
pub struct ChatSettings {
    /// Upper bound on one classifier call.
    pub timeout: Duration,
    /// Pause before the reply is shown.
    pub typing_delay: Duration,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            typing_delay: Duration::from_millis(600),
        }
    }
}

pub struct ConversationController {
    assembler: ConversationAssembler,
    recorder: Arc<SessionRecorder>,
    classifier: Arc<dyn Classifier>,
    names: Arc<dyn NameStore>,
    started_at: DateTime<Utc>,
    settings: ChatSettings,
}

impl ConversationController {
    pub fn new(
        ledger: Arc<MoodLedger>,
        recorder: Arc<SessionRecorder>,
        classifier: Arc<dyn Classifier>,
        names: Arc<dyn NameStore>,
        settings: ChatSettings,
    ) -> Self {
        Self {
            assembler: ConversationAssembler::new(ledger, None),
            recorder,
            classifier,
            names,
            started_at: Utc::now(),
            settings,
        }
    }

    /// Resolve the user's name and open a fresh conversation.
    ///
    /// `fallback_name` is used when nothing is stored.
    pub async fn start(&mut self, fallback_name: Option<&str>) {
        let name = resolve_name(self.names.as_ref())
            .await
            .or_else(|| fallback_name.and_then(normalize_name));
        self.assembler.reset_with_greeting(name.as_deref());
        self.started_at = Utc::now();
        tracing::debug!(named = name.is_some(), "Conversation started");
    }

    pub fn assembler(&self) -> &ConversationAssembler {
        &self.assembler
    }

    pub fn messages(&self) -> &[Message] {
        self.assembler.messages()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Send a user message and wait for the assistant's reply.
    ///
    /// On timeout or failure the pending state is cleared and nothing is
    /// recorded; the caller may retry.
    pub async fn send(&mut self, text: &str) -> std::result::Result<SendOutcome, ChatError> {
        let Some(request) = self.assembler.begin_send(text) else {
            return Ok(SendOutcome::Ignored);
        };

        let call = self.classifier.classify(&request);
        let reply = match tokio::time::timeout(self.settings.timeout, call).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(error)) => {
                self.assembler.abort_send();
                tracing::warn!(classifier = self.classifier.name(), "Classifier call failed: {error:#}");
                return Err(ChatError::Connectivity(format!("{error:#}")));
            }
            Err(_) => {
                self.assembler.abort_send();
                let secs = self.settings.timeout.as_secs();
                tracing::warn!(classifier = self.classifier.name(), secs, "Classifier call timed out");
                return Err(ChatError::Timeout(secs));
            }
        };

        if !self.settings.typing_delay.is_zero() {
            tokio::time::sleep(self.settings.typing_delay).await;
        }

        let message = self.assembler.complete_send(reply).await.clone();
        Ok(SendOutcome::Replied(message))
    }

    /// End the conversation: store it as a session (if it holds more than
    /// the greeting) and start over with a fresh greeting.
    ///
    /// Explicit clears and app-level resets must both come through here so a
    /// conversation is never recorded twice. If storing fails the live
    /// conversation is kept so the caller can retry.
    pub async fn end(&mut self) -> Result<Option<Session>> {
        let session = self
            .recorder
            .finalize(self.assembler.messages(), self.started_at)
            .await?;
        let name = self.assembler.display_name().map(ToString::to_string);
        self.assembler.reset_with_greeting(name.as_deref());
        self.started_at = Utc::now();
        Ok(session)
    }

    /// Onboarding: store the user's name. Blank input is ignored.
    pub async fn set_name(&mut self, name: &str) -> Result<Option<String>> {
        if normalize_name(name).is_none() {
            return Ok(None);
        }
        let confirmed = self.names.set_stored_name(name).await?;
        self.assembler.set_display_name(Some(&confirmed));
        Ok(Some(confirmed))
    }
}
