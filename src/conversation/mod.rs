//! Conversation: the live message list, the send round-trip and the chat
//! loop.

pub mod assembler;
pub mod controller;
pub mod greeting;
pub mod message;
pub mod repl;

pub use assembler::ConversationAssembler;
pub use controller::{ChatError, ChatSettings, ConversationController, SendOutcome};
pub use greeting::{greeting_for, personalize_reply};
pub use message::{Message, Role, GREETING_ID};

use crate::config::Config;
use std::time::Duration;

impl ChatSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            timeout: Duration::from_secs(config.classifier.timeout_secs),
            typing_delay: Duration::from_millis(config.chat.typing_delay_ms),
        }
    }
}
