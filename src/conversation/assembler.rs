//! Live conversation state: the message list of the in-progress session.

use std::sync::Arc;

use super::greeting::{greeting_for, personalize_reply};
use super::message::Message;
use crate::classifier::{ClassifierRequest, ClassifierResponse, HistoryTurn};
use crate::mood::{MoodLedger, Sentiment};
use crate::profile::normalize_name;

/// Owns the unsaved message list and the send-pending flag.
///
/// The list always starts with the synthetic greeting. Every assistant reply
/// carrying a sentiment is handed to the mood ledger exactly once, at the
/// moment it is appended.
pub struct ConversationAssembler {
    messages: Vec<Message>,
    display_name: Option<String>,
    pending: bool,
    ledger: Arc<MoodLedger>,
}

impl ConversationAssembler {
    pub fn new(ledger: Arc<MoodLedger>, display_name: Option<&str>) -> Self {
        let mut assembler = Self {
            messages: Vec::new(),
            display_name: None,
            pending: false,
            ledger,
        };
        assembler.reset_with_greeting(display_name);
        assembler
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Set or clear the name used for personalization. Blank clears it.
    pub fn set_display_name(&mut self, name: Option<&str>) {
        self.display_name = name.and_then(normalize_name);
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Whether the conversation holds anything beyond the greeting.
    pub fn has_exchanges(&self) -> bool {
        self.messages.len() > 1
    }

    /// Append a user message. No-op for blank text or while a send is
    /// pending.
    pub fn append_user_message(&mut self, text: &str) -> Option<&Message> {
        if self.pending || text.trim().is_empty() {
            return None;
        }
        self.messages.push(Message::user(text));
        self.messages.last()
    }

    /// `{role, text}` for every message except the leading greeting.
    pub fn build_history_payload(&self) -> Vec<HistoryTurn> {
        let skip = usize::from(self.messages.first().is_some_and(Message::is_greeting));
        self.messages
            .iter()
            .skip(skip)
            .map(|m| HistoryTurn {
                role: m.role,
                text: m.text.clone(),
            })
            .collect()
    }

    /// Append the assistant reply, personalized with the display name, and
    /// record its sentiment in the mood ledger.
    ///
    /// A ledger failure is logged; the reply stays in the conversation.
    pub async fn append_assistant_reply(
        &mut self,
        raw_text: &str,
        sentiment: Option<Sentiment>,
        is_crisis: Option<bool>,
    ) -> &Message {
        let text = personalize_reply(raw_text, self.display_name.as_deref());
        let message = Message::assistant(text, sentiment, is_crisis);

        if let Err(error) = self.ledger.record(&message).await {
            tracing::error!(message_id = %message.id, "Failed to record mood entry: {error:#}");
        }

        let index = self.messages.len();
        self.messages.push(message);
        &self.messages[index]
    }

    /// Replace the conversation with a fresh greeting.
    pub fn reset_with_greeting(&mut self, name: Option<&str>) {
        self.set_display_name(name);
        self.messages = vec![Message::greeting(greeting_for(self.display_name.as_deref()))];
        self.pending = false;
    }

    /// Start a send: append the user message, mark the conversation pending
    /// and return the request for the classifier.
    ///
    /// The history covers the conversation before this message. Returns
    /// `None` (and changes nothing) for blank text or while another send is
    /// pending.
    pub fn begin_send(&mut self, text: &str) -> Option<ClassifierRequest> {
        let history = self.build_history_payload();
        let message = self.append_user_message(text)?.text.clone();
        self.pending = true;
        Some(ClassifierRequest {
            message,
            conversation_history: history,
        })
    }

    /// Finish a send with the classifier's reply.
    pub async fn complete_send(&mut self, reply: ClassifierResponse) -> &Message {
        self.pending = false;
        let sentiment = reply.sentiment.as_deref().and_then(Sentiment::parse);
        self.append_assistant_reply(&reply.response, sentiment, Some(reply.is_crisis))
            .await
    }

    /// Abandon a send after a failure. The user message stays so it can be
    /// seen and retried; nothing is recorded.
    pub fn abort_send(&mut self) {
        self.pending = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Role;
    use crate::store::{Collections, InMemoryCollectionStore};

    fn assembler(name: Option<&str>) -> (ConversationAssembler, Arc<MoodLedger>) {
        let collections = Arc::new(Collections::new(Arc::new(InMemoryCollectionStore::new())));
        let ledger = Arc::new(MoodLedger::new(collections));
        (ConversationAssembler::new(Arc::clone(&ledger), name), ledger)
    }

    #[test]
    fn starts_with_single_greeting() {
        let (a, _) = assembler(None);
        assert_eq!(a.messages().len(), 1);
        assert!(a.messages()[0].is_greeting());
        assert!(!a.has_exchanges());
    }

    #[test]
    fn blank_user_text_is_ignored() {
        let (mut a, _) = assembler(None);
        assert!(a.append_user_message("").is_none());
        assert!(a.append_user_message(" \n\t ").is_none());
        assert_eq!(a.messages().len(), 1);
    }

    #[test]
    fn user_message_gets_fresh_id_and_role() {
        let (mut a, _) = assembler(None);
        let id = a.append_user_message("hello").unwrap().id.clone();
        let last = a.messages().last().unwrap();
        assert_eq!(last.id, id);
        assert_eq!(last.role, Role::User);
        assert_ne!(id, crate::conversation::GREETING_ID);
    }

    #[tokio::test]
    async fn history_excludes_greeting_and_keeps_order() {
        let (mut a, _) = assembler(None);
        a.append_user_message("first");
        a.append_assistant_reply("reply", None, None).await;
        a.append_user_message("second");

        let history = a.build_history_payload();
        let texts: Vec<&str> = history.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "reply", "second"]);
        assert_eq!(history[1].role, Role::Assistant);
    }

    #[tokio::test]
    async fn reply_is_personalized_once() {
        let (mut a, _) = assembler(Some("Sam"));
        let greeted = a
            .append_assistant_reply("Hey, Sam, that sounds hard", None, None)
            .await
            .text
            .clone();
        assert_eq!(greeted, "Hey, Sam, that sounds hard");

        let plain = a
            .append_assistant_reply("That sounds hard", None, None)
            .await
            .text
            .clone();
        assert_eq!(plain, "Hey, Sam. That sounds hard");
    }

    #[tokio::test]
    async fn sentiment_reply_records_exactly_one_entry() {
        let (mut a, ledger) = assembler(None);
        a.append_assistant_reply("ok", Some(Sentiment::Anxiety), Some(false))
            .await;
        a.append_assistant_reply("ok", None, Some(false)).await;

        let entries = ledger.entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].sentiment, Sentiment::Anxiety);
    }

    #[test]
    fn pending_send_rejects_new_messages() {
        let (mut a, _) = assembler(None);
        let request = a.begin_send("I feel low").unwrap();
        assert!(a.is_pending());
        assert_eq!(request.message, "I feel low");
        assert!(request.conversation_history.is_empty());

        assert!(a.begin_send("again").is_none());
        assert!(a.append_user_message("again").is_none());
        assert_eq!(a.messages().len(), 2);

        a.abort_send();
        assert!(!a.is_pending());
        assert!(a.append_user_message("again").is_some());
    }

    #[tokio::test]
    async fn complete_send_parses_sentiment_and_clears_pending() {
        let (mut a, ledger) = assembler(None);
        a.begin_send("hello").unwrap();
        let reply = a
            .complete_send(ClassifierResponse {
                response: "Hi.".into(),
                sentiment: Some("depression".into()),
                is_crisis: false,
            })
            .await
            .clone();

        assert!(!a.is_pending());
        assert_eq!(reply.sentiment, Some(Sentiment::Depression));
        assert_eq!(reply.is_crisis, Some(false));
        assert!(ledger.has_recorded(&reply.id));
    }

    #[tokio::test]
    async fn empty_sentiment_label_records_nothing() {
        let (mut a, ledger) = assembler(None);
        a.begin_send("hello").unwrap();
        a.complete_send(ClassifierResponse {
            response: "Hi.".into(),
            sentiment: Some(String::new()),
            is_crisis: false,
        })
        .await;
        assert!(ledger.entries().await.is_empty());
    }

    #[test]
    fn reset_replaces_list_with_greeting() {
        let (mut a, _) = assembler(None);
        a.append_user_message("hello");
        a.reset_with_greeting(Some("Ana"));

        assert_eq!(a.messages().len(), 1);
        assert!(a.messages()[0].text.starts_with("Hi Ana,"));
        assert_eq!(a.display_name(), Some("Ana"));
    }
}
