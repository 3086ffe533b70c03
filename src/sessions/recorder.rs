//! Turns a live conversation into a stored session.

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::types::Session;
use crate::conversation::Message;
use crate::mood::{Sentiment, SentimentTally};
use crate::store::{Collections, SESSIONS_KEY};

/// Most frequent sentiment among the messages, first-seen on ties, neutral
/// when no message carries one.
pub fn dominant_sentiment(messages: &[Message]) -> Sentiment {
    messages
        .iter()
        .filter_map(|m| m.sentiment.as_ref())
        .collect::<SentimentTally>()
        .dominant_or_neutral()
        .0
}

pub struct SessionRecorder {
    collections: Arc<Collections>,
}

impl SessionRecorder {
    pub fn new(collections: Arc<Collections>) -> Self {
        Self { collections }
    }

    /// Finalize and store the conversation.
    ///
    /// A conversation holding nothing beyond the greeting is not a session:
    /// returns `Ok(None)` and stores nothing. New sessions are inserted at the
    /// front of the stored collection.
    pub async fn finalize(
        &self,
        live: &[Message],
        started_at: DateTime<Utc>,
    ) -> Result<Option<Session>> {
        if live.len() <= 1 {
            return Ok(None);
        }

        let session = Session {
            id: uuid::Uuid::new_v4().to_string(),
            started_at,
            ended_at: Utc::now(),
            messages: live.to_vec(),
            dominant_sentiment: dominant_sentiment(live),
            message_count: live.len(),
        };

        let stored = session.clone();
        self.collections
            .update(SESSIONS_KEY, move |sessions: &mut Vec<Session>| {
                sessions.insert(0, stored);
                true
            })
            .await?;

        tracing::info!(
            session_id = %session.id,
            messages = session.message_count,
            dominant = %session.dominant_sentiment,
            "Session recorded"
        );
        Ok(Some(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryCollectionStore;

    fn recorder() -> (SessionRecorder, Arc<Collections>) {
        let collections = Arc::new(Collections::new(Arc::new(InMemoryCollectionStore::new())));
        (SessionRecorder::new(Arc::clone(&collections)), collections)
    }

    fn greeting() -> Message {
        Message::greeting("Hi there".into())
    }

    #[tokio::test]
    async fn empty_conversation_stores_nothing() {
        let (recorder, collections) = recorder();

        assert!(recorder.finalize(&[], Utc::now()).await.unwrap().is_none());
        assert!(recorder
            .finalize(&[greeting()], Utc::now())
            .await
            .unwrap()
            .is_none());
        assert!(collections
            .store()
            .read_collection(SESSIONS_KEY)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn finalize_stores_exactly_one_session() {
        let (recorder, collections) = recorder();
        let started = Utc::now();
        let live = vec![
            greeting(),
            Message::user("I can't sleep"),
            Message::assistant("That sounds hard.".into(), Some(Sentiment::Anxiety), Some(false)),
        ];

        let session = recorder.finalize(&live, started).await.unwrap().unwrap();
        assert_eq!(session.message_count, 3);
        assert_eq!(session.started_at, started);
        assert!(session.ended_at >= started);
        assert_eq!(session.dominant_sentiment, Sentiment::Anxiety);

        let stored: Vec<Session> = collections.load(SESSIONS_KEY).await;
        assert_eq!(stored, vec![session]);
    }

    #[tokio::test]
    async fn new_sessions_go_to_the_front() {
        let (recorder, collections) = recorder();
        let live = vec![greeting(), Message::user("one")];

        let first = recorder.finalize(&live, Utc::now()).await.unwrap().unwrap();
        let second = recorder.finalize(&live, Utc::now()).await.unwrap().unwrap();

        let stored: Vec<Session> = collections.load(SESSIONS_KEY).await;
        let ids: Vec<&str> = stored.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);
    }

    #[test]
    fn dominant_defaults_to_neutral() {
        let live = vec![greeting(), Message::user("hello")];
        assert_eq!(dominant_sentiment(&live), Sentiment::Normal);
    }

    #[test]
    fn dominant_tie_keeps_first_counted_label() {
        let live = vec![
            Message::assistant("a".into(), Some(Sentiment::Stress), None),
            Message::assistant("b".into(), Some(Sentiment::Depression), None),
            Message::assistant("c".into(), Some(Sentiment::Depression), None),
            Message::assistant("d".into(), Some(Sentiment::Stress), None),
        ];
        assert_eq!(dominant_sentiment(&live), Sentiment::Stress);
    }
}
