use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Duration;

use super::traits::{Classifier, ClassifierRequest, ClassifierResponse};

/// Classifier that replays a fixed queue of outcomes.
///
/// Used for offline runs and tests. Every request is kept so callers can
/// inspect what would have gone over the wire.
pub struct ScriptedClassifier {
    outcomes: Mutex<VecDeque<std::result::Result<ClassifierResponse, String>>>,
    requests: Mutex<Vec<ClassifierRequest>>,
    delay: Duration,
}

impl ScriptedClassifier {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
        }
    }

    /// Delay every reply, e.g. to exercise timeouts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn push_reply(&self, response: &str, sentiment: Option<&str>, is_crisis: bool) {
        self.outcomes.lock().push_back(Ok(ClassifierResponse {
            response: response.to_string(),
            sentiment: sentiment.map(ToString::to_string),
            is_crisis,
        }));
    }

    pub fn push_failure(&self, error: &str) {
        self.outcomes.lock().push_back(Err(error.to_string()));
    }

    pub fn requests(&self) -> Vec<ClassifierRequest> {
        self.requests.lock().clone()
    }
}

impl Default for ScriptedClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Classifier for ScriptedClassifier {
    async fn classify(&self, request: &ClassifierRequest) -> Result<ClassifierResponse> {
        self.requests.lock().push(request.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let next = self.outcomes.lock().pop_front();
        match next {
            Some(Ok(response)) => Ok(response),
            Some(Err(error)) => anyhow::bail!(error),
            None => Ok(ClassifierResponse {
                response: "I'm listening. Tell me more.".to_string(),
                sentiment: None,
                is_crisis: false,
            }),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ClassifierRequest {
        ClassifierRequest {
            message: "hi".into(),
            conversation_history: Vec::new(),
        }
    }

    #[tokio::test]
    async fn replays_outcomes_in_order() {
        let c = ScriptedClassifier::new();
        c.push_reply("first", Some("Stress"), false);
        c.push_failure("offline");

        let first = c.classify(&request()).await.unwrap();
        assert_eq!(first.response, "first");
        assert!(c.classify(&request()).await.is_err());
        assert_eq!(c.requests().len(), 2);
    }

    #[tokio::test]
    async fn empty_queue_falls_back_to_listening_reply() {
        let c = ScriptedClassifier::default();
        let reply = c.classify(&request()).await.unwrap();
        assert!(reply.sentiment.is_none());
        assert!(!reply.is_crisis);
    }
}
