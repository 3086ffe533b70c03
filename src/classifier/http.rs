//! HTTP classifier client.
//! POSTs the request as JSON and expects the response body described by
//! [`ClassifierResponse`].

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::traits::{Classifier, ClassifierRequest, ClassifierResponse};

pub struct HttpClassifier {
    endpoint: String,
    api_key: Option<String>,
    client: Client,
}

impl HttpClassifier {
    pub fn new(endpoint: &str, api_key: Option<&str>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(ToString::to_string),
            client: Client::builder()
                .timeout(timeout)
                .connect_timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, request: &ClassifierRequest) -> Result<ClassifierResponse> {
        let mut builder = self.client.post(&self.endpoint).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .with_context(|| format!("Classifier request to {} failed", self.endpoint))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(200).collect();
            anyhow::bail!("Classifier returned {status}: {snippet}");
        }

        response
            .json::<ClassifierResponse>()
            .await
            .context("Classifier returned an unreadable response")
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_is_normalized() {
        let c = HttpClassifier::new("https://api.example.com/chat/", None, Duration::from_secs(5));
        assert_eq!(c.endpoint(), "https://api.example.com/chat");
        assert_eq!(c.name(), "http");
    }

    #[test]
    fn blank_api_key_is_dropped() {
        let c = HttpClassifier::new("https://x", Some("   "), Duration::from_secs(5));
        assert!(c.api_key.is_none());
        let c = HttpClassifier::new("https://x", Some("tok"), Duration::from_secs(5));
        assert_eq!(c.api_key.as_deref(), Some("tok"));
    }

    #[test]
    fn request_wire_format_matches_service_contract() {
        let request = ClassifierRequest {
            message: "hello".into(),
            conversation_history: vec![super::super::HistoryTurn {
                role: crate::conversation::Role::User,
                text: "earlier".into(),
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["message"], "hello");
        assert_eq!(json["conversationHistory"][0]["role"], "user");
        assert_eq!(json["conversationHistory"][0]["text"], "earlier");
    }

    #[test]
    fn response_tolerates_missing_sentiment() {
        let r: ClassifierResponse =
            serde_json::from_str(r#"{"response":"ok","isCrisis":false}"#).unwrap();
        assert!(r.sentiment.is_none());

        let r: ClassifierResponse = serde_json::from_str(
            r#"{"response":"ok","sentiment":"Anxiety","isCrisis":true}"#,
        )
        .unwrap();
        assert_eq!(r.sentiment.as_deref(), Some("Anxiety"));
        assert!(r.is_crisis);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_an_error() {
        let c = HttpClassifier::new("http://127.0.0.1:9", None, Duration::from_secs(2));
        let request = ClassifierRequest {
            message: "hi".into(),
            conversation_history: Vec::new(),
        };
        assert!(c.classify(&request).await.is_err());
    }
}
