//! Classifier collaborator: the remote service that replies to the user and
//! labels each exchange with a sentiment.

pub mod http;
pub mod scripted;
pub mod traits;

pub use http::HttpClassifier;
pub use scripted::ScriptedClassifier;
pub use traits::{Classifier, ClassifierRequest, ClassifierResponse, HistoryTurn};

use crate::config::ClassifierConfig;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

/// Factory: create the classifier from config.
pub fn create_classifier(config: &ClassifierConfig) -> Result<Arc<dyn Classifier>> {
    let Some(url) = config
        .api_url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
    else {
        anyhow::bail!(
            "classifier.api_url is not configured (set it in config.toml or SOLACE_API_URL)"
        );
    };
    Ok(Arc::new(HttpClassifier::new(
        url,
        config.api_key.as_deref(),
        Duration::from_secs(config.timeout_secs),
    )))
}

/// Classifier for `--offline` runs: replies without a sentiment.
pub fn create_offline_classifier() -> Arc<dyn Classifier> {
    Arc::new(ScriptedClassifier::new())
}
