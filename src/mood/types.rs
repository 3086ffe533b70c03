//! Sentiment labels and mood observations.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Emotional-state label assigned by the remote classifier.
///
/// The known labels form a small closed set; anything else the classifier
/// sends is kept in [`Sentiment::Other`] rather than dropped, capitalized so
/// that "grief" and "GRIEF" count as one label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Sentiment {
    Anxiety,
    Bipolar,
    Depression,
    Normal,
    PersonalityDisorder,
    Stress,
    Suicidal,
    Other(String),
}

impl Sentiment {
    /// Label used when nothing was observed.
    pub fn neutral() -> Self {
        Self::Normal
    }

    /// Parse a classifier label. Returns `None` for an empty label, which
    /// means "no sentiment" rather than an unknown one.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let sentiment = match trimmed.to_ascii_lowercase().as_str() {
            "anxiety" => Self::Anxiety,
            "bipolar" => Self::Bipolar,
            "depression" => Self::Depression,
            "normal" => Self::Normal,
            "personality disorder" | "personality_disorder" => Self::PersonalityDisorder,
            "stress" => Self::Stress,
            "suicidal" => Self::Suicidal,
            _ => Self::Other(capitalize(trimmed)),
        };
        Some(sentiment)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Anxiety => "Anxiety",
            Self::Bipolar => "Bipolar",
            Self::Depression => "Depression",
            Self::Normal => "Normal",
            Self::PersonalityDisorder => "Personality disorder",
            Self::Stress => "Stress",
            Self::Suicidal => "Suicidal",
            Self::Other(label) => label,
        }
    }

    /// Labels that call for surfacing crisis resources.
    pub fn is_crisis(&self) -> bool {
        matches!(self, Self::Suicidal)
    }
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl TryFrom<String> for Sentiment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| "sentiment label must not be empty".to_string())
    }
}

impl From<Sentiment> for String {
    fn from(value: Sentiment) -> Self {
        value.as_str().to_string()
    }
}

/// One observation of a sentiment, recorded once per classified message.
///
/// Entries are never merged on write; `occurrence_count` is always 1 and
/// aggregation happens when the collection is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntry {
    /// Local calendar date of the observation.
    pub day: NaiveDate,
    pub sentiment: Sentiment,
    pub occurrence_count: u32,
    pub observed_at: DateTime<Utc>,
    /// Message that produced this entry. Absent on entries written by older
    /// clients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}
