use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
    /// The model answered, but not in the expected shape.
    Unknown,
    /// The call failed or the reply could not be parsed.
    Error,
}

impl SentimentLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "POSITIVE",
            SentimentLabel::Negative => "NEGATIVE",
            SentimentLabel::Neutral => "NEUTRAL",
            SentimentLabel::Unknown => "UNKNOWN",
            SentimentLabel::Error => "ERROR",
        }
    }

    /// Parses one of the three labels the model is asked to produce.
    pub fn from_model_label(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "POSITIVE" => Some(SentimentLabel::Positive),
            "NEGATIVE" => Some(SentimentLabel::Negative),
            "NEUTRAL" => Some(SentimentLabel::Neutral),
            _ => None,
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one classification call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    /// Model confidence in `[0, 1]`; `0.0` for `UNKNOWN` and `ERROR`.
    pub score: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SentimentResult {
    pub fn classified(label: SentimentLabel, score: f32) -> Self {
        Self {
            label,
            score: score.clamp(0.0, 1.0),
            message: None,
        }
    }

    pub fn unknown() -> Self {
        Self {
            label: SentimentLabel::Unknown,
            score: 0.0,
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            label: SentimentLabel::Error,
            score: 0.0,
            message: Some(message.into()),
        }
    }
}
