use serde::{Deserialize, Serialize};

/// Connection settings for the Gemini `generateContent` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SentimentConfig {
    /// Sent as the `key` query parameter. An empty key is sent as-is.
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    /// Upper bound for one classification call, connect included.
    pub timeout_secs: u64,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://generativelanguage.googleapis.com".into(),
            model: "gemini-2.5-flash-preview-05-20".into(),
            temperature: 0.2,
            timeout_secs: 30,
        }
    }
}

impl SentimentConfig {
    /// Full `generateContent` URL including the API key.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url.trim_end_matches('/'),
            self.model,
            self.api_key
        )
    }
}
