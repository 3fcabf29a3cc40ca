use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{SentimentClassifier, SentimentConfig, SentimentError, SentimentLabel, SentimentResult};

/// Longest slice of an upstream error body copied into a result message.
const MAX_ERROR_BODY: usize = 200;

/// Request body of `models/{model}:generateContent`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub temperature: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// The subset of the `generateContent` reply we read. Every level is optional
/// so a reply of the wrong shape still deserializes and maps to `UNKNOWN`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

impl GenerateContentRequest {
    pub fn for_text(text: &str, temperature: f32) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(build_prompt(text)),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".into(),
                temperature,
            },
        }
    }
}

impl GenerateContentResponse {
    /// `candidates[0].content.parts[0].text`, if the reply has one.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }

    /// Maps a decoded reply body onto a [`SentimentResult`]. Bodies that
    /// don't fit the response shape are UNKNOWN.
    pub fn from_body(body: Value) -> SentimentResult {
        match serde_json::from_value::<Self>(body) {
            Ok(response) => response.into_result(),
            Err(_) => SentimentResult::unknown(),
        }
    }

    /// Maps the model's reply onto a [`SentimentResult`].
    pub fn into_result(self) -> SentimentResult {
        let Some(text) = self.first_text() else {
            return SentimentResult::unknown();
        };
        let value: Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(e) => return SentimentResult::error(format!("JSON parse error: {e}")),
        };
        let label = value
            .get("label")
            .and_then(Value::as_str)
            .and_then(SentimentLabel::from_model_label);
        let score = value.get("score").and_then(Value::as_f64);
        match (label, score) {
            (Some(label), Some(score)) => SentimentResult::classified(label, score as f32),
            _ => SentimentResult::unknown(),
        }
    }
}

/// Few-shot prompt asking for a bare JSON object.
fn build_prompt(text: &str) -> String {
    format!(
        r#"Classify the sentiment of the following text as one of "POSITIVE", "NEGATIVE" or "NEUTRAL",
and output the label together with your confidence as JSON. Output only the JSON object and
nothing else.

Examples:
Text: "このレストランはとても美味しくて最高でした！"
Output: {{"label": "POSITIVE", "score": 0.95}}

Text: "騒がしくて、料理もいまいちだった。"
Output: {{"label": "NEGATIVE", "score": 0.88}}

Text: "特に何も感じなかった。"
Output: {{"label": "NEUTRAL", "score": 0.60}}

Text: "{text}"
Output:
"#
    )
}

/// [`SentimentClassifier`] calling Google's Gemini `generateContent` API.
///
/// One attempt per call, bounded by `timeout_secs`. The underlying
/// `reqwest::Client` is pooled, so clone the classifier rather than building
/// a new one per request.
#[derive(Debug, Clone)]
pub struct GeminiClassifier {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    temperature: f32,
}

impl GeminiClassifier {
    pub fn new(cfg: &SentimentConfig) -> Result<Self, SentimentError> {
        if cfg.timeout_secs == 0 {
            return Err(SentimentError::InvalidConfig(
                "timeout_secs must be positive".into(),
            ));
        }
        if cfg.api_key.is_empty() {
            tracing::warn!("sentiment api_key is empty; upstream calls will likely be rejected");
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: cfg.endpoint(),
            model: cfg.model.clone(),
            temperature: cfg.temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    // reqwest errors embed the request URL, and with it the API key.
    async fn call(&self, text: &str) -> Result<Value, String> {
        let request = GenerateContentRequest::for_text(text, self.temperature);
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(MAX_ERROR_BODY).collect();
            return Err(format!("upstream returned {status}: {snippet}"));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| format!("unreadable response body: {}", e.without_url()))
    }
}

#[async_trait]
impl SentimentClassifier for GeminiClassifier {
    async fn classify(&self, text: &str) -> SentimentResult {
        let result = match self.call(text).await {
            Ok(body) => GenerateContentResponse::from_body(body),
            Err(message) => SentimentResult::error(message),
        };
        match result.label {
            SentimentLabel::Error => tracing::warn!(
                model = %self.model,
                error = result.message.as_deref().unwrap_or_default(),
                "sentiment classification failed"
            ),
            SentimentLabel::Unknown => tracing::warn!(
                model = %self.model,
                "sentiment reply did not have the expected shape"
            ),
            _ => tracing::debug!(label = %result.label, score = result.score, "sentiment classified"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(text: &str) -> GenerateContentResponse {
        GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(Content {
                    parts: vec![Part {
                        text: Some(text.into()),
                    }],
                }),
            }],
        }
    }

    #[test]
    fn request_body_matches_wire_format() {
        let body = serde_json::to_value(GenerateContentRequest::for_text("静かな店", 0.2)).unwrap();
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert!((body["generationConfig"]["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
        let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.contains("\"静かな店\""));
        assert!(prompt.contains("POSITIVE"));
    }

    #[test]
    fn well_formed_reply_is_classified() {
        let result = reply(r#"{"label": "POSITIVE", "score": 0.93}"#).into_result();
        assert_eq!(result.label, SentimentLabel::Positive);
        assert!((result.score - 0.93).abs() < 1e-6);
        assert!(result.message.is_none());
    }

    #[test]
    fn out_of_range_score_is_clamped() {
        let result = reply(r#"{"label": "negative", "score": 4}"#).into_result();
        assert_eq!(result.label, SentimentLabel::Negative);
        assert_eq!(result.score, 1.0);
    }

    #[test]
    fn missing_structure_is_unknown() {
        assert_eq!(GenerateContentResponse::default().into_result(), SentimentResult::unknown());
        let no_parts = GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(Content::default()),
            }],
        };
        assert_eq!(no_parts.into_result(), SentimentResult::unknown());
        let no_content = GenerateContentResponse {
            candidates: vec![Candidate::default()],
        };
        assert_eq!(no_content.into_result(), SentimentResult::unknown());
    }

    #[test]
    fn incomplete_inner_json_is_unknown() {
        for text in [
            r#"{"label": "POSITIVE"}"#,
            r#"{"score": 0.5}"#,
            r#"{"label": "EXCITED", "score": 0.5}"#,
            r#"{"label": "NEUTRAL", "score": "high"}"#,
            "[1, 2]",
        ] {
            assert_eq!(reply(text).into_result(), SentimentResult::unknown(), "{text}");
        }
    }

    #[test]
    fn mistyped_body_is_unknown() {
        for body in [
            serde_json::json!({"candidates": null}),
            serde_json::json!({"candidates": {"oops": 1}}),
            serde_json::json!({"candidates": [{"content": {"parts": [{"text": {"label": "POSITIVE"}}]}}]}),
            serde_json::json!([1, 2, 3]),
        ] {
            assert_eq!(
                GenerateContentResponse::from_body(body.clone()),
                SentimentResult::unknown(),
                "{body}"
            );
        }
    }

    #[test]
    fn non_json_text_is_error() {
        let result = reply("Sure! The sentiment is positive.").into_result();
        assert_eq!(result.label, SentimentLabel::Error);
        assert_eq!(result.score, 0.0);
        assert!(result.message.unwrap().starts_with("JSON parse error"));
    }

    #[test]
    fn zero_timeout_rejected() {
        let cfg = SentimentConfig {
            timeout_secs: 0,
            ..SentimentConfig::default()
        };
        assert!(matches!(
            GeminiClassifier::new(&cfg),
            Err(SentimentError::InvalidConfig(_))
        ));
    }
}
