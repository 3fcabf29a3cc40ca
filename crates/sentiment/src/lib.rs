//! Sentiment classification of free text through a hosted LLM.
//!
//! [`SentimentClassifier::classify`] never fails: transport problems and
//! malformed replies are folded into the returned [`SentimentResult`] as
//! [`SentimentLabel::Error`] or [`SentimentLabel::Unknown`], so a recommendation
//! can go ahead without sentiment.

pub mod config;
pub mod error;

mod gemini;
mod types;

pub use crate::config::SentimentConfig;
pub use crate::error::SentimentError;
pub use crate::gemini::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, GeminiClassifier,
    GenerationConfig, Part,
};
pub use crate::types::{SentimentLabel, SentimentResult};

use async_trait::async_trait;

/// Anything that can label a text as positive, negative or neutral.
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> SentimentResult;
}
