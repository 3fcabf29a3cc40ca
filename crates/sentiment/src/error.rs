use thiserror::Error;

/// Construction-time failures. Classification itself never returns an error.
#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("invalid sentiment config: {0}")]
    InvalidConfig(String),
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}
