use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::views;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
///
/// Search failures never reach this type; they are turned into a one-shot
/// message and a redirect by the route. What remains is startup failures and
/// infrastructure faults such as a broken session store.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Catalog error: {0}")]
    Catalog(#[from] catalog::CatalogError),

    #[error("Semantic error: {0}")]
    Semantic(#[from] semantic::SemanticError),

    #[error("Sentiment error: {0}")]
    Sentiment(#[from] sentiment::SentimentError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] ambiance::PipelineError),

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Not found")]
    NotFound,
}

impl ServerError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Config(_)
            | ServerError::Catalog(_)
            | ServerError::Semantic(_)
            | ServerError::Sentiment(_)
            | ServerError::Pipeline(_)
            | ServerError::Session(_)
            | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ServerError::Config(_) => "CONFIG_ERROR",
            ServerError::Catalog(_) => "CATALOG_ERROR",
            ServerError::Semantic(_) => "SEMANTIC_ERROR",
            ServerError::Sentiment(_) => "SENTIMENT_ERROR",
            ServerError::Pipeline(_) => "PIPELINE_ERROR",
            ServerError::Session(_) => "SESSION_ERROR",
            ServerError::Internal(_) => "INTERNAL_ERROR",
            ServerError::NotFound => "NOT_FOUND",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "Request failed");
        }

        let body = Html(views::error_page(status, self.error_code(), &self.to_string()));
        (status, body).into_response()
    }
}

impl From<tokio::task::JoinError> for ServerError {
    fn from(err: tokio::task::JoinError) -> Self {
        ServerError::Internal(format!("Background task failed: {err}"))
    }
}
