//! Route handlers
//!
//! - `pages`: landing page, search form and the recommend form post
//! - `health`: liveness and readiness probes

pub mod health;
pub mod pages;

use crate::error::ServerError;

/// 404 Not Found handler
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
