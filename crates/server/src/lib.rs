//! Ambiance Server - HTML frontend for atmosphere-based restaurant search
//!
//! Serves a small form-driven site: describe the atmosphere you want, get the
//! closest catalog entry, two runners-up, and the sentiment of what you typed.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Endpoints
//!
//! - `GET /` - Landing page
//! - `GET /search` - Search form, shows a pending one-shot error once
//! - `POST /recommend` - Form field `atmosphere`; renders results or redirects
//!   back to `/search` with an error
//! - `GET /health` - Liveness probe (JSON)
//! - `GET /ready` - Readiness probe with catalog size and embedding dimension

pub mod config;
pub mod error;
pub mod flash;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;
pub mod views;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use flash::Flash;
pub use server::{build_router, start_server};
pub use state::AppState;
