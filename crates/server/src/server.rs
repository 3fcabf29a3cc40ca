//! Server initialization and routing
//!
//! Router assembly, middleware stack, logging setup and graceful shutdown.

use crate::config::ServerConfig;
use crate::middleware::{log_requests, request_id};
use crate::routes::{health, not_found, pages};
use crate::state::AppState;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::{Key, SameSite};
use tower_sessions::{MemoryStore, SessionManagerLayer};
use tracing_subscriber::EnvFilter;

/// Build the Axum router with all routes and middleware
///
/// Sessions live in memory and their cookie is signed with `session_key`.
pub fn build_router(state: Arc<AppState>, session_key: Key) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(state.config.secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_signed(session_key);

    Router::new()
        .route("/", get(pages::landing))
        .route("/search", get(pages::search_form))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .fallback(not_found)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            state.config.timeout(),
        ))
        // Enforces the same deadline itself and redirects instead of a bare 408.
        .route("/recommend", post(pages::recommend))
        .layer(session_layer)
        .layer(CompressionLayer::new())
        .layer(from_fn(log_requests))
        .layer(from_fn(request_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the ambiance HTTP server
///
/// Sets up logging, loads the model and catalog, then serves until SIGTERM or
/// Ctrl+C. A model or catalog that fails to load aborts startup.
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    init_tracing(&config)?;
    config.validate()?;

    let session_key = config.session_key()?;
    let addr: SocketAddr = config.socket_addr()?;

    tracing::info!(
        mode = %config.semantic.mode,
        model = %config.semantic.model_name,
        "Loading embedding model and indexing catalog"
    );
    let state = Arc::new(AppState::initialize(config.clone()).await?);

    let app = build_router(state, session_key);

    tracing::info!("Starting ambiance server on {}", addr);
    tracing::info!(
        "Timeout: {}s, secure cookies: {}",
        config.timeout_secs,
        config.secure_cookies
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// `RUST_LOG` wins over `log_level`; `log_json` switches to JSON lines.
fn init_tracing(config: &ServerConfig) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let result = if config.log_json {
        builder
            .with_thread_ids(true)
            .with_thread_names(true)
            .json()
            .try_init()
    } else {
        builder.compact().try_init()
    };
    result.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
