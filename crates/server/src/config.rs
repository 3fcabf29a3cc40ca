use semantic::SemanticConfig;
use sentiment::SentimentConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tower_sessions::cookie::Key;

use crate::error::{ServerError, ServerResult};

/// Minimum length of `session_secret`, the size of a cookie signing key.
pub const MIN_SESSION_SECRET_BYTES: usize = 64;

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Log filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON log lines instead of compact text
    #[serde(default)]
    pub log_json: bool,

    /// Cookie signing secret, at least 64 bytes. Generated per process when unset.
    #[serde(default)]
    pub session_secret: Option<String>,

    /// Mark the session cookie `Secure` (HTTPS only)
    #[serde(default)]
    pub secure_cookies: bool,

    /// JSON catalog file; the built-in catalog is used when unset
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    #[serde(default)]
    pub semantic: SemanticConfig,

    #[serde(default)]
    pub sentiment: SentimentConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            log_level: default_log_level(),
            log_json: false,
            session_secret: None,
            secure_cookies: false,
            catalog_path: None,
            semantic: SemanticConfig::default(),
            sentiment: SentimentConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from `.env`, an optional `ambiance.{toml,yaml,json}`
    /// file and `AMBIANCE__*` environment variables, later sources winning.
    pub fn load() -> anyhow::Result<Self> {
        // A missing .env is fine.
        let _ = dotenvy::dotenv();

        let builder = config::Config::builder()
            .add_source(config::File::with_name("ambiance").required(false))
            .add_source(
                config::Environment::with_prefix("AMBIANCE")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: ServerConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would only fail later at runtime.
    pub fn validate(&self) -> ServerResult<()> {
        if self.timeout_secs == 0 {
            return Err(ServerError::Config("timeout_secs must be positive".into()));
        }
        if let Some(secret) = &self.session_secret {
            if secret.len() < MIN_SESSION_SECRET_BYTES {
                return Err(ServerError::Config(format!(
                    "session_secret must be at least {MIN_SESSION_SECRET_BYTES} bytes, got {}",
                    secret.len()
                )));
            }
        }
        Ok(())
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Cookie signing key derived from `session_secret`, or a fresh random key.
    pub fn session_key(&self) -> ServerResult<Key> {
        match &self.session_secret {
            Some(secret) => Key::try_from(secret.as_bytes()).map_err(|_| {
                ServerError::Config(format!(
                    "session_secret must be at least {MIN_SESSION_SECRET_BYTES} bytes"
                ))
            }),
            None => {
                tracing::warn!(
                    "No session_secret configured, using a random key; sessions will not survive restarts"
                );
                Ok(Key::generate())
            }
        }
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}
