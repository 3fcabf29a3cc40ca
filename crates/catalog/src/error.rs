use thiserror::Error;

/// Errors surfaced while building a [`Catalog`](crate::Catalog).
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A catalog must contain at least one venue.
    #[error("catalog is empty")]
    Empty,
    /// A record failed validation.
    #[error("invalid catalog record at index {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },
    /// The catalog source was not valid JSON or did not match the record schema.
    #[error("catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// The catalog file could not be read.
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
