use catalog::RestaurantRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One ranked catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMatch {
    /// Position of the record in the catalog.
    pub index: usize,
    pub record: RestaurantRecord,
    /// Cosine similarity to the query, rounded to 4 decimals.
    pub similarity_score: f32,
}

/// Result of ranking one query against the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    pub best: RankedMatch,
    /// Next-best entries in descending similarity, never containing `best`.
    pub runners_up: Vec<RankedMatch>,
}

impl Ranking {
    /// Best match followed by the runners-up.
    pub fn iter(&self) -> impl Iterator<Item = &RankedMatch> {
        std::iter::once(&self.best).chain(self.runners_up.iter())
    }
}

/// Errors produced by the ranking layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatchError {
    /// Nothing to rank against.
    #[error("catalog is empty")]
    EmptyCatalog,
    /// Vectors and records are not index-aligned.
    #[error("catalog has {records} records but {vectors} embeddings")]
    LengthMismatch { records: usize, vectors: usize },
    /// A catalog vector has a different dimension from the query.
    #[error("embedding {index} has dimension {found}, query has {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },
}
