//! Workspace umbrella crate for ambiance.
//!
//! Stitches the catalog, embedding, ranking and sentiment crates into a single
//! [`Recommender`] so callers can go from a free-text atmosphere description
//! to a [`Recommendation`] with one call.
//!
//! ```no_run
//! use std::sync::Arc;
//! use ambiance::{
//!     load_embedder, Catalog, GeminiClassifier, IndexedCatalog, Recommender, SemanticConfig,
//!     SentimentConfig,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let embedder = load_embedder(&SemanticConfig::default()).await?;
//! let index = IndexedCatalog::build(Catalog::builtin(), embedder.as_ref())?;
//! let classifier = Arc::new(GeminiClassifier::new(&SentimentConfig::default())?);
//!
//! let recommender = Recommender::new(index, embedder, classifier);
//! let rec = recommender.recommend("友達とワイワイお酒を飲みたい").await?;
//! println!("{} ({})", rec.best.record.name, rec.best.similarity_score);
//! # Ok(())
//! # }
//! ```

pub use catalog::{Catalog, CatalogError, RestaurantRecord};
pub use matcher::{rank, round4, MatchError, RankedMatch, Ranking, MAX_RUNNERS_UP};
pub use semantic::{
    cosine_similarity, load_embedder, Embedder, EmbeddingVector, SemanticConfig, SemanticError,
};
pub use sentiment::{
    GeminiClassifier, SentimentClassifier, SentimentConfig, SentimentError, SentimentLabel,
    SentimentResult,
};

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while producing a recommendation.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("query is empty")]
    EmptyQuery,
    #[error("embedding failed: {0}")]
    Semantic(#[from] SemanticError),
    #[error("ranking failed: {0}")]
    Match(#[from] MatchError),
    #[error("embedding task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// A catalog together with one embedding per record, in catalog order.
#[derive(Debug, Clone)]
pub struct IndexedCatalog {
    catalog: Catalog,
    vectors: Vec<EmbeddingVector>,
    dimension: usize,
}

impl IndexedCatalog {
    /// Embeds every atmosphere description once.
    ///
    /// Fails if the embedder returns the wrong number of vectors or vectors of
    /// differing dimension.
    pub fn build(catalog: Catalog, embedder: &dyn Embedder) -> Result<Self, PipelineError> {
        let started = Instant::now();
        let vectors = embedder.encode_batch(&catalog.atmosphere_texts())?;
        if vectors.len() != catalog.len() {
            return Err(MatchError::LengthMismatch {
                records: catalog.len(),
                vectors: vectors.len(),
            }
            .into());
        }

        let dimension = vectors.first().map(Vec::len).unwrap_or(0);
        if let Some((index, v)) = vectors.iter().enumerate().find(|(_, v)| v.len() != dimension) {
            return Err(MatchError::DimensionMismatch {
                index,
                expected: dimension,
                found: v.len(),
            }
            .into());
        }

        tracing::info!(
            records = catalog.len(),
            dimension,
            model = embedder.model_name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "catalog indexed"
        );
        Ok(Self {
            catalog,
            vectors,
            dimension,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn vectors(&self) -> &[EmbeddingVector] {
        &self.vectors
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    /// Embedding dimension shared by every vector.
    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Everything shown on the result page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub best: RankedMatch,
    pub runners_up: Vec<RankedMatch>,
    pub sentiment: SentimentResult,
}

/// Embeds a query, ranks it against an [`IndexedCatalog`] and classifies its
/// sentiment. Cheap to share behind an `Arc`.
pub struct Recommender {
    index: IndexedCatalog,
    embedder: Arc<dyn Embedder>,
    classifier: Arc<dyn SentimentClassifier>,
}

impl Recommender {
    pub fn new(
        index: IndexedCatalog,
        embedder: Arc<dyn Embedder>,
        classifier: Arc<dyn SentimentClassifier>,
    ) -> Self {
        Self {
            index,
            embedder,
            classifier,
        }
    }

    pub fn index(&self) -> &IndexedCatalog {
        &self.index
    }

    pub fn model_name(&self) -> &str {
        self.embedder.model_name()
    }

    /// Runs classification and embedding concurrently, then ranks.
    ///
    /// Sentiment failures never fail the recommendation; they come back as
    /// `ERROR` / `UNKNOWN` labels in [`Recommendation::sentiment`].
    pub async fn recommend(&self, text: &str) -> Result<Recommendation, PipelineError> {
        if text.trim().is_empty() {
            return Err(PipelineError::EmptyQuery);
        }
        let started = Instant::now();

        let embedder = Arc::clone(&self.embedder);
        let query_text = text.to_owned();
        let embedding = tokio::task::spawn_blocking(move || embedder.encode(&query_text));
        let (sentiment, embedded) = tokio::join!(self.classifier.classify(text), embedding);

        let query = embedded??;
        let Ranking { best, runners_up } =
            rank(&query, self.index.vectors(), self.index.catalog())?;

        tracing::debug!(
            best = best.index,
            score = best.similarity_score,
            sentiment = %sentiment.label,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "recommendation ready"
        );
        Ok(Recommendation {
            best,
            runners_up,
            sentiment,
        })
    }
}
