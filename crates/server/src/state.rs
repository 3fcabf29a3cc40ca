use std::sync::Arc;

use ambiance::{Catalog, GeminiClassifier, IndexedCatalog, Recommender};

use crate::config::ServerConfig;
use crate::error::ServerResult;

/// Shared application state, built once at startup.
pub struct AppState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Catalog, embeddings, embedder and sentiment classifier
    pub recommender: Arc<Recommender>,
}

impl AppState {
    pub fn new(config: ServerConfig, recommender: Recommender) -> Self {
        Self {
            config: Arc::new(config),
            recommender: Arc::new(recommender),
        }
    }

    /// Loads the catalog and the embedding model, embeds the catalog and
    /// builds the sentiment client. Any failure here is fatal.
    pub async fn initialize(config: ServerConfig) -> ServerResult<Self> {
        let catalog = match &config.catalog_path {
            Some(path) => {
                tracing::info!(path = %path.display(), "Loading catalog file");
                Catalog::from_json_file(path)?
            }
            None => Catalog::builtin(),
        };

        let embedder = semantic::load_embedder(&config.semantic).await?;
        let index = {
            let embedder = Arc::clone(&embedder);
            tokio::task::spawn_blocking(move || IndexedCatalog::build(catalog, embedder.as_ref()))
                .await??
        };
        let classifier = Arc::new(GeminiClassifier::new(&config.sentiment)?);

        tracing::info!(
            records = index.len(),
            dimension = index.dimension(),
            model = embedder.model_name(),
            sentiment_model = classifier.model(),
            "Recommender ready"
        );
        Ok(Self::new(config, Recommender::new(index, embedder, classifier)))
    }
}
