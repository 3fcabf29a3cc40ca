//! Ambiance sentence embeddings
//!
//! Turns free text into fixed-length vectors so atmosphere descriptions can be
//! compared with cosine similarity. Two backends sit behind the [`Embedder`]
//! trait:
//!
//! - **ONNX mode** - runs a sentence-transformers export locally with ONNX
//!   Runtime and a HuggingFace `tokenizer.json`. Mean pooling over the
//!   attention mask, optional L2 normalization.
//! - **Stub mode** - deterministic hash-seeded vectors. No model files, no
//!   semantics; handy for development and tests.
//!
//! Unlike a search index there is no silent fallback here: if the configured
//! model cannot be loaded, [`load_embedder`] fails and the caller decides
//! whether that is fatal (the server treats it as fatal at startup).
//!
//! ## Quick example
//!
//! ```no_run
//! use semantic::{load_embedder, SemanticConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let cfg = SemanticConfig::default();
//!     let embedder = load_embedder(&cfg).await.unwrap();
//!     let vector = embedder.encode("静かで落ち着いたカフェ").unwrap();
//!     assert_eq!(vector.len(), 384);
//! }
//! ```
//!
//! ## Model assets
//!
//! `model_path` / `tokenizer_path` point at local files. When they are missing
//! and `model_url` / `tokenizer_url` are set, the files are downloaded once
//! into place before loading.

pub mod config;
pub mod error;

mod assets;
mod onnx;
mod stub;
mod vector;

pub use crate::config::SemanticConfig;
pub use crate::error::SemanticError;
pub use crate::onnx::OnnxEmbedder;
pub use crate::stub::StubEmbedder;
pub use crate::vector::{cosine_similarity, l2_normalize_in_place};

use std::sync::Arc;

use crate::assets::resolve_model_assets;

/// Dense embedding produced by an [`Embedder`].
pub type EmbeddingVector = Vec<f32>;

/// Text-to-vector encoder shared across request handlers.
///
/// Implementations are deterministic for a fixed model and must be safe to
/// call from several threads at once.
pub trait Embedder: Send + Sync {
    /// Encodes a single text.
    fn encode(&self, text: &str) -> Result<EmbeddingVector, SemanticError>;

    /// Encodes several texts, preserving input order.
    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>, SemanticError> {
        texts.iter().map(|text| self.encode(text)).collect()
    }

    /// Label surfaced in logs and the readiness probe.
    fn model_name(&self) -> &str;
}

/// Builds the embedder selected by `cfg.mode`.
///
/// `"stub"` returns the deterministic stub immediately. Anything else (the
/// default is `"onnx"`) resolves model assets, downloading them if URLs are
/// configured, and loads an ONNX Runtime session.
pub async fn load_embedder(cfg: &SemanticConfig) -> Result<Arc<dyn Embedder>, SemanticError> {
    match cfg.mode.as_str() {
        "stub" | "fast" => {
            tracing::warn!(
                dim = cfg.stub_dim,
                "using stub embeddings; similarity scores carry no meaning"
            );
            Ok(Arc::new(StubEmbedder::new(cfg)))
        }
        "onnx" => {
            let assets = resolve_model_assets(cfg).await?;
            let embedder = OnnxEmbedder::load(&assets, cfg)?;
            tracing::info!(
                model = %cfg.model_name,
                path = %assets.model_path.display(),
                "sentence embedding model loaded"
            );
            Ok(Arc::new(embedder))
        }
        other => Err(SemanticError::InvalidConfig(format!(
            "unknown embedding mode '{other}' (expected \"onnx\" or \"stub\")"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn stub_mode_loads_without_assets() {
        let cfg = SemanticConfig {
            mode: "stub".into(),
            model_path: PathBuf::from("/nonexistent/model.onnx"),
            ..SemanticConfig::default()
        };
        let embedder = load_embedder(&cfg).await.unwrap();
        let v = embedder.encode("賑やかな居酒屋").unwrap();
        assert_eq!(v.len(), cfg.stub_dim);
    }

    #[tokio::test]
    async fn onnx_mode_without_assets_is_an_error() {
        let cfg = SemanticConfig {
            mode: "onnx".into(),
            model_path: PathBuf::from("./missing/model.onnx"),
            tokenizer_path: Some(PathBuf::from("./missing/tokenizer.json")),
            ..SemanticConfig::default()
        };
        let err = load_embedder(&cfg).await.err().expect("missing model must fail");
        assert!(matches!(err, SemanticError::ModelNotFound(_)));
    }

    #[tokio::test]
    async fn unknown_mode_is_rejected() {
        let cfg = SemanticConfig {
            mode: "gpu-magic".into(),
            ..SemanticConfig::default()
        };
        let err = load_embedder(&cfg).await.err().unwrap();
        assert!(matches!(err, SemanticError::InvalidConfig(_)));
        assert!(err.to_string().contains("gpu-magic"));
    }

    #[test]
    fn default_encode_batch_preserves_order() {
        let stub = StubEmbedder::new(&SemanticConfig::default());
        let texts = ["first", "second", "third"];
        let batch = stub.encode_batch(&texts).unwrap();
        assert_eq!(batch.len(), 3);
        for (text, vector) in texts.iter().zip(batch.iter()) {
            assert_eq!(&stub.encode(text).unwrap(), vector);
        }
    }

    #[tokio::test]
    #[ignore = "requires local ONNX + tokenizer assets under models/"]
    async fn real_model_prefers_matching_atmosphere() {
        let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let workspace_root = manifest_dir
            .parent()
            .and_then(|p| p.parent())
            .expect("workspace root");
        let model_dir = workspace_root
            .join("models")
            .join("paraphrase-multilingual-MiniLM-L12-v2");

        let cfg = SemanticConfig {
            model_path: model_dir.join("onnx").join("model.onnx"),
            tokenizer_path: Some(model_dir.join("tokenizer.json")),
            ..SemanticConfig::default()
        };
        let embedder = load_embedder(&cfg).await.expect("model should load");

        let lively = embedder.encode("友達とワイワイお酒を飲みたい").unwrap();
        let izakaya = embedder
            .encode("ワイワイ賑やかで、友人と楽しくお酒を飲むのにぴったりです。")
            .unwrap();
        let library = embedder
            .encode("多くの本が並ぶ静かな空間で、読書を楽しめます。")
            .unwrap();

        assert_eq!(lively.len(), 384);
        assert!(cosine_similarity(&lively, &izakaya) > cosine_similarity(&lively, &library));
    }
}
