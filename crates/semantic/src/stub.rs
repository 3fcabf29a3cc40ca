use fxhash::hash64;

use crate::vector::l2_normalize_in_place;
use crate::{Embedder, EmbeddingVector, SemanticConfig, SemanticError};

/// Deterministic stand-in for a real model.
///
/// Generates sinusoid values derived from a hash of the input text, so equal
/// texts always map to equal vectors. Similarity between different texts is
/// meaningless.
#[derive(Debug, Clone)]
pub struct StubEmbedder {
    dim: usize,
    normalize: bool,
    model_name: String,
}

impl StubEmbedder {
    pub fn new(cfg: &SemanticConfig) -> Self {
        Self {
            dim: cfg.stub_dim.max(1),
            normalize: cfg.normalize,
            model_name: format!("stub-{}", cfg.stub_dim.max(1)),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }
}

impl Embedder for StubEmbedder {
    fn encode(&self, text: &str) -> Result<EmbeddingVector, SemanticError> {
        let mut v = vec![0f32; self.dim];
        let h = hash64(text.as_bytes());
        for (idx, value) in v.iter_mut().enumerate() {
            *value = ((h >> (idx % 32)) as f32 * 0.0001).sin();
        }
        if self.normalize {
            l2_normalize_in_place(&mut v);
        }
        Ok(v)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
