use std::path::Path;
use std::sync::Mutex;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use tokenizers::{Tokenizer, TruncationParams};

use crate::vector::l2_normalize_in_place;
use crate::{Embedder, EmbeddingVector, SemanticConfig, SemanticError};

/// Sentence-transformers model running under ONNX Runtime.
///
/// `Session::run` needs `&mut`, so the session sits behind a mutex; the
/// tokenizer is immutable and shared.
pub struct OnnxEmbedder {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    wants_token_types: bool,
    max_sequence_length: usize,
    normalize: bool,
    model_name: String,
}

impl OnnxEmbedder {
    /// Loads the ONNX graph and tokenizer from local files.
    pub fn from_files(
        model_path: &Path,
        tokenizer_path: &Path,
        cfg: &SemanticConfig,
    ) -> Result<Self, SemanticError> {
        if cfg.max_sequence_length == 0 {
            return Err(SemanticError::InvalidConfig(
                "max_sequence_length must be positive".into(),
            ));
        }

        let mut tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| SemanticError::Inference(format!("load tokenizer: {e}")))?;
        // Truncate inside the tokenizer so the trailing special token survives.
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: cfg.max_sequence_length,
                ..TruncationParams::default()
            }))
            .map_err(|e| SemanticError::Inference(format!("configure tokenizer: {e}")))?;

        let mut builder = Session::builder()
            .map_err(|e| SemanticError::Inference(format!("session builder: {e}")))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| SemanticError::Inference(format!("session builder: {e}")))?;
        if cfg.intra_threads > 0 {
            builder = builder
                .with_intra_threads(cfg.intra_threads)
                .map_err(|e| SemanticError::Inference(format!("session builder: {e}")))?;
        }
        let session = builder
            .commit_from_file(model_path)
            .map_err(|e| SemanticError::Inference(format!("load model: {e}")))?;

        let declares = |name: &str| session.inputs.iter().any(|input| input.name == name);
        for required in ["input_ids", "attention_mask"] {
            if !declares(required) {
                return Err(SemanticError::InvalidConfig(format!(
                    "model does not declare required input `{required}`"
                )));
            }
        }
        let wants_token_types = declares("token_type_ids");

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            wants_token_types,
            max_sequence_length: cfg.max_sequence_length,
            normalize: cfg.normalize,
            model_name: cfg.model_name.clone(),
        })
    }

    pub(crate) fn load(
        assets: &crate::assets::ModelAssets,
        cfg: &SemanticConfig,
    ) -> Result<Self, SemanticError> {
        Self::from_files(&assets.model_path, &assets.tokenizer_path, cfg)
    }

    fn run_batch(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>, SemanticError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let encoded = encode_documents(&self.tokenizer, texts, self.max_sequence_length)?;
        let padded = build_padded_arrays(encoded)?;
        let (batch, seq_len) = padded.input_ids.dim();
        let mask = padded.attention_mask.clone();

        let input_ids = tensor(padded.input_ids)?;
        let attention_mask = tensor(padded.attention_mask)?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| SemanticError::Inference("onnx session lock poisoned".into()))?;

        let run = if self.wants_token_types {
            let token_type_ids = tensor(Array2::<i64>::zeros((batch, seq_len)))?;
            session.run(ort::inputs![
                "input_ids" => input_ids,
                "attention_mask" => attention_mask,
                "token_type_ids" => token_type_ids,
            ])
        } else {
            session.run(ort::inputs![
                "input_ids" => input_ids,
                "attention_mask" => attention_mask,
            ])
        };
        let outputs = run.map_err(|e| SemanticError::Inference(e.to_string()))?;

        let output = outputs
            .get("last_hidden_state")
            .or_else(|| outputs.get("sentence_embedding"))
            .ok_or_else(|| SemanticError::Inference("model returned no usable output".into()))?;
        let (shape, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| SemanticError::Inference(e.to_string()))?;
        let dims: Vec<usize> = shape.iter().map(|&d| d as usize).collect();

        let mut vectors = match dims.as_slice() {
            // [batch, seq, hidden]: token embeddings, pool them.
            [b, s, hidden] if *b == batch && *s == seq_len => mean_pool(data, &mask, *hidden),
            // [batch, hidden]: already pooled by the graph.
            [b, hidden] if *b == batch && *hidden > 0 => {
                data.chunks(*hidden).map(<[f32]>::to_vec).collect()
            }
            other => {
                return Err(SemanticError::Inference(format!(
                    "unexpected output shape {other:?} for batch of {batch}"
                )))
            }
        };

        if self.normalize {
            for vector in &mut vectors {
                l2_normalize_in_place(vector);
            }
        }
        Ok(vectors)
    }
}

impl Embedder for OnnxEmbedder {
    fn encode(&self, text: &str) -> Result<EmbeddingVector, SemanticError> {
        self.run_batch(&[text])?
            .pop()
            .ok_or_else(|| SemanticError::Inference("model returned no outputs".into()))
    }

    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>, SemanticError> {
        let vectors = self.run_batch(texts)?;
        if vectors.len() != texts.len() {
            return Err(SemanticError::Inference(format!(
                "model returned {} embeddings for {} inputs",
                vectors.len(),
                texts.len()
            )));
        }
        Ok(vectors)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

fn tensor(array: Array2<i64>) -> Result<Tensor<i64>, SemanticError> {
    Tensor::from_array(array).map_err(|e| SemanticError::Inference(e.to_string()))
}

struct EncodedDoc {
    ids: Vec<i64>,
    mask: Vec<i64>,
}

struct PaddedBatch {
    input_ids: Array2<i64>,
    attention_mask: Array2<i64>,
}

fn encode_documents(
    tokenizer: &Tokenizer,
    texts: &[&str],
    max_sequence_length: usize,
) -> Result<Vec<EncodedDoc>, SemanticError> {
    texts
        .iter()
        .map(|text| {
            let encoding = tokenizer
                .encode(*text, true)
                .map_err(|e| SemanticError::Inference(e.to_string()))?;
            let mut ids: Vec<i64> = encoding.get_ids().iter().map(|&x| x as i64).collect();
            let mut mask: Vec<i64> = encoding
                .get_attention_mask()
                .iter()
                .map(|&x| x as i64)
                .collect();
            ids.truncate(max_sequence_length);
            mask.truncate(max_sequence_length);
            Ok(EncodedDoc { ids, mask })
        })
        .collect()
}

/// Right-pads every sequence with zeros to the longest one in the batch.
fn build_padded_arrays(encoded: Vec<EncodedDoc>) -> Result<PaddedBatch, SemanticError> {
    let seq_len = encoded.iter().map(|d| d.ids.len()).max().unwrap_or(0).max(1);
    let batch = encoded.len();
    let mut id_storage = Vec::with_capacity(batch * seq_len);
    let mut mask_storage = Vec::with_capacity(batch * seq_len);

    for EncodedDoc { ids, mask } in encoded {
        if ids.len() != mask.len() {
            return Err(SemanticError::Inference(
                "tokenizer produced mismatched id/mask lengths".into(),
            ));
        }
        let pad = seq_len - ids.len();
        id_storage.extend(ids);
        mask_storage.extend(mask);
        id_storage.extend(std::iter::repeat_n(0, pad));
        mask_storage.extend(std::iter::repeat_n(0, pad));
    }

    let input_ids = Array2::from_shape_vec((batch, seq_len), id_storage)
        .map_err(|e| SemanticError::Inference(e.to_string()))?;
    let attention_mask = Array2::from_shape_vec((batch, seq_len), mask_storage)
        .map_err(|e| SemanticError::Inference(e.to_string()))?;
    Ok(PaddedBatch {
        input_ids,
        attention_mask,
    })
}

/// Attention-masked mean over token embeddings laid out as `[batch, seq, hidden]`.
fn mean_pool(data: &[f32], mask: &Array2<i64>, hidden: usize) -> Vec<EmbeddingVector> {
    let (batch, seq_len) = mask.dim();
    let mut pooled = Vec::with_capacity(batch);

    for b in 0..batch {
        let mut sum = vec![0.0f32; hidden];
        let mut count = 0.0f32;
        for t in 0..seq_len {
            if mask[[b, t]] == 0 {
                continue;
            }
            let offset = (b * seq_len + t) * hidden;
            for (acc, value) in sum.iter_mut().zip(&data[offset..offset + hidden]) {
                *acc += value;
            }
            count += 1.0;
        }
        if count > 0.0 {
            sum.iter_mut().for_each(|x| *x /= count);
        }
        pooled.push(sum);
    }
    pooled
}
