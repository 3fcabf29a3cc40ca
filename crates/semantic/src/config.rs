use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Runtime configuration describing which model/tokenizer to use and how to
/// post-process vectors.
///
/// Every field has a default so the struct can be filled piecemeal from a
/// config file or environment variables.
///
/// # Example
/// ```no_run
/// use semantic::SemanticConfig;
/// use std::path::PathBuf;
///
/// let cfg = SemanticConfig {
///     model_path: PathBuf::from("/srv/models/minilm/model.onnx"),
///     model_url: Some("https://example.com/minilm/model.onnx".into()),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SemanticConfig {
    /// Backend selector: `"onnx"` (local inference) or `"stub"` (deterministic fake vectors).
    pub mode: String,
    /// Friendly label for logs and the readiness probe.
    pub model_name: String,
    /// Local path of the ONNX export. Also the download target when
    /// [`model_url`](Self::model_url) is set.
    pub model_path: PathBuf,
    /// Optional HTTPS URL fetched when [`model_path`](Self::model_path) is missing.
    pub model_url: Option<String>,
    /// Path to `tokenizer.json`. When absent and [`tokenizer_url`](Self::tokenizer_url)
    /// is set, the file is placed next to the model.
    pub tokenizer_path: Option<PathBuf>,
    /// Optional HTTPS URL for fetching the tokenizer on demand.
    pub tokenizer_url: Option<String>,
    /// Longer inputs are truncated to this many tokens.
    pub max_sequence_length: usize,
    /// Normalize vectors to unit length.
    pub normalize: bool,
    /// Dimension of stub vectors.
    pub stub_dim: usize,
    /// ONNX Runtime intra-op threads; `0` lets the runtime decide.
    pub intra_threads: usize,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            mode: "onnx".into(),
            model_name: "paraphrase-multilingual-MiniLM-L12-v2".into(),
            model_path: PathBuf::from(
                "./models/paraphrase-multilingual-MiniLM-L12-v2/onnx/model.onnx",
            ),
            model_url: None,
            tokenizer_path: Some(PathBuf::from(
                "./models/paraphrase-multilingual-MiniLM-L12-v2/tokenizer.json",
            )),
            tokenizer_url: None,
            max_sequence_length: 128,
            normalize: true,
            stub_dim: 384,
            intra_threads: 0,
        }
    }
}
