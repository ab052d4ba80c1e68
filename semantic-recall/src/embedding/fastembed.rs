//! fastembed-backed embedding model
//!
//! ONNX sentence-embedding models downloaded and cached by fastembed.

use std::path::PathBuf;

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use super::Embedder;
use crate::error::{Result, RetrievalError};

/// Maximum token budget per input; longer texts are truncated by the model
const MAX_TOKENS: usize = 512;

/// Embedder backed by a fastembed [`TextEmbedding`] model.
///
/// The model identifier is an opaque configuration string resolved against
/// the supported model set; an unknown identifier fails with
/// [`RetrievalError::Model`] rather than silently substituting a default.
pub struct FastTextEmbedder {
    model: TextEmbedding,
    dimension: usize,
}

impl FastTextEmbedder {
    /// Load an embedding model by identifier.
    ///
    /// `cache_dir` overrides fastembed's default model cache location.
    pub fn new(model_name: &str, cache_dir: Option<PathBuf>) -> Result<Self> {
        let model_kind = resolve_model(model_name)?;

        let mut options = InitOptions::new(model_kind)
            .with_show_download_progress(false)
            .with_max_length(MAX_TOKENS);
        if let Some(dir) = cache_dir {
            options = options.with_cache_dir(dir);
        }

        let model = TextEmbedding::try_new(options).map_err(|e| {
            RetrievalError::model(format!("failed to load embedding model {model_name}: {e}"))
        })?;

        // Probe for the dimension; model metadata is not exposed uniformly
        let probe = model
            .embed(vec!["dimension probe"], None)
            .map_err(|e| RetrievalError::model(format!("embedding model self-test failed: {e}")))?;
        let dimension = probe
            .first()
            .map(|v| v.len())
            .ok_or_else(|| RetrievalError::model("embedding model produced no probe vector"))?;

        log::info!("Loaded embedding model {model_name} ({dimension}d, max {MAX_TOKENS} tokens)");

        Ok(Self { model, dimension })
    }
}

impl Embedder for FastTextEmbedder {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        self.model
            .embed(texts.to_vec(), None)
            .map_err(|e| RetrievalError::embedding(format!("failed to encode batch: {e}")))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Resolve a model identifier string to a supported fastembed model
fn resolve_model(name: &str) -> Result<EmbeddingModel> {
    match name {
        "bge-small-en-v1.5" | "BAAI/bge-small-en-v1.5" => Ok(EmbeddingModel::BGESmallENV15),
        "bge-base-en-v1.5" | "BAAI/bge-base-en-v1.5" => Ok(EmbeddingModel::BGEBaseENV15),
        "all-minilm-l6-v2" | "sentence-transformers/all-MiniLM-L6-v2" => {
            Ok(EmbeddingModel::AllMiniLML6V2)
        }
        "nomic-embed-text-v1.5" | "nomic-ai/nomic-embed-text-v1.5" => {
            Ok(EmbeddingModel::NomicEmbedTextV15)
        }
        other => Err(RetrievalError::model(format!(
            "unknown embedding model: {other}"
        ))),
    }
}
