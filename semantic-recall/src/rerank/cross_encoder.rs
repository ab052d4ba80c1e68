//! fastembed-backed cross-encoder reranker

use std::path::PathBuf;

use fastembed::{RerankInitOptions, RerankerModel, TextRerank};

use super::Reranker;
use crate::error::{Result, RetrievalError};

/// Reranker backed by a fastembed [`TextRerank`] cross-encoder.
///
/// The model scores query and candidate jointly, unlike the embedding
/// similarity used for recall. fastembed returns results sorted by score;
/// they are mapped back to input order here so the trait's order-preservation
/// contract holds.
pub struct CrossEncoderReranker {
    model: TextRerank,
}

impl CrossEncoderReranker {
    /// Load a reranker model by identifier
    pub fn new(model_name: &str, cache_dir: Option<PathBuf>) -> Result<Self> {
        let model_kind = resolve_model(model_name)?;

        let mut options = RerankInitOptions::new(model_kind).with_show_download_progress(false);
        if let Some(dir) = cache_dir {
            options = options.with_cache_dir(dir);
        }

        let model = TextRerank::try_new(options).map_err(|e| {
            RetrievalError::model(format!("failed to load reranker {model_name}: {e}"))
        })?;

        log::info!("Loaded reranker model {model_name}");

        Ok(Self { model })
    }
}

impl Reranker for CrossEncoderReranker {
    fn score(&self, query: &str, candidates: &[&str]) -> Result<Vec<f32>> {
        if candidates.is_empty() {
            return Ok(vec![]);
        }

        let ranked = self
            .model
            .rerank(query, candidates.to_vec(), false, None)
            .map_err(|e| RetrievalError::rerank(format!("failed to score candidates: {e}")))?;

        let mut scores = vec![0.0f32; candidates.len()];
        for result in ranked {
            if result.index >= scores.len() {
                return Err(RetrievalError::rerank(format!(
                    "reranker returned out-of-range candidate index {}",
                    result.index
                )));
            }
            scores[result.index] = result.score;
        }

        Ok(scores)
    }
}

/// Resolve a model identifier string to a supported fastembed reranker
fn resolve_model(name: &str) -> Result<RerankerModel> {
    match name {
        "bge-reranker-base" | "BAAI/bge-reranker-base" => Ok(RerankerModel::BGERerankerBase),
        "jina-reranker-v1-turbo-en" | "jinaai/jina-reranker-v1-turbo-en" => {
            Ok(RerankerModel::JINARerankerV1TurboEn)
        }
        other => Err(RetrievalError::model(format!("unknown reranker: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_models() {
        assert!(resolve_model("bge-reranker-base").is_ok());
        assert!(resolve_model("jinaai/jina-reranker-v1-turbo-en").is_ok());
    }

    #[test]
    fn test_resolve_unknown_model_is_model_error() {
        assert!(resolve_model("tf-idf").unwrap_err().is_model_failure());
    }
}
