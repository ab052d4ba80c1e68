//! Retrieval configuration
//!
//! All tuning knobs of the core live here; the crate never reads environment
//! variables or files. The host resolves configuration however it likes and
//! hands the values over at construction.

use std::path::PathBuf;

/// Similarity metric used for both insert-time and query-time comparison.
///
/// Must be used consistently for a given index; switching metrics over an
/// existing index invalidates its ordering guarantees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimilarityMetric {
    /// Cosine similarity, in [-1, 1]. The only metric accelerated by the
    /// HNSW index; the others fall back to a linear scan.
    #[default]
    Cosine,
    /// Raw dot product, unbounded
    Dot,
    /// Euclidean distance mapped to 1 / (1 + d)
    Euclidean,
}

impl SimilarityMetric {
    /// Similarity between two vectors; higher = closer.
    ///
    /// Mismatched lengths score 0.0 — callers are expected to have
    /// dimension-checked already.
    pub fn similarity(&self, a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() {
            return 0.0;
        }
        match self {
            Self::Cosine => cosine_similarity(a, b),
            Self::Dot => dot(a, b),
            Self::Euclidean => 1.0 / (1.0 + euclidean(a, b)),
        }
    }
}

/// Construction-time configuration for [`crate::RetrievalService::open`]
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    /// Embedding model identifier (e.g. "bge-small-en-v1.5")
    pub embedding_model: String,
    /// Cross-encoder reranker model identifier (e.g. "bge-reranker-base")
    pub reranker_model: String,
    /// Directory for the persistent document index
    pub index_path: PathBuf,
    /// Optional cache directory for downloaded model files
    pub model_cache_dir: Option<PathBuf>,
    /// Similarity metric for vector search
    pub metric: SimilarityMetric,
    /// Minimum similarity for a document to count as a candidate.
    ///
    /// `None` disables the cutoff. Values are in the metric's own scale
    /// (cosine: the original deployment used 0.7).
    pub min_similarity: Option<f32>,
    /// Candidate over-fetch multiplier for the recall stage.
    ///
    /// A query for `limit` results fetches `overfetch_factor * limit` nearest
    /// neighbors before reranking, so the reranker has room to demote noisy
    /// near-neighbors without starving the final top-k.
    pub overfetch_factor: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            embedding_model: "bge-small-en-v1.5".to_string(),
            reranker_model: "bge-reranker-base".to_string(),
            index_path: PathBuf::from("recall-index"),
            model_cache_dir: None,
            metric: SimilarityMetric::Cosine,
            min_similarity: None,
            overfetch_factor: 2,
        }
    }
}

/// Calculate cosine similarity between two vectors
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn euclidean(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity_identical() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &b).abs() < 0.001);
    }

    #[test]
    fn test_cosine_similarity_opposite() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 0.001);
    }

    #[test]
    fn test_mismatched_lengths_score_zero() {
        let a = vec![1.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert_eq!(SimilarityMetric::Cosine.similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_euclidean_self_similarity_is_one() {
        let a = vec![0.3, -1.2, 4.0];
        let sim = SimilarityMetric::Euclidean.similarity(&a, &a);
        assert!((sim - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_config_default() {
        let config = RetrievalConfig::default();
        assert_eq!(config.metric, SimilarityMetric::Cosine);
        assert_eq!(config.overfetch_factor, 2);
        assert!(config.min_similarity.is_none());
    }
}
