//! Vector index backends
//!
//! Storage of (vector, text, category) documents and approximate
//! nearest-neighbor retrieval. The [`VectorIndex`] trait isolates the
//! orchestration in [`crate::RetrievalService`] from any specific backend:
//! [`InMemoryIndex`] for tests and ephemeral deployments, [`DiskIndex`] for
//! durable storage.

mod ann;
mod memory;
mod persistent;

pub use memory::InMemoryIndex;
pub use persistent::DiskIndex;

use crate::config::SimilarityMetric;
use crate::document::Document;
use crate::error::{Result, RetrievalError};

/// A shared, mutable store of documents with nearest-neighbor search.
///
/// Structural mutations (insert/delete) are serialized against each other by
/// implementations; concurrent searches proceed without blocking each other.
pub trait VectorIndex: Send + Sync {
    /// Create the storage structure if absent. Idempotent — calling it when
    /// the structure already exists must neither fail nor duplicate it.
    fn ensure_schema(&self) -> Result<()>;

    /// Append all documents.
    ///
    /// Every vector is dimension-checked before any write; a dimension
    /// failure rejects the whole batch and leaves the index unchanged. A
    /// storage failure mid-batch surfaces as
    /// [`RetrievalError::PartialInsert`] with the count already stored.
    fn insert_batch(&self, documents: Vec<Document>) -> Result<()>;

    /// Nearest documents to `query`, most similar first, bounded by `limit`.
    ///
    /// `category` restricts the search to documents carrying that tag.
    /// Fewer than `limit` matches is success, not an error.
    fn search(&self, query: &[f32], category: Option<&str>, limit: usize)
        -> Result<Vec<Document>>;

    /// Remove all documents with the given category. No-op success when
    /// nothing matches.
    fn delete_by_category(&self, category: &str) -> Result<()>;

    /// Remove every document. Irreversible.
    fn delete_all(&self) -> Result<()>;

    /// Number of stored documents
    fn len(&self) -> usize;

    /// True when no documents are stored
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Corpus statistics: document total and per-category counts
    fn stats(&self) -> serde_json::Value;
}

/// Build the stats payload from the stored category tags
pub(crate) fn corpus_stats(categories: impl Iterator<Item = String>) -> serde_json::Value {
    use std::collections::HashMap;

    let mut by_category: HashMap<String, usize> = HashMap::new();
    let mut total = 0usize;
    for category in categories {
        *by_category.entry(category).or_insert(0) += 1;
        total += 1;
    }

    serde_json::json!({
        "totalDocuments": total,
        "byCategory": by_category,
    })
}

/// Reject a vector whose length is not the index dimension
pub(crate) fn check_dimension(expected: usize, vector: &[f32]) -> Result<()> {
    if vector.len() != expected {
        return Err(RetrievalError::DimensionMismatch {
            expected,
            actual: vector.len(),
        });
    }
    Ok(())
}

/// Brute-force ranking over a document iterator.
///
/// Used for filtered searches and non-cosine metrics, where the HNSW index
/// does not apply.
pub(crate) fn rank_linear(
    docs: impl Iterator<Item = Document>,
    query: &[f32],
    metric: SimilarityMetric,
    min_similarity: Option<f32>,
    category: Option<&str>,
    limit: usize,
) -> Vec<Document> {
    let mut scored: Vec<(f32, Document)> = docs
        .filter(|doc| category.map_or(true, |c| doc.category == c))
        .map(|doc| (metric.similarity(query, &doc.vector), doc))
        .filter(|(sim, _)| min_similarity.map_or(true, |cutoff| *sim >= cutoff))
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(limit);
    scored.into_iter().map(|(_, doc)| doc).collect()
}
