//! Second-stage reranking
//!
//! Nearest-neighbor similarity over independently-produced embeddings is a
//! noisy proxy for relevance. The reranker scores query and candidate
//! jointly, which is too expensive to run over the whole corpus but corrects
//! ordering errors within the recalled candidate set.

mod cross_encoder;
mod lexical;

pub use cross_encoder::CrossEncoderReranker;
pub use lexical::TokenOverlapReranker;

use crate::document::ScoredCandidate;
use crate::error::Result;

/// A (query, candidate) relevance scorer.
///
/// Scores are length- and order-preserving with the candidate list; higher =
/// more relevant. Scoring is independent per candidate — no cross-candidate
/// normalization is required of implementations.
pub trait Reranker: Send + Sync {
    /// One score per candidate, aligned with the input order
    fn score(&self, query: &str, candidates: &[&str]) -> Result<Vec<f32>>;
}

/// Rerank candidates against a query, keeping the top `k`.
///
/// Stable descending sort: ties keep their original input order, so results
/// are reproducible. Returns at most `min(k, candidates.len())` entries and
/// never invokes the model on an empty candidate list.
pub fn rerank(
    reranker: &dyn Reranker,
    query: &str,
    candidates: Vec<String>,
    k: usize,
) -> Result<Vec<ScoredCandidate>> {
    if candidates.is_empty() {
        return Ok(vec![]);
    }

    let refs: Vec<&str> = candidates.iter().map(String::as_str).collect();
    let scores = reranker.score(query, &refs)?;
    if scores.len() != candidates.len() {
        return Err(crate::error::RetrievalError::rerank(format!(
            "reranker returned {} scores for {} candidates",
            scores.len(),
            candidates.len()
        )));
    }

    let mut scored: Vec<ScoredCandidate> = candidates
        .into_iter()
        .zip(scores)
        .map(|(content, relevance)| ScoredCandidate { content, relevance })
        .collect();

    // sort_by is stable, so equal scores preserve input order
    scored.sort_by(|a, b| {
        b.relevance
            .partial_cmp(&a.relevance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(k);

    Ok(scored)
}
