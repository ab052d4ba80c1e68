//! Token-overlap reranker
//!
//! Deterministic lexical scorer for tests and deployments without a
//! cross-encoder model.

use std::collections::HashSet;

use super::Reranker;
use crate::error::Result;

/// Scores candidates by Jaccard overlap of lowercase token sets.
///
/// Independent per candidate and fully deterministic; scores are in [0, 1].
#[derive(Debug, Default)]
pub struct TokenOverlapReranker;

impl TokenOverlapReranker {
    pub fn new() -> Self {
        Self
    }

    fn tokens(text: &str) -> HashSet<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_lowercase())
            .collect()
    }
}

impl Reranker for TokenOverlapReranker {
    fn score(&self, query: &str, candidates: &[&str]) -> Result<Vec<f32>> {
        let query_tokens = Self::tokens(query);

        Ok(candidates
            .iter()
            .map(|candidate| {
                let candidate_tokens = Self::tokens(candidate);
                let union = query_tokens.union(&candidate_tokens).count();
                if union == 0 {
                    return 0.0;
                }
                let shared = query_tokens.intersection(&candidate_tokens).count();
                shared as f32 / union as f32
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scores_align_with_input() {
        let reranker = TokenOverlapReranker::new();
        let scores = reranker
            .score("red rose", &["red rose garden", "white lily", "red tulip"])
            .unwrap();
        assert_eq!(scores.len(), 3);
        assert!(scores[0] > scores[2]);
        assert_eq!(scores[1], 0.0);
    }

    #[test]
    fn test_identical_text_scores_one() {
        let reranker = TokenOverlapReranker::new();
        let scores = reranker.score("lotus purity", &["lotus purity"]).unwrap();
        assert!((scores[0] - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_case_insensitive() {
        let reranker = TokenOverlapReranker::new();
        let scores = reranker.score("Red ROSE", &["red rose"]).unwrap();
        assert!((scores[0] - 1.0).abs() < 0.001);
    }
}
