//! Feature-hashing embedder
//!
//! Deterministic, dependency-free vectors from token hashing. Not as
//! semantically rich as the neural models, but always available — suitable
//! for tests and air-gapped deployments.

use std::collections::HashMap;

use super::Embedder;
use crate::error::Result;

/// Token budget mirroring the neural models' truncation behavior
const MAX_TOKENS: usize = 512;

/// Deterministic embedder hashing tokens into fixed-dimension buckets.
///
/// Buckets are weighted by in-text term frequency and a length-based IDF
/// approximation, then L2-normalized, so cosine similarity over the output
/// behaves as a crude lexical-overlap measure.
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    /// Hash a term into a bucket index using FNV-1a
    fn hash_term(term: &str, dims: usize) -> usize {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in term.as_bytes() {
            h ^= *b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        (h as usize) % dims
    }

    /// Tokenize text into lowercase alphanumeric terms, truncated to the
    /// token budget
    fn tokenize(text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric() && c != '_')
            .filter(|s| s.len() >= 2)
            .map(|s| s.to_lowercase())
            .take(MAX_TOKENS)
            .collect()
    }

    fn vector_for(&self, text: &str) -> Vec<f32> {
        let tokens = Self::tokenize(text);
        if tokens.is_empty() {
            return vec![0.0; self.dimension];
        }

        let mut tf: HashMap<&str, f32> = HashMap::new();
        for tok in &tokens {
            *tf.entry(tok.as_str()).or_default() += 1.0;
        }

        let total = tokens.len() as f32;
        let mut vec = vec![0.0f32; self.dimension];

        for (term, count) in &tf {
            let freq = count / total;
            // Longer terms carry more signal; short ones are likely stopwords
            let weight = 1.0 + (term.len() as f32).ln();
            let bucket = Self::hash_term(term, self.dimension);
            vec[bucket] += freq * weight;
        }

        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut vec {
                *v /= norm;
            }
        }

        vec
    }
}

impl Embedder for HashEmbedder {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vector_for(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let embedder = HashEmbedder::new(64);
        let a = embedder.embed_batch(&["semantic retrieval core"]).unwrap();
        let b = embedder.embed_batch(&["semantic retrieval core"]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_dimension_and_batch_shape() {
        let embedder = HashEmbedder::new(48);
        let vectors = embedder.embed_batch(&["one", "two words", ""]).unwrap();
        assert_eq!(vectors.len(), 3);
        for v in &vectors {
            assert_eq!(v.len(), 48);
        }
    }

    #[test]
    fn test_output_is_normalized() {
        let embedder = HashEmbedder::new(64);
        let v = &embedder.embed_batch(&["normalize this text"]).unwrap()[0];
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let embedder = HashEmbedder::new(16);
        let v = &embedder.embed_batch(&["?!"]).unwrap()[0];
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_shared_tokens_raise_similarity() {
        let embedder = HashEmbedder::new(128);
        let vs = embedder
            .embed_batch(&[
                "red rose meaning love",
                "red rose in the garden",
                "bamboo stands for resilience",
            ])
            .unwrap();
        let close = crate::config::cosine_similarity(&vs[0], &vs[1]);
        let far = crate::config::cosine_similarity(&vs[0], &vs[2]);
        assert!(close > far);
    }
}
