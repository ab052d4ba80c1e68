//! Caching front over an embedding model
//!
//! Repeated ingestion and querying of the same texts is common; the engine
//! memoizes per-text vectors so batch calls only hit the model for misses.

use std::sync::Arc;

use dashmap::DashMap;

use super::Embedder;
use crate::error::Result;

/// Embedding engine with a per-text vector cache.
///
/// Wraps any [`Embedder`] and preserves its batch ordering guarantees: the
/// result of [`EmbeddingEngine::embed_batch`] is index-aligned with the
/// input regardless of which entries were cache hits.
pub struct EmbeddingEngine {
    model: Arc<dyn Embedder>,
    cache: DashMap<String, Vec<f32>>,
}

impl EmbeddingEngine {
    /// Wrap a model in a caching engine
    pub fn new(model: Arc<dyn Embedder>) -> Self {
        log::info!("EmbeddingEngine ready ({}d)", model.dimension());
        Self {
            model,
            cache: DashMap::new(),
        }
    }

    /// Embed a single text
    pub fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if let Some(cached) = self.cache.get(text) {
            return Ok(cached.clone());
        }

        let mut vectors = self.model.embed_batch(&[text])?;
        let vector = vectors.pop().ok_or_else(|| {
            crate::error::RetrievalError::embedding("model returned no vector for input")
        })?;
        self.cache.insert(text.to_string(), vector.clone());
        Ok(vector)
    }

    /// Embed a batch, consulting the cache per entry.
    ///
    /// All-or-nothing: a model failure on the uncached remainder fails the
    /// whole call and caches nothing from it.
    pub fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results: Vec<Option<Vec<f32>>> = texts
            .iter()
            .map(|text| self.cache.get(*text).map(|v| v.clone()))
            .collect();

        let misses: Vec<(usize, &str)> = results
            .iter()
            .enumerate()
            .filter(|(_, cached)| cached.is_none())
            .map(|(i, _)| (i, texts[i]))
            .collect();

        if !misses.is_empty() {
            let miss_texts: Vec<&str> = misses.iter().map(|(_, t)| *t).collect();
            let fresh = self.model.embed_batch(&miss_texts)?;
            if fresh.len() != miss_texts.len() {
                return Err(crate::error::RetrievalError::embedding(format!(
                    "model returned {} vectors for {} inputs",
                    fresh.len(),
                    miss_texts.len()
                )));
            }

            for ((idx, text), vector) in misses.iter().zip(fresh.into_iter()) {
                self.cache.insert(text.to_string(), vector.clone());
                results[*idx] = Some(vector);
            }
        }

        Ok(results.into_iter().flatten().collect())
    }

    /// Embedding dimension of the underlying model
    pub fn dimension(&self) -> usize {
        self.model.dimension()
    }

    /// Number of cached texts
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    /// Drop all cached vectors
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashEmbedder;

    fn engine() -> EmbeddingEngine {
        EmbeddingEngine::new(Arc::new(HashEmbedder::new(32)))
    }

    #[test]
    fn test_embed_is_cached() {
        let engine = engine();
        let first = engine.embed("the quick brown fox").unwrap();
        assert_eq!(engine.cache_size(), 1);
        let second = engine.embed("the quick brown fox").unwrap();
        assert_eq!(first, second);
        assert_eq!(engine.cache_size(), 1);
    }

    #[test]
    fn test_batch_preserves_order_across_cache_hits() {
        let engine = engine();
        // Prime the cache with the middle entry only
        engine.embed("bravo").unwrap();

        let batch = engine.embed_batch(&["alpha", "bravo", "charlie"]).unwrap();
        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0], engine.embed("alpha").unwrap());
        assert_eq!(batch[1], engine.embed("bravo").unwrap());
        assert_eq!(batch[2], engine.embed("charlie").unwrap());
    }

    #[test]
    fn test_empty_batch() {
        let engine = engine();
        assert!(engine.embed_batch(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_clear_cache() {
        let engine = engine();
        engine.embed("x").unwrap();
        engine.clear_cache();
        assert_eq!(engine.cache_size(), 0);
    }
}
