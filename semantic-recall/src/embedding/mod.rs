//! Embedding layer
//!
//! Maps text to fixed-length vectors. The [`Embedder`] trait isolates the
//! orchestration logic from any specific model backend; [`EmbeddingEngine`]
//! adds a cache in front of whichever backend is configured.

mod engine;
mod fastembed;
mod hashed;

pub use self::engine::EmbeddingEngine;
pub use self::fastembed::FastTextEmbedder;
pub use self::hashed::HashEmbedder;

use crate::error::Result;

/// A text embedding model.
///
/// Implementations must be length- and order-preserving (`result[i]`
/// corresponds to `texts[i]`), all-or-nothing per call, and deterministic for
/// fixed model state. Input beyond the model's token budget is truncated, not
/// rejected.
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Embedding dimension D, fixed for the life of the model
    fn dimension(&self) -> usize;
}
