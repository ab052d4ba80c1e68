//! Semantic Recall
//!
//! Embedding-indexed semantic retrieval with two-stage reranking: free text
//! is embedded into fixed-length vectors, stored in a vector index with a
//! category tag, recalled by approximate nearest-neighbor search, and
//! reordered by a cross-encoding relevance model before delivery.
//!
//! ## Design
//!
//! - **Recall then rerank** - vector similarity over-fetches candidates
//!   (2x the requested limit by default), then a joint (query, candidate)
//!   scorer corrects the ordering errors that independent embeddings make
//! - **Pluggable backends** - [`Embedder`], [`Reranker`], and [`VectorIndex`]
//!   traits with fastembed/RocksDB production implementations and
//!   deterministic in-memory ones for tests
//! - **Explicit outcomes** - empty result sets are success values; model and
//!   store failures are typed [`RetrievalError`] variants, never swallowed
//!
//! ## Example
//!
//! ```ignore
//! use semantic_recall::{RetrievalConfig, RetrievalService};
//!
//! let service = RetrievalService::open(&RetrievalConfig::default())?;
//!
//! service.ingest(
//!     &[
//!         "red rose meaning love".into(),
//!         "lotus symbolizing purity".into(),
//!         "bamboo representing resilience".into(),
//!     ],
//!     "flora",
//! )?;
//!
//! let results = service.query("flower that symbolizes romance", Some("flora"), 1)?;
//! assert_eq!(results, vec!["red rose meaning love".to_string()]);
//! ```

pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod index;
pub mod rerank;
pub mod service;

// Re-exports for convenience
pub use config::{RetrievalConfig, SimilarityMetric};
pub use document::{Document, DocumentId, ScoredCandidate};
pub use embedding::{Embedder, EmbeddingEngine, FastTextEmbedder, HashEmbedder};
pub use error::{Result, RetrievalError};
pub use index::{DiskIndex, InMemoryIndex, VectorIndex};
pub use rerank::{rerank, CrossEncoderReranker, Reranker, TokenOverlapReranker};
pub use service::{RetrievalService, DEFAULT_QUERY_LIMIT};
