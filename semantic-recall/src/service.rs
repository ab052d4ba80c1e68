//! Retrieval orchestration
//!
//! Two-stage pipeline: approximate recall via vector similarity, then
//! precise reordering via the cross-encoding reranker. Ingestion is the
//! mirror path: embed, tag, store.

use std::sync::Arc;

use crate::config::RetrievalConfig;
use crate::document::{Document, ScoredCandidate};
use crate::embedding::{EmbeddingEngine, FastTextEmbedder};
use crate::error::Result;
use crate::index::{DiskIndex, VectorIndex};
use crate::rerank::{rerank, CrossEncoderReranker, Reranker};

/// Default number of results for a query
pub const DEFAULT_QUERY_LIMIT: usize = 5;

/// Stateless retrieval front over an embedder, a reranker, and a vector
/// index.
///
/// Each operation is an independent request/response over the shared index;
/// no session or transaction state is carried between calls. The heavy model
/// objects are constructed once and shared read-only via `Arc`, so one
/// service (or clones of its parts) can serve concurrent callers.
pub struct RetrievalService {
    engine: Arc<EmbeddingEngine>,
    reranker: Arc<dyn Reranker>,
    index: Arc<dyn VectorIndex>,
    overfetch_factor: usize,
}

impl RetrievalService {
    /// Production wiring: fastembed embedding + cross-encoder models and a
    /// durable [`DiskIndex`] at `config.index_path`.
    ///
    /// Model loading is expensive; call this once per process and share the
    /// service.
    pub fn open(config: &RetrievalConfig) -> Result<Self> {
        let embedder =
            FastTextEmbedder::new(&config.embedding_model, config.model_cache_dir.clone())?;
        let engine = Arc::new(EmbeddingEngine::new(Arc::new(embedder)));
        let reranker = Arc::new(CrossEncoderReranker::new(
            &config.reranker_model,
            config.model_cache_dir.clone(),
        )?);
        let index = Arc::new(DiskIndex::with_options(
            &config.index_path,
            engine.dimension(),
            config.metric,
            config.min_similarity,
        )?);

        Self::with_components(engine, reranker, index, config.overfetch_factor)
    }

    /// Assemble a service from explicit components.
    ///
    /// Calls `ensure_schema` on the index, as [`RetrievalService::open`]
    /// does. An `overfetch_factor` of 0 is treated as 1.
    pub fn with_components(
        engine: Arc<EmbeddingEngine>,
        reranker: Arc<dyn Reranker>,
        index: Arc<dyn VectorIndex>,
        overfetch_factor: usize,
    ) -> Result<Self> {
        index.ensure_schema()?;
        Ok(Self {
            engine,
            reranker,
            index,
            overfetch_factor: overfetch_factor.max(1),
        })
    }

    /// Embed and store texts under one category tag.
    ///
    /// The whole batch is embedded in a single model call, so an embedding
    /// failure inserts nothing. A storage failure mid-insert surfaces as
    /// [`crate::RetrievalError::PartialInsert`]; already-stored documents are
    /// not rolled back (the index has no transaction concept). Returns the
    /// number of documents inserted.
    pub fn ingest(&self, texts: &[String], category: &str) -> Result<usize> {
        if texts.is_empty() {
            return Ok(0);
        }

        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let vectors = self.engine.embed_batch(&refs)?;

        let documents: Vec<Document> = texts
            .iter()
            .zip(vectors)
            .map(|(text, vector)| Document::new(text.clone(), category, vector))
            .collect();
        let count = documents.len();

        self.index.insert_batch(documents)?;
        log::debug!("Ingested {count} documents under category {category:?}");
        Ok(count)
    }

    /// Query with the default result limit of [`DEFAULT_QUERY_LIMIT`]
    pub fn query_default(&self, text: &str, category: Option<&str>) -> Result<Vec<String>> {
        self.query(text, category, DEFAULT_QUERY_LIMIT)
    }

    /// Query contents most relevant to `text`, most relevant first.
    ///
    /// See [`RetrievalService::query_scored`] for the pipeline; this variant
    /// returns only the text content of the kept candidates, in rerank order.
    pub fn query(&self, text: &str, category: Option<&str>, limit: usize) -> Result<Vec<String>> {
        Ok(self
            .query_scored(text, category, limit)?
            .into_iter()
            .map(|candidate| candidate.content)
            .collect())
    }

    /// Query with rerank relevance scores attached.
    ///
    /// Pipeline: embed the query, fetch `overfetch_factor × limit` nearest
    /// neighbors (applying the category filter), rerank them against the
    /// original query text, keep the top `limit`. Zero recalled candidates is
    /// a success (`Ok(vec![])`) and never invokes the reranker.
    pub fn query_scored(
        &self,
        text: &str,
        category: Option<&str>,
        limit: usize,
    ) -> Result<Vec<ScoredCandidate>> {
        if limit == 0 {
            return Ok(vec![]);
        }

        let query_vector = self.engine.embed(text)?;
        // Saturate: a huge caller-supplied limit must not overflow
        let fetch = limit.saturating_mul(self.overfetch_factor);
        let candidates = self.index.search(&query_vector, category, fetch)?;
        log::debug!(
            "Recalled {} candidates for limit {limit} (category {category:?})",
            candidates.len()
        );

        if candidates.is_empty() {
            return Ok(vec![]);
        }

        let contents: Vec<String> = candidates.into_iter().map(|doc| doc.content).collect();
        rerank(self.reranker.as_ref(), text, contents, limit)
    }

    /// Delete every document carrying `category`. No-op success when nothing
    /// matches.
    pub fn clear_category(&self, category: &str) -> Result<()> {
        self.index.delete_by_category(category)
    }

    /// Delete every stored document
    pub fn clear_all(&self) -> Result<()> {
        self.index.delete_all()
    }

    /// Number of stored documents
    pub fn document_count(&self) -> usize {
        self.index.len()
    }

    /// Corpus statistics from the underlying index
    pub fn stats(&self) -> serde_json::Value {
        self.index.stats()
    }

    /// The shared embedding engine
    pub fn engine(&self) -> &Arc<EmbeddingEngine> {
        &self.engine
    }
}
