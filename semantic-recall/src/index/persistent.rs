//! RocksDB-backed vector index
//!
//! Durable storage with LZ4 compression. Documents live under `doc:{id}`
//! keys; an in-memory table and HNSW graph are rebuilt from disk at open, so
//! searches never touch RocksDB on the hot path.

use std::path::Path;
use std::sync::Arc;

use dashmap::DashMap;
use rocksdb::{IteratorMode, Options, DB};

use super::ann::{AnnSet, IndexPoint};
use super::{check_dimension, rank_linear, VectorIndex};
use crate::config::SimilarityMetric;
use crate::document::Document;
use crate::error::{Result, RetrievalError};

const DOC_PREFIX: &str = "doc:";
const SCHEMA_VERSION_KEY: &[u8] = b"meta:schema_version";
const SCHEMA_VERSION: u32 = 1;

/// Durable vector index on RocksDB
pub struct DiskIndex {
    db: Arc<DB>,
    dimension: usize,
    metric: SimilarityMetric,
    min_similarity: Option<f32>,
    docs: DashMap<String, Document>,
    ann: AnnSet,
}

impl DiskIndex {
    /// Open (or create) an index at `path` for dimension-`dimension` vectors
    /// with cosine similarity and no cutoff
    pub fn open(path: impl AsRef<Path>, dimension: usize) -> Result<Self> {
        Self::with_options(path, dimension, SimilarityMetric::Cosine, None)
    }

    /// Open with an explicit metric and optional minimum-similarity cutoff
    pub fn with_options(
        path: impl AsRef<Path>,
        dimension: usize,
        metric: SimilarityMetric,
        min_similarity: Option<f32>,
    ) -> Result<Self> {
        let path = path.as_ref();
        std::fs::create_dir_all(path)?;

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_max_background_jobs(2);
        opts.set_bytes_per_sync(1048576); // 1MB
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);

        let db = DB::open(&opts, path).map_err(|e| {
            RetrievalError::unreachable(format!("failed to open index at {}: {e}", path.display()))
        })?;

        log::info!("DiskIndex opened at: {}", path.display());

        let index = Self {
            db: Arc::new(db),
            dimension,
            metric,
            min_similarity,
            docs: DashMap::new(),
            ann: AnnSet::new(),
        };

        index.load_cache()?;
        Ok(index)
    }

    /// Load stored documents into the in-memory table and HNSW graph
    fn load_cache(&self) -> Result<()> {
        let mut count = 0;
        let mut skipped = 0;
        let mut points = Vec::new();

        for item in self.db.iterator(IteratorMode::Start) {
            let (key, value) = item?;
            let key_str = String::from_utf8_lossy(&key);
            let Some(id) = key_str.strip_prefix(DOC_PREFIX) else {
                continue;
            };

            match bincode::deserialize::<Document>(&value) {
                Ok(doc) if doc.vector.len() == self.dimension => {
                    points.push(IndexPoint {
                        id: id.to_string(),
                        vector: doc.vector.clone(),
                    });
                    self.docs.insert(id.to_string(), doc);
                    count += 1;
                }
                Ok(doc) => {
                    log::warn!(
                        "Document {id} has dimension {} (index expects {}). Skipping.",
                        doc.vector.len(),
                        self.dimension
                    );
                    skipped += 1;
                }
                Err(e) => {
                    log::warn!("Failed to deserialize document {id}: {e}. Skipping.");
                    skipped += 1;
                }
            }
        }

        if count > 0 {
            log::info!("Loaded {count} documents from disk");
            self.ann.extend(points);
        }
        if skipped > 0 {
            log::warn!("Skipped {skipped} documents while loading the index");
        }

        Ok(())
    }

    /// Finish an interrupted batch: publish what made it to disk, then
    /// surface the failure with the partial count
    fn abort_batch(
        &self,
        inserted: usize,
        attempted: usize,
        points: Vec<IndexPoint>,
        source: RetrievalError,
    ) -> RetrievalError {
        if !points.is_empty() {
            self.ann.extend(points);
        }
        if inserted == 0 {
            return source;
        }
        RetrievalError::PartialInsert {
            inserted,
            attempted,
            source: Box::new(source),
        }
    }
}

impl VectorIndex for DiskIndex {
    fn ensure_schema(&self) -> Result<()> {
        if self.db.get(SCHEMA_VERSION_KEY)?.is_some() {
            return Ok(());
        }
        self.db
            .put(SCHEMA_VERSION_KEY, SCHEMA_VERSION.to_le_bytes())?;
        log::debug!("Initialized index schema (version {SCHEMA_VERSION})");
        Ok(())
    }

    fn insert_batch(&self, documents: Vec<Document>) -> Result<()> {
        for doc in &documents {
            check_dimension(self.dimension, &doc.vector)?;
        }

        let attempted = documents.len();
        let mut inserted = 0;
        let mut points = Vec::with_capacity(attempted);

        for doc in documents {
            let id = doc.id.to_string();
            let bytes = match bincode::serialize(&doc) {
                Ok(bytes) => bytes,
                Err(e) => return Err(self.abort_batch(inserted, attempted, points, e.into())),
            };
            if let Err(e) = self.db.put(format!("{DOC_PREFIX}{id}").as_bytes(), bytes) {
                return Err(self.abort_batch(inserted, attempted, points, e.into()));
            }

            points.push(IndexPoint {
                id: id.clone(),
                vector: doc.vector.clone(),
            });
            self.docs.insert(id, doc);
            inserted += 1;
        }

        self.ann.extend(points);
        self.db.flush()?;
        Ok(())
    }

    fn search(
        &self,
        query: &[f32],
        category: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Document>> {
        check_dimension(self.dimension, query)?;
        if limit == 0 {
            return Ok(vec![]);
        }

        if category.is_none() && self.metric == SimilarityMetric::Cosine {
            if let Some(hits) = self.ann.search(query, limit) {
                let docs = hits
                    .into_iter()
                    .filter(|(_, sim)| self.min_similarity.map_or(true, |cutoff| *sim >= cutoff))
                    .filter_map(|(id, _)| self.docs.get(&id).map(|e| e.clone()))
                    .collect();
                return Ok(docs);
            }
        }

        Ok(rank_linear(
            self.docs.iter().map(|e| e.value().clone()),
            query,
            self.metric,
            self.min_similarity,
            category,
            limit,
        ))
    }

    fn delete_by_category(&self, category: &str) -> Result<()> {
        let doomed: std::collections::HashSet<String> = self
            .docs
            .iter()
            .filter(|e| e.value().category == category)
            .map(|e| e.key().clone())
            .collect();

        if doomed.is_empty() {
            return Ok(());
        }

        for id in &doomed {
            self.db.delete(format!("{DOC_PREFIX}{id}").as_bytes())?;
            self.docs.remove(id);
        }
        self.ann.retain(|id| !doomed.contains(id));
        self.db.flush()?;

        Ok(())
    }

    fn delete_all(&self) -> Result<()> {
        // Walk the DB rather than the cache so orphaned rows go too. An
        // iterator error aborts before any cache is cleared; otherwise the
        // skipped rows would report success and resurrect on the next open.
        let mut keys = Vec::new();
        for item in self.db.iterator(IteratorMode::Start) {
            let (key, _) = item?;
            if key.starts_with(DOC_PREFIX.as_bytes()) {
                keys.push(key.to_vec());
            }
        }

        for key in keys {
            self.db.delete(&key)?;
        }
        self.docs.clear();
        self.ann.clear();
        self.db.flush()?;

        Ok(())
    }

    fn len(&self) -> usize {
        self.docs.len()
    }

    fn stats(&self) -> serde_json::Value {
        super::corpus_stats(self.docs.iter().map(|e| e.value().category.clone()))
    }
}
