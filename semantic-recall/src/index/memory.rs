//! In-memory vector index
//!
//! Ephemeral backend for tests and deployments that rebuild their corpus at
//! startup. Same search semantics as [`super::DiskIndex`], no persistence.

use dashmap::DashMap;

use super::ann::{AnnSet, IndexPoint};
use super::{check_dimension, rank_linear, VectorIndex};
use crate::config::SimilarityMetric;
use crate::document::Document;
use crate::error::Result;

/// Vector index held entirely in memory
pub struct InMemoryIndex {
    dimension: usize,
    metric: SimilarityMetric,
    min_similarity: Option<f32>,
    docs: DashMap<String, Document>,
    ann: AnnSet,
}

impl InMemoryIndex {
    /// Create an index for dimension-`dimension` vectors with cosine
    /// similarity and no cutoff
    pub fn new(dimension: usize) -> Self {
        Self::with_options(dimension, SimilarityMetric::Cosine, None)
    }

    /// Create an index with an explicit metric and optional
    /// minimum-similarity cutoff
    pub fn with_options(
        dimension: usize,
        metric: SimilarityMetric,
        min_similarity: Option<f32>,
    ) -> Self {
        Self {
            dimension,
            metric,
            min_similarity,
            docs: DashMap::new(),
            ann: AnnSet::new(),
        }
    }
}

impl VectorIndex for InMemoryIndex {
    fn ensure_schema(&self) -> Result<()> {
        // Nothing to create; the maps are the schema
        Ok(())
    }

    fn insert_batch(&self, documents: Vec<Document>) -> Result<()> {
        for doc in &documents {
            check_dimension(self.dimension, &doc.vector)?;
        }

        let mut points = Vec::with_capacity(documents.len());
        for doc in documents {
            let id = doc.id.to_string();
            points.push(IndexPoint {
                id: id.clone(),
                vector: doc.vector.clone(),
            });
            self.docs.insert(id, doc);
        }
        self.ann.extend(points);

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

        // HNSW only answers unfiltered cosine queries; everything else scans
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

        for id in &doomed {
            self.docs.remove(id);
        }
        if !doomed.is_empty() {
            self.ann.retain(|id| !doomed.contains(id));
        }

        Ok(())
    }

    fn delete_all(&self) -> Result<()> {
        self.docs.clear();
        self.ann.clear();
        Ok(())
    }

    fn len(&self) -> usize {
        self.docs.len()
    }

    fn stats(&self) -> serde_json::Value {
        super::corpus_stats(self.docs.iter().map(|e| e.value().category.clone()))
    }
}
