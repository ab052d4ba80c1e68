//! Document types
//!
//! Core types flowing through the retrieval pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for stored documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub Uuid);

impl DocumentId {
    /// Create a new random DocumentId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for DocumentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A stored document: free text with one category tag and its embedding.
///
/// Immutable once stored. There is no update operation — documents are
/// created by ingestion and destroyed only by category-scoped or full
/// deletion. Duplicate contents are permitted and independent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier
    pub id: DocumentId,
    /// Full text content
    pub content: String,
    /// Category tag restricting searches to a corpus subset
    pub category: String,
    /// Embedding vector, dimension fixed by the embedding model
    pub vector: Vec<f32>,
    /// When this document was ingested
    pub created_at: DateTime<Utc>,
}

impl Document {
    /// Create a document with a fresh id and the current timestamp
    pub fn new(content: impl Into<String>, category: impl Into<String>, vector: Vec<f32>) -> Self {
        Self {
            id: DocumentId::new(),
            content: content.into(),
            category: category.into(),
            vector,
            created_at: Utc::now(),
        }
    }
}

/// A query-time candidate with its rerank relevance score.
///
/// Transient — produced during a query, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    /// Candidate text content
    pub content: String,
    /// Relevance under the reranker; higher = more relevant
    pub relevance: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_document_id_roundtrip() {
        let id = DocumentId::new();
        let parsed = DocumentId::from_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_document_new_sets_identity() {
        let a = Document::new("alpha", "test", vec![0.0; 4]);
        let b = Document::new("alpha", "test", vec![0.0; 4]);
        // Duplicate contents are independent documents
        assert_ne!(a.id, b.id);
        assert_eq!(a.content, b.content);
    }
}
