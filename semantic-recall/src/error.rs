//! Error types for semantic-recall

use thiserror::Error;

/// Errors that can occur in the retrieval core
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// Embedding or reranker model failed to load
    #[error("Model unavailable: {0}")]
    Model(String),

    /// Embedding model failed to execute
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Reranker model failed to execute
    #[error("Rerank error: {0}")]
    Rerank(String),

    /// A vector's length does not match the index dimension
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The vector store could not be opened or reached
    #[error("Index unreachable: {0}")]
    IndexUnreachable(String),

    /// RocksDB error
    #[error("Storage error: {0}")]
    Storage(#[from] rocksdb::Error),

    /// Serialization error (bincode)
    #[error("Serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// UUID parsing error
    #[error("UUID error: {0}")]
    Uuid(#[from] uuid::Error),

    /// A batch insert stored some documents before failing.
    ///
    /// `inserted` documents out of `attempted` reached the store; the caller
    /// can retry the remainder. Never produced for dimension failures, which
    /// reject the batch before any write.
    #[error("Partial insert: {inserted} of {attempted} documents stored before failure: {source}")]
    PartialInsert {
        inserted: usize,
        attempted: usize,
        #[source]
        source: Box<RetrievalError>,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl RetrievalError {
    /// Create a model-unavailable error
    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }

    /// Create an embedding error
    pub fn embedding(msg: impl Into<String>) -> Self {
        Self::Embedding(msg.into())
    }

    /// Create a rerank error
    pub fn rerank(msg: impl Into<String>) -> Self {
        Self::Rerank(msg.into())
    }

    /// Create an index-unreachable error
    pub fn unreachable(msg: impl Into<String>) -> Self {
        Self::IndexUnreachable(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// True for failures of the model layer (load or execute), as opposed to
    /// failures of the vector store
    pub fn is_model_failure(&self) -> bool {
        matches!(self, Self::Model(_) | Self::Embedding(_) | Self::Rerank(_))
    }
}

/// Result type for retrieval operations
pub type Result<T> = std::result::Result<T, RetrievalError>;
