//! Unified error types for the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error for rag-store operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// I/O or filesystem errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing / serialization errors.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The source document does not exist.
    #[error("source document not found at {0}; check DOCUMENT_PATH")]
    DocumentNotFound(PathBuf),

    /// No persisted index at the given path.
    #[error("vector index not found at {0}; run ingestion first")]
    IndexNotFound(PathBuf),

    /// Mismatch in vector dimensionality.
    ///
    /// Raised eagerly at load time (stored index vs. configured embedding
    /// model) and defensively at build/search time. Silently querying a
    /// mismatched index would return meaningless neighbors with no error.
    #[error("vector dimension mismatch: got {got}, want {want}; rebuild the index with the configured embedding model")]
    DimensionMismatch { got: usize, want: usize },

    /// Embedding backend failure (wrapped).
    #[error("embedding service: {0}")]
    Service(#[from] llm_service::AiLlmError),
}
