//! Runtime configuration for ingestion and retrieval.

use std::path::PathBuf;

use crate::errors::RagError;

/// Configuration for document ingestion and retrieval.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Path to the source document (UTF-8 text, form-feed page breaks).
    pub document_path: PathBuf,
    /// Path of the persisted index file.
    pub index_path: PathBuf,
    /// Maximum chunk length in characters.
    pub chunk_size: usize,
    /// Character overlap between adjacent chunks (must be < `chunk_size`).
    pub chunk_overlap: usize,
    /// Default number of chunks returned per query.
    pub top_k: usize,
    /// Expected embedding dimension; enables the eager guard at load time.
    pub embedding_dim: Option<usize>,
    /// Batch size for embedding requests during ingestion.
    pub embed_batch: usize,
}

impl StoreConfig {
    /// Creates a sane default config for the given paths.
    pub fn new_default(
        document_path: impl Into<PathBuf>,
        index_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            document_path: document_path.into(),
            index_path: index_path.into(),
            chunk_size: 1000,
            chunk_overlap: 200,
            top_k: 4,
            embedding_dim: None,
            embed_batch: 32,
        }
    }

    /// Loads configuration from environment variables, with defaults.
    ///
    /// Recognized: `DOCUMENT_PATH`, `INDEX_PATH`, `CHUNK_SIZE`,
    /// `CHUNK_OVERLAP`, `RETRIEVAL_K`, `EMBEDDING_DIM`, `EMBED_BATCH`.
    pub fn from_env() -> Result<Self, RagError> {
        let mut cfg = Self::new_default(
            env_or("DOCUMENT_PATH", "data/documents/master_direction.txt"),
            env_or("INDEX_PATH", "data/vector_store/index.json"),
        );
        if let Some(v) = env_opt_usize("CHUNK_SIZE")? {
            cfg.chunk_size = v;
        }
        if let Some(v) = env_opt_usize("CHUNK_OVERLAP")? {
            cfg.chunk_overlap = v;
        }
        if let Some(v) = env_opt_usize("RETRIEVAL_K")? {
            cfg.top_k = v;
        }
        cfg.embedding_dim = env_opt_usize("EMBEDDING_DIM")?;
        if let Some(v) = env_opt_usize("EMBED_BATCH")? {
            cfg.embed_batch = v;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), RagError> {
        if self.chunk_size == 0 {
            return Err(RagError::Config("chunk_size must be > 0".into()));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(RagError::Config(
                "chunk_overlap must be < chunk_size".into(),
            ));
        }
        if self.top_k == 0 {
            return Err(RagError::Config("top_k must be >= 1".into()));
        }
        if self.embed_batch == 0 {
            return Err(RagError::Config("embed_batch must be > 0".into()));
        }
        Ok(())
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_opt_usize(name: &'static str) -> Result<Option<usize>, RagError> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v
            .parse::<usize>()
            .map(Some)
            .map_err(|_| RagError::Config(format!("{name}: expected an unsigned integer"))),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = StoreConfig::new_default("doc.txt", "index.json");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn overlap_must_stay_below_chunk_size() {
        let mut cfg = StoreConfig::new_default("doc.txt", "index.json");
        cfg.chunk_overlap = cfg.chunk_size;
        assert!(matches!(cfg.validate(), Err(RagError::Config(_))));
    }

    #[test]
    fn top_k_of_zero_is_rejected() {
        let mut cfg = StoreConfig::new_default("doc.txt", "index.json");
        cfg.top_k = 0;
        assert!(matches!(cfg.validate(), Err(RagError::Config(_))));
    }
}
