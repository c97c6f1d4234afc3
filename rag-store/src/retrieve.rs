//! Similarity retrieval over a loaded vector index.

use std::sync::Arc;

use tracing::debug;

use crate::chunk::ScoredChunk;
use crate::config::StoreConfig;
use crate::embed::Embedder;
use crate::errors::RagError;
use crate::index::VectorIndex;

/// Read-side facade pairing an index with the embedder that produced it.
///
/// The retriever holds the index immutably; rebuilding requires running
/// ingestion and constructing a fresh retriever.
pub struct Retriever {
    index: VectorIndex,
    embedder: Arc<dyn Embedder>,
}

impl Retriever {
    pub fn new(index: VectorIndex, embedder: Arc<dyn Embedder>) -> Self {
        Self { index, embedder }
    }

    /// Opens a retriever over the persisted index at `cfg.index_path`.
    ///
    /// # Errors
    /// `IndexNotFound` when no index has been ingested yet,
    /// `DimensionMismatch` when the stored index was built with a different
    /// embedding dimension than configured.
    pub fn open(cfg: &StoreConfig, embedder: Arc<dyn Embedder>) -> Result<Self, RagError> {
        let index = VectorIndex::load(&cfg.index_path, cfg.embedding_dim)?;
        Ok(Self::new(index, embedder))
    }

    /// Embeds the question and returns its top-`k` most similar chunks,
    /// ordered by descending score.
    pub async fn retrieve(&self, question: &str, k: usize) -> Result<Vec<ScoredChunk>, RagError> {
        let query = self.embedder.embed(question).await?;
        let hits = self.index.search(&query, k)?;
        debug!(k, hits = hits.len(), "retrieval complete");
        Ok(hits)
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{Chunk, Page};
    use crate::index::IndexRecord;
    use std::future::Future;
    use std::pin::Pin;

    /// Embeds text onto one of three axes by keyword.
    struct KeywordEmbedder;

    fn axis(text: &str) -> Vec<f32> {
        if text.contains("loan") {
            vec![1.0, 0.0, 0.0]
        } else if text.contains("deposit") {
            vec![0.0, 1.0, 0.0]
        } else {
            vec![0.0, 0.0, 1.0]
        }
    }

    impl Embedder for KeywordEmbedder {
        fn embed<'a>(
            &'a self,
            text: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, RagError>> + Send + 'a>> {
            Box::pin(async move { Ok(axis(text)) })
        }
    }

    fn chunk(text: &str, page: u32) -> Chunk {
        Chunk {
            text: text.to_string(),
            page: Page::Number(page),
            source: "doc.txt".to_string(),
        }
    }

    #[tokio::test]
    async fn retrieval_finds_the_topical_chunk() {
        let records = vec![
            IndexRecord {
                chunk: chunk("rules about loan amounts", 3),
                vector: axis("loan"),
            },
            IndexRecord {
                chunk: chunk("rules about deposit taking", 7),
                vector: axis("deposit"),
            },
            IndexRecord {
                chunk: chunk("general provisions", 1),
                vector: axis("general"),
            },
        ];
        let index = VectorIndex::from_records(records).unwrap();
        let retriever = Retriever::new(index, Arc::new(KeywordEmbedder));

        let hits = retriever.retrieve("what is the loan limit", 2).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].chunk.page, Page::Number(3));
        assert!(hits[0].score > hits[1].score);
    }
}
