//! End-to-end ingestion: document to persisted vector index.

use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::config::StoreConfig;
use crate::embed::Embedder;
use crate::errors::RagError;
use crate::index::{IndexRecord, VectorIndex};
use crate::loader::load_document;
use crate::segment::segment_pages;

/// Builds (or reuses) the vector index for the configured document.
///
/// When an index already exists at `cfg.index_path` and `force` is false,
/// the existing index is loaded and returned without touching the document
/// or the embedding provider, so repeated startups are cheap and
/// deterministic. With `force` the full pipeline runs again: load, segment,
/// embed, save.
///
/// Embedding is all-or-nothing: a provider failure mid-run aborts before
/// anything is written, leaving any previous index intact.
pub async fn ingest(
    cfg: &StoreConfig,
    embedder: Arc<dyn Embedder>,
    force: bool,
) -> Result<VectorIndex, RagError> {
    cfg.validate()?;

    if !force && cfg.index_path.exists() {
        info!(path = %cfg.index_path.display(), "reusing existing index");
        return VectorIndex::load(&cfg.index_path, cfg.embedding_dim);
    }
    if force && cfg.index_path.exists() {
        warn!(path = %cfg.index_path.display(), "force requested, rebuilding index");
    }

    let pages = load_document(&cfg.document_path)?;
    let source = cfg.document_path.display().to_string();
    let chunks = segment_pages(&pages, cfg.chunk_size, cfg.chunk_overlap, &source);
    if chunks.is_empty() {
        return Err(RagError::Config(format!(
            "document {} produced no chunks",
            cfg.document_path.display()
        )));
    }
    info!(pages = pages.len(), chunks = chunks.len(), "document segmented");

    let bar = ProgressBar::new(chunks.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar.set_message("embedding chunks");

    let mut records = Vec::with_capacity(chunks.len());
    for batch in chunks.chunks(cfg.embed_batch) {
        let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
        let vectors = embedder.embed_batch(&texts).await.inspect_err(|_| {
            bar.abandon_with_message("embedding failed");
        })?;
        for (chunk, vector) in batch.iter().cloned().zip(vectors) {
            records.push(IndexRecord { chunk, vector });
        }
        bar.inc(batch.len() as u64);
    }
    bar.finish_with_message("embedding done");

    let index = VectorIndex::from_records(records)?;
    index.save(&cfg.index_path)?;
    info!(
        records = index.len(),
        dim = index.dim(),
        path = %cfg.index_path.display(),
        "ingestion complete"
    );
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Deterministic embedder that counts how many texts it was asked to
    /// embed, optionally failing after a given number of calls.
    struct CountingEmbedder {
        calls: AtomicUsize,
        fail_after: Option<usize>,
    }

    impl CountingEmbedder {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_after: None,
            }
        }

        fn failing_after(n: usize) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_after: Some(n),
            }
        }

        fn count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Embedder for CountingEmbedder {
        fn embed<'a>(
            &'a self,
            text: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, RagError>> + Send + 'a>> {
            Box::pin(async move {
                let n = self.calls.fetch_add(1, Ordering::SeqCst);
                if let Some(limit) = self.fail_after {
                    if n >= limit {
                        return Err(RagError::Config("embedder exhausted".into()));
                    }
                }
                let len = text.chars().count() as f32;
                Ok(vec![len, 1.0, 0.0])
            })
        }
    }

    fn test_config(dir: &std::path::Path) -> StoreConfig {
        let mut cfg = StoreConfig::new_default(dir.join("doc.txt"), dir.join("store/index.json"));
        cfg.chunk_size = 40;
        cfg.chunk_overlap = 8;
        cfg
    }

    fn write_doc(cfg: &StoreConfig) {
        let text = (0..30).map(|i| format!("item{i:02} ")).collect::<String>();
        std::fs::write(&cfg.document_path, text).unwrap();
    }

    #[tokio::test]
    async fn ingestion_builds_and_persists_an_index() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = test_config(dir.path());
        write_doc(&cfg);

        let embedder = Arc::new(CountingEmbedder::new());
        let index = ingest(&cfg, embedder.clone(), false).await.unwrap();
        assert!(!index.is_empty());
        assert!(cfg.index_path.exists());
        assert_eq!(embedder.count(), index.len());
    }

    #[tokio::test]
    async fn second_run_reuses_the_index_without_embedding() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = test_config(dir.path());
        write_doc(&cfg);

        let first = Arc::new(CountingEmbedder::new());
        let built = ingest(&cfg, first, false).await.unwrap();

        let second = Arc::new(CountingEmbedder::new());
        let reused = ingest(&cfg, second.clone(), false).await.unwrap();
        assert_eq!(second.count(), 0);
        assert_eq!(reused.len(), built.len());
    }

    #[tokio::test]
    async fn force_rebuilds_even_when_an_index_exists() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = test_config(dir.path());
        write_doc(&cfg);

        ingest(&cfg, Arc::new(CountingEmbedder::new()), false)
            .await
            .unwrap();

        let embedder = Arc::new(CountingEmbedder::new());
        let rebuilt = ingest(&cfg, embedder.clone(), true).await.unwrap();
        assert_eq!(embedder.count(), rebuilt.len());
    }

    #[tokio::test]
    async fn missing_document_surfaces_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = test_config(dir.path());

        let err = ingest(&cfg, Arc::new(CountingEmbedder::new()), false)
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::DocumentNotFound(_)));
    }

    #[tokio::test]
    async fn embedding_failure_leaves_no_index_behind() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = test_config(dir.path());
        write_doc(&cfg);

        let embedder = Arc::new(CountingEmbedder::failing_after(2));
        let err = ingest(&cfg, embedder, false).await.unwrap_err();
        assert!(matches!(err, RagError::Config(_)));
        assert!(!cfg.index_path.exists());
    }
}
