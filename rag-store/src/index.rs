//! Flat cosine-similarity vector index with JSON persistence.
//!
//! The index is built whole at ingestion time, persisted as a single file,
//! and loaded read-only by serving processes. Exact search over a flat
//! record list is deliberate: the corpus is one regulatory document, small
//! enough that approximate structures would add complexity for no gain.

use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::chunk::{Chunk, ScoredChunk};
use crate::embed::Embedder;
use crate::errors::RagError;

/// A chunk together with its embedding vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexRecord {
    pub chunk: Chunk,
    pub vector: Vec<f32>,
}

/// Durable collection of embedded chunks supporting top-K cosine search.
///
/// Invariant: every record shares the same vector dimension `dim`.
#[derive(Debug, Serialize, Deserialize)]
pub struct VectorIndex {
    dim: usize,
    records: Vec<IndexRecord>,
}

impl VectorIndex {
    /// Assembles an index from pre-embedded records, validating that all
    /// vectors share one dimension.
    ///
    /// # Errors
    /// `Config` for an empty record set, `DimensionMismatch` when vectors
    /// disagree on dimensionality.
    pub fn from_records(records: Vec<IndexRecord>) -> Result<Self, RagError> {
        let Some(first) = records.first() else {
            return Err(RagError::Config(
                "cannot build an index from zero records".into(),
            ));
        };
        let dim = first.vector.len();
        if dim == 0 {
            return Err(RagError::Config("embedding dimension must be > 0".into()));
        }
        for r in &records {
            if r.vector.len() != dim {
                return Err(RagError::DimensionMismatch {
                    got: r.vector.len(),
                    want: dim,
                });
            }
        }
        Ok(Self { dim, records })
    }

    /// Embeds every chunk (batched) and constructs the index.
    ///
    /// Deterministic given deterministic embeddings. Nothing is persisted;
    /// the caller decides when to [`VectorIndex::save`].
    pub async fn build(
        chunks: Vec<Chunk>,
        embedder: &dyn Embedder,
        batch_size: usize,
    ) -> Result<Self, RagError> {
        let batch_size = batch_size.max(1);
        let mut records = Vec::with_capacity(chunks.len());
        for batch in chunks.chunks(batch_size) {
            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
            let vectors = embedder.embed_batch(&texts).await?;
            for (chunk, vector) in batch.iter().cloned().zip(vectors) {
                records.push(IndexRecord { chunk, vector });
            }
        }
        Self::from_records(records)
    }

    /// Vector dimension shared by every record.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of records in the index.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Performs an exact cosine-similarity search.
    ///
    /// Returns exactly `min(k, len)` results, strictly ordered by
    /// descending score.
    ///
    /// # Errors
    /// `DimensionMismatch` when the query vector does not match the index.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredChunk>, RagError> {
        if query.len() != self.dim {
            return Err(RagError::DimensionMismatch {
                got: query.len(),
                want: self.dim,
            });
        }

        let mut hits: Vec<ScoredChunk> = self
            .records
            .iter()
            .map(|r| ScoredChunk {
                chunk: r.chunk.clone(),
                score: cosine(query, &r.vector),
            })
            .collect();
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(k);

        debug!(k, hits = hits.len(), "search completed");
        Ok(hits)
    }

    /// Persists the index as one JSON file.
    ///
    /// Writes to a temporary sibling first and renames into place, so a
    /// failed save never leaves a partial index behind. Parent directories
    /// are created as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RagError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = path.with_extension("json.tmp");
        {
            let file = fs::File::create(&tmp)?;
            serde_json::to_writer(BufWriter::new(file), self)?;
        }
        fs::rename(&tmp, path)?;

        info!(path = %path.display(), records = self.records.len(), "index saved");
        Ok(())
    }

    /// Loads a persisted index, validating its dimension eagerly.
    ///
    /// The dimension check happens here, before any query is served:
    /// querying a mismatched index silently returns meaningless neighbors,
    /// so an incompatible index must fail loudly at load time.
    ///
    /// # Errors
    /// `IndexNotFound` when the path has no index, `DimensionMismatch` when
    /// the stored dimension differs from `expected_dim`.
    pub fn load(path: impl AsRef<Path>, expected_dim: Option<usize>) -> Result<Self, RagError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(RagError::IndexNotFound(path.to_path_buf()));
        }

        let file = fs::File::open(path)?;
        let index: VectorIndex = serde_json::from_reader(BufReader::new(file))?;

        if let Some(want) = expected_dim {
            if index.dim != want {
                return Err(RagError::DimensionMismatch {
                    got: index.dim,
                    want,
                });
            }
        }

        info!(path = %path.display(), records = index.records.len(), dim = index.dim, "index loaded");
        Ok(index)
    }
}

/// Cosine similarity between two equal-length vectors.
///
/// Returns 0.0 when either vector has zero norm.
fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut na = 0.0f32;
    let mut nb = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    dot / (na.sqrt() * nb.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::Page;

    fn chunk(text: &str) -> Chunk {
        Chunk {
            text: text.to_string(),
            page: Page::Number(1),
            source: "doc.txt".to_string(),
        }
    }

    fn record(text: &str, vector: Vec<f32>) -> IndexRecord {
        IndexRecord {
            chunk: chunk(text),
            vector,
        }
    }

    fn sample_index() -> VectorIndex {
        VectorIndex::from_records(vec![
            record("alpha", vec![1.0, 0.0, 0.0]),
            record("beta", vec![0.0, 1.0, 0.0]),
            record("gamma", vec![0.7, 0.7, 0.0]),
        ])
        .unwrap()
    }

    #[test]
    fn mixed_dimensions_are_rejected() {
        let err = VectorIndex::from_records(vec![
            record("a", vec![1.0, 0.0]),
            record("b", vec![1.0, 0.0, 0.0]),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            RagError::DimensionMismatch { got: 3, want: 2 }
        ));
    }

    #[test]
    fn search_returns_min_k_ordered_by_score() {
        let index = sample_index();

        let hits = index.search(&[1.0, 0.1, 0.0], 2).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].chunk.text, "alpha");
        assert!(hits[0].score > hits[1].score);

        // k larger than the index size truncates to the index size.
        let hits = index.search(&[1.0, 0.1, 0.0], 10).unwrap();
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn query_dimension_is_checked() {
        let index = sample_index();
        let err = index.search(&[1.0, 0.0], 1).unwrap_err();
        assert!(matches!(
            err,
            RagError::DimensionMismatch { got: 2, want: 3 }
        ));
    }

    #[test]
    fn save_load_round_trip_preserves_search_results() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");

        let index = sample_index();
        let query = [0.3f32, 0.9, 0.1];
        let before = index.search(&query, 3).unwrap();

        index.save(&path).unwrap();
        let loaded = VectorIndex::load(&path, Some(3)).unwrap();
        let after = loaded.search(&query, 3).unwrap();

        assert_eq!(before.len(), after.len());
        for (b, a) in before.iter().zip(after.iter()) {
            assert_eq!(b.chunk, a.chunk);
            assert_eq!(b.score, a.score);
        }
    }

    #[test]
    fn loading_a_missing_index_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = VectorIndex::load(dir.path().join("absent.json"), None).unwrap_err();
        assert!(matches!(err, RagError::IndexNotFound(_)));
    }

    #[test]
    fn dimension_guard_fires_at_load_time() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        sample_index().save(&path).unwrap();

        let err = VectorIndex::load(&path, Some(768)).unwrap_err();
        assert!(matches!(
            err,
            RagError::DimensionMismatch { got: 3, want: 768 }
        ));
    }

    #[test]
    fn zero_norm_vectors_score_zero() {
        assert_eq!(cosine(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }
}
