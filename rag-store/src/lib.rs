//! Document ingestion and retrieval over a local persisted vector index.
//!
//! This crate provides a clean API to:
//! - Load a source document and split it into overlapping chunks
//! - Build, persist, and load a flat cosine-similarity vector index
//! - Retrieve top-K context chunks for a textual query
//!
//! The design is flat (no deep nesting) and splits responsibilities into
//! focused modules. Embedding generation happens behind the [`Embedder`]
//! trait so any backend can be plugged in.

mod chunk;
mod config;
mod embed;
mod errors;
mod index;
mod ingest;
mod loader;
mod retrieve;
mod segment;

pub use chunk::{Chunk, Page, ScoredChunk};
pub use config::StoreConfig;
pub use embed::{Embedder, ProfileEmbedder};
pub use errors::RagError;
pub use index::{IndexRecord, VectorIndex};
pub use ingest::ingest;
pub use loader::{PageText, load_document};
pub use retrieve::Retriever;
pub use segment::{segment_pages, split_text};
