//! Embedding provider interface and the profile-backed implementation.

use std::{future::Future, pin::Pin, sync::Arc};

use llm_service::service_profiles::LlmServiceProfiles;

use crate::errors::RagError;

/// Asynchronous embedding provider.
///
/// Async is required because real providers (Ollama, OpenAI, etc.) perform
/// HTTP requests. Implement this trait to plug in your own embedding
/// backend; tests use deterministic in-process implementations.
pub trait Embedder: Send + Sync {
    /// Embeds a single text into a fixed-dimension vector.
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, RagError>> + Send + 'a>>;

    /// Embeds a batch of texts, preserving input order.
    ///
    /// The default implementation loops over [`Embedder::embed`]; providers
    /// with a batch endpoint override this to amortize round-trips. Per-item
    /// semantics are identical to the scalar form.
    fn embed_batch<'a>(
        &'a self,
        texts: &'a [String],
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Vec<f32>>, RagError>> + Send + 'a>> {
        Box::pin(async move {
            let mut out = Vec::with_capacity(texts.len());
            for t in texts {
                out.push(self.embed(t).await?);
            }
            Ok(out)
        })
    }
}

/// Embedder backed by the shared LLM profile service.
///
/// When `dim` is known, every returned vector is checked against it so a
/// misconfigured embedding model is caught at the first call rather than
/// after a full (and expensive) ingestion run.
#[derive(Clone)]
pub struct ProfileEmbedder {
    svc: Arc<LlmServiceProfiles>,
    dim: Option<usize>,
}

impl ProfileEmbedder {
    /// Constructs a new embedder over the shared profile service.
    pub fn new(svc: Arc<LlmServiceProfiles>, dim: Option<usize>) -> Self {
        Self { svc, dim }
    }

    fn check_dim(&self, v: &[f32]) -> Result<(), RagError> {
        if let Some(want) = self.dim {
            if v.len() != want {
                return Err(RagError::DimensionMismatch { got: v.len(), want });
            }
        }
        Ok(())
    }
}

impl Embedder for ProfileEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, RagError>> + Send + 'a>> {
        Box::pin(async move {
            let v = self.svc.embed(text).await?;
            self.check_dim(&v)?;
            Ok(v)
        })
    }

    fn embed_batch<'a>(
        &'a self,
        texts: &'a [String],
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Vec<f32>>, RagError>> + Send + 'a>> {
        Box::pin(async move {
            let vectors = self.svc.embed_batch(texts).await?;
            for v in &vectors {
                self.check_dim(v)?;
            }
            Ok(vectors)
        })
    }
}
