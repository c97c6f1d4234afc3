use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::info;

use llm_service::config::default_config::{config_embedding, config_generation};
use llm_service::service_profiles::LlmServiceProfiles;
use qa_chain::QaChain;
use rag_store::{ProfileEmbedder, Retriever, StoreConfig};

use crate::error_handler::{AppError, AppResult};

/// Shared state for all HTTP handlers.
pub struct AppState {
    /// Store configuration (document path, index path, chunking, K).
    pub cfg: StoreConfig,
    /// Shared LLM service with generation and embedding profiles.
    pub svc: Arc<LlmServiceProfiles>,
    /// Lazily initialized QA chain; `None` until the index is available.
    chain: RwLock<Option<Arc<QaChain>>>,
    /// Serializes ingestion runs; handlers `try_lock` and refuse overlap.
    pub ingest_lock: Mutex<()>,
}

impl AppState {
    /// Loads shared state from environment variables.
    ///
    /// Fails fast on invalid configuration; the chain itself is not built
    /// here because the index may not exist yet.
    pub fn from_env() -> AppResult<Self> {
        let generation = config_generation()?;
        let embedding = config_embedding()?;

        // StoreConfig::from_env validates before returning.
        let cfg = StoreConfig::from_env()?;

        let svc = Arc::new(LlmServiceProfiles::new(generation, embedding, Some(5))?);

        Ok(Self {
            cfg,
            svc,
            chain: RwLock::new(None),
            ingest_lock: Mutex::new(()),
        })
    }

    /// Embedder bound to the shared embedding profile.
    pub fn embedder(&self) -> Arc<ProfileEmbedder> {
        Arc::new(ProfileEmbedder::new(
            self.svc.clone(),
            self.cfg.embedding_dim,
        ))
    }

    /// Returns the QA chain, building it on first use.
    ///
    /// Double-checked under the write lock so concurrent first requests
    /// initialize exactly once. Load failures are not cached; the next
    /// request retries, which is what makes "ingest, then ask" work without
    /// a restart.
    pub async fn chain(&self) -> AppResult<Arc<QaChain>> {
        if let Some(chain) = self.chain.read().await.as_ref() {
            return Ok(chain.clone());
        }

        let mut slot = self.chain.write().await;
        if let Some(chain) = slot.as_ref() {
            return Ok(chain.clone());
        }

        // Loading the index is blocking file IO; keep it off the runtime
        // threads so concurrent requests are not stalled.
        let cfg = self.cfg.clone();
        let embedder = self.embedder();
        let retriever = tokio::task::spawn_blocking(move || Retriever::open(&cfg, embedder))
            .await
            .map_err(|e| AppError::Internal(format!("index load task failed: {e}")))??;
        let chain = Arc::new(QaChain::new(
            retriever,
            self.svc.clone(),
            self.svc.generation_model().to_string(),
            self.cfg.top_k,
        ));
        info!(
            chunks = chain.index_len(),
            model = chain.model(),
            "qa chain initialized"
        );
        *slot = Some(chain.clone());
        Ok(chain)
    }

    /// Whether the chain has been successfully initialized.
    pub async fn chain_ready(&self) -> bool {
        self.chain.read().await.is_some()
    }

    /// Drops the cached chain so the next request reloads the index.
    /// Called after a successful re-ingestion.
    pub async fn invalidate_chain(&self) {
        *self.chain.write().await = None;
    }
}
