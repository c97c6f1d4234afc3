//! POST /ingest — builds or rebuilds the vector index.

use std::sync::Arc;

use axum::{Json, body::Bytes, extract::State};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
};

#[derive(Debug, Deserialize, Default)]
pub struct IngestRequest {
    /// Rebuild even when an index already exists.
    #[serde(default)]
    pub force: bool,
}

#[derive(Serialize)]
pub struct IngestResponse {
    pub status: &'static str,
    pub chunks: usize,
    pub dimension: usize,
    pub forced: bool,
}

/// Handler: POST /ingest
///
/// The body is optional (an empty POST means a default run); a present
/// body must be valid JSON. Only one ingestion may run at a time; a second
/// call while one is in flight gets 409 rather than queueing a duplicate
/// embedding run.
pub async fn ingest(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> AppResult<Json<IngestResponse>> {
    let req = parse_body(&body)?;

    let _guard = state
        .ingest_lock
        .try_lock()
        .map_err(|_| AppError::IngestBusy)?;

    let index = rag_store::ingest(&state.cfg, state.embedder(), req.force).await?;

    // The cached chain may hold a stale index after a forced rebuild.
    state.invalidate_chain().await;
    info!(chunks = index.len(), forced = req.force, "ingestion finished");

    Ok(Json(IngestResponse {
        status: "ok",
        chunks: index.len(),
        dimension: index.dim(),
        forced: req.force,
    }))
}

fn parse_body(body: &[u8]) -> AppResult<IngestRequest> {
    if body.is_empty() {
        return Ok(IngestRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(format!("invalid JSON body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_means_a_default_run() {
        let req = parse_body(b"").unwrap();
        assert!(!req.force);
    }

    #[test]
    fn force_flag_is_parsed() {
        let req = parse_body(br#"{"force": true}"#).unwrap();
        assert!(req.force);
    }

    #[test]
    fn malformed_body_is_a_bad_request() {
        let err = parse_body(b"{force}").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
