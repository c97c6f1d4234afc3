//! GET /health — service liveness and provider reachability.

use std::sync::Arc;

use axum::{Json, extract::State};
use chrono::Utc;
use llm_service::health_service::HealthStatus;
use serde::Serialize;

use crate::core::app_state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    /// Whether the QA chain is initialized and ready to answer.
    pub chatbot_initialized: bool,
    pub model: String,
    /// Reachability of each configured LLM profile.
    pub providers: Vec<HealthStatus>,
}

/// Handler: GET /health
///
/// Always returns 200: the body tells the caller whether answering is
/// currently possible and whether the model backends are reachable.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().to_rfc3339(),
        chatbot_initialized: state.chain_ready().await,
        model: state.svc.generation_model().to_string(),
        providers: state.svc.health_all().await,
    })
}
