//! HTTP surface of the question-answering service.

use std::{env, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use colored::Colorize;
use tokio::signal;
use tracing::{info, warn};

pub mod core;
pub mod error_handler;
mod routes;

use crate::{
    core::app_state::AppState,
    error_handler::AppError,
    routes::{
        ask::ask_question_route::ask_question, health_route::health, ingest_route::ingest,
        root_route::root,
    },
};

const DEFAULT_ADDRESS: &str = "0.0.0.0:8000";

/// Boots the service and serves until interrupted.
///
/// The QA chain is warmed up eagerly when an index exists; otherwise the
/// service still starts and /ask returns 503 until ingestion runs.
pub async fn start() -> Result<(), AppError> {
    let state = Arc::new(AppState::from_env()?);

    match state.chain().await {
        Ok(chain) => info!(
            chunks = chain.index_len(),
            model = chain.model(),
            "qa chain ready at startup"
        ),
        Err(e) => warn!("qa chain unavailable at startup: {e}"),
    }

    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/ask", post(ask_question))
        .route("/ingest", post(ingest))
        .with_state(state);

    let address = env::var("API_ADDRESS").unwrap_or_else(|_| DEFAULT_ADDRESS.into());
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(AppError::Bind)?;

    println!(
        "{} {}",
        "Serving on".green().bold(),
        format!("http://{address}").cyan()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    Ok(())
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {e}");
    }
}
