use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use llm_service::AiLlmError;
use qa_chain::ChainError;
use rag_store::RagError;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("configuration error: {0}")]
    Config(String),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request handling ---
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The knowledge base has not been ingested (or is unreadable).
    #[error("service not ready: {0}")]
    NotReady(String),

    /// Another ingestion run currently holds the pipeline.
    #[error("ingestion already in progress")]
    IngestBusy,

    /// The LLM provider failed while serving the request.
    #[error("upstream model error: {0}")]
    Upstream(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotReady(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::IngestBusy => StatusCode::CONFLICT,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,

            AppError::Config(_)
            | AppError::Bind(_)
            | AppError::Server(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::NotReady(_) => "NOT_READY",
            AppError::IngestBusy => "INGEST_IN_PROGRESS",
            AppError::Upstream(_) => "UPSTREAM_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.error_code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// Store-layer failures mapped to HTTP semantics. A missing index or
/// document means the service cannot answer yet (503, with remediation in
/// the message); everything else is an internal fault.
impl From<RagError> for AppError {
    fn from(err: RagError) -> Self {
        match err {
            RagError::IndexNotFound(_) | RagError::DocumentNotFound(_) => {
                AppError::NotReady(err.to_string())
            }
            RagError::Service(e) => AppError::Upstream(e.to_string()),
            RagError::Config(msg) => AppError::Config(msg),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<ChainError> for AppError {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::Validation(msg) => AppError::BadRequest(msg),
            ChainError::Rag(e) => AppError::from(e),
            ChainError::Llm(e) => AppError::Upstream(e.to_string()),
        }
    }
}

impl From<AiLlmError> for AppError {
    fn from(err: AiLlmError) -> Self {
        match err {
            AiLlmError::Config(e) => AppError::Config(e.to_string()),
            other => AppError::Upstream(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn missing_index_maps_to_service_unavailable() {
        let err = AppError::from(RagError::IndexNotFound(PathBuf::from("x.json")));
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(err.to_string().contains("ingestion"));
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let err = AppError::from(ChainError::Validation("question must not be empty".into()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "BAD_REQUEST");
    }

    #[test]
    fn busy_ingestion_maps_to_conflict() {
        assert_eq!(AppError::IngestBusy.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn rejected_bodies_keep_the_json_error_shape() {
        let resp = AppError::BadRequest("Expected request with `Content-Type: application/json`".into())
            .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            resp.headers().get(axum::http::header::CONTENT_TYPE),
            Some(&axum::http::HeaderValue::from_static("application/json"))
        );
    }
}
