//! GET / — service metadata.

use axum::Json;
use serde_json::{Value, json};

/// Handler: GET /
pub async fn root() -> Json<Value> {
    Json(json!({
        "service": "RBI NBFC Q&A API",
        "description": "Question answering over the RBI Master Direction for NBFCs",
        "endpoints": {
            "GET /": "this document",
            "GET /health": "service and provider health",
            "POST /ask": "answer a question from the indexed document",
            "POST /ingest": "build or rebuild the vector index",
        },
        "example": {
            "method": "POST",
            "path": "/ask",
            "body": { "question": "What is the maximum loan amount for IS category NBFCs?" },
        },
    }))
}
