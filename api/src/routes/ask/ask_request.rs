use serde::{Deserialize, Serialize};

use rag_store::Page;

/// Request payload for /ask.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// Natural language question.
    pub question: String,
    /// Optional override: number of source excerpts to return.
    #[serde(default)]
    pub max_sources: Option<usize>,
    /// Whether to include source excerpts in the response.
    #[serde(default = "default_true")]
    pub include_sources: bool,
}

fn default_true() -> bool {
    true
}

/// Response payload for /ask.
#[derive(Debug, Serialize)]
pub struct AskResponse {
    /// The question as answered (after trimming).
    pub question: String,
    /// Final model answer (plain text).
    pub answer: String,
    /// Supporting excerpts in rank order; omitted when not requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<SourceRef>>,
    /// RFC 3339 UTC timestamp of the response.
    pub timestamp: String,
    /// Generation model that produced the answer.
    pub model: String,
    /// Wall-clock handling time, milliseconds with 2 decimals.
    pub processing_time_ms: f64,
}

/// One supporting excerpt.
#[derive(Debug, Serialize)]
pub struct SourceRef {
    /// 1-based rank of the excerpt.
    pub chunk_id: usize,
    /// Excerpt text, truncated for transport.
    pub content: String,
    /// Page number, or the string "unknown".
    pub page: Page,
    /// Originating document.
    pub source: String,
    /// Cosine similarity to the question.
    pub score: f32,
}
