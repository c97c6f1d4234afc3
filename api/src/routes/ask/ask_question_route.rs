//! POST /ask — answers a question from the indexed document.

use std::sync::Arc;
use std::time::Instant;

use axum::{Json, extract::State};
use chrono::Utc;
use rag_store::ScoredChunk;
use tracing::info;

use crate::{
    core::{app_state::AppState, extract::AppJson},
    error_handler::AppResult,
    routes::ask::ask_request::{AskRequest, AskResponse, SourceRef},
};

/// Excerpt text longer than this is truncated with an ellipsis.
const SOURCE_PREVIEW_CHARS: usize = 300;

/// Handler: POST /ask
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8000/ask \
///   -H 'content-type: application/json' \
///   -d '{"question":"What is the loan ceiling for IS category NBFCs?"}'
/// ```
pub async fn ask_question(
    State(state): State<Arc<AppState>>,
    AppJson(body): AppJson<AskRequest>,
) -> AppResult<Json<AskResponse>> {
    let started = Instant::now();

    let chain = state.chain().await?;
    let answer = chain
        .ask_question(&body.question, body.include_sources)
        .await?;

    let max_sources = body.max_sources.unwrap_or(state.cfg.top_k);
    let sources = answer
        .sources
        .map(|hits| to_source_refs(hits, max_sources));

    let elapsed_ms = (started.elapsed().as_secs_f64() * 1000.0 * 100.0).round() / 100.0;
    info!(elapsed_ms, "question answered");

    Ok(Json(AskResponse {
        question: answer.question,
        answer: answer.answer,
        sources,
        timestamp: Utc::now().to_rfc3339(),
        model: answer.model,
        processing_time_ms: elapsed_ms,
    }))
}

fn to_source_refs(hits: Vec<ScoredChunk>, max_sources: usize) -> Vec<SourceRef> {
    hits.into_iter()
        .take(max_sources)
        .enumerate()
        .map(|(i, hit)| SourceRef {
            chunk_id: i + 1,
            content: preview(&hit.chunk.text),
            page: hit.chunk.page,
            source: hit.chunk.source,
            score: hit.score,
        })
        .collect()
}

/// Truncates to [`SOURCE_PREVIEW_CHARS`] characters, appending an ellipsis
/// when anything was cut. Character-based so multibyte text never splits.
fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(SOURCE_PREVIEW_CHARS).collect();
    if text.chars().count() > SOURCE_PREVIEW_CHARS {
        out.push_str("...");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rag_store::{Chunk, Page};

    fn hit(text: &str) -> ScoredChunk {
        ScoredChunk {
            chunk: Chunk {
                text: text.to_string(),
                page: Page::Number(2),
                source: "doc.txt".to_string(),
            },
            score: 0.5,
        }
    }

    #[test]
    fn short_content_is_untouched() {
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn long_content_is_truncated_with_ellipsis() {
        let long = "x".repeat(400);
        let p = preview(&long);
        assert_eq!(p.chars().count(), SOURCE_PREVIEW_CHARS + 3);
        assert!(p.ends_with("..."));
    }

    #[test]
    fn chunk_ids_are_one_based_and_capped() {
        let refs = to_source_refs(vec![hit("a"), hit("b"), hit("c")], 2);
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].chunk_id, 1);
        assert_eq!(refs[1].chunk_id, 2);
    }
}
