use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    /// The caller's input was rejected before any retrieval or generation.
    #[error("[QA Chain] Validation error: {0}")]
    Validation(String),

    #[error("[QA Chain] Store error: {0}")]
    Rag(#[from] rag_store::RagError),

    #[error("[QA Chain] LLM error: {0}")]
    Llm(#[from] llm_service::AiLlmError),
}
