//! Prompt assembly for grounded answering.

use rag_store::ScoredChunk;

/// System instructions constraining the model to the retrieved context.
pub const SYSTEM_PROMPT: &str = "You are an expert assistant on Reserve Bank of India (RBI) \
regulations for Non-Banking Financial Companies (NBFCs). Answer questions using only the \
provided context from the RBI Master Direction. Be precise with amounts, percentages, \
timelines and regulatory terms. If the context does not contain the answer, say that the \
provided excerpts do not cover the question instead of guessing.";

/// Renders retrieved chunks and the question into the user prompt.
///
/// Each chunk gets a numbered header with its page and source so the model
/// can ground statements, and excerpts are fenced with an unambiguous
/// separator so document text cannot be mistaken for instructions.
pub fn build_prompt(question: &str, chunks: &[ScoredChunk]) -> String {
    let mut context = String::new();
    for (i, hit) in chunks.iter().enumerate() {
        context.push_str(&format!(
            "[Excerpt {n} | page {page} | {source}]\n{text}\n---\n",
            n = i + 1,
            page = hit.chunk.page,
            source = hit.chunk.source,
            text = hit.chunk.text.trim(),
        ));
    }

    format!(
        "Context from the RBI Master Direction:\n\
         ========\n\
         {context}\
         ========\n\n\
         Question: {question}\n\n\
         Answer based strictly on the context above:"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rag_store::{Chunk, Page};

    fn hit(text: &str, page: Page) -> ScoredChunk {
        ScoredChunk {
            chunk: Chunk {
                text: text.to_string(),
                page,
                source: "master_direction.txt".to_string(),
            },
            score: 0.9,
        }
    }

    #[test]
    fn prompt_contains_question_and_numbered_excerpts() {
        let chunks = vec![
            hit("NBFCs shall maintain records.", Page::Number(4)),
            hit("Ceiling applies to ICC loans.", Page::Unknown),
        ];
        let prompt = build_prompt("What is the ceiling?", &chunks);

        assert!(prompt.contains("Question: What is the ceiling?"));
        assert!(prompt.contains("[Excerpt 1 | page 4 | master_direction.txt]"));
        assert!(prompt.contains("[Excerpt 2 | page unknown | master_direction.txt]"));
        assert!(prompt.contains("NBFCs shall maintain records."));
    }

    #[test]
    fn empty_retrieval_still_yields_a_wellformed_prompt() {
        let prompt = build_prompt("anything", &[]);
        assert!(prompt.contains("Question: anything"));
    }
}
