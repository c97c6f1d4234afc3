//! The question-answering chain: retrieve, prompt, generate.

use std::sync::Arc;

use tracing::{debug, info};

use rag_store::{Retriever, ScoredChunk};

use crate::error::ChainError;
use crate::generate::TextGenerator;
use crate::prompt::{SYSTEM_PROMPT, build_prompt};

/// A completed answer with its supporting evidence.
#[derive(Debug)]
pub struct QaAnswer {
    pub question: String,
    pub answer: String,
    /// Name of the generation model that produced the answer.
    pub model: String,
    /// Retrieved chunks in rank order, present only when the caller asked
    /// for sources.
    pub sources: Option<Vec<ScoredChunk>>,
}

/// Retrieval-augmented answering over an ingested document.
///
/// Immutable once constructed; concurrent `ask_question` calls are safe.
pub struct QaChain {
    retriever: Retriever,
    generator: Arc<dyn TextGenerator>,
    model: String,
    top_k: usize,
}

impl QaChain {
    pub fn new(
        retriever: Retriever,
        generator: Arc<dyn TextGenerator>,
        model: String,
        top_k: usize,
    ) -> Self {
        Self {
            retriever,
            generator,
            model,
            top_k,
        }
    }

    /// Answers `question` from the indexed document.
    ///
    /// Validation happens before any embedding or generation call, so a
    /// blank question never reaches an external provider. Retrieval always
    /// runs with the configured K; `return_sources` only controls whether
    /// the hits are echoed back to the caller.
    pub async fn ask_question(
        &self,
        question: &str,
        return_sources: bool,
    ) -> Result<QaAnswer, ChainError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ChainError::Validation("question must not be empty".into()));
        }

        let hits = self.retriever.retrieve(question, self.top_k).await?;
        debug!(hits = hits.len(), "context retrieved");

        let prompt = build_prompt(question, &hits);
        let answer = self.generator.generate(&prompt, Some(SYSTEM_PROMPT)).await?;
        info!(model = %self.model, "answer generated");

        Ok(QaAnswer {
            question: question.to_string(),
            answer,
            model: self.model.clone(),
            sources: return_sources.then_some(hits),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn index_len(&self) -> usize {
        self.retriever.index().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rag_store::{Chunk, Embedder, IndexRecord, Page, RagError, VectorIndex};
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Keyword-axis embedder so retrieval order is fully deterministic.
    struct KeywordEmbedder {
        calls: AtomicUsize,
    }

    fn axis(text: &str) -> Vec<f32> {
        let t = text.to_lowercase();
        if t.contains("loan") || t.contains("crore") {
            vec![1.0, 0.0, 0.0]
        } else if t.contains("deposit") {
            vec![0.0, 1.0, 0.0]
        } else {
            vec![0.0, 0.0, 1.0]
        }
    }

    impl KeywordEmbedder {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Embedder for KeywordEmbedder {
        fn embed<'a>(
            &'a self,
            text: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, RagError>> + Send + 'a>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move { Ok(axis(text)) })
        }
    }

    /// Echoes the first context excerpt back so tests can verify the
    /// retrieved text actually flowed into generation.
    struct EchoGenerator {
        calls: AtomicUsize,
    }

    impl EchoGenerator {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl TextGenerator for EchoGenerator {
        fn generate<'a>(
            &'a self,
            prompt: &'a str,
            _system: Option<&'a str>,
        ) -> Pin<Box<dyn Future<Output = Result<String, ChainError>> + Send + 'a>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                let excerpt = prompt
                    .lines()
                    .skip_while(|l| !l.starts_with("[Excerpt 1"))
                    .nth(1)
                    .unwrap_or("no context");
                Ok(format!("According to the direction: {excerpt}"))
            })
        }
    }

    fn chunk(text: &str, page: u32) -> Chunk {
        Chunk {
            text: text.to_string(),
            page: Page::Number(page),
            source: "master_direction.txt".to_string(),
        }
    }

    fn sample_chain(generator: Arc<dyn TextGenerator>) -> QaChain {
        let records = vec![
            IndexRecord {
                chunk: chunk(
                    "The ceiling on IS loans is Rs.2 crore per borrower.",
                    12,
                ),
                vector: axis("loan"),
            },
            IndexRecord {
                chunk: chunk("Deposit-taking NBFCs require a certificate.", 5),
                vector: axis("deposit"),
            },
            IndexRecord {
                chunk: chunk("These directions apply to every NBFC.", 1),
                vector: axis("general"),
            },
        ];
        let index = VectorIndex::from_records(records).unwrap();
        let retriever = Retriever::new(index, Arc::new(KeywordEmbedder::new()));
        QaChain::new(retriever, generator, "test-model".to_string(), 2)
    }

    #[tokio::test]
    async fn blank_questions_are_rejected_before_any_provider_call() {
        let embedder = Arc::new(KeywordEmbedder::new());
        let generator = Arc::new(EchoGenerator::new());

        let index = VectorIndex::from_records(vec![IndexRecord {
            chunk: chunk("text", 1),
            vector: vec![0.0, 0.0, 1.0],
        }])
        .unwrap();
        let chain = QaChain::new(
            Retriever::new(index, embedder.clone()),
            generator.clone(),
            "test-model".to_string(),
            2,
        );

        let err = chain.ask_question("   \n\t ", true).await.unwrap_err();
        assert!(matches!(err, ChainError::Validation(_)));
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn answer_is_grounded_in_the_retrieved_chunk() {
        let chain = sample_chain(Arc::new(EchoGenerator::new()));

        let answer = chain
            .ask_question("What is the maximum loan amount in crore?", true)
            .await
            .unwrap();

        assert!(answer.answer.contains("Rs.2 crore"));
        assert_eq!(answer.model, "test-model");

        let sources = answer.sources.unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].chunk.page, Page::Number(12));
        assert!(sources[0].score >= sources[1].score);
    }

    #[tokio::test]
    async fn sources_are_omitted_unless_requested() {
        let chain = sample_chain(Arc::new(EchoGenerator::new()));
        let answer = chain
            .ask_question("loan ceiling?", false)
            .await
            .unwrap();
        assert!(answer.sources.is_none());
        assert!(!answer.answer.is_empty());
    }
}
