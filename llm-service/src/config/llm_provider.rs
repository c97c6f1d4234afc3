/// Represents the provider (backend) used for LLM inference and embeddings.
///
/// Distinguishes between a local Ollama runtime and an OpenAI-compatible
/// HTTP API. Adding more providers later (e.g., Anthropic, Mistral) means
/// extending this enum and the matching service client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Local Ollama runtime for on-device inference.
    Ollama,
    /// OpenAI-compatible REST API.
    OpenAI,
}
