//! Text generation interface.

use std::{future::Future, pin::Pin};

use llm_service::service_profiles::LlmServiceProfiles;

use crate::error::ChainError;

/// Asynchronous answer generator.
///
/// Production uses the shared profile service; tests use deterministic
/// in-process implementations so chain behavior can be verified without a
/// live model.
pub trait TextGenerator: Send + Sync {
    /// Generates a completion for `prompt` under `system` instructions.
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        system: Option<&'a str>,
    ) -> Pin<Box<dyn Future<Output = Result<String, ChainError>> + Send + 'a>>;
}

impl TextGenerator for LlmServiceProfiles {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        system: Option<&'a str>,
    ) -> Pin<Box<dyn Future<Output = Result<String, ChainError>> + Send + 'a>> {
        Box::pin(async move { Ok(LlmServiceProfiles::generate(self, prompt, system).await?) })
    }
}
