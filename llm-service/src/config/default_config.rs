//! Default LLM configs loaded strictly from environment variables.
//!
//! This module provides convenience constructors for [`LlmModelConfig`],
//! grouped by role:
//!
//! - **Generation** → the model that composes answers
//! - **Embedding**  → the model that vectorizes text
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND`       = provider kind (`ollama` (default) or `openai`)
//! - `LLM_MAX_TOKENS` = optional max tokens (u32)
//! - `TEMPERATURE`    = optional generation temperature (0.0..=1.0)
//!
//! Ollama-specific:
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (mandatory)
//!
//! OpenAI-specific:
//! - `OPENAI_API_KEY` = API key (mandatory)
//! - `OPENAI_URL`     = API base (default `https://api.openai.com`)
//!
//! Role-specific:
//! - `GENERATION_MODEL` = generation model id (mandatory)
//! - `EMBEDDING_MODEL`  = embedding model id (mandatory)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, env_opt_f32, env_opt_u32, must_env, validate_range_f32,
    },
};

/// Default generation temperature when `TEMPERATURE` is unset.
const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Resolves the provider kind from `LLM_KIND` (defaults to Ollama).
///
/// # Errors
/// [`ConfigError::UnsupportedProvider`] for anything other than
/// `ollama`/`openai`.
pub fn provider_kind() -> Result<LlmProvider, AiLlmError> {
    match std::env::var("LLM_KIND") {
        Ok(v) if !v.trim().is_empty() => match v.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(LlmProvider::Ollama),
            "openai" => Ok(LlmProvider::OpenAI),
            other => Err(ConfigError::UnsupportedProvider(other.to_string()).into()),
        },
        _ => Ok(LlmProvider::Ollama),
    }
}

/// Resolves the Ollama endpoint strictly from environment.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
///
/// # Errors
/// - [`ConfigError::MissingVar`] if both are missing
/// - [`ConfigError::InvalidNumber`] if `OLLAMA_PORT` is invalid
fn ollama_endpoint() -> Result<String, AiLlmError> {
    if let Ok(url) = std::env::var("OLLAMA_URL") {
        if !url.trim().is_empty() {
            return Ok(url);
        }
    }
    if let Ok(port) = std::env::var("OLLAMA_PORT") {
        if !port.trim().is_empty() {
            let _ = port
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidNumber {
                    var: "OLLAMA_PORT",
                    reason: "expected u16 (1..=65535)",
                })?;
            return Ok(format!("http://localhost:{port}"));
        }
    }
    Err(AiLlmError::Config(ConfigError::MissingVar(
        "OLLAMA_URL or OLLAMA_PORT",
    )))
}

/// Resolves endpoint and credentials for the configured provider.
fn provider_base(provider: LlmProvider) -> Result<(String, Option<String>), AiLlmError> {
    match provider {
        LlmProvider::Ollama => Ok((ollama_endpoint()?, None)),
        LlmProvider::OpenAI => {
            let endpoint = std::env::var("OPENAI_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "https://api.openai.com".to_string());
            let key = must_env("OPENAI_API_KEY")?;
            Ok((endpoint, Some(key)))
        }
    }
}

/// Constructs a config for the **generation** model.
///
/// # Env
/// - `GENERATION_MODEL` (required)
/// - `TEMPERATURE` (optional, validated against `0.0..=1.0`)
/// - `LLM_MAX_TOKENS` (optional)
///
/// # Defaults
/// - `temperature = 0.1`
/// - `timeout_secs = Some(120)`
pub fn config_generation() -> Result<LlmModelConfig, AiLlmError> {
    let provider = provider_kind()?;
    let (endpoint, api_key) = provider_base(provider)?;
    let model = must_env("GENERATION_MODEL")?;
    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?;

    let temperature = env_opt_f32("TEMPERATURE")?.unwrap_or(DEFAULT_TEMPERATURE);
    validate_range_f32("temperature", temperature, 0.0, 1.0)?;

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key,
        max_tokens,
        temperature: Some(temperature),
        top_p: None,
        timeout_secs: Some(120),
    })
}

/// Constructs a config for the **embedding** model.
///
/// # Env
/// - `EMBEDDING_MODEL` (required)
///
/// # Defaults
/// - `temperature = Some(0.0)` (deterministic)
/// - `timeout_secs = Some(30)`
pub fn config_embedding() -> Result<LlmModelConfig, AiLlmError> {
    let provider = provider_kind()?;
    let (endpoint, api_key) = provider_base(provider)?;
    let model = must_env("EMBEDDING_MODEL")?;

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key,
        max_tokens: None,
        temperature: Some(0.0),
        top_p: None,
        timeout_secs: Some(30),
    })
}
