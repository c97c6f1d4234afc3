//! Shared LLM service with two active profiles: **generation** and **embedding**.
//!
//! Provides thin clients for Ollama and OpenAI-compatible backends, unified
//! error types, env-driven default configs, and lightweight health probes.
//! Construct [`service_profiles::LlmServiceProfiles`] once, wrap it in an
//! `Arc`, and pass clones to dependents.

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod service_profiles;
pub mod services;

pub use config::llm_model_config::LlmModelConfig;
pub use config::llm_provider::LlmProvider;
pub use error_handler::AiLlmError;
