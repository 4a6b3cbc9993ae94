//! LLM integration.
//!
//! Provides a provider abstraction over multiple LLM backends (Anthropic,
//! OpenAI, Ollama, Hyperbolic) and a client that applies timeout, retry and
//! response caching to every call the flows make.

pub(crate) mod anthropic;
pub(crate) mod client;
pub(crate) mod ollama;
pub(crate) mod openai;
pub(crate) mod provider;
pub(crate) mod retry;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{ClientOptions, LlmClient};
pub use provider::{
    api_key_env_var, resolve_env_var, LlmProvider, LlmProviderFactory, LlmRequest, LlmResponse,
    PROVIDERS,
};
pub use retry::{backoff_duration, is_retryable};
