//! LLM provider trait and request/response types.
//!
//! Defines the interface that all LLM providers implement, plus the
//! factory that creates the right provider from CLI flags and config.

use crate::config::LlmConfig;
use crate::error::FlowError;
use crate::media::ImageInput;
use async_trait::async_trait;
use std::time::Duration;

/// Provider identifiers accepted by [`LlmProviderFactory::create`].
pub const PROVIDERS: &[&str] = &["anthropic", "openai", "ollama", "hyperbolic"];

/// A single prompt sent to a model, optionally with one image attached.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    /// Fully rendered prompt text
    pub prompt: String,
    /// Image to send alongside the prompt (vision flows only)
    pub image: Option<ImageInput>,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Ask the provider for a JSON-only answer where the API supports it
    pub json_output: bool,
}

impl LlmRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            image: None,
            max_tokens: 1024,
            temperature: 0.2,
            json_output: false,
        }
    }

    pub fn with_image(mut self, image: ImageInput) -> Self {
        self.image = Some(image);
        self
    }
}

/// The response from an LLM call.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Generated text
    pub text: String,
    /// Model identifier used
    pub model: String,
    /// Number of tokens used (input + output), if reported
    pub tokens_used: Option<u32>,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Trait that all LLM providers implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (we need `Box<dyn LlmProvider>` for dynamic dispatch).
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logging (e.g., "anthropic", "ollama").
    fn name(&self) -> &str;

    /// Model the provider sends requests to.
    fn model(&self) -> &str;

    /// Check whether the provider is configured and reachable.
    async fn is_available(&self) -> bool;

    /// Generate a completion for the given request.
    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, FlowError>;

    /// Per-request timeout for this provider.
    fn timeout(&self) -> Duration;
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Environment variable conventionally holding a provider's API key.
pub fn api_key_env_var(provider: &str) -> Option<&'static str> {
    match provider {
        "anthropic" => Some("ANTHROPIC_API_KEY"),
        "openai" => Some("OPENAI_API_KEY"),
        "hyperbolic" => Some("HYPERBOLIC_API_KEY"),
        _ => None,
    }
}

fn missing_key(label: &str, env_var: &str) -> FlowError {
    FlowError::Llm {
        message: format!(
            "{label} API key not set. Set {env_var} env var or run `leafwise config set-key`."
        ),
        status_code: None,
    }
}

/// Factory that creates the appropriate provider from CLI flags and config.
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Create an LLM provider based on provider name, config, and optional model override.
    ///
    /// # Arguments
    /// * `provider` - Provider identifier ("ollama", "anthropic", "openai", "hyperbolic")
    /// * `config` - The full LLM config section
    /// * `model_override` - Optional model name that overrides the config default
    pub fn create(
        provider: &str,
        config: &LlmConfig,
        model_override: Option<&str>,
    ) -> Result<Box<dyn LlmProvider>, FlowError> {
        let pick_model = |default: &str| model_override.unwrap_or(default).to_string();

        match provider {
            "ollama" => {
                let cfg = config.ollama.clone().unwrap_or_default();
                Ok(Box::new(super::ollama::OllamaProvider::new(
                    &cfg.endpoint,
                    &pick_model(&cfg.model),
                )))
            }
            "anthropic" => {
                let cfg = config.anthropic.clone().unwrap_or_default();
                let api_key = resolve_env_var(&cfg.api_key)
                    .ok_or_else(|| missing_key("Anthropic", "ANTHROPIC_API_KEY"))?;
                Ok(Box::new(super::anthropic::AnthropicProvider::new(
                    &api_key,
                    &pick_model(&cfg.model),
                )))
            }
            "openai" => {
                let cfg = config.openai.clone().unwrap_or_default();
                let api_key = resolve_env_var(&cfg.api_key)
                    .ok_or_else(|| missing_key("OpenAI", "OPENAI_API_KEY"))?;
                Ok(Box::new(super::openai::OpenAiProvider::new(
                    &api_key,
                    &pick_model(&cfg.model),
                )))
            }
            "hyperbolic" => {
                let cfg = config.hyperbolic.clone().unwrap_or_default();
                let api_key = resolve_env_var(&cfg.api_key)
                    .ok_or_else(|| missing_key("Hyperbolic", "HYPERBOLIC_API_KEY"))?;
                Ok(Box::new(super::openai::OpenAiProvider::compatible(
                    "hyperbolic",
                    &cfg.endpoint,
                    &api_key,
                    &pick_model(&cfg.model),
                )))
            }
            other => Err(FlowError::Llm {
                message: format!(
                    "Unknown LLM provider: {other} (expected one of {})",
                    PROVIDERS.join(", ")
                ),
                status_code: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AnthropicConfig, OllamaConfig};

    #[test]
    fn test_request_builder() {
        let image = ImageInput::from_bytes(&[1, 2, 3], "png");
        let request = LlmRequest::new("Identify this").with_image(image);
        assert_eq!(request.prompt, "Identify this");
        assert_eq!(request.image.unwrap().media_type, "image/png");
        assert!(!request.json_output);
    }

    #[test]
    fn test_resolve_env_var() {
        // Non-env-var strings pass through
        assert_eq!(resolve_env_var("plain-key"), Some("plain-key".to_string()));
        // Empty returns None
        assert_eq!(resolve_env_var(""), None);
        // Unset env var returns None
        assert_eq!(resolve_env_var("${DEFINITELY_NOT_SET_LEAFWISE_123}"), None);
    }

    #[test]
    fn test_api_key_env_var() {
        assert_eq!(api_key_env_var("anthropic"), Some("ANTHROPIC_API_KEY"));
        assert_eq!(api_key_env_var("ollama"), None);
    }

    #[test]
    fn test_factory_ollama_needs_no_key() {
        let config = LlmConfig {
            ollama: Some(OllamaConfig::default()),
            ..LlmConfig::default()
        };
        let provider = LlmProviderFactory::create("ollama", &config, Some("llava:13b")).unwrap();
        assert_eq!(provider.name(), "ollama");
        assert_eq!(provider.model(), "llava:13b");
    }

    #[test]
    fn test_factory_uses_config_model_and_key() {
        let config = LlmConfig {
            anthropic: Some(AnthropicConfig {
                api_key: "sk-ant-test".to_string(),
                model: "claude-test".to_string(),
            }),
            ..LlmConfig::default()
        };
        let provider = LlmProviderFactory::create("anthropic", &config, None).unwrap();
        assert_eq!(provider.name(), "anthropic");
        assert_eq!(provider.model(), "claude-test");
    }

    #[test]
    fn test_factory_missing_key() {
        let config = LlmConfig {
            openai: Some(crate::config::OpenAiConfig {
                api_key: "${DEFINITELY_NOT_SET_LEAFWISE_456}".to_string(),
                model: "gpt-4o-mini".to_string(),
            }),
            ..LlmConfig::default()
        };
        let err = LlmProviderFactory::create("openai", &config, None)
            .err()
            .unwrap();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_factory_unknown_provider() {
        let err = LlmProviderFactory::create("gemini", &LlmConfig::default(), None)
            .err()
            .unwrap();
        assert!(err.to_string().contains("Unknown LLM provider: gemini"));
    }
}
