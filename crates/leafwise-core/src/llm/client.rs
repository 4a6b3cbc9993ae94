//! Resilient wrapper around a provider: timeout, retry with backoff, cache.
//!
//! Every flow call goes through [`LlmClient::complete`], so retry policy and
//! caching are applied uniformly no matter which provider is configured.

use super::provider::{LlmProvider, LlmRequest, LlmResponse};
use super::retry;
use crate::cache::{CacheEntry, ResponseCache};
use crate::config::Config;
use crate::error::{FlowError, FlowResult};
use std::sync::Arc;
use std::time::Duration;

/// Call policy applied to every flow request.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
    /// Maximum retries per request
    pub retry_attempts: u32,
    /// Base backoff delay in milliseconds
    pub retry_delay_ms: u64,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 60_000,
            retry_attempts: 3,
            retry_delay_ms: 1000,
            max_tokens: 1024,
            temperature: 0.2,
        }
    }
}

impl ClientOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            timeout_ms: config.limits.llm_timeout_ms,
            retry_attempts: config.pipeline.retry_attempts,
            retry_delay_ms: config.pipeline.retry_delay_ms,
            max_tokens: config.generation.max_tokens,
            temperature: config.generation.temperature,
        }
    }
}

/// A provider plus the policy used to call it. Cheap to clone.
#[derive(Clone)]
pub struct LlmClient {
    provider: Arc<dyn LlmProvider>,
    options: ClientOptions,
    cache: Option<ResponseCache>,
}

impl LlmClient {
    pub fn new(provider: Box<dyn LlmProvider>, options: ClientOptions) -> Self {
        Self {
            provider: Arc::from(provider),
            options,
            cache: None,
        }
    }

    /// Serve repeated requests from `cache` instead of the provider.
    pub fn with_cache(mut self, cache: ResponseCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Whether the provider looks usable (key present, or local server up).
    pub async fn is_available(&self) -> bool {
        self.provider.is_available().await
    }

    /// Send one flow request, retrying transient failures.
    ///
    /// `flow` names the caller in errors, logs and cache keys. `accept` turns
    /// the raw answer into the caller's output; only answers it accepts are
    /// cached, and a cached answer it rejects is treated as a miss.
    pub async fn complete<T, A>(
        &self,
        flow: &str,
        mut request: LlmRequest,
        accept: A,
    ) -> FlowResult<T>
    where
        A: Fn(&str) -> FlowResult<T>,
    {
        request.max_tokens = self.options.max_tokens;
        request.temperature = self.options.temperature;

        let cache_key = self.cache.as_ref().map(|_| {
            ResponseCache::key(self.provider.name(), self.provider.model(), flow, &request)
        });
        if let (Some(cache), Some(key)) = (&self.cache, &cache_key) {
            if let Some(entry) = cache.get(key).await {
                match accept(&entry.text) {
                    Ok(output) => {
                        tracing::debug!("{flow}: cache hit");
                        return Ok(output);
                    }
                    Err(e) => tracing::debug!("{flow}: ignoring cached answer: {e}"),
                }
            }
        }

        let response = self.complete_with_retry(flow, &request).await?;
        let output = accept(&response.text).inspect_err(|e| {
            tracing::debug!("{flow}: rejected answer {:?}: {e}", response.text);
        })?;

        if let (Some(cache), Some(key)) = (&self.cache, &cache_key) {
            let entry = CacheEntry {
                flow: flow.to_string(),
                model: response.model,
                text: response.text,
            };
            if let Err(e) = cache.put(key, &entry).await {
                tracing::warn!("{flow}: failed to write response cache: {e}");
            }
        }

        Ok(output)
    }

    async fn complete_with_retry(
        &self,
        flow: &str,
        request: &LlmRequest,
    ) -> FlowResult<LlmResponse> {
        let timeout = Duration::from_millis(self.options.timeout_ms);
        let mut last_error = None;

        for attempt in 0..=self.options.retry_attempts {
            if attempt > 0 {
                let delay = retry::backoff_duration(attempt - 1, self.options.retry_delay_ms);
                tracing::debug!(
                    "{flow}: retry {attempt}/{} after {delay:?}",
                    self.options.retry_attempts
                );
                tokio::time::sleep(delay).await;
            }

            let error = match tokio::time::timeout(timeout, self.provider.generate(request)).await
            {
                Ok(Ok(response)) => {
                    tracing::debug!(
                        "{flow}: {} answered in {}ms ({} tokens)",
                        response.model,
                        response.latency_ms,
                        response
                            .tokens_used
                            .map_or_else(|| "?".to_string(), |t| t.to_string())
                    );
                    return Ok(response);
                }
                Ok(Err(e)) => e,
                Err(_) => FlowError::Timeout {
                    flow: flow.to_string(),
                    timeout_ms: self.options.timeout_ms,
                },
            };

            tracing::warn!("{flow}: attempt {} failed: {error}", attempt + 1);
            let retryable = retry::is_retryable(&error);
            last_error = Some(error);
            if !retryable {
                break;
            }
        }

        Err(last_error.unwrap_or_else(|| FlowError::Llm {
            message: format!("{flow}: no attempt was made"),
            status_code: None,
        }))
    }
}
