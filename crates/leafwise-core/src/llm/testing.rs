//! Configurable mock provider shared by the unit tests.

use super::provider::{LlmProvider, LlmRequest, LlmResponse};
use crate::error::FlowError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type ResponseFn = dyn Fn(u32, &LlmRequest) -> Result<LlmResponse, FlowError> + Send + Sync;

/// A mock LLM provider.
///
/// Each call to `generate()` invokes the response factory with the current
/// call index and the request, so tests can vary answers per attempt or per
/// flow (by looking at the prompt).
pub(crate) struct MockProvider {
    response_fn: Box<ResponseFn>,
    call_count: Arc<AtomicU32>,
    requests: Arc<Mutex<Vec<LlmRequest>>>,
    delay: Option<Duration>,
    /// (in_flight, max_concurrent) for checking concurrency bounds
    in_flight: Option<(Arc<AtomicU32>, Arc<AtomicU32>)>,
    available: bool,
}

pub(crate) fn text_response(text: &str) -> LlmResponse {
    LlmResponse {
        text: text.to_string(),
        model: "mock-v1".to_string(),
        tokens_used: Some(42),
        latency_ms: 10,
    }
}

impl MockProvider {
    fn from_fn(
        f: impl Fn(u32, &LlmRequest) -> Result<LlmResponse, FlowError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            response_fn: Box::new(f),
            call_count: Arc::new(AtomicU32::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
            delay: None,
            in_flight: None,
            available: true,
        }
    }

    pub(crate) fn success(text: &str) -> Self {
        let text = text.to_string();
        Self::from_fn(move |_, _| Ok(text_response(&text)))
    }

    pub(crate) fn failing(status_code: Option<u16>, message: &str) -> Self {
        let message = message.to_string();
        Self::from_fn(move |_, _| {
            Err(FlowError::Llm {
                message: message.clone(),
                status_code,
            })
        })
    }

    /// First call returns an error, subsequent calls succeed.
    pub(crate) fn fail_then_succeed(
        status_code: Option<u16>,
        error_msg: &str,
        success_text: &str,
    ) -> Self {
        let error_msg = error_msg.to_string();
        let success_text = success_text.to_string();
        Self::from_fn(move |idx, _| {
            if idx == 0 {
                Err(FlowError::Llm {
                    message: error_msg.clone(),
                    status_code,
                })
            } else {
                Ok(text_response(&success_text))
            }
        })
    }

    /// Answer with `answers` in order, repeating the last one.
    pub(crate) fn sequence(answers: &[&str]) -> Self {
        let answers: Vec<String> = answers.iter().map(|a| a.to_string()).collect();
        Self::from_fn(move |idx, _| {
            let text = answers
                .get(idx as usize)
                .or(answers.last())
                .cloned()
                .unwrap_or_default();
            Ok(text_response(&text))
        })
    }

    /// Answer based on the request (typically by matching the prompt).
    pub(crate) fn scripted(
        f: impl Fn(&LlmRequest) -> Result<String, FlowError> + Send + Sync + 'static,
    ) -> Self {
        Self::from_fn(move |_, request| f(request).map(|text| text_response(&text)))
    }

    pub(crate) fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn with_concurrency_gauge(
        mut self,
        in_flight: Arc<AtomicU32>,
        max_concurrent: Arc<AtomicU32>,
    ) -> Self {
        self.in_flight = Some((in_flight, max_concurrent));
        self
    }

    /// Shared handle to the call counter (clone before moving the provider).
    pub(crate) fn call_count_handle(&self) -> Arc<AtomicU32> {
        self.call_count.clone()
    }

    /// Shared handle to every request received.
    pub(crate) fn requests_handle(&self) -> Arc<Mutex<Vec<LlmRequest>>> {
        self.requests.clone()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-v1"
    }

    async fn is_available(&self) -> bool {
        self.available
    }

    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, FlowError> {
        let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        if let Some((ref in_flight, ref max_concurrent)) = self.in_flight {
            let current = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            max_concurrent.fetch_max(current, Ordering::SeqCst);
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let result = (self.response_fn)(idx, request);
        if let Some((ref in_flight, _)) = self.in_flight {
            in_flight.fetch_sub(1, Ordering::SeqCst);
        }
        result
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(60)
    }
}
