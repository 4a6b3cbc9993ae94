//! Retry utilities for transient LLM failures.
//!
//! Provides classification of retryable errors and exponential backoff.

use crate::error::FlowError;
use std::time::Duration;

/// Determine whether a flow error is worth retrying.
///
/// Retryable errors: timeouts, rate limits (429), server errors (5xx), and
/// transport failures without a status code. Not retryable: auth failures,
/// bad requests, and answers that arrived but failed schema validation.
pub fn is_retryable(error: &FlowError) -> bool {
    match error {
        FlowError::Timeout { .. } => true,
        FlowError::Llm {
            status_code,
            message,
        } => {
            if let Some(code) = status_code {
                return *code == 429 || (500..=599).contains(code);
            }
            // Non-HTTP failures (connection refused, DNS failure, read timeout)
            message.contains("timed out") || message.contains("connect")
        }
        FlowError::InvalidInput { .. } | FlowError::InvalidOutput { .. } => false,
    }
}

/// Calculate exponential backoff duration for a given attempt.
///
/// Uses `base_delay * 2^attempt` with a cap at 30 seconds.
pub fn backoff_duration(attempt: u32, base_delay_ms: u64) -> Duration {
    let delay = base_delay_ms.saturating_mul(2u64.saturating_pow(attempt));
    Duration::from_millis(delay.min(30_000))
}
