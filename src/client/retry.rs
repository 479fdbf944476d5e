//! Bounded retry with linear backoff around a text generator.
//!
//! Epistemic foundation:
//! - K_i: The retry budget and backoff schedule are fixed per call
//! - B_i: Any single attempt may fail; all failure modes are retryable
//! - I^B: Whether the next attempt will succeed is unknowable → bounded
//!   attempts, then a definitive [`Exhausted`](DidactError::Exhausted)

use crate::client::TextGenerator;
use crate::models::{DidactError, Result, RetryConfig};
use std::time::Duration;
use tracing::debug;

/// Wraps a [`TextGenerator`] with bounded retry and linear backoff.
///
/// Attempt k (zero-based) that fails waits `base_delay * (k + 1)` before the
/// next attempt; the final attempt's failure is surfaced without a wait. A
/// success returns immediately. An empty completion counts as a failed
/// attempt, indistinguishable from an error for retry purposes.
pub struct RetryingGenerator<G> {
    inner: G,
    max_attempts: u32,
    base_delay: Duration,
}

impl<G: TextGenerator> RetryingGenerator<G> {
    /// Wrap a generator with the configured retry policy.
    pub fn new(inner: G, config: &RetryConfig) -> Self {
        Self {
            inner,
            max_attempts: config.max_attempts.max(1),
            base_delay: config.base_delay(),
        }
    }

    /// The wrapped generator.
    pub fn inner(&self) -> &G {
        &self.inner
    }

    /// Generate text, retrying up to the budget.
    ///
    /// Returns the first non-empty completion, or
    /// `Exhausted { attempts, last_error }` once the budget is consumed.
    /// `last_error` renders the underlying failure for display.
    pub async fn call(&self, prompt: &str) -> Result<String> {
        let mut last_error: Option<DidactError> = None;

        for attempt in 0..self.max_attempts {
            match self.inner.generate(prompt).await {
                Ok(text) if !text.trim().is_empty() => return Ok(text),
                Ok(_) => last_error = Some(DidactError::EmptyCompletion),
                Err(e) => last_error = Some(e),
            }

            if attempt + 1 < self.max_attempts {
                let backoff = self.base_delay * (attempt + 1);
                debug!(
                    attempt = attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    "Retrying after failed generation"
                );
                tokio::time::sleep(backoff).await;
            }
        }

        Err(DidactError::Exhausted {
            attempts: self.max_attempts,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown error".to_string()),
        })
    }
}
