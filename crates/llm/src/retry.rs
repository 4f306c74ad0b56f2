use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;
use trendcast_common::{Result, TrendcastError};

use crate::client::{LlmClient, LlmRequest, LlmResponse};

/// Backoff policy for transient generation failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 500,
            max_delay_ms: 30_000,
            backoff_multiplier: 2.0,
        }
    }
}

/// Retries rate-limit, server and transport failures of the wrapped client.
///
/// Content-level retries (a response that repeats an excluded trend) are the
/// trend scout's business; this layer never looks at response text.
pub struct RetryingClient<T: LlmClient> {
    inner: T,
    config: RetryConfig,
}

impl<T: LlmClient> RetryingClient<T> {
    pub fn new(inner: T, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    fn retry_after_ms(error: &TrendcastError) -> Option<u64> {
        let TrendcastError::Provider { body, .. } = error else {
            return None;
        };
        let lower = body.to_lowercase();
        let pos = lower.find("retry-after")?;
        body.get(pos..)?
            .split_whitespace()
            .skip(1)
            .map(|word| word.trim_end_matches(|c: char| !c.is_ascii_digit()))
            .find_map(|digits| digits.parse::<u64>().ok())
            .map(|secs| secs.saturating_mul(1000))
    }

    fn compute_delay(&self, attempt: u32) -> u64 {
        let base = self.config.initial_delay_ms as f64
            * self.config.backoff_multiplier.powi(attempt as i32);
        let jitter = (base * 0.1 * rand::thread_rng().gen_range(0.0..1.0)) as u64;
        (base as u64)
            .saturating_add(jitter)
            .min(self.config.max_delay_ms)
    }
}

#[async_trait]
impl<T: LlmClient> LlmClient for RetryingClient<T> {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse> {
        let mut attempt = 0;
        loop {
            match self.inner.complete(request.clone()).await {
                Ok(response) => return Ok(response),
                Err(e) if attempt < self.config.max_retries && e.is_transient() => {
                    let delay = Self::retry_after_ms(&e)
                        .map(|ms| ms.min(self.config.max_delay_ms))
                        .unwrap_or_else(|| self.compute_delay(attempt));

                    warn!(
                        attempt = attempt + 1,
                        max_retries = self.config.max_retries,
                        delay_ms = delay,
                        error = %e,
                        "Retrying generation request"
                    );

                    tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}
