use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use trendcast_common::{Result, TrendcastError};

use crate::client::LlmClient;
use crate::openai::OpenAiClient;
use crate::retry::{RetryConfig, RetryingClient};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Only "openai" (and OpenAI-compatible endpoints) is supported.
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Falls back to `OPENAI_API_KEY` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_provider() -> String {
    "openai".into()
}

fn default_model() -> String {
    "gpt-4o".into()
}

fn default_timeout_ms() -> u64 {
    120_000
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            api_key: None,
            api_url: None,
            temperature: None,
            timeout_ms: default_timeout_ms(),
            retry: RetryConfig::default(),
        }
    }
}

impl LlmConfig {
    /// Resolve the API key: explicit config first, then the environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .as_ref()
            .filter(|key| !key.is_empty())
            .cloned()
            .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|key| !key.is_empty()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(TrendcastError::Config("llm.model must not be empty".into()));
        }
        if self.provider != "openai" {
            return Err(TrendcastError::Config(format!(
                "Unknown LLM provider: {}",
                self.provider
            )));
        }
        Ok(())
    }
}

/// Build the configured client, wrapped for transient-failure retries.
pub fn build_llm_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>> {
    config.validate()?;

    let api_key = config.resolve_api_key();
    if api_key.is_none() && config.api_url.is_none() {
        return Err(TrendcastError::Config(format!(
            "No API key configured; set llm.api_key or {API_KEY_ENV}"
        )));
    }

    let base = OpenAiClient::new(config.api_url.clone(), config.model.clone(), api_key)
        .with_timeout(Duration::from_millis(config.timeout_ms));

    Ok(Arc::new(RetryingClient::new(base, config.retry.clone())))
}
