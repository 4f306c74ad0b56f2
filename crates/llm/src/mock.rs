//! Scripted [`LlmClient`] for exercising agents without a provider.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use trendcast_common::{Result, TrendcastError};

use crate::client::{LlmClient, LlmRequest, LlmResponse};

const MOCK_MODEL: &str = "mock";

/// Replays queued responses in FIFO order and records every request.
///
/// Once the queue is drained the client answers with the fallback text if
/// one is set, otherwise with a generation error.
#[derive(Default)]
pub struct MockLlmClient {
    script: Mutex<VecDeque<Result<LlmResponse>>>,
    fallback: Option<String>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every call with `text` once the script runs out.
    pub fn with_fallback(mut self, text: impl Into<String>) -> Self {
        self.fallback = Some(text.into());
        self
    }

    pub fn push_text(&self, text: impl Into<String>) {
        self.script
            .lock()
            .push_back(Ok(LlmResponse::text(MOCK_MODEL, text)));
    }

    pub fn push_error(&self, error: TrendcastError) {
        self.script.lock().push_back(Err(error));
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().clone()
    }

    /// User prompts in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .iter()
            .filter_map(|r| r.prompt().map(str::to_owned))
            .collect()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse> {
        self.requests.lock().push(request);

        if let Some(next) = self.script.lock().pop_front() {
            return next;
        }
        match &self.fallback {
            Some(text) => Ok(LlmResponse::text(MOCK_MODEL, text.clone())),
            None => Err(TrendcastError::Generation(
                "mock script exhausted".to_string(),
            )),
        }
    }

    fn model_name(&self) -> &str {
        MOCK_MODEL
    }
}
