//! Content creator: drafts the post body from a topic and its trend set.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use trendcast_common::{Result, TrendcastError};
use trendcast_llm::{LlmClient, LlmRequest};

use crate::hooks::{HookCatalog, HookSelector, RandomHookSelector};
use crate::traits::Agent;

pub const CONTENT_CREATOR_NAME: &str = "Content Creator Agent";

/// Input of the content stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRequest {
    pub topic: String,
    pub trends: String,
    pub platform: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub hooks: HookCatalog,
    pub banned_openers: Vec<String>,
    pub persona: String,
    pub max_tokens: u32,
    /// Fixes the hook RNG; unset means seeded from entropy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            hooks: HookCatalog::default(),
            banned_openers: vec![
                "In today's world".into(),
                "The industry is changing".into(),
                "As we know".into(),
            ],
            persona: "an ENTP 8w7, tritype 853".into(),
            max_tokens: 4000,
            seed: None,
        }
    }
}

impl ContentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.persona.trim().is_empty() {
            return Err(TrendcastError::Config("content.persona must not be empty".into()));
        }
        if self.max_tokens == 0 {
            return Err(TrendcastError::Config(
                "content.max_tokens must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Writes a short reflective post that opens with a randomly chosen hook.
/// One generation call per invocation; failures are not retried.
pub struct ContentCreatorAgent {
    name: String,
    llm: Arc<dyn LlmClient>,
    config: ContentConfig,
    selector: Arc<dyn HookSelector>,
    temperature: Option<f32>,
}

impl ContentCreatorAgent {
    pub fn new(llm: Arc<dyn LlmClient>, config: ContentConfig) -> Result<Self> {
        config.validate()?;
        let selector: Arc<dyn HookSelector> = match config.seed {
            Some(seed) => Arc::new(RandomHookSelector::seeded(seed)),
            None => Arc::new(RandomHookSelector::from_entropy()),
        };
        Ok(Self {
            name: CONTENT_CREATOR_NAME.to_string(),
            llm,
            config,
            selector,
            temperature: None,
        })
    }

    pub fn with_selector(mut self, selector: Arc<dyn HookSelector>) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn hooks(&self) -> &HookCatalog {
        &self.config.hooks
    }

    pub fn build_prompt(&self, request: &ContentRequest, hook: &str) -> String {
        let ContentRequest {
            topic,
            trends,
            platform,
        } = request;
        let banned = self
            .config
            .banned_openers
            .iter()
            .map(|o| format!("\"{o}\""))
            .collect::<Vec<_>>()
            .join(", ");
        let persona = &self.config.persona;

        let mut prompt = format!(
            "You are a creative {platform} thought leader writing about \"{topic}\" using these current trends: {trends}.\n\nInstructions:\n"
        );
        if !banned.is_empty() {
            prompt.push_str(&format!(
                "- Do NOT use generic openers like {banned}, or anything similar.\n"
            ));
        }
        prompt.push_str(&format!(
            "- Open the post this way: {hook}\n\
             - Write like {persona}.\n\
             - In 2-4 sentences, reflect on how these trends are shaping the future of the industry, ending with an original insight, prediction, or question.\n\
             - Sound personal and inspired, but professional.\n\
             - No hashtags, no markdown formatting.\n\
             - Lengthen paragraphs as you see fit.\n"
        ));
        prompt
    }
}

#[async_trait]
impl Agent for ContentCreatorAgent {
    type Input = ContentRequest;
    type Output = String;

    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, request: ContentRequest) -> Result<String> {
        info!(
            agent = %self.name,
            topic = %request.topic,
            trends = %request.trends,
            platform = %request.platform,
            "Creating content"
        );

        let hook = self.config.hooks.pick(self.selector.as_ref());
        debug!(agent = %self.name, hook = %hook, "Selected opening hook");

        let prompt = self.build_prompt(&request, hook);
        let llm_request = LlmRequest::from_prompt(prompt)
            .with_max_tokens(self.config.max_tokens)
            .with_temperature(self.temperature);

        let response = self.llm.complete(llm_request).await?;
        Ok(response.content)
    }
}
