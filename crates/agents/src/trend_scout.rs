//! Trend scout: asks the model for current trend tags on a topic and
//! re-asks whenever the answer repeats a tag that was already used.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use trendcast_common::{Result, TrendcastError};
use trendcast_llm::{LlmClient, LlmRequest};

use crate::traits::Agent;

pub const TREND_SCOUT_NAME: &str = "Trend Scout Agent";

/// Previously used trend tags. Matching is a case-insensitive substring test.
///
/// Tags are trimmed and blank entries dropped, whether built in code or
/// loaded from config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ExclusionList {
    tags: Vec<String>,
}

impl ExclusionList {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags
                .into_iter()
                .map(|t| {
                    let tag: String = t.into();
                    tag.trim().to_string()
                })
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// First excluded tag that `text` contains, ignoring case.
    pub fn first_match(&self, text: &str) -> Option<&str> {
        let haystack = text.to_lowercase();
        self.tags
            .iter()
            .find(|tag| haystack.contains(&tag.to_lowercase()))
            .map(String::as_str)
    }

    pub fn is_clean(&self, text: &str) -> bool {
        self.first_match(text).is_none()
    }
}

impl From<Vec<String>> for ExclusionList {
    fn from(tags: Vec<String>) -> Self {
        Self::new(tags)
    }
}

impl From<ExclusionList> for Vec<String> {
    fn from(list: ExclusionList) -> Self {
        list.tags
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendScoutConfig {
    pub exclusion_tags: ExclusionList,
    /// Upper bound on generation calls per topic, clean or not.
    pub max_attempts: u32,
    pub max_tokens: u32,
    pub tag_count: u32,
    pub lookback_months: u32,
}

impl Default for TrendScoutConfig {
    fn default() -> Self {
        Self {
            exclusion_tags: ExclusionList::new([
                "Supply chain transparency",
                "ESG compliance integration",
                "Digital certification platforms",
                "AI-driven compliance tools",
                "Remote audit adoption",
                "Cybersecurity compliance focus",
            ]),
            max_attempts: 5,
            max_tokens: 4000,
            tag_count: 3,
            lookback_months: 3,
        }
    }
}

impl TrendScoutConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(TrendcastError::Config(
                "trend_scout.max_attempts must be at least 1".into(),
            ));
        }
        if self.tag_count == 0 {
            return Err(TrendcastError::Config(
                "trend_scout.tag_count must be at least 1".into(),
            ));
        }
        if self.max_tokens == 0 {
            return Err(TrendcastError::Config(
                "trend_scout.max_tokens must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Produces a comma-separated trend set that avoids every excluded tag.
///
/// A response containing an excluded tag is discarded and the same prompt
/// is sent again, up to `max_attempts` calls in total. Generation errors are
/// not retried here; they leave the loop immediately.
pub struct TrendScoutAgent {
    name: String,
    llm: Arc<dyn LlmClient>,
    config: TrendScoutConfig,
    temperature: Option<f32>,
}

impl TrendScoutAgent {
    pub fn new(llm: Arc<dyn LlmClient>, config: TrendScoutConfig) -> Self {
        Self {
            name: TREND_SCOUT_NAME.to_string(),
            llm,
            config,
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn exclusions(&self) -> &ExclusionList {
        &self.config.exclusion_tags
    }

    pub fn build_prompt(&self, topic: &str) -> String {
        let excluded = self.config.exclusion_tags.tags().join(", ");
        let count = self.config.tag_count;
        let months = self.config.lookback_months;

        format!(
            r#"You are an industry trend scout. Search recent news, articles, and thought pieces for *real, current trends* shaping the "{topic}" industry right now.

Instructions:
- Focus on events, launches, viral topics, shifts in public discourse, or recurring themes from the last {months} months.
- Do NOT suggest marketing strategies, generic technologies, or hypothetical trends.
- Only use trends with clear evidence in recent news, articles, or social media.
- Condense each trend into a concise, specific tag of 1-5 words, echoing the language of the source where possible.
- Output {count} tags, separated by commas. Do not explain or elaborate.
- Do not reuse any of these past tags: {excluded}.
- If stuck, look for tangentially related trends.
- Do not use hashtags."#
        )
    }
}

#[async_trait]
impl Agent for TrendScoutAgent {
    type Input = String;
    type Output = String;

    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, topic: String) -> Result<String> {
        info!(agent = %self.name, topic = %topic, "Scouting for trends");

        let prompt = self.build_prompt(&topic);
        debug!(agent = %self.name, prompt_len = prompt.len(), "Built trend prompt");

        let request = LlmRequest::from_prompt(prompt)
            .with_max_tokens(self.config.max_tokens)
            .with_temperature(self.temperature);

        let max_attempts = self.config.max_attempts.max(1);
        let mut last_match = String::new();

        for attempt in 1..=max_attempts {
            let response = self.llm.complete(request.clone()).await?;

            match self.config.exclusion_tags.first_match(&response.content) {
                Some(tag) => {
                    warn!(
                        agent = %self.name,
                        attempt,
                        max_attempts,
                        tag = %tag,
                        "Response repeated an excluded tag, asking again"
                    );
                    last_match = tag.to_string();
                }
                None => {
                    info!(
                        agent = %self.name,
                        attempt,
                        trends = %response.content,
                        "New trends found"
                    );
                    return Ok(response.content);
                }
            }
        }

        Err(TrendcastError::ExclusionRetriesExhausted {
            attempts: max_attempts,
            last_match,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trendcast_llm::MockLlmClient;

    fn scout(mock: Arc<MockLlmClient>, max_attempts: u32) -> TrendScoutAgent {
        TrendScoutAgent::new(
            mock,
            TrendScoutConfig {
                max_attempts,
                ..Default::default()
            },
        )
    }

    #[test]
    fn exclusion_match_ignores_case() {
        let list = ExclusionList::new(["Remote audit adoption"]);
        assert_eq!(
            list.first_match("AI agents, REMOTE AUDIT ADOPTION, quantum"),
            Some("Remote audit adoption")
        );
        assert!(list.is_clean("AI agents, ISO 42001 certification rush"));
    }

    #[test]
    fn blank_tags_never_match() {
        let list = ExclusionList::new(["", "   ", "ESG"]);
        assert_eq!(list.tags(), ["ESG"]);

        let raw: ExclusionList = serde_json::from_str(r#"["", "ESG"]"#).unwrap();
        assert!(raw.is_clean("anything at all"));
        assert!(!raw.is_clean("esg rollback"));
    }

    #[test]
    fn zero_token_budget_is_rejected() {
        let config = TrendScoutConfig {
            max_tokens: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(TrendcastError::Config(_))));
        assert!(TrendScoutConfig::default().validate().is_ok());
    }

    #[tokio::test]
    async fn padded_config_tags_still_trigger_a_retry() {
        let config: TrendScoutConfig =
            toml::from_str("exclusion_tags = [\" Quantum hype \", \"\", \"  \"]\n").unwrap();
        assert_eq!(config.exclusion_tags.tags(), ["Quantum hype"]);

        let mock = Arc::new(MockLlmClient::new());
        mock.push_text("Quantum hype, x, y");
        mock.push_text("clean, x, y");

        let agent = TrendScoutAgent::new(mock.clone(), config);
        assert!(agent.build_prompt("t").contains("past tags: Quantum hype."));

        let trends = agent.execute("t".into()).await.unwrap();
        assert_eq!(trends, "clean, x, y");
        assert_eq!(mock.call_count(), 2);
    }

    #[test]
    fn prompt_lists_every_excluded_tag() {
        let agent = scout(Arc::new(MockLlmClient::new()), 5);
        let prompt = agent.build_prompt("b2b compliance iso42001");

        assert!(prompt.contains("\"b2b compliance iso42001\""));
        assert!(prompt.contains("last 3 months"));
        assert!(prompt.contains("Output 3 tags"));
        for tag in agent.exclusions().tags() {
            assert!(prompt.contains(tag.as_str()), "missing {tag}");
        }
        assert!(prompt.contains("Do not use hashtags"));
    }

    #[test]
    fn name_is_fixed() {
        let agent = scout(Arc::new(MockLlmClient::new()), 5);
        assert_eq!(agent.name(), TREND_SCOUT_NAME);
    }

    #[tokio::test]
    async fn clean_first_response_is_returned_without_retry() {
        let mock = Arc::new(MockLlmClient::new());
        mock.push_text("AI Act enforcement, ISO 42001 audits, Model cards");

        let agent = scout(mock.clone(), 5);
        let trends = agent.execute("ai governance".into()).await.unwrap();

        assert_eq!(trends, "AI Act enforcement, ISO 42001 audits, Model cards");
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn excluded_response_triggers_exactly_one_retry() {
        let mock = Arc::new(MockLlmClient::new());
        mock.push_text("supply chain transparency, AI audits, Carbon labels");
        mock.push_text("AI audits, Carbon labels, Deepfake disclosure");

        let agent = scout(mock.clone(), 5);
        let trends = agent.execute("compliance".into()).await.unwrap();

        assert_eq!(trends, "AI audits, Carbon labels, Deepfake disclosure");
        assert_eq!(mock.call_count(), 2);
        let prompts = mock.prompts();
        assert_eq!(prompts[0], prompts[1]);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let mock = Arc::new(MockLlmClient::new().with_fallback("Remote audit adoption, X, Y"));

        let agent = scout(mock.clone(), 3);
        let err = agent.execute("compliance".into()).await.unwrap_err();

        match err {
            TrendcastError::ExclusionRetriesExhausted {
                attempts,
                last_match,
            } => {
                assert_eq!(attempts, 3);
                assert_eq!(last_match, "Remote audit adoption");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn generation_error_propagates_without_retry() {
        let mock = Arc::new(MockLlmClient::new().with_fallback("clean, tags, here"));
        mock.push_error(TrendcastError::Provider {
            status: 500,
            body: "upstream down".into(),
        });

        let agent = scout(mock.clone(), 5);
        let err = agent.execute("compliance".into()).await.unwrap_err();

        assert!(matches!(err, TrendcastError::Provider { status: 500, .. }));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn request_carries_token_budget_and_temperature() {
        let mock = Arc::new(MockLlmClient::new());
        mock.push_text("a, b, c");

        let agent = scout(mock.clone(), 5).with_temperature(Some(0.4));
        agent.execute("topic".into()).await.unwrap();

        let request = &mock.requests()[0];
        assert_eq!(request.max_tokens, Some(4000));
        assert_eq!(request.temperature, Some(0.4));
        assert!(request.system_prompt.is_none());
    }
}
