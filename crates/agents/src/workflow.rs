//! Campaign workflow: a fixed, strictly sequential pipeline of agents.
//!
//! ```text
//! CampaignRequest { topic, platform }
//!     │
//!     ▼
//! [ScoutTrends]    topic ─────────────────────► trends
//!     ▼
//! [CreateContent]  { topic, trends, platform } ► content
//!     ▼
//! [Publish]        { content, platform } ─────► PostReceipt        (optional)
//!     ▼
//! [Analyze]        PostReceipt ───────────────► PerformanceReport  (optional)
//! ```
//!
//! Each stage is awaited before the next starts. The first failing stage
//! ends the run and its error is returned unchanged.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use trendcast_common::Result;
use trendcast_llm::LlmClient;

use crate::config::CampaignConfig;
use crate::content_creator::{ContentCreatorAgent, ContentRequest};
use crate::traits::Agent;
use crate::trend_scout::TrendScoutAgent;

pub type TrendAgent = dyn Agent<Input = String, Output = String>;
pub type ContentAgent = dyn Agent<Input = ContentRequest, Output = String>;
pub type PublishAgent = dyn Agent<Input = PublishRequest, Output = PostReceipt>;
pub type AnalyticsAgent = dyn Agent<Input = PostReceipt, Output = PerformanceReport>;

/// The only external input to a campaign run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignRequest {
    pub topic: String,
    pub platform: String,
}

impl CampaignRequest {
    pub fn new(topic: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            platform: platform.into(),
        }
    }
}

/// Input of the publish stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishRequest {
    pub content: String,
    pub platform: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostReceipt {
    pub platform: String,
    pub post_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub post_id: String,
    pub views: u64,
    pub engagement: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ScoutTrends,
    CreateContent,
    Publish,
    Analyze,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::ScoutTrends => "scout_trends",
            Stage::CreateContent => "create_content",
            Stage::Publish => "publish",
            Stage::Analyze => "analyze",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageRecord {
    pub stage: Stage,
    pub agent_name: String,
    pub duration_ms: u64,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowResult {
    pub topic: String,
    pub platform: String,
    pub trends: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<PostReceipt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<PerformanceReport>,
    pub stages: Vec<StageRecord>,
    pub duration_ms: u64,
}

pub struct MarketingWorkflow {
    name: String,
    trend_scout: Arc<TrendAgent>,
    content_creator: Arc<ContentAgent>,
    publisher: Option<Arc<PublishAgent>>,
    analytics: Option<Arc<AnalyticsAgent>>,
}

impl MarketingWorkflow {
    pub fn new(trend_scout: Arc<TrendAgent>, content_creator: Arc<ContentAgent>) -> Self {
        Self {
            name: "marketing".into(),
            trend_scout,
            content_creator,
            publisher: None,
            analytics: None,
        }
    }

    /// Wire the standard trend scout and content creator to `llm`.
    pub fn from_config(llm: Arc<dyn LlmClient>, config: &CampaignConfig) -> Result<Self> {
        config.validate()?;
        let temperature = config.llm.temperature;

        let scout = TrendScoutAgent::new(llm.clone(), config.trend_scout.clone())
            .with_temperature(temperature);
        let creator =
            ContentCreatorAgent::new(llm, config.content.clone())?.with_temperature(temperature);

        Ok(Self::new(Arc::new(scout), Arc::new(creator)))
    }

    pub fn with_publisher(mut self, publisher: Arc<PublishAgent>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Analytics consumes the publish receipt, so it only runs when a
    /// publisher is attached too.
    pub fn with_analytics(mut self, analytics: Arc<AnalyticsAgent>) -> Self {
        self.analytics = Some(analytics);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stages a run will execute, in order.
    pub fn stages(&self) -> Vec<Stage> {
        let mut stages = vec![Stage::ScoutTrends, Stage::CreateContent];
        if self.publisher.is_some() {
            stages.push(Stage::Publish);
            if self.analytics.is_some() {
                stages.push(Stage::Analyze);
            }
        }
        stages
    }

    pub async fn run(&self, request: CampaignRequest) -> Result<WorkflowResult> {
        let start_time = Instant::now();
        let CampaignRequest { topic, platform } = request;

        info!(
            workflow = %self.name,
            topic = %topic,
            platform = %platform,
            stages = self.stages().len(),
            "Starting campaign workflow"
        );

        let mut records = Vec::new();

        let trends = self
            .run_stage(
                Stage::ScoutTrends,
                self.trend_scout.as_ref(),
                topic.clone(),
                &mut records,
            )
            .await?;
        info!(workflow = %self.name, trends = %trends, "Trends found");

        let content = self
            .run_stage(
                Stage::CreateContent,
                self.content_creator.as_ref(),
                ContentRequest {
                    topic: topic.clone(),
                    trends: trends.clone(),
                    platform: platform.clone(),
                },
                &mut records,
            )
            .await?;
        info!(workflow = %self.name, content = %content, "Content created");

        let mut post = None;
        let mut report = None;

        if let Some(publisher) = &self.publisher {
            let receipt = self
                .run_stage(
                    Stage::Publish,
                    publisher.as_ref(),
                    PublishRequest {
                        content: content.clone(),
                        platform: platform.clone(),
                    },
                    &mut records,
                )
                .await?;
            info!(
                workflow = %self.name,
                platform = %receipt.platform,
                post_id = %receipt.post_id,
                "Post published"
            );

            if let Some(analytics) = &self.analytics {
                let metrics = self
                    .run_stage(
                        Stage::Analyze,
                        analytics.as_ref(),
                        receipt.clone(),
                        &mut records,
                    )
                    .await?;
                info!(
                    workflow = %self.name,
                    post_id = %metrics.post_id,
                    views = metrics.views,
                    engagement = metrics.engagement,
                    "Performance analyzed"
                );
                report = Some(metrics);
            }
            post = Some(receipt);
        } else if self.analytics.is_some() {
            warn!(workflow = %self.name, "Analytics attached without a publisher, skipping");
        }

        let duration_ms = start_time.elapsed().as_millis() as u64;
        info!(
            workflow = %self.name,
            stages = records.len(),
            duration_ms,
            "Campaign workflow finished"
        );

        Ok(WorkflowResult {
            topic,
            platform,
            trends,
            content,
            post,
            report,
            stages: records,
            duration_ms,
        })
    }

    async fn run_stage<A>(
        &self,
        stage: Stage,
        agent: &A,
        input: A::Input,
        records: &mut Vec<StageRecord>,
    ) -> Result<A::Output>
    where
        A: Agent + ?Sized,
    {
        let step_start = Instant::now();
        info!(workflow = %self.name, stage = %stage, agent = %agent.name(), "Executing stage");

        match agent.execute(input).await {
            Ok(output) => {
                records.push(StageRecord {
                    stage,
                    agent_name: agent.name().to_string(),
                    duration_ms: step_start.elapsed().as_millis() as u64,
                });
                Ok(output)
            }
            Err(e) => {
                error!(
                    workflow = %self.name,
                    stage = %stage,
                    agent = %agent.name(),
                    error = %e,
                    "Stage failed"
                );
                Err(e)
            }
        }
    }
}
