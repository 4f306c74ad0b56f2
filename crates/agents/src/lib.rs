//! Agents and the campaign workflow that turns a topic into a post.
//!
//! - **Trend Scout Agent**: asks for current trend tags on a topic and
//!   re-asks when a previously used tag comes back
//! - **Content Creator Agent**: drafts a short post around those trends,
//!   opening with a randomly chosen hook
//! - **MarketingWorkflow**: runs the agents in order, feeding each output
//!   into the next input
//!
//! ```text
//! topic ──► [Trend Scout] ──► trends ──► [Content Creator] ──► post
//!                 │                              │
//!                 └──────────► LlmClient ◄───────┘
//! ```

pub mod config;
pub mod content_creator;
pub mod hooks;
pub mod traits;
pub mod trend_scout;
pub mod workflow;

pub use config::CampaignConfig;
pub use content_creator::{ContentConfig, ContentCreatorAgent, ContentRequest};
pub use hooks::{HookCatalog, HookSelector, RandomHookSelector};
pub use traits::Agent;
pub use trend_scout::{ExclusionList, TrendScoutAgent, TrendScoutConfig};
pub use workflow::{
    CampaignRequest, MarketingWorkflow, PerformanceReport, PostReceipt, PublishRequest, Stage,
    StageRecord, WorkflowResult,
};
