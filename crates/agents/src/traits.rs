//! The agent contract shared by every pipeline stage.

use async_trait::async_trait;
use trendcast_common::Result;

/// A named unit with one asynchronous operation.
///
/// The name is fixed when the agent is built and only used for logging.
/// Errors raised by the generation capability are returned as-is.
#[async_trait]
pub trait Agent: Send + Sync {
    type Input: Send + 'static;
    type Output: Send + 'static;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Run the agent once.
    async fn execute(&self, input: Self::Input) -> Result<Self::Output>;
}
