//! The text-generation capability the trendcast agents call into.
//!
//! Agents only see [`LlmClient`]. Concrete bindings live here: an
//! OpenAI-compatible HTTP client, a retrying wrapper for transient
//! transport failures, and a scripted mock for tests.

pub mod client;
pub mod config;
pub mod mock;
pub mod openai;
pub mod retry;

pub use client::{ChatMessage, LlmClient, LlmRequest, LlmResponse, Role, TokenUsage};
pub use config::{LlmConfig, build_llm_client};
pub use mock::MockLlmClient;
pub use openai::OpenAiClient;
pub use retry::{RetryConfig, RetryingClient};
