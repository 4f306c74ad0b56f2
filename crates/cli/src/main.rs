//! Trendcast campaign runner.
//!
//! Usage:
//!   trendcast [TOPIC] [PLATFORM]
//!
//! # Environment Variables
//!
//! - `OPENAI_API_KEY` - API key for the generation endpoint
//! - `TRENDCAST_CONFIG` - Path to a TOML config file (optional)
//! - `RUST_LOG` - Log filter (default: info,trendcast_agents=debug)
//!
//! A `.env` file in the working directory is loaded first.

use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trendcast_agents::{CampaignConfig, CampaignRequest, MarketingWorkflow};
use trendcast_llm::build_llm_client;

const DEFAULT_TOPIC: &str = "b2b compliance iso42001";
const DEFAULT_PLATFORM: &str = "LinkedIn";

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine.
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,trendcast_agents=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return ExitCode::SUCCESS;
    }

    let request = CampaignRequest::new(
        args.first().map(String::as_str).unwrap_or(DEFAULT_TOPIC),
        args.get(1).map(String::as_str).unwrap_or(DEFAULT_PLATFORM),
    );

    match run(request).await {
        Ok(content) => {
            println!("{content}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "Workflow failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(request: CampaignRequest) -> anyhow::Result<String> {
    let config = CampaignConfig::from_env()?;
    tracing::info!(model = %config.llm.model, "Configuration loaded");

    let llm = build_llm_client(&config.llm)?;
    let workflow = MarketingWorkflow::from_config(llm, &config)?;

    let result = workflow.run(request).await?;
    Ok(result.content)
}

fn print_help() {
    println!("Trendcast: scout current trends for a topic and draft a post about them");
    println!();
    println!("Usage: trendcast [TOPIC] [PLATFORM]");
    println!();
    println!("Arguments:");
    println!("  TOPIC       Campaign topic (default: \"{DEFAULT_TOPIC}\")");
    println!("  PLATFORM    Target platform (default: \"{DEFAULT_PLATFORM}\")");
    println!();
    println!("Environment variables:");
    println!("  OPENAI_API_KEY      API key for the generation endpoint");
    println!("  TRENDCAST_CONFIG    Path to a TOML config file");
    println!("  RUST_LOG            Log filter (default: info,trendcast_agents=debug)");
}
