//! Campaign configuration.
//!
//! Loaded once at startup from a TOML file (path in `TRENDCAST_CONFIG`) or
//! taken from defaults. Every section is optional.
//!
//! ```toml
//! [llm]
//! model = "gpt-4o"
//!
//! [trend_scout]
//! exclusion_tags = ["Remote audit adoption"]
//! max_attempts = 5
//!
//! [content]
//! hooks = ["Ask a provocative question about one of the trends."]
//! seed = 7
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;
use trendcast_common::{Result, TrendcastError};
use trendcast_llm::LlmConfig;

use crate::content_creator::ContentConfig;
use crate::trend_scout::TrendScoutConfig;

pub const CONFIG_ENV: &str = "TRENDCAST_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignConfig {
    pub llm: LlmConfig,
    pub trend_scout: TrendScoutConfig,
    pub content: ContentConfig,
}

impl CampaignConfig {
    /// Load from a TOML file after checking its permissions.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        #[cfg(unix)]
        validate_config_file_permissions(path)?;

        let config = Self::from_file_unchecked(path)?;

        if config.llm.api_key.is_some() {
            warn!(
                "API key found in config file '{}'. Prefer the OPENAI_API_KEY environment variable.",
                path.display()
            );
        }

        Ok(config)
    }

    /// Load from a TOML file without permission checks.
    pub fn from_file_unchecked(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            TrendcastError::Config(format!("Failed to read '{}': {e}", path.display()))
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            TrendcastError::Config(msg) => {
                TrendcastError::Config(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| TrendcastError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Config file named by `TRENDCAST_CONFIG`, or defaults when unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.llm.validate()?;
        self.trend_scout.validate()?;
        self.content.validate()
    }
}

/// Reject config files that are not regular files, are world-writable, or
/// expose an API key to every user.
#[cfg(unix)]
fn validate_config_file_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = std::fs::symlink_metadata(path).map_err(|e| {
        TrendcastError::Config(format!("Failed to read config file '{}': {e}", path.display()))
    })?;

    if !metadata.is_file() {
        return Err(TrendcastError::Config(format!(
            "Config path '{}' is not a regular file",
            path.display()
        )));
    }

    let mode = metadata.permissions().mode() & 0o777;

    if mode & 0o002 != 0 {
        return Err(TrendcastError::Config(format!(
            "Config file '{}' is world-writable (mode {mode:04o}); fix with: chmod o-w {}",
            path.display(),
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path)?;
    let has_api_key = content
        .lines()
        .any(|line| line.trim_start().starts_with("api_key"));

    if has_api_key && mode & 0o004 != 0 {
        return Err(TrendcastError::Config(format!(
            "Config file '{}' contains an API key but is world-readable (mode {mode:04o}); fix with: chmod 600 {}",
            path.display(),
            path.display()
        )));
    }

    Ok(())
}
