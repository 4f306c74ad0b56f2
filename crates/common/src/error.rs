//! Error types for trendcast.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrendcastError {
    /// The text-generation capability failed before producing a usable response.
    #[error("Generation error: {0}")]
    Generation(String),

    /// The provider answered with a non-success HTTP status.
    #[error("Provider error {status}: {body}")]
    Provider { status: u16, body: String },

    /// Every trend-scout attempt repeated a tag from the exclusion list.
    #[error("Trend scout gave up after {attempts} attempts; last response repeated '{last_match}'")]
    ExclusionRetriesExhausted { attempts: u32, last_match: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TrendcastError {
    /// Whether retrying the same generation request could succeed.
    ///
    /// Rate limiting and server-side failures are transient; authentication
    /// and malformed-request errors are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Provider { status, .. } => *status == 429 || (500..=599).contains(status),
            Self::Generation(msg) => {
                let lower = msg.to_lowercase();
                lower.contains("timed out")
                    || lower.contains("connection")
                    || lower.contains("request failed")
            }
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, TrendcastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_and_server_errors_are_transient() {
        for status in [429, 500, 502, 503, 504] {
            let err = TrendcastError::Provider {
                status,
                body: String::new(),
            };
            assert!(err.is_transient(), "status {status} should be transient");
        }
    }

    #[test]
    fn auth_and_request_errors_are_not_transient() {
        for status in [400, 401, 403, 404] {
            let err = TrendcastError::Provider {
                status,
                body: "nope".into(),
            };
            assert!(!err.is_transient(), "status {status} should not be transient");
        }
        assert!(!TrendcastError::Config("bad".into()).is_transient());
    }

    #[test]
    fn transport_failures_are_transient() {
        let err = TrendcastError::Generation("OpenAI request failed: connection reset".into());
        assert!(err.is_transient());
        let err = TrendcastError::Generation("No choices in OpenAI response".into());
        assert!(!err.is_transient());
    }

    #[test]
    fn exhausted_error_names_the_repeated_tag() {
        let err = TrendcastError::ExclusionRetriesExhausted {
            attempts: 5,
            last_match: "Remote audit adoption".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("5 attempts"));
        assert!(msg.contains("Remote audit adoption"));
    }
}
