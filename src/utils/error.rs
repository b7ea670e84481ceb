use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RefreshError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{status_text}")]
    Status { code: u16, status_text: String },

    #[error("connection error: {message}")]
    Connection { message: String },

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfig { field: String },
}

/// Per-token failure classes reported in the run log and the JSON report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The endpoint could not be reached (DNS, refused, reset, timeout).
    Transport,
    /// The endpoint answered with a non-success status.
    Application,
    /// A success status carried a body that is not JSON.
    Parse,
    /// The request could not be built from the configuration.
    Configuration,
}

impl RefreshError {
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            RefreshError::Request(e) if e.is_decode() => FailureKind::Parse,
            RefreshError::Request(_) | RefreshError::Connection { .. } => FailureKind::Transport,
            RefreshError::Status { .. } => FailureKind::Application,
            RefreshError::Decode(_) => FailureKind::Parse,
            RefreshError::Io(_)
            | RefreshError::Config { .. }
            | RefreshError::InvalidConfigValue { .. }
            | RefreshError::MissingConfig { .. } => FailureKind::Configuration,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            RefreshError::Request(_) | RefreshError::Connection { .. } => {
                "Check network connectivity and the --base-url value, then rerun the affected token IDs".to_string()
            }
            RefreshError::Status { code: 429, .. } => {
                "The API is rate limiting requests; rerun the failed range later".to_string()
            }
            RefreshError::Status { code: 401 | 403, .. } => {
                "Provide a valid API key with --api-key or OPENSEA_API_KEY".to_string()
            }
            RefreshError::Status { .. } => {
                "Verify the contract address and token range exist on the marketplace".to_string()
            }
            RefreshError::Decode(_) => "The endpoint returned a non-JSON body; check --base-url".to_string(),
            RefreshError::Io(_) => "Check that the output path is writable".to_string(),
            RefreshError::Config { .. }
            | RefreshError::InvalidConfigValue { .. }
            | RefreshError::MissingConfig { .. } => {
                "Fix the configuration value and run again".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, RefreshError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_displays_status_text() {
        let err = RefreshError::Status {
            code: 404,
            status_text: "Not Found".to_string(),
        };
        assert_eq!(err.to_string(), "Not Found");
        assert_eq!(err.failure_kind(), FailureKind::Application);
    }

    #[test]
    fn test_failure_kinds() {
        let reset = RefreshError::Connection {
            message: "connection reset by peer".to_string(),
        };
        assert_eq!(reset.failure_kind(), FailureKind::Transport);

        let decode = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        assert_eq!(RefreshError::from(decode).failure_kind(), FailureKind::Parse);

        let missing = RefreshError::MissingConfig {
            field: "target.contract_address".to_string(),
        };
        assert_eq!(missing.failure_kind(), FailureKind::Configuration);
    }

    #[test]
    fn test_rate_limit_suggestion() {
        let err = RefreshError::Status {
            code: 429,
            status_text: "Too Many Requests".to_string(),
        };
        assert!(err.recovery_suggestion().contains("rate limiting"));
    }
}
