//! Error types for trendscope

use std::time::Duration;
use thiserror::Error;

/// Result type alias for trendscope operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the library and CLI
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Operation failed: {0}")]
    Other(String),
}

/// Failure of a single fetch.
///
/// `RateLimit` is a distinguished kind of download failure: callers that only
/// care about "the network let us down" should use [`FetchError::is_download`],
/// callers that want to back off should use [`FetchError::is_rate_limit`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Caller-fixable input problem, raised before any network access
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Download failed: {0}")]
    Download(String),

    #[error("Rate limited by upstream (HTTP {status}){}", retry_hint(.retry_after))]
    RateLimit {
        status: u16,
        retry_after: Option<Duration>,
    },

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

fn retry_hint(retry_after: &Option<Duration>) -> String {
    match retry_after {
        Some(d) => format!(", retry after {}s", d.as_secs()),
        None => String::new(),
    }
}

impl FetchError {
    /// True for transport failures, including throttling.
    pub fn is_download(&self) -> bool {
        matches!(self, FetchError::Download(_) | FetchError::RateLimit { .. })
    }

    pub fn is_rate_limit(&self) -> bool {
        matches!(self, FetchError::RateLimit { .. })
    }

    /// Short machine-readable label for the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::InvalidParameter(_) => "parameter",
            FetchError::Download(_) => "download",
            FetchError::RateLimit { .. } => "rate_limit",
            FetchError::Parse(_) => "parse",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Download("Request timed out".to_string())
        } else if err.is_connect() {
            FetchError::Download("Failed to connect to upstream".to_string())
        } else {
            FetchError::Download(err.to_string())
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found. Run `trendscope config init` to create one.")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
