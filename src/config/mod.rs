//! Configuration management for trendscope

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};
use crate::lookup;

/// Default trending feed endpoint
pub const DEFAULT_FEED_URL: &str = "https://trends.google.com/trending/rss";

/// Default explore export endpoint
pub const DEFAULT_EXPORT_URL: &str = "https://trends.google.com/trends/explore/csv";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheSettings,

    #[serde(default)]
    pub network: NetworkSettings,

    #[serde(default)]
    pub batch: BatchSettings,

    #[serde(default)]
    pub defaults: Defaults,
}

/// Result cache sizing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Entry lifetime in seconds; 0 disables caching
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    #[serde(default = "default_max_size")]
    pub max_size: usize,
}

fn default_ttl_secs() -> u64 {
    300
}

fn default_max_size() -> usize {
    100
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            max_size: default_max_size(),
        }
    }
}

/// HTTP transport settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSettings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_feed_url")]
    pub feed_url: String,

    /// Endpoint serving explore exports as multi-section CSV text
    #[serde(default = "default_export_url")]
    pub export_url: String,

    /// Pace applied after the upstream starts throttling
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
}

impl NetworkSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("trendscope/{}", env!("CARGO_PKG_VERSION"))
}

fn default_feed_url() -> String {
    DEFAULT_FEED_URL.to_string()
}

fn default_export_url() -> String {
    DEFAULT_EXPORT_URL.to_string()
}

fn default_requests_per_second() -> u32 {
    5
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            feed_url: default_feed_url(),
            export_url: default_export_url(),
            requests_per_second: default_requests_per_second(),
        }
    }
}

/// Batch scheduling defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSettings {
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Pause between targets in serial mode
    #[serde(default)]
    pub delay_ms: u64,
}

fn default_max_concurrent() -> usize {
    5
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
            delay_ms: 0,
        }
    }
}

/// Defaults for command-line flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default = "default_geo")]
    pub geo: String,

    #[serde(default = "default_max_articles")]
    pub max_articles: usize,
}

fn default_geo() -> String {
    "US".to_string()
}

fn default_max_articles() -> usize {
    5
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            geo: default_geo(),
            max_articles: default_max_articles(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".trendscope").join("config.yaml"))
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound.into());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;
        config.validate()?;

        Ok(config)
    }

    /// Load from `path` (or the default path), falling back to defaults when
    /// the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };

        match Self::load_from(&path) {
            Err(crate::error::Error::Config(ConfigError::NotFound)) => {
                log::debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(path, contents)?;

        // Set file permissions to 600 on Unix systems
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(path, perms)?;
        }

        Ok(())
    }

    /// Reject values that would make the client unusable
    pub fn validate(&self) -> Result<()> {
        let invalid =
            |msg: &str| -> Result<()> { Err(ConfigError::Invalid(msg.to_string()).into()) };

        if self.cache.max_size == 0 {
            return invalid("cache.max_size must be at least 1");
        }
        if self.network.timeout_secs == 0 {
            return invalid("network.timeout_secs must be at least 1");
        }
        if self.network.requests_per_second == 0 {
            return invalid("network.requests_per_second must be at least 1");
        }
        if self.network.feed_url.trim().is_empty() || self.network.export_url.trim().is_empty() {
            return invalid("network.feed_url and network.export_url must not be empty");
        }
        if self.batch.max_concurrent == 0 {
            return invalid("batch.max_concurrent must be at least 1");
        }
        if let Err(e) = lookup::validate_geo(&self.defaults.geo) {
            return Err(ConfigError::Invalid(format!("defaults.geo: {}", e)).into());
        }

        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch.delay_ms)
    }
}
