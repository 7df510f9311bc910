//! Remote management
//!
//! Remotes are named references to S3-compatible endpoints reached without
//! credentials. A remote only describes where and how to connect; it never
//! carries keys.

use serde::{Deserialize, Serialize};

use crate::config::ConfigManager;
use crate::error::{Error, Result};

/// Retry configuration for a remote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Initial backoff duration in milliseconds
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff duration in milliseconds
    #[serde(default = "default_max_backoff")]
    pub max_backoff_ms: u64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_backoff() -> u64 {
    100
}

fn default_max_backoff() -> u64 {
    10000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff(),
            max_backoff_ms: default_max_backoff(),
        }
    }
}

/// Timeout configuration for a remote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Connection timeout in milliseconds
    #[serde(default = "default_connect_timeout")]
    pub connect_ms: u64,

    /// Read timeout in milliseconds
    #[serde(default = "default_read_timeout")]
    pub read_ms: u64,
}

fn default_connect_timeout() -> u64 {
    5000
}

fn default_read_timeout() -> u64 {
    30000
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_ms: default_connect_timeout(),
            read_ms: default_read_timeout(),
        }
    }
}

/// How bucket names are placed in request URLs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketLookup {
    /// Path style unless the endpoint is known to need virtual hosts
    #[default]
    Auto,
    /// `https://endpoint/bucket/key`
    Path,
    /// `https://bucket.endpoint/key`
    Dns,
}

impl BucketLookup {
    pub fn force_path_style(self) -> bool {
        matches!(self, BucketLookup::Auto | BucketLookup::Path)
    }
}

impl std::str::FromStr for BucketLookup {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "auto" => Ok(Self::Auto),
            "path" => Ok(Self::Path),
            "dns" => Ok(Self::Dns),
            other => Err(Error::Config(format!(
                "Unknown bucket lookup '{other}'. Expected: auto, path or dns"
            ))),
        }
    }
}

impl std::fmt::Display for BucketLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Path => "path",
            Self::Dns => "dns",
        })
    }
}

/// A named, credential-free S3-compatible endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remote {
    /// Unique name for this remote
    pub name: String,

    /// Endpoint URL
    pub endpoint: String,

    /// Region used for request routing
    #[serde(default = "default_region")]
    pub region: String,

    /// Bucket lookup style
    #[serde(default)]
    pub bucket_lookup: BucketLookup,

    /// Retry configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryConfig>,

    /// Timeout configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<TimeoutConfig>,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl Remote {
    /// Create a new remote with default settings
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            region: default_region(),
            bucket_lookup: BucketLookup::default(),
            retry: None,
            timeout: None,
        }
    }

    /// Check the name and endpoint
    pub fn validate(&self) -> Result<()> {
        if !is_valid_remote_name(&self.name) {
            return Err(Error::Config(format!(
                "Invalid remote name '{}'. Use letters, digits, '-' or '_'",
                self.name
            )));
        }

        let url = url::Url::parse(&self.endpoint)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "Unsupported endpoint scheme '{}'. Expected http or https",
                url.scheme()
            )));
        }

        Ok(())
    }

    /// Get the effective retry configuration
    pub fn retry_config(&self) -> RetryConfig {
        self.retry.clone().unwrap_or_default()
    }

    /// Get the effective timeout configuration
    pub fn timeout_config(&self) -> TimeoutConfig {
        self.timeout.clone().unwrap_or_default()
    }
}

/// Check if a string is a valid remote name
pub(crate) fn is_valid_remote_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Manager for remote operations
pub struct RemoteManager {
    config_manager: ConfigManager,
}

impl RemoteManager {
    /// Create a new RemoteManager with a specific ConfigManager
    pub fn with_config_manager(config_manager: ConfigManager) -> Self {
        Self { config_manager }
    }

    /// Create a new RemoteManager using the default config location
    pub fn new() -> Result<Self> {
        let config_manager = ConfigManager::new()?;
        Ok(Self { config_manager })
    }

    /// List all configured remotes
    pub fn list(&self) -> Result<Vec<Remote>> {
        let config = self.config_manager.load()?;
        Ok(config.remotes)
    }

    /// Get a remote by name
    pub fn get(&self, name: &str) -> Result<Remote> {
        let config = self.config_manager.load()?;
        config
            .remotes
            .into_iter()
            .find(|r| r.name == name)
            .ok_or_else(|| Error::RemoteNotFound(name.to_string()))
    }

    /// Add or update a remote
    pub fn set(&self, remote: Remote) -> Result<()> {
        remote.validate()?;

        let mut config = self.config_manager.load()?;

        config.remotes.retain(|r| r.name != remote.name);
        config.remotes.push(remote);

        self.config_manager.save(&config)
    }

    /// Remove a remote
    pub fn remove(&self, name: &str) -> Result<()> {
        let mut config = self.config_manager.load()?;
        let original_len = config.remotes.len();

        config.remotes.retain(|r| r.name != name);

        if config.remotes.len() == original_len {
            return Err(Error::RemoteNotFound(name.to_string()));
        }

        self.config_manager.save(&config)
    }

    /// Check if a remote exists
    pub fn exists(&self, name: &str) -> Result<bool> {
        let config = self.config_manager.load()?;
        Ok(config.remotes.iter().any(|r| r.name == name))
    }
}
