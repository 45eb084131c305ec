//! Configuration management for labelsync CLI
//!
//! Settings are resolved from built-in defaults, then environment variables,
//! then command-line flags (applied by the commands through the setters).

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ============================================================================
// CLI Configuration Constants
// ============================================================================

/// Default number of concurrently running transfers.
pub const DEFAULT_PARALLEL: usize = 2;

/// Default timeout for a single HTTP request in seconds.
/// Can be overridden via LABELSYNC_HTTP_TIMEOUT_SECS.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 300;

/// Default region for S3-compatible stores.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Endpoint of the GCS S3-interoperability (XML) API.
pub const GCS_INTEROP_ENDPOINT: &str = "https://storage.googleapis.com";

/// Transfer pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Admission gate capacity
    pub parallel: usize,

    /// Per-operation deadline; `None` means no deadline
    pub operation_timeout: Option<Duration>,

    /// Timeout applied by the HTTP client to each request
    pub http_timeout: Duration,

    /// User agent sent with downloads
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            parallel: DEFAULT_PARALLEL,
            operation_timeout: None,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            user_agent: format!("labelsync/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    /// Load config from environment variables
    ///
    /// - `LABELSYNC_PARALLEL`: admission gate capacity
    /// - `LABELSYNC_OPERATION_TIMEOUT_SECS`: per-operation timeout (0 = off)
    /// - `LABELSYNC_HTTP_TIMEOUT_SECS`: HTTP client timeout
    /// - `LABELSYNC_USER_AGENT`: HTTP user agent
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(parallel) = env_parse::<usize>("LABELSYNC_PARALLEL")? {
            config.set_parallel(parallel)?;
        }

        if let Some(secs) = env_parse::<u64>("LABELSYNC_OPERATION_TIMEOUT_SECS")? {
            config.set_operation_timeout_secs(secs);
        }

        if let Some(secs) = env_parse::<u64>("LABELSYNC_HTTP_TIMEOUT_SECS")? {
            config.http_timeout = Duration::from_secs(secs);
        }

        if let Ok(agent) = std::env::var("LABELSYNC_USER_AGENT") {
            config.user_agent = agent;
        }

        Ok(config)
    }

    /// Set the admission gate capacity; zero is rejected
    pub fn set_parallel(&mut self, parallel: usize) -> Result<()> {
        if parallel == 0 {
            return Err(CliError::config("parallel must be at least 1"));
        }
        self.parallel = parallel;
        Ok(())
    }

    /// Set the per-operation timeout; zero turns it off
    pub fn set_operation_timeout_secs(&mut self, secs: u64) {
        self.operation_timeout = (secs > 0).then(|| Duration::from_secs(secs));
    }
}

/// Connection settings for S3-compatible object stores
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    pub endpoint: Option<String>,
    pub region: String,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub path_style: bool,
}

impl StorageConfig {
    /// Read connection settings from the environment.
    ///
    /// Without static keys the default AWS credential chain is used.
    pub fn from_env() -> Self {
        Self {
            endpoint: first_env(&["LABELSYNC_S3_ENDPOINT", "S3_ENDPOINT"]),
            region: first_env(&["AWS_REGION", "S3_REGION"])
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
            access_key: first_env(&["S3_ACCESS_KEY", "AWS_ACCESS_KEY_ID"]),
            secret_key: first_env(&["S3_SECRET_KEY", "AWS_SECRET_ACCESS_KEY"]),
            path_style: std::env::var("S3_PATH_STYLE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }

    /// Settings for Google Cloud Storage through its S3-compatible API.
    ///
    /// Uses HMAC keys from `GCS_HMAC_ACCESS_KEY`/`GCS_HMAC_SECRET` when set,
    /// falling back to the S3 variables.
    pub fn for_gcs() -> Self {
        let base = Self::from_env();
        Self {
            endpoint: Some(GCS_INTEROP_ENDPOINT.to_string()),
            region: "auto".to_string(),
            access_key: std::env::var("GCS_HMAC_ACCESS_KEY").ok().or(base.access_key),
            secret_key: std::env::var("GCS_HMAC_SECRET").ok().or(base.secret_key),
            path_style: true,
        }
    }

    /// Static credentials, when both halves are configured
    pub fn static_credentials(&self) -> Option<(&str, &str)> {
        match (&self.access_key, &self.secret_key) {
            (Some(access), Some(secret)) => Some((access.as_str(), secret.as_str())),
            _ => None,
        }
    }
}

fn first_env(names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| std::env::var(name).ok())
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| CliError::config(format!("{} has an invalid value: '{}'", name, raw))),
        Err(_) => Ok(None),
    }
}
