//! Configuration schema.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigResult};

/// Ledger host used when none is configured.
pub const DEFAULT_HOST: &str = "https://app.provenant.dev";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Ledger connection configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Changelog configuration.
    #[serde(default)]
    pub changelog: ChangelogConfig,
}

/// Ledger connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Base URL of the ledger service.
    #[serde(default = "default_host")]
    pub host: String,

    /// Organization that owns the pipelines.
    #[serde(default)]
    pub owner: Option<String>,

    /// API token. Prefer the `PROVENANT_API_TOKEN` environment variable.
    #[serde(default)]
    pub api_token: Option<String>,

    /// How many times a failed request is retried.
    #[serde(default = "default_max_api_retries")]
    pub max_api_retries: u32,

    /// Seconds allowed for each request attempt.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            owner: None,
            api_token: None,
            max_api_retries: default_max_api_retries(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl LedgerConfig {
    /// Returns the owner and API token, which every ledger call needs.
    ///
    /// # Errors
    ///
    /// Returns an error if either value is missing or blank.
    pub fn credentials(&self) -> ConfigResult<(&str, &str)> {
        let owner = non_blank(self.owner.as_deref())
            .ok_or_else(|| ConfigError::Invalid("ledger owner is required".to_string()))?;
        let token = non_blank(self.api_token.as_deref())
            .ok_or_else(|| ConfigError::Invalid("ledger API token is required".to_string()))?;
        Ok((owner, token))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_max_api_retries() -> u32 {
    3
}

fn default_timeout_secs() -> u64 {
    30
}

/// What to report when no earlier artifact exists for a fingerprint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HistoryCutoff {
    /// Report only the commit that produced the artifact.
    #[default]
    CurrentCommit,

    /// Report every commit reachable from the current one.
    FullHistory,
}

/// Changelog configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangelogConfig {
    /// Changelog cutoff for first-ever artifacts.
    #[serde(default)]
    pub cutoff: HistoryCutoff,

    /// Remote used to build the repository URL.
    #[serde(default = "default_remote")]
    pub remote: String,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            cutoff: HistoryCutoff::default(),
            remote: default_remote(),
        }
    }
}

fn default_remote() -> String {
    "origin".to_string()
}
