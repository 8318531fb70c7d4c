//! Configuration module
//!
//! Handles CLI argument parsing, TOML configuration files, and validation.

pub mod cli;
pub mod cli_convert;
pub mod toml;
pub mod validator;

use crate::sampling::{SampleSizePolicy, DEFAULT_CENSUS_THRESHOLD, DEFAULT_MARGIN_ERROR};
use crate::fetch::MAX_BATCH_SIZE;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Complete estimator configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sampling: SamplingConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub service: ServiceConfig,
}

/// Sample sizing parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Populations below this size are looked up in full
    #[serde(default = "default_census_threshold")]
    pub census_threshold: usize,
    /// Margin of error (0.0-1.0), smaller means a larger sample
    #[serde(default = "default_margin_error")]
    pub margin_error: f64,
    /// Fixed RNG seed for reproducible samples
    pub seed: Option<u64>,
    /// Identifiers per metadata request (1-50)
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_census_threshold() -> usize {
    DEFAULT_CENSUS_THRESHOLD
}

fn default_margin_error() -> f64 {
    DEFAULT_MARGIN_ERROR
}

fn default_batch_size() -> usize {
    MAX_BATCH_SIZE
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            census_threshold: default_census_threshold(),
            margin_error: default_margin_error(),
            seed: None,
            batch_size: default_batch_size(),
        }
    }
}

impl SamplingConfig {
    pub fn policy(&self) -> SampleSizePolicy {
        SampleSizePolicy::new(self.census_threshold, self.margin_error)
    }
}

/// What to do when a metadata batch fails
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Fail the whole estimation on the first failed batch
    #[default]
    Abort,
    /// Count the failed batch's videos as unresolved and continue
    Degrade,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Abort => write!(f, "abort"),
            Self::Degrade => write!(f, "degrade"),
        }
    }
}

/// Metadata provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Videos endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Provider API key
    pub api_key: Option<String>,
    /// Per-batch timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Maximum batches in flight at once
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_batches: usize,
    /// Batch failure handling
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

fn default_endpoint() -> String {
    crate::fetch::youtube::DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_concurrent() -> usize {
    16
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            max_concurrent_batches: default_max_concurrent(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Report output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Print the report as JSON instead of text
    #[serde(default)]
    pub json: bool,
    /// Also write the JSON report to this file
    pub json_output: Option<PathBuf>,
}

/// Upload service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,
    /// Origin allowed by CORS (the frontend's URL)
    pub allow_origin: Option<String>,
    /// Largest accepted upload in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_listen() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_max_upload_bytes() -> usize {
    64 * 1024 * 1024
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            allow_origin: None,
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.sampling.census_threshold, 300);
        assert_eq!(config.sampling.margin_error, 0.03);
        assert_eq!(config.sampling.batch_size, 50);
        assert_eq!(config.fetch.failure_policy, FailurePolicy::Abort);
        assert_eq!(config.fetch.timeout(), Duration::from_secs(30));
        assert!(!config.output.json);
    }

    #[test]
    fn test_policy_from_sampling_config() {
        let sampling = SamplingConfig { census_threshold: 400, margin_error: 0.02, ..Default::default() };
        let policy = sampling.policy();
        assert_eq!(policy.census_threshold, 400);
        assert_eq!(policy.margin_error, 0.02);
    }

    #[test]
    fn test_failure_policy_display() {
        assert_eq!(FailurePolicy::Abort.to_string(), "abort");
        assert_eq!(FailurePolicy::Degrade.to_string(), "degrade");
    }
}
