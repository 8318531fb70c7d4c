//! TOML configuration file parsing
//!
//! ```toml
//! [sampling]
//! margin_error = 0.025
//! census_threshold = 400
//!
//! [fetch]
//! failure_policy = "degrade"
//! timeout_secs = 15
//!
//! [service]
//! listen = "0.0.0.0:8080"
//! allow_origin = "https://example.com"
//! ```

use super::*;
use crate::config::cli::Cli;
use crate::config::cli_convert::convert_failure_policy;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse TOML configuration file
pub fn parse_toml_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML configuration from string
pub fn parse_toml_string(contents: &str) -> Result<Config> {
    let config: Config = ::toml::from_str(contents)
        .context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Merge CLI arguments with TOML configuration (CLI takes precedence)
pub fn merge_cli_with_config(cli: &Cli, mut config: Config) -> Config {
    // Sampling
    if let Some(margin) = cli.margin_error {
        config.sampling.margin_error = margin;
    }
    if let Some(threshold) = cli.census_threshold {
        config.sampling.census_threshold = threshold;
    }
    if let Some(batch_size) = cli.batch_size {
        config.sampling.batch_size = batch_size;
    }
    if cli.seed.is_some() {
        config.sampling.seed = cli.seed;
    }

    // Provider
    if let Some(ref key) = cli.api_key {
        config.fetch.api_key = Some(key.clone());
    }
    if let Some(ref endpoint) = cli.endpoint {
        config.fetch.endpoint = endpoint.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.fetch.timeout_secs = timeout;
    }
    if let Some(max) = cli.max_concurrent {
        config.fetch.max_concurrent_batches = max;
    }
    if let Some(policy) = cli.failure_policy {
        config.fetch.failure_policy = convert_failure_policy(policy);
    }

    // Output
    if cli.json {
        config.output.json = true;
    }
    if let Some(ref path) = cli.json_output {
        config.output.json_output = Some(path.clone());
    }

    // Service
    if let Some(ref listen) = cli.listen {
        config.service.listen = listen.clone();
    }
    if let Some(ref origin) = cli.allow_origin {
        config.service.allow_origin = Some(origin.clone());
    }

    config
}

/// Build the effective configuration from the CLI and optional config file
pub fn load_config(cli: &Cli) -> Result<Config> {
    let base = match cli.config {
        Some(ref path) => parse_toml_file(path)?,
        None => Config::default(),
    };

    Ok(merge_cli_with_config(cli, base))
}
