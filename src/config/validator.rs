//! Configuration validation

use super::*;
use crate::fetch::MAX_BATCH_SIZE;
use anyhow::{Context, Result};
use std::net::SocketAddr;

/// Validate complete configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_sampling(&config.sampling)?;
    validate_fetch(&config.fetch)?;
    validate_service(&config.service)?;
    Ok(())
}

/// Validate sampling configuration
pub fn validate_sampling(sampling: &SamplingConfig) -> Result<()> {
    if !(sampling.margin_error > 0.0 && sampling.margin_error < 1.0) {
        anyhow::bail!(
            "margin_error must be between 0.0 and 1.0 (exclusive), got {}",
            sampling.margin_error
        );
    }

    if sampling.batch_size == 0 || sampling.batch_size > MAX_BATCH_SIZE {
        anyhow::bail!(
            "batch_size must be between 1 and {}, got {}",
            MAX_BATCH_SIZE,
            sampling.batch_size
        );
    }

    Ok(())
}

/// Validate provider configuration
pub fn validate_fetch(fetch: &FetchConfig) -> Result<()> {
    reqwest::Url::parse(&fetch.endpoint)
        .with_context(|| format!("Invalid endpoint URL: {}", fetch.endpoint))?;

    if fetch.timeout_secs == 0 {
        anyhow::bail!("timeout_secs must be at least 1");
    }

    if fetch.max_concurrent_batches == 0 {
        anyhow::bail!("max_concurrent_batches must be at least 1");
    }

    if let Some(ref key) = fetch.api_key {
        if key.trim().is_empty() {
            anyhow::bail!("api_key is empty");
        }
    }

    Ok(())
}

/// Validate service configuration
pub fn validate_service(service: &ServiceConfig) -> Result<()> {
    service
        .listen
        .parse::<SocketAddr>()
        .with_context(|| format!("Invalid listen address: {}", service.listen))?;

    if service.max_upload_bytes == 0 {
        anyhow::bail!("max_upload_bytes must be at least 1");
    }

    Ok(())
}

/// Ensure an API key is available before calling the provider
pub fn require_api_key(fetch: &FetchConfig) -> Result<&str> {
    fetch
        .api_key
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("no API key: pass --api-key, set API_KEY, or add fetch.api_key to the config file"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_margin_error_bounds() {
        let mut sampling = SamplingConfig::default();
        for bad in [0.0, -0.1, 1.0, 2.0, f64::NAN] {
            sampling.margin_error = bad;
            assert!(validate_sampling(&sampling).is_err(), "accepted margin {}", bad);
        }
        sampling.margin_error = 0.02;
        assert!(validate_sampling(&sampling).is_ok());
    }

    #[test]
    fn test_batch_size_bounds() {
        let mut sampling = SamplingConfig::default();
        sampling.batch_size = 0;
        assert!(validate_sampling(&sampling).is_err());
        sampling.batch_size = 51;
        assert!(validate_sampling(&sampling).is_err());
        sampling.batch_size = 1;
        assert!(validate_sampling(&sampling).is_ok());
    }

    #[test]
    fn test_fetch_validation() {
        let mut fetch = FetchConfig::default();
        fetch.endpoint = "not a url".to_string();
        assert!(validate_fetch(&fetch).is_err());

        let mut fetch = FetchConfig::default();
        fetch.max_concurrent_batches = 0;
        assert!(validate_fetch(&fetch).is_err());

        let mut fetch = FetchConfig::default();
        fetch.api_key = Some("   ".to_string());
        assert!(validate_fetch(&fetch).is_err());
    }

    #[test]
    fn test_listen_address() {
        let mut service = ServiceConfig::default();
        service.listen = "localhost".to_string();
        assert!(validate_service(&service).is_err());
    }

    #[test]
    fn test_require_api_key() {
        let mut fetch = FetchConfig::default();
        assert!(require_api_key(&fetch).is_err());
        fetch.api_key = Some("k".to_string());
        assert_eq!(require_api_key(&fetch).unwrap(), "k");
    }
}
