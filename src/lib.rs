//! watchtime - Watch-history watch time estimator
//!
//! watchtime estimates how long someone has spent watching videos, given the
//! watch-history export of their account. Looking up every video would take
//! thousands of metadata requests, so it draws a random sample, fetches the
//! durations of the sample in batches, and scales the result up to the whole
//! history.
//!
//! # Architecture
//!
//! - **history**: Export parsing, video identifiers, per-year counts
//! - **sampling**: Sample sizing and uniform sampling without replacement
//! - **fetch**: Batch planning and the metadata provider boundary
//! - **stats**: Concurrent batch aggregation and extrapolation
//! - **coordinator**: One estimation end to end
//! - **service**: HTTP upload endpoint
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use watchtime::coordinator::Estimator;
//! use watchtime::fetch::youtube::{YouTubeClient, DEFAULT_ENDPOINT};
//! use watchtime::history::load_history;
//! use watchtime::Config;
//!
//! # async fn run() -> watchtime::Result<()> {
//! let config = Config::default();
//! let client = YouTubeClient::new(DEFAULT_ENDPOINT, "API_KEY", config.fetch.timeout())?;
//! let entries = load_history(std::path::Path::new("watch-history.json"))?;
//!
//! let mut estimator = Estimator::from_config(&config, Arc::new(client), CancellationToken::new());
//! let report = estimator.estimate(entries).await?;
//! println!("{}s", report.total_estimated_duration);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod coordinator;
pub mod duration;
pub mod error;
pub mod fetch;
pub mod history;
pub mod output;
pub mod sampling;
pub mod service;
pub mod stats;
pub mod util;

// Re-export commonly used types
pub use config::Config;
pub use coordinator::{EstimationReport, Estimator};
pub use error::{EstimateError, FetchError};

/// Result type used throughout watchtime
pub type Result<T> = anyhow::Result<T>;
