//! Video metadata retrieval
//!
//! This module defines the network boundary of the estimator. A
//! [`MetadataSource`] takes one [`Batch`] of identifiers and returns the
//! provider's response for it. The aggregator only sees this trait, so the
//! real HTTP client and the test mock are interchangeable.
//!
//! # Sources
//!
//! - **YouTube**: YouTube Data API v3 `videos` endpoint over HTTPS
//! - **Mock**: In-memory durations with configurable delays and failures
//!
//! # Response format
//!
//! ```json
//! {
//!   "items": [
//!     { "id": "dQw4w9WgXcQ", "contentDetails": { "duration": "PT3M33S" } }
//!   ]
//! }
//! ```
//!
//! Videos that were removed or made private are simply absent from `items`.

pub mod batch;
pub mod mock;
pub mod youtube;

pub use batch::{plan, plan_with_size, Batch, MAX_BATCH_SIZE};

use crate::error::FetchError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Provider response for one batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

/// One video in a provider response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub content_details: Option<ContentDetails>,
}

/// Content details of a video
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentDetails {
    /// ISO-8601 duration, e.g. `PT4M13S`
    #[serde(default)]
    pub duration: Option<String>,
}

impl VideoItem {
    /// Build an item with the given id and duration
    pub fn with_duration(id: impl Into<String>, duration: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            content_details: Some(ContentDetails {
                duration: Some(duration.into()),
            }),
        }
    }

    pub fn duration(&self) -> Option<&str> {
        self.content_details
            .as_ref()
            .and_then(|details| details.duration.as_deref())
    }
}

impl VideoListResponse {
    /// Decode a response body
    pub fn from_slice(body: &[u8]) -> Result<Self, FetchError> {
        serde_json::from_slice(body).map_err(|e| FetchError::Malformed(e.to_string()))
    }
}

/// Network boundary: fetch metadata for one batch
///
/// # Thread Safety
///
/// Sources are shared between concurrent batch tasks behind an `Arc`, so they
/// must be `Send + Sync`.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Fetch durations for every identifier in `batch`
    async fn fetch_batch(&self, batch: &Batch) -> Result<VideoListResponse, FetchError>;

    /// Short name used in log lines
    fn name(&self) -> &str;
}
