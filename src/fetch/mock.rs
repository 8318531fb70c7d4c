//! Mock metadata source for testing
//!
//! Serves durations from memory without touching the network, so estimator
//! tests are fast and deterministic.
//!
//! # Features
//!
//! - Per-identifier durations with an optional fallback
//! - Identifiers with no duration are omitted from the response (removed video)
//! - Per-batch artificial delays to reorder completions
//! - Per-batch failures
//! - Records every requested batch for verification
//!
//! # Example
//!
//! ```
//! use watchtime::fetch::{Batch, MetadataSource};
//! use watchtime::fetch::mock::MockSource;
//!
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! rt.block_on(async {
//!     let source = MockSource::new().with_default_duration("PT10M");
//!     let batch = Batch { index: 0, ids: vec!["a".into()] };
//!     let response = source.fetch_batch(&batch).await.unwrap();
//!     assert_eq!(response.items[0].duration(), Some("PT10M"));
//! });
//! ```

use super::{Batch, MetadataSource, VideoItem, VideoListResponse};
use crate::error::FetchError;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// In-memory metadata source
#[derive(Clone, Default)]
pub struct MockSource {
    /// Duration string per identifier
    durations: Arc<Mutex<HashMap<String, String>>>,

    /// Duration used for identifiers without an explicit entry
    default_duration: Option<String>,

    /// Batch indices that fail
    failing_batches: Arc<Mutex<HashSet<usize>>>,

    /// Artificial latency per batch index
    delays: Arc<Mutex<HashMap<usize, Duration>>>,

    /// Batch indices in the order they were requested
    requested: Arc<Mutex<Vec<usize>>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `duration` for every identifier without an explicit entry
    pub fn with_default_duration(mut self, duration: impl Into<String>) -> Self {
        self.default_duration = Some(duration.into());
        self
    }

    /// Set the duration string served for `id`
    pub fn set_duration(&self, id: impl Into<String>, duration: impl Into<String>) {
        self.durations.lock().unwrap().insert(id.into(), duration.into());
    }

    /// Make the batch at `index` fail with a transport error
    pub fn fail_batch(&self, index: usize) {
        self.failing_batches.lock().unwrap().insert(index);
    }

    /// Delay the response for the batch at `index`
    pub fn delay_batch(&self, index: usize, delay: Duration) {
        self.delays.lock().unwrap().insert(index, delay);
    }

    /// Batch indices requested so far
    pub fn requested_batches(&self) -> Vec<usize> {
        self.requested.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requested.lock().unwrap().len()
    }
}

#[async_trait]
impl MetadataSource for MockSource {
    async fn fetch_batch(&self, batch: &Batch) -> Result<VideoListResponse, FetchError> {
        self.requested.lock().unwrap().push(batch.index);

        let delay = self.delays.lock().unwrap().get(&batch.index).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing_batches.lock().unwrap().contains(&batch.index) {
            return Err(FetchError::Transport(format!("mock failure for batch {}", batch.index)));
        }

        let durations = self.durations.lock().unwrap();
        let items = batch
            .ids
            .iter()
            .filter_map(|id| {
                durations
                    .get(id.as_str())
                    .or(self.default_duration.as_ref())
                    .map(|duration| VideoItem::with_duration(id.as_str(), duration.as_str()))
            })
            .collect();

        Ok(VideoListResponse { items })
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(index: usize, ids: &[&str]) -> Batch {
        Batch {
            index,
            ids: ids.iter().map(|id| (*id).into()).collect(),
        }
    }

    #[tokio::test]
    async fn test_default_and_explicit_durations() {
        let source = MockSource::new().with_default_duration("PT1M");
        source.set_duration("long", "P1D");

        let response = source.fetch_batch(&batch(0, &["a", "long"])).await.unwrap();
        assert_eq!(response.items[0].duration(), Some("PT1M"));
        assert_eq!(response.items[1].duration(), Some("P1D"));
    }

    #[tokio::test]
    async fn test_unknown_ids_omitted() {
        let source = MockSource::new();
        source.set_duration("known", "PT5S");

        let response = source.fetch_batch(&batch(0, &["known", "removed"])).await.unwrap();
        assert_eq!(response.items.len(), 1);
        assert_eq!(response.items[0].id.as_deref(), Some("known"));
    }

    #[tokio::test]
    async fn test_failing_batch() {
        let source = MockSource::new();
        source.fail_batch(1);

        assert!(source.fetch_batch(&batch(0, &["a"])).await.is_ok());
        assert!(source.fetch_batch(&batch(1, &["b"])).await.is_err());
        assert_eq!(source.requested_batches(), vec![0, 1]);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let source = MockSource::new();
        let clone = source.clone();

        clone.fetch_batch(&batch(4, &[])).await.unwrap();
        assert_eq!(source.request_count(), 1);
    }
}
