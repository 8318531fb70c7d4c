//! Concurrent batch aggregation
//!
//! One tokio task is spawned per batch. Each task fetches its batch, decodes
//! every duration and returns its own [`AggregateResult`]. The calling task
//! waits for all of them and merges the tallies serially as they complete, so
//! the totals are exact whatever order the tasks finish in.
//!
//! # Failure policy
//!
//! - **Abort**: the first failed batch cancels the remaining tasks and the
//!   whole aggregation fails with [`EstimateError::FetchFailure`]
//! - **Degrade**: the failed batch's identifiers are counted as unresolved
//!   and aggregation continues
//!
//! # Liveness
//!
//! Every fetch is bounded by the batch timeout, and the whole aggregation can
//! be stopped through a [`CancellationToken`]. Dropping the returned future
//! also aborts all in-flight tasks.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use watchtime::fetch::{plan, mock::MockSource};
//! use watchtime::history::VideoId;
//! use watchtime::stats::aggregator::{AggregatorOptions, ConcurrentAggregator};
//!
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! rt.block_on(async {
//!     let source = Arc::new(MockSource::new().with_default_duration("PT1M"));
//!     let aggregator = ConcurrentAggregator::new(source, AggregatorOptions::default());
//!
//!     let ids: Vec<VideoId> = (0..120).map(|i| VideoId::new(i.to_string())).collect();
//!     let result = aggregator.aggregate(plan(&ids)).await.unwrap();
//!     assert_eq!(result.total_sample_duration, 120 * 60);
//! });
//! ```

use super::AggregateResult;
use crate::config::{FailurePolicy, FetchConfig};
use crate::error::{EstimateError, FetchError};
use crate::fetch::{Batch, MetadataSource, VideoListResponse};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Aggregation tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregatorOptions {
    pub failure_policy: FailurePolicy,
    /// Upper bound on a single batch fetch, `None` for no limit
    pub batch_timeout: Option<Duration>,
    /// Maximum batches fetched at the same time
    pub max_concurrent: usize,
}

impl Default for AggregatorOptions {
    fn default() -> Self {
        Self::from(&FetchConfig::default())
    }
}

impl From<&FetchConfig> for AggregatorOptions {
    fn from(fetch: &FetchConfig) -> Self {
        Self {
            failure_policy: fetch.failure_policy,
            batch_timeout: Some(fetch.timeout()),
            max_concurrent: fetch.max_concurrent_batches,
        }
    }
}

/// Result of one batch task
struct BatchOutcome {
    index: usize,
    len: usize,
    result: Result<AggregateResult, FetchError>,
}

/// Fans out batch fetches and merges their tallies
pub struct ConcurrentAggregator {
    source: Arc<dyn MetadataSource>,
    options: AggregatorOptions,
    cancel: CancellationToken,
}

impl ConcurrentAggregator {
    pub fn new(source: Arc<dyn MetadataSource>, options: AggregatorOptions) -> Self {
        Self {
            source,
            options,
            cancel: CancellationToken::new(),
        }
    }

    /// Stop aggregation when `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Fetch and decode every batch, then merge the results
    pub async fn aggregate(&self, batches: Vec<Batch>) -> Result<AggregateResult, EstimateError> {
        let semaphore = Arc::new(Semaphore::new(self.options.max_concurrent.max(1)));
        let mut tasks = JoinSet::new();

        log::info!(
            "Fetching {} batches from {} (max {} in flight)",
            batches.len(),
            self.source.name(),
            self.options.max_concurrent.max(1)
        );

        for batch in batches {
            let source = Arc::clone(&self.source);
            let semaphore = Arc::clone(&semaphore);
            let timeout = self.options.batch_timeout;

            tasks.spawn(async move {
                // The semaphore is never closed
                let _permit = semaphore.acquire_owned().await.ok();
                let result = fetch_with_timeout(source.as_ref(), &batch, timeout)
                    .await
                    .map(|response| AggregateResult::from_response(&batch, &response));

                BatchOutcome {
                    index: batch.index,
                    len: batch.len(),
                    result,
                }
            });
        }

        let mut total = AggregateResult::default();

        loop {
            let joined = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    tasks.abort_all();
                    return Err(EstimateError::Cancelled);
                }
                next = tasks.join_next() => next,
            };

            let Some(joined) = joined else { break };
            let outcome = joined.map_err(|e| EstimateError::Task(e.to_string()))?;

            match outcome.result {
                Ok(tally) => {
                    log::debug!(
                        "Batch {} done: {}s resolved, {} unresolved",
                        outcome.index,
                        tally.total_sample_duration,
                        tally.unresolved_in_sample()
                    );
                    total.merge(&tally);
                }
                Err(err) => match self.options.failure_policy {
                    FailurePolicy::Abort => {
                        log::error!("Batch {} failed, aborting: {}", outcome.index, err);
                        tasks.abort_all();
                        return Err(EstimateError::FetchFailure {
                            batch: outcome.index,
                            source: err,
                        });
                    }
                    FailurePolicy::Degrade => {
                        log::warn!(
                            "Batch {} failed, counting {} videos as unresolved: {}",
                            outcome.index,
                            outcome.len,
                            err
                        );
                        total.record_failed_batch(outcome.len);
                    }
                },
            }
        }

        Ok(total)
    }
}

async fn fetch_with_timeout(
    source: &dyn MetadataSource,
    batch: &Batch,
    timeout: Option<Duration>,
) -> Result<VideoListResponse, FetchError> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, source.fetch_batch(batch))
            .await
            .map_err(|_| FetchError::Timeout(limit))?,
        None => source.fetch_batch(batch).await,
    }
}
