//! Coordinator module
//!
//! Runs one estimation end to end:
//!
//! ```text
//! entries ──┬─> YearHistogram ─────────────────────────────────────┐
//!           └─> Sampler ─> BatchPlanner ─> ConcurrentAggregator ─> Extrapolator ─> EstimationReport
//! ```
//!
//! The year histogram is built on a blocking worker while the batches are
//! being fetched.

pub mod report;

pub use report::EstimationReport;

use crate::config::Config;
use crate::error::EstimateError;
use crate::fetch::{plan_with_size, MetadataSource, MAX_BATCH_SIZE};
use crate::history::histogram::YearHistogram;
use crate::history::HistoryEntry;
use crate::sampling::Sampler;
use crate::stats::aggregator::{AggregatorOptions, ConcurrentAggregator};
use crate::stats::extrapolate::extrapolate;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Estimates total watch time for a history
pub struct Estimator {
    sampler: Sampler,
    aggregator: ConcurrentAggregator,
    batch_size: usize,
}

impl Estimator {
    pub fn new(sampler: Sampler, aggregator: ConcurrentAggregator) -> Self {
        Self {
            sampler,
            aggregator,
            batch_size: MAX_BATCH_SIZE,
        }
    }

    /// Build an estimator from configuration
    ///
    /// Uses the configured seed if there is one, system entropy otherwise.
    pub fn from_config(config: &Config, source: Arc<dyn MetadataSource>, cancel: CancellationToken) -> Self {
        let policy = config.sampling.policy();
        let sampler = match config.sampling.seed {
            Some(seed) => Sampler::with_seed(policy, seed),
            None => Sampler::new(policy),
        };

        let aggregator = ConcurrentAggregator::new(source, AggregatorOptions::from(&config.fetch))
            .with_cancellation(cancel);

        Self::new(sampler, aggregator).with_batch_size(config.sampling.batch_size)
    }

    /// Identifiers per request, capped at [`MAX_BATCH_SIZE`]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.clamp(1, MAX_BATCH_SIZE);
        self
    }

    /// Estimate the total watch time of `entries`
    pub async fn estimate(&mut self, entries: Vec<HistoryEntry>) -> Result<EstimationReport, EstimateError> {
        let population = entries.len();
        let entries = Arc::new(entries);

        let histogram_task = {
            let entries = Arc::clone(&entries);
            tokio::task::spawn_blocking(move || YearHistogram::build(&entries))
        };

        let sample_size = self.sampler.compute_sample_size(population);
        let sample = self.sampler.sample(&entries, sample_size);

        if sample.is_empty() {
            log::warn!(
                "No video identifiers found in {} entries ({} missing links)",
                population,
                sample.missing_links
            );
            return Err(EstimateError::EmptySample);
        }

        let batches = plan_with_size(&sample.identifiers, self.batch_size);
        let batch_count = batches.len();

        log::info!(
            "Population {}, checking {} videos in {} requests",
            population,
            sample.len(),
            batch_count
        );

        let aggregate = self.aggregator.aggregate(batches).await?;

        let year_buckets = histogram_task
            .await
            .map_err(|e| EstimateError::Task(e.to_string()))?;

        let missing_from_sample = sample_size.saturating_sub(sample.len());
        let unresolved_total = missing_from_sample + aggregate.unresolved_in_sample();

        let extrapolation = extrapolate(
            aggregate.total_sample_duration,
            sample_size,
            population,
            unresolved_total,
        )?;

        log::info!(
            "Estimated total {}s from a sample total of {}s ({} unresolved)",
            extrapolation.estimated_total,
            aggregate.total_sample_duration,
            unresolved_total
        );

        Ok(EstimationReport::new(
            population,
            sample_size,
            &sample,
            batch_count,
            &aggregate,
            &extrapolation,
            year_buckets,
        ))
    }
}
