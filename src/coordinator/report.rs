//! Estimation report

use crate::history::histogram::YearHistogram;
use crate::sampling::SampleResult;
use crate::stats::extrapolate::Extrapolation;
use crate::stats::AggregateResult;
use serde::{Deserialize, Serialize};

/// Final result of one estimation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationReport {
    /// Entries in the history file
    pub population: usize,
    /// Target sample size for this population
    pub sample_size: usize,
    /// Identifiers actually drawn
    pub sampled: usize,
    /// Entries with an empty or unparseable link
    pub missing_links: usize,
    /// `sample_size - sampled`
    pub missing_from_sample: usize,
    /// Drawn identifiers without a usable duration
    pub unresolved_in_sample: usize,
    /// Drawn identifiers longer than a day
    pub out_of_range: usize,
    /// Drawn identifiers absent from the provider's response
    pub unavailable: usize,
    /// Metadata requests issued
    pub batches: usize,
    /// Requests that failed under the degrade policy
    pub failed_batches: usize,
    /// Estimated watch time of the whole history, seconds
    pub total_estimated_duration: u64,
    /// Sum of resolved sample durations, seconds
    pub sample_total_duration: u64,
    /// Estimated mean duration per history entry, seconds
    pub average_duration: f64,
    /// Watch events per calendar year
    pub year_buckets: YearHistogram,
}

impl EstimationReport {
    pub fn new(
        population: usize,
        sample_size: usize,
        sample: &SampleResult,
        batches: usize,
        aggregate: &AggregateResult,
        extrapolation: &Extrapolation,
        year_buckets: YearHistogram,
    ) -> Self {
        Self {
            population,
            sample_size,
            sampled: sample.len(),
            missing_links: sample.missing_links,
            missing_from_sample: sample_size.saturating_sub(sample.len()),
            unresolved_in_sample: aggregate.unresolved_in_sample(),
            out_of_range: aggregate.out_of_range,
            unavailable: aggregate.unavailable,
            batches,
            failed_batches: aggregate.failed_batches,
            total_estimated_duration: extrapolation.estimated_total,
            sample_total_duration: aggregate.total_sample_duration,
            average_duration: extrapolation.average_per_video,
            year_buckets,
        }
    }

    /// Whether some batches were dropped under the degrade policy
    pub fn is_degraded(&self) -> bool {
        self.failed_batches > 0
    }
}
