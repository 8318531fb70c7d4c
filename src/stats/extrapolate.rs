//! Extrapolation from the sample to the whole history
//!
//! ```text
//! resolved          = sample_size - unresolved
//! avg_per_resolved  = sample_total / resolved
//! estimated_total   = avg_per_resolved * population
//! avg_per_video     = estimated_total / population
//! ```
//!
//! `unresolved` covers both identifiers that could not be drawn (missing from
//! the sample) and identifiers drawn but not resolved (out of range,
//! unavailable, failed batch).

use crate::error::EstimateError;
use serde::{Deserialize, Serialize};

/// Population-wide estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extrapolation {
    /// Estimated watch time of the whole history in seconds
    pub estimated_total: u64,
    /// Mean duration of a resolved sampled video in seconds
    pub average_per_resolved: f64,
    /// `estimated_total / population` in seconds
    pub average_per_video: f64,
}

/// Scale a sample total up to the population
///
/// Fails with [`EstimateError::InsufficientResolvedSample`] when no sampled
/// video was resolved or the population is empty.
pub fn extrapolate(
    sample_total: u64,
    sample_size: usize,
    population: usize,
    unresolved_total: usize,
) -> Result<Extrapolation, EstimateError> {
    let resolved = sample_size.saturating_sub(unresolved_total);
    if resolved == 0 || population == 0 {
        return Err(EstimateError::InsufficientResolvedSample {
            sample_size,
            unresolved: unresolved_total,
        });
    }

    let average_per_resolved = sample_total as f64 / resolved as f64;
    let estimated_total = (average_per_resolved * population as f64).round() as u64;
    let average_per_video = estimated_total as f64 / population as f64;

    Ok(Extrapolation {
        estimated_total,
        average_per_resolved,
        average_per_video,
    })
}
