//! Sample statistics
//!
//! Tallies of decoded durations for the sampled videos, and the step that
//! scales them up to the whole history.
//!
//! Each batch task builds its own [`AggregateResult`] from the provider's
//! response; the coordinating task merges those tallies one at a time as the
//! tasks complete. No counter is ever shared between tasks.
//!
//! # Example
//!
//! ```
//! use watchtime::duration::DecodedDuration;
//! use watchtime::stats::AggregateResult;
//!
//! let mut batch_a = AggregateResult::default();
//! batch_a.record_decoded(DecodedDuration::Seconds(600));
//!
//! let mut batch_b = AggregateResult::default();
//! batch_b.record_decoded(DecodedDuration::OutOfRange);
//!
//! let mut total = AggregateResult::default();
//! total.merge(&batch_a);
//! total.merge(&batch_b);
//! assert_eq!(total.total_sample_duration, 600);
//! assert_eq!(total.unresolved_in_sample(), 1);
//! ```

pub mod aggregator;
pub mod extrapolate;

use crate::duration::{decode, DecodedDuration};
use crate::fetch::{Batch, VideoItem, VideoListResponse};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Running totals for the sampled videos
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Sum of resolved durations in seconds
    pub total_sample_duration: u64,
    /// Videos with a concrete, in-range duration
    pub resolved: usize,
    /// Videos longer than a day (livestreams)
    pub out_of_range: usize,
    /// Videos missing from the response or with an unreadable duration
    pub unavailable: usize,
    /// Batches that failed under the degrade policy
    pub failed_batches: usize,
    /// Identifiers in failed batches
    pub failed_ids: usize,
}

impl AggregateResult {
    /// Sampled identifiers without a usable duration
    pub fn unresolved_in_sample(&self) -> usize {
        self.out_of_range + self.unavailable + self.failed_ids
    }

    pub fn record_decoded(&mut self, decoded: DecodedDuration) {
        match decoded {
            DecodedDuration::Seconds(seconds) => {
                self.total_sample_duration = self.total_sample_duration.saturating_add(seconds);
                self.resolved += 1;
            }
            DecodedDuration::OutOfRange => self.out_of_range += 1,
            DecodedDuration::Unrecognized => self.unavailable += 1,
        }
    }

    pub fn record_unavailable(&mut self) {
        self.unavailable += 1;
    }

    /// Count every identifier of a failed batch as unresolved
    pub fn record_failed_batch(&mut self, batch_len: usize) {
        self.failed_batches += 1;
        self.failed_ids += batch_len;
    }

    pub fn merge(&mut self, other: &AggregateResult) {
        self.total_sample_duration = self.total_sample_duration.saturating_add(other.total_sample_duration);
        self.resolved += other.resolved;
        self.out_of_range += other.out_of_range;
        self.unavailable += other.unavailable;
        self.failed_batches += other.failed_batches;
        self.failed_ids += other.failed_ids;
    }

    /// Tally one batch's response
    ///
    /// Items are matched to the batch by id so a duplicated identifier counts
    /// once per occurrence and identifiers absent from the response count as
    /// unavailable.
    pub fn from_response(batch: &Batch, response: &VideoListResponse) -> Self {
        let by_id: HashMap<&str, &VideoItem> = response
            .items
            .iter()
            .filter_map(|item| item.id.as_deref().map(|id| (id, item)))
            .collect();

        let mut tally = Self::default();
        for id in &batch.ids {
            match by_id.get(id.as_str()).and_then(|item| item.duration()) {
                Some(encoded) => tally.record_decoded(decode(encoded)),
                None => tally.record_unavailable(),
            }
        }
        tally
    }
}
