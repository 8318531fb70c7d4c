//! Watch counts per calendar year
//!
//! Built over the full population, independent of sampling.

use super::HistoryEntry;
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of watch events per year (UTC)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct YearHistogram {
    buckets: BTreeMap<i32, u64>,
}

impl YearHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bucket every entry by the year it was watched
    ///
    /// Entries without a timestamp are skipped.
    pub fn build(entries: &[HistoryEntry]) -> Self {
        let mut histogram = Self::new();
        for entry in entries {
            if let Some(watched_at) = entry.watched_at {
                histogram.record(watched_at.year());
            }
        }
        histogram
    }

    pub fn record(&mut self, year: i32) {
        *self.buckets.entry(year).or_insert(0) += 1;
    }

    pub fn count(&self, year: i32) -> u64 {
        self.buckets.get(&year).copied().unwrap_or(0)
    }

    /// Sum of all buckets
    pub fn total(&self) -> u64 {
        self.buckets.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Buckets in ascending year order
    pub fn iter(&self) -> impl Iterator<Item = (i32, u64)> + '_ {
        self.buckets.iter().map(|(year, count)| (*year, *count))
    }
}
