//! Sample sizing and simple random sampling
//!
//! This module decides how many videos to look up and picks them.
//!
//! # Sample size
//!
//! Small histories are looked up in full (census). Above the census threshold
//! the finite-population formula is used:
//!
//! ```text
//! n = N / (1 + N * e^2)
//! ```
//!
//! where `N` is the population and `e` the margin of error. A smaller margin
//! gives a larger and more accurate sample.
//!
//! # Sampling
//!
//! Entries with an empty or unparseable link are counted as missing and left
//! out of the pool. The pool is shuffled with Fisher-Yates, then scanned in
//! order until enough identifiers are collected. Links that parse but carry no
//! video identifier are skipped without being counted as missing.
//!
//! # Example
//!
//! ```
//! use watchtime::history::HistoryEntry;
//! use watchtime::sampling::{Sampler, SampleSizePolicy};
//!
//! let entries = vec![
//!     HistoryEntry::new("https://www.youtube.com/watch?v=a", None),
//!     HistoryEntry::new("", None),
//! ];
//!
//! let mut sampler = Sampler::with_seed(SampleSizePolicy::default(), 7);
//! let size = sampler.compute_sample_size(entries.len());
//! let sample = sampler.sample(&entries, size);
//! assert_eq!(sample.identifiers.len(), 1);
//! assert_eq!(sample.missing_links, 1);
//! ```

use crate::history::{video_id_from_url, HistoryEntry, VideoId};
use rand::Rng;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Populations below this size are looked up in full
pub const DEFAULT_CENSUS_THRESHOLD: usize = 300;

/// Default margin of error for the sample-size formula
pub const DEFAULT_MARGIN_ERROR: f64 = 0.03;

/// Parameters of the sample-size rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleSizePolicy {
    pub census_threshold: usize,
    pub margin_error: f64,
}

impl SampleSizePolicy {
    pub fn new(census_threshold: usize, margin_error: f64) -> Self {
        Self {
            census_threshold,
            margin_error,
        }
    }

    /// Number of entries to sample from a population of `population`
    pub fn sample_size(&self, population: usize) -> usize {
        if population < self.census_threshold {
            return population;
        }

        let n = population as f64;
        let size = n / (1.0 + n * self.margin_error * self.margin_error);
        (size as usize).min(population)
    }
}

impl Default for SampleSizePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_CENSUS_THRESHOLD, DEFAULT_MARGIN_ERROR)
    }
}

/// Outcome of one sampling pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleResult {
    /// Sampled identifiers, in draw order
    pub identifiers: Vec<VideoId>,
    /// Entries whose link was empty or unparseable
    pub missing_links: usize,
    /// Scanned entries whose link had no video identifier
    pub skipped: usize,
}

impl SampleResult {
    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }
}

/// Random sampler over history entries
///
/// Owns its random source so tests can fix the seed.
pub struct Sampler {
    rng: Xoshiro256PlusPlus,
    policy: SampleSizePolicy,
}

impl Sampler {
    /// Create a sampler seeded from system entropy
    pub fn new(policy: SampleSizePolicy) -> Self {
        Self {
            rng: Xoshiro256PlusPlus::from_entropy(),
            policy,
        }
    }

    /// Create a sampler with a fixed seed
    ///
    /// Useful for reproducible tests.
    pub fn with_seed(policy: SampleSizePolicy, seed: u64) -> Self {
        Self {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
            policy,
        }
    }

    pub fn compute_sample_size(&self, population: usize) -> usize {
        self.policy.sample_size(population)
    }

    /// Draw up to `sample_size` identifiers without replacement
    pub fn sample(&mut self, entries: &[HistoryEntry], sample_size: usize) -> SampleResult {
        let mut missing_links = 0;
        let mut pool = Vec::with_capacity(entries.len());

        for entry in entries {
            match entry.locator_url() {
                Some(url) => pool.push(url),
                None => missing_links += 1,
            }
        }

        shuffle(&mut pool, &mut self.rng);

        let mut identifiers = Vec::with_capacity(sample_size.min(pool.len()));
        let mut skipped = 0;

        for url in &pool {
            if identifiers.len() >= sample_size {
                break;
            }
            match video_id_from_url(url) {
                Some(id) => identifiers.push(id),
                None => skipped += 1,
            }
        }

        log::debug!(
            "Sampled {} identifiers (target {}), {} missing links, {} skipped",
            identifiers.len(),
            sample_size,
            missing_links,
            skipped
        );

        SampleResult {
            identifiers,
            missing_links,
            skipped,
        }
    }
}

/// Fisher-Yates shuffle
///
/// Position `i` is swapped with a uniformly chosen position in `[i, N-1]`.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    let n = items.len();
    for i in 0..n {
        let j = rng.gen_range(i..n);
        items.swap(i, j);
    }
}
