//! Error types for the estimation pipeline
//!
//! Library code returns these typed errors so callers (CLI, upload service)
//! can tell "bad input" apart from "provider failure" and "not enough data".
//! Plumbing code uses `anyhow` via [`crate::Result`].

use std::time::Duration;
use thiserror::Error;

/// Failure of a single metadata batch request
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, TLS or protocol failure
    #[error("request failed: {0}")]
    Transport(String),

    /// Provider answered with a non-success status
    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body could not be decoded
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Request did not complete within the configured timeout
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

/// Failure of a whole estimation request
#[derive(Debug, Error)]
pub enum EstimateError {
    /// No video identifier could be extracted from any history entry
    #[error("unrecognized input: no video links found, check that it is your watch history and not your search history")]
    EmptySample,

    /// A batch request failed and the failure policy is `abort`
    #[error("metadata batch {batch} failed: {source}")]
    FetchFailure {
        batch: usize,
        #[source]
        source: FetchError,
    },

    /// Every sampled identifier was unresolved, nothing to extrapolate from
    #[error("cannot estimate: {unresolved} of {sample_size} sampled videos could not be resolved")]
    InsufficientResolvedSample { sample_size: usize, unresolved: usize },

    /// The cancellation hook fired before all batches completed
    #[error("estimation cancelled")]
    Cancelled,

    /// A batch task panicked or was aborted by the runtime
    #[error("batch task failed: {0}")]
    Task(String),
}

impl EstimateError {
    /// Whether the error is caused by the uploaded input rather than the system
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::EmptySample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_failure_message_includes_source() {
        let err = EstimateError::FetchFailure {
            batch: 3,
            source: FetchError::Status { status: 403, body: "quotaExceeded".to_string() },
        };
        let msg = err.to_string();
        assert!(msg.contains("batch 3"));
        assert!(msg.contains("HTTP 403"));
    }

    #[test]
    fn test_input_error_classification() {
        assert!(EstimateError::EmptySample.is_input_error());
        assert!(!EstimateError::Cancelled.is_input_error());
        assert!(!EstimateError::InsufficientResolvedSample { sample_size: 1, unresolved: 1 }.is_input_error());
    }
}
