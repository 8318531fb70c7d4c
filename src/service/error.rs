//! HTTP error handling and response types.

use crate::error::EstimateError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Message returned for uploads that are not a watch history.
pub const INVALID_HISTORY_MESSAGE: &str =
    "Error with file, check that it is your watched history and not searched history";

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Application error type for handlers.
#[derive(Debug)]
pub enum AppError {
    /// Malformed upload
    BadRequest(String),
    /// Estimation failed
    Estimate(EstimateError),
    /// Internal server error
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Estimate(e) if e.is_input_error() => StatusCode::BAD_REQUEST,
            AppError::Estimate(EstimateError::InsufficientResolvedSample { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Estimate(EstimateError::FetchFailure { .. }) => StatusCode::BAD_GATEWAY,
            AppError::Estimate(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match self {
            AppError::BadRequest(msg) => ApiError::new("BAD_REQUEST", msg),
            AppError::Estimate(e) => {
                let code = match e {
                    EstimateError::EmptySample => "EMPTY_SAMPLE",
                    EstimateError::InsufficientResolvedSample { .. } => "INSUFFICIENT_SAMPLE",
                    EstimateError::FetchFailure { .. } => "PROVIDER_ERROR",
                    EstimateError::Cancelled => "CANCELLED",
                    EstimateError::Task(_) => "INTERNAL_ERROR",
                };
                if status.is_server_error() {
                    log::error!("Estimation failed: {}", e);
                }
                ApiError::new(code, e.to_string())
            }
            AppError::Internal(msg) => {
                log::error!("Internal error: {}", msg);
                ApiError::new("INTERNAL_ERROR", msg)
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<EstimateError> for AppError {
    fn from(err: EstimateError) -> Self {
        AppError::Estimate(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
