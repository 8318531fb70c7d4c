//! HTTP request handlers.

use super::error::{AppError, INVALID_HISTORY_MESSAGE};
use super::state::AppState;
use crate::coordinator::{EstimationReport, Estimator};
use crate::history::parse_history;
use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Multipart field carrying the history export
pub const UPLOAD_FIELD: &str = "file";

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub source: String,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        source: state.source.name().to_string(),
    })
}

/// POST /upload
///
/// Reads the `file` field of a multipart form, parses it as a watch-history
/// export and runs one estimation.
pub async fn upload_history(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> HandlerResult<EstimationReport> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() == Some(UPLOAD_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            upload = Some(bytes);
            break;
        }
    }

    let bytes = upload.ok_or_else(|| {
        AppError::BadRequest(format!("missing multipart field `{}`", UPLOAD_FIELD))
    })?;

    let entries = parse_history(&bytes).map_err(|e| {
        log::debug!("Rejected upload: {}", e);
        AppError::BadRequest(INVALID_HISTORY_MESSAGE.to_string())
    })?;

    log::info!("Upload with {} entries ({} bytes)", entries.len(), bytes.len());

    let mut estimator = Estimator::from_config(
        &state.config,
        state.source.clone(),
        state.shutdown.child_token(),
    );
    let report = estimator.estimate(entries).await?;

    Ok(Json(report))
}
