//! Upload service
//!
//! An axum server that accepts a watch-history export as a multipart upload
//! and answers with the estimation report as JSON.
//!
//! # Endpoints
//!
//! - `POST /upload`: multipart form, field `file` holds the history JSON
//! - `GET /health`: liveness probe
//!
//! # Status codes
//!
//! | Outcome                          | Status |
//! |----------------------------------|--------|
//! | Report computed                  | 200    |
//! | Missing field, bad JSON, no links| 400    |
//! | Every sampled video unresolved   | 422    |
//! | Metadata provider failure        | 502    |
//! | Anything else                    | 500    |

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;

use crate::config::Config;
use crate::fetch::MetadataSource;
use crate::Result;
use anyhow::Context;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Run the upload service until Ctrl-C
pub async fn serve(config: Arc<Config>, source: Arc<dyn MetadataSource>) -> Result<()> {
    let shutdown = CancellationToken::new();
    let listen = config.service.listen.clone();

    let state = AppState::new(config, source).with_shutdown(shutdown.clone());
    let app = create_router(state)?;

    let listener = tokio::net::TcpListener::bind(&listen)
        .await
        .with_context(|| format!("Failed to bind {}", listen))?;

    log::info!("Listening on {}", listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::info!("Shutting down");
            }
            shutdown.cancel();
        })
        .await
        .context("Server error")?;

    Ok(())
}
