//! YouTube Data API client

use super::{Batch, MetadataSource, VideoListResponse};
use crate::error::FetchError;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;

/// Default videos endpoint
pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/videos";

/// Longest error body kept in a [`FetchError::Status`]
const MAX_ERROR_BODY: usize = 512;

/// Added to the per-batch timeout for the HTTP client's own limit, so a hung
/// request surfaces as [`FetchError::Timeout`] from the aggregator
const CLIENT_TIMEOUT_GRACE: Duration = Duration::from_secs(5);

/// HTTP metadata source backed by the YouTube Data API
///
/// The API key is handed in at construction; nothing here reads the
/// environment.
pub struct YouTubeClient {
    http: Client,
    endpoint: Url,
    api_key: String,
}

impl YouTubeClient {
    /// Create a client for `endpoint`
    ///
    /// `timeout` is the per-batch limit. The client itself gives up a little
    /// later, as a backstop for callers that do not enforce it.
    pub fn new(endpoint: &str, api_key: impl Into<String>, timeout: Duration) -> crate::Result<Self> {
        let endpoint = Url::parse(endpoint)
            .with_context(|| format!("Invalid metadata endpoint: {}", endpoint))?;

        let http = Client::builder()
            .timeout(timeout + CLIENT_TIMEOUT_GRACE)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            endpoint,
            api_key: api_key.into(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl MetadataSource for YouTubeClient {
    async fn fetch_batch(&self, batch: &Batch) -> Result<VideoListResponse, FetchError> {
        log::debug!("Requesting batch {} ({} ids) from {}", batch.index, batch.len(), self.endpoint);

        let response = self
            .http
            .get(batch.request_url(&self.endpoint, &self.api_key))
            .send()
            .await
            // Strip the URL: it carries the API key
            .map_err(|e| FetchError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.without_url().to_string()))?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: error_body(&body),
            });
        }

        VideoListResponse::from_slice(&body)
    }

    fn name(&self) -> &str {
        "youtube"
    }
}

/// Error body as text, cut to [`MAX_ERROR_BODY`] bytes on a char boundary
fn error_body(body: &[u8]) -> String {
    let mut text = String::from_utf8_lossy(body).into_owned();
    if text.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
    }
    text
}
