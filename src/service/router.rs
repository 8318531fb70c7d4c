//! Router configuration for the upload service.

use super::handlers;
use super::state::AppState;
use crate::Result;
use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

/// Create the application router with all routes and middleware.
///
/// Without a configured origin CORS is left open.
pub fn create_router(state: AppState) -> Result<Router> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::PUT, Method::POST])
        .allow_headers(Any);

    let cors = match state.config.service.allow_origin.as_deref() {
        Some(origin) => {
            let origin = HeaderValue::from_str(origin)
                .with_context(|| format!("Invalid allowed origin: {}", origin))?;
            cors.allow_origin(origin)
        }
        None => cors.allow_origin(Any),
    };

    let body_limit = state.config.service.max_upload_bytes;

    Ok(Router::new()
        .route("/health", get(handlers::health_check))
        .route("/upload", post(handlers::upload_history))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .with_state(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::coordinator::EstimationReport;
    use crate::fetch::mock::MockSource;
    use crate::service::error::{ApiError, INVALID_HISTORY_MESSAGE};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    const BOUNDARY: &str = "watchtime-test-boundary";

    fn router(source: MockSource) -> Router {
        let mut config = Config::default();
        config.sampling.seed = Some(1);
        let state = AppState::new(Arc::new(config), Arc::new(source));
        create_router(state).unwrap()
    }

    fn upload_request(field: &str, contents: &str) -> Request<Body> {
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"watch-history.json\"\r\n\
             Content-Type: application/json\r\n\r\n{contents}\r\n--{b}--\r\n",
            b = BOUNDARY,
            field = field,
            contents = contents,
        );

        Request::builder()
            .method("POST")
            .uri("/upload")
            .header("content-type", format!("multipart/form-data; boundary={}", BOUNDARY))
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    const HISTORY: &str = r#"[
        {"header": "YouTube", "title": "Watched a", "titleUrl": "https://www.youtube.com/watch?v=a", "time": "2020-05-01T10:00:00.000Z"},
        {"header": "YouTube", "title": "Watched b", "titleUrl": "https://www.youtube.com/watch?v=b", "time": "2020-06-01T10:00:00.000Z"},
        {"header": "YouTube", "title": "Watched a removed video", "time": "2021-01-01T10:00:00.000Z"}
    ]"#;

    #[test]
    fn test_router_creation() {
        let _router = router(MockSource::new());
    }

    #[test]
    fn test_invalid_origin_rejected() {
        let mut config = Config::default();
        config.service.allow_origin = Some("bad\norigin".to_string());
        let state = AppState::new(Arc::new(config), Arc::new(MockSource::new()));
        assert!(create_router(state).is_err());
    }

    #[tokio::test]
    async fn test_health() {
        let response = router(MockSource::new())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_upload_returns_report() {
        let source = MockSource::new().with_default_duration("PT10M");
        let response = router(source).oneshot(upload_request("file", HISTORY)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let report: EstimationReport = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(report.population, 3);
        assert_eq!(report.missing_links, 1);
        assert_eq!(report.sample_total_duration, 1200);
        assert_eq!(report.total_estimated_duration, 1800);
        assert_eq!(report.year_buckets.count(2020), 2);
        assert_eq!(report.year_buckets.count(2021), 1);
    }

    #[tokio::test]
    async fn test_upload_not_json() {
        let response = router(MockSource::new())
            .oneshot(upload_request("file", "this is not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.message, INVALID_HISTORY_MESSAGE);
    }

    #[tokio::test]
    async fn test_upload_wrong_field() {
        let response = router(MockSource::new())
            .oneshot(upload_request("history", HISTORY))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_search_history_is_bad_request() {
        let search = r#"[{"title": "Searched for rust", "titleUrl": "https://www.youtube.com/results?search_query=rust", "time": "2020-01-01T00:00:00Z"}]"#;
        let source = MockSource::new();
        let response = router(source.clone()).oneshot(upload_request("file", search)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(source.request_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_is_bad_gateway() {
        let source = MockSource::new().with_default_duration("PT1M");
        source.fail_batch(0);

        let response = router(source).oneshot(upload_request("file", HISTORY)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_all_unresolved_is_unprocessable() {
        let source = MockSource::new().with_default_duration("P3D");
        let response = router(source).oneshot(upload_request("file", HISTORY)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
