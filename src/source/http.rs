//! HTTP data source
//!
//! Fetches `GET {base}/sprints` and `GET {base}/calendar-events`.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::{DataSource, CALENDAR_EVENTS_ENDPOINT, SPRINTS_ENDPOINT};
use crate::config::{DashboardConfig, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::error::DashboardError;
use crate::types::{ApiCalendarEvent, Sprint};

/// Backend reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpSource {
    base_url: String,
    client: Client,
}

impl HttpSource {
    /// Create a source with the default request timeout
    pub fn new(base_url: impl Into<String>) -> Result<Self, DashboardError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DashboardError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, client))
    }

    /// Use a preconfigured client
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self, DashboardError> {
        Self::with_timeout(config.api_base_url.clone(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of an endpoint under the base
    pub fn url_for(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, DashboardError> {
        let url = self.url_for(endpoint);
        debug!(url = %url, "fetching");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DashboardError::LoadFailed {
                endpoint: url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DashboardError::LoadFailed {
                endpoint: url,
                reason: format!("status {status}"),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| DashboardError::LoadFailed {
                endpoint: url,
                reason: format!("invalid response body: {e}"),
            })
    }
}

#[async_trait]
impl DataSource for HttpSource {
    fn describe(&self) -> String {
        self.base_url.clone()
    }

    async fn fetch_sprints(&self) -> Result<Vec<Sprint>, DashboardError> {
        self.get_json(SPRINTS_ENDPOINT).await
    }

    async fn fetch_calendar_events(&self) -> Result<Vec<ApiCalendarEvent>, DashboardError> {
        self.get_json(CALENDAR_EVENTS_ENDPOINT).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    /// Run `router` on a random local port and return its API base URL
    async fn spawn_backend(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move { axum::serve(listener, router).await.expect("serve backend") });
        format!("http://{addr}/api")
    }

    fn local_source(base_url: String) -> HttpSource {
        let client = Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .expect("client");
        HttpSource::with_client(base_url, client)
    }

    #[test]
    fn test_url_for_trims_trailing_slash() {
        let source = HttpSource::new("http://localhost:4000/api/").unwrap();
        assert_eq!(
            source.url_for(SPRINTS_ENDPOINT),
            "http://localhost:4000/api/sprints"
        );
        assert_eq!(
            source.url_for(CALENDAR_EVENTS_ENDPOINT),
            "http://localhost:4000/api/calendar-events"
        );
    }

    #[test]
    fn test_from_config_builds_client() {
        let config = DashboardConfig {
            api_base_url: "http://retro.internal/api".to_string(),
            request_timeout_secs: 3,
            ..Default::default()
        };
        let source = HttpSource::from_config(&config).unwrap();
        assert_eq!(source.base_url(), "http://retro.internal/api");
        assert_eq!(source.describe(), "http://retro.internal/api");
    }

    #[tokio::test]
    async fn test_fetch_both_endpoints() {
        let router = Router::new()
            .route(
                "/api/sprints",
                get(|| async {
                    Json(json!([{
                        "sprint": "Sprint 1", "committed": 20, "completed": 18,
                        "bugs": 3, "features": 12, "chores": 5,
                        "members": {"Alice": {"completed": 9}}
                    }]))
                }),
            )
            .route(
                "/api/calendar-events",
                get(|| async {
                    Json(json!([{
                        "title": "Retro", "start": "2025-04-01T10:00:00Z",
                        "end": "2025-04-01T11:00:00Z", "cost": 120,
                        "sprint": "Sprint 1", "milestone": "M1"
                    }]))
                }),
            );
        let source = local_source(spawn_backend(router).await);

        let sprints = source.fetch_sprints().await.unwrap();
        assert_eq!(sprints.len(), 1);
        assert_eq!(sprints[0].sprint, "Sprint 1");
        assert_eq!(sprints[0].members["Alice"].completed, 9.0);

        let events = source.fetch_calendar_events().await.unwrap();
        assert_eq!(events[0].title, "Retro");
        assert_eq!(events[0].day, None);
    }

    #[tokio::test]
    async fn test_non_success_status_names_endpoint() {
        let router = Router::new().route(
            "/api/calendar-events",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "boom"}))) }),
        );
        let base = spawn_backend(router).await;
        let source = local_source(base.clone());

        let err = source.fetch_calendar_events().await.unwrap_err();
        match err {
            DashboardError::LoadFailed { endpoint, reason } => {
                assert_eq!(endpoint, format!("{base}/calendar-events"));
                assert!(reason.contains("500"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_route_is_load_failure() {
        let source = local_source(spawn_backend(Router::new()).await);

        let err = source.fetch_sprints().await.unwrap_err();
        assert!(err.is_load_failure());
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_undecodable_body_is_load_failure() {
        let router = Router::new().route("/api/sprints", get(|| async { "not json" }));
        let source = local_source(spawn_backend(router).await);

        let err = source.fetch_sprints().await.unwrap_err();
        assert!(err.is_load_failure());
        assert!(err.to_string().contains("invalid response body"));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_load_failure() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let source = local_source(format!("http://127.0.0.1:{port}/api"));

        let err = source.fetch_sprints().await.unwrap_err();
        assert!(err.is_load_failure());
        assert!(err.to_string().contains("/api/sprints"));
    }
}
