//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with mock addon transport and TMDB injected, enabling end-to-end testing
//! without network access.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use streamhub_core::{
    testing::{ManualClock, MockAddonTransport, MockExternalCatalog},
    AddonSeed, AddonTransport, Clock, Config, ExternalCatalog, ResponseCache,
};
use streamhub_server::state::AppState;

/// Re-export fixtures for test convenience
pub use streamhub_core::testing::fixtures;

/// Test fixture for E2E testing with mock dependencies.
///
/// Provides an in-process server with fully controllable mocks for:
/// - Addon manifests and resources (MockAddonTransport)
/// - TMDB (MockExternalCatalog)
/// - Cache time (ManualClock)
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_catalog() {
///     let fixture = TestFixture::new().await;
///     fixture.install_addon("cinemeta", "top").await;
///
///     let response = fixture.get("/api/v1/catalog/movie/top").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Shared state, for assertions on registry and cache
    pub state: Arc<AppState>,
    /// Mock addon transport - configure manifests and responses
    pub transport: Arc<MockAddonTransport>,
    /// Mock TMDB - configure items and errors
    pub tmdb: Arc<MockExternalCatalog>,
    /// Clock driving cache expiry
    pub clock: Arc<ManualClock>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    /// `data` of the envelope.
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// `metadata.source` of the envelope.
    pub fn source(&self) -> &str {
        self.body["metadata"]["source"].as_str().unwrap_or_default()
    }
}

impl TestFixture {
    /// Create a new test fixture with default config and no addons.
    pub async fn new() -> Self {
        Self::with_config(Config::default()).await
    }

    /// Create a fixture whose config declares the given seed addons.
    pub async fn with_seeds(seeds: Vec<AddonSeed>) -> Self {
        let mut config = Config::default();
        config.addons.seeds = seeds;
        Self::with_config(config).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(config: Config) -> Self {
        let transport = Arc::new(MockAddonTransport::new());
        let tmdb = Arc::new(MockExternalCatalog::new());
        let clock = Arc::new(ManualClock::default());

        let cache = Arc::new(ResponseCache::with_clock(
            chrono::Duration::seconds(config.cache.ttl_secs as i64),
            Arc::clone(&clock) as Arc<dyn Clock>,
        ));

        let state = Arc::new(AppState::with_cache(
            config,
            Arc::clone(&transport) as Arc<dyn AddonTransport>,
            Arc::clone(&tmdb) as Arc<dyn ExternalCatalog>,
            cache,
        ));

        let router = streamhub_server::api::create_router(Arc::clone(&state));

        Self {
            router,
            state,
            transport,
            tmdb,
            clock,
        }
    }

    /// Transport URL used for the addon `id`.
    pub fn addon_url(id: &str) -> String {
        format!("https://{}.addons.test", id)
    }

    /// Serve a catalog+meta manifest for `id` and install it through the API.
    pub async fn install_addon(&self, id: &str, catalog_id: &str) -> TestResponse {
        let url = Self::addon_url(id);
        self.transport
            .set_manifest(
                &format!("{}/manifest.json", url),
                fixtures::manifest(id, catalog_id),
            )
            .await;
        self.post("/api/v1/addons", serde_json::json!({ "url": url }))
            .await
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST request without a body.
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request("POST", path, None).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a GET request and return the raw body text.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        (status, String::from_utf8_lossy(&body_bytes).to_string())
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}

/// Helper to assert a JSON path equals expected value.
#[macro_export]
macro_rules! assert_json_path {
    ($json:expr, $path:expr, $expected:expr) => {
        let actual = &$json[$path];
        assert_eq!(
            actual, &$expected,
            "Path '{}' expected {:?}, got {:?}",
            $path, $expected, actual
        );
    };
}
