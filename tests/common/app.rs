//! Test application factory for integration tests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use emojify::models::AppConfig;
use emojify::server::{build_router, create_app_state};
use emojify::services::{CompositeStore, MosaicService};

use super::fixtures;

/// Test application with router and direct access to services
pub struct TestApp {
    router: axum::Router,
    pub mosaic: Arc<MosaicService>,
    pub composites: Arc<CompositeStore>,
    /// Directory holding the library file; removed on drop
    pub dir: TempDir,
}

impl TestApp {
    /// Create a test application with the standard test library loaded
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let library = fixtures::write_library(dir.path());
        Self::with_config(dir, fixtures::test_config(library))
    }

    /// Create a test application whose library file does not exist
    pub fn without_library() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let library = dir.path().join("missing.npy");
        Self::with_config(dir, fixtures::test_config(library))
    }

    /// Create a test application from a custom configuration
    pub fn with_config(dir: TempDir, config: AppConfig) -> Self {
        let state = create_app_state(config).expect("Failed to create app state");

        // Keep references for test assertions
        let mosaic = state.mosaic.clone();
        let composites = state.composites.clone();

        // Build router using shared server module (same as production)
        let router = build_router(state);

        Self {
            router,
            mosaic,
            composites,
            dir,
        }
    }

    /// Path the library is configured at
    pub fn library_path(&self) -> PathBuf {
        self.mosaic.config().library.path.clone()
    }

    /// Make a GET request to the given path
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// Make a POST request without a body
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request(Request::post(path).body(Body::empty()).unwrap())
            .await
    }

    /// Make a POST request with a raw body and optional content type
    pub async fn post_bytes(
        &self,
        path: &str,
        content_type: Option<&str>,
        body: Vec<u8>,
    ) -> TestResponse {
        let mut builder = Request::post(path);
        if let Some(content_type) = content_type {
            builder = builder.header("Content-Type", content_type);
        }
        self.request(builder.body(Body::from(body)).unwrap()).await
    }

    /// Submit a PNG photo to the mosaic endpoint
    pub async fn post_photo(&self, photo: Vec<u8>) -> TestResponse {
        self.post_bytes("/api/mosaic", Some("image/png"), photo)
            .await
    }

    /// Send a request to the router
    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Test response with convenience methods
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Get body as string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Get a header as string
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Check if response is a PNG image
    pub fn is_png(&self) -> bool {
        self.body.len() >= 8 && &self.body[0..8] == b"\x89PNG\r\n\x1a\n"
    }
}
