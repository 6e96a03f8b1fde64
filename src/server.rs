//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header::CACHE_CONTROL, HeaderMap, HeaderValue},
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use utoipa::OpenApi;

use crate::api::{self, ApiDoc, ReloadResponse, StatusResponse};
use crate::error::ApiError;
use crate::models::AppConfig;
use crate::services::{CompositeStore, MosaicService};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub mosaic: Arc<MosaicService>,
    pub composites: Arc<CompositeStore>,
    pub max_upload_bytes: usize,
}

impl AppState {
    /// State around an already constructed service
    pub fn new(mosaic: MosaicService) -> Self {
        let max_upload_bytes = mosaic.config().output.max_upload_bytes;
        Self {
            mosaic: Arc::new(mosaic),
            composites: Arc::new(CompositeStore::new()),
            max_upload_bytes,
        }
    }
}

/// Create application state, loading the configured emoji library.
///
/// A library that fails to load does not prevent startup; mosaic requests
/// answer 503 until a reload succeeds.
pub fn create_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    config.validate()?;
    Ok(AppState::new(MosaicService::new(config)))
}

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        .route("/api/mosaic", post(handle_mosaic))
        .route("/api/mosaic/latest", get(handle_latest))
        .route("/api/status", get(handle_status))
        .route("/api/library/reload", post(handle_reload))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        // Health check
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        // Mosaics are per-request results; never let intermediaries cache them
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}

// Wrapper handlers to extract state components for the underlying API handlers

async fn handle_mosaic(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Result<Response, ApiError> {
    api::handle_mosaic(State(state.mosaic), State(state.composites), headers, body).await
}

async fn handle_latest(State(state): State<AppState>) -> Result<Response, ApiError> {
    api::handle_latest(State(state.composites)).await
}

async fn handle_status(State(state): State<AppState>) -> Json<StatusResponse> {
    api::handle_status(State(state.mosaic)).await
}

async fn handle_reload(State(state): State<AppState>) -> Result<Json<ReloadResponse>, ApiError> {
    api::handle_reload(State(state.mosaic)).await
}
