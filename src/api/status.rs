use axum::{extract::State, response::Json};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::services::{LibraryInfo, MosaicService};

/// Service readiness and mosaic parameters
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    /// `ready`, `failed` or `uninitialized`
    pub state: String,
    /// Whether mosaic requests are accepted
    pub ready: bool,
    /// Why the library failed to load
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The loaded library, when ready
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library: Option<LibraryInfo>,
    /// Configured mosaic geometry
    pub mosaic: MosaicParameters,
    /// Server version
    pub version: String,
}

/// Configured mosaic geometry and placement
#[derive(Debug, Serialize, ToSchema)]
pub struct MosaicParameters {
    /// Output edge in pixels
    pub target_size: u32,
    /// Cells per row and column
    pub grid_dim: u32,
    /// Canvas color behind the tiles
    pub background: String,
    /// Chance of leaving an opaque cell empty
    pub skip_probability: f64,
    /// Fixed seed for skipping, if any
    pub seed: Option<u64>,
}

/// Get service status
#[utoipa::path(
    get,
    path = "/api/status",
    responses(
        (status = 200, description = "Current status", body = StatusResponse),
    ),
    tag = "Status"
)]
pub async fn handle_status(State(service): State<Arc<MosaicService>>) -> Json<StatusResponse> {
    let state = service.state().await;
    let mosaic = &service.config().mosaic;

    Json(StatusResponse {
        state: state.label().to_string(),
        ready: state.is_ready(),
        error: state.failure().map(str::to_string),
        library: state.engine().ok().map(|engine| engine.info().clone()),
        mosaic: MosaicParameters {
            target_size: mosaic.target_size,
            grid_dim: mosaic.grid_dim,
            background: mosaic.background.clone(),
            skip_probability: mosaic.skip_probability,
            seed: mosaic.seed,
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
