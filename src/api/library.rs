use axum::{extract::State, response::Json};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::services::{LibraryInfo, MosaicService};

/// Result of a library reload
#[derive(Debug, Serialize, ToSchema)]
pub struct ReloadResponse {
    /// Status code (200 = success)
    pub status: u16,
    /// The newly loaded library
    pub library: LibraryInfo,
}

/// Reload the emoji library
///
/// Re-reads the configured container. If loading fails, a previously
/// loaded library stays in service.
#[utoipa::path(
    post,
    path = "/api/library/reload",
    responses(
        (status = 200, description = "Library reloaded", body = ReloadResponse),
        (status = 500, description = "Library could not be loaded"),
    ),
    tag = "Library"
)]
pub async fn handle_reload(
    State(service): State<Arc<MosaicService>>,
) -> Result<Json<ReloadResponse>, ApiError> {
    let library = service.reload().await?;

    Ok(Json(ReloadResponse {
        status: 200,
        library,
    }))
}
