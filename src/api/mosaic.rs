use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderName, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::error::ApiError;
use crate::services::{CompositeStore, LatestComposite, MosaicService};

pub const CELLS_PLACED_HEADER: HeaderName = HeaderName::from_static("x-mosaic-cells-placed");
pub const CELLS_SKIPPED_HEADER: HeaderName = HeaderName::from_static("x-mosaic-cells-skipped");
pub const GENERATED_AT_HEADER: HeaderName = HeaderName::from_static("x-mosaic-generated-at");

const DOWNLOAD_DISPOSITION: &str = "attachment; filename=\"emojified_image.png\"";

/// Create an emoji mosaic from a photo
///
/// The request body is the raw image (PNG or JPEG). The response is the
/// mosaic as a PNG download.
#[utoipa::path(
    post,
    path = "/api/mosaic",
    request_body(content = Vec<u8>, description = "Raw PNG or JPEG bytes", content_type = "image/*"),
    responses(
        (status = 200, description = "Mosaic PNG", content_type = "image/png"),
        (status = 400, description = "Empty request body"),
        (status = 413, description = "Image exceeds the upload limit"),
        (status = 415, description = "Body is not an image"),
        (status = 422, description = "Image could not be decoded"),
        (status = 503, description = "Emoji library not loaded"),
    ),
    tag = "Mosaic"
)]
pub async fn handle_mosaic(
    State(service): State<Arc<MosaicService>>,
    State(store): State<Arc<CompositeStore>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    if let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    {
        if !is_image_content_type(content_type) {
            return Err(ApiError::UnsupportedMediaType(content_type.to_string()));
        }
    }
    if body.is_empty() {
        return Err(ApiError::MissingBody);
    }

    tracing::info!(size_bytes = body.len(), "Mosaic request received");

    let rendered = service.render(body.to_vec()).await.inspect_err(|e| {
        tracing::warn!(error = %e, "Mosaic request failed");
    })?;

    tracing::info!(
        placed = rendered.placed,
        skipped = rendered.skipped,
        grid = rendered.grid_dim,
        size_bytes = rendered.png.len(),
        "Mosaic rendered"
    );

    store
        .store(LatestComposite {
            png_bytes: rendered.png.clone(),
            placed: rendered.placed,
            skipped: rendered.skipped,
            generated_at: chrono::Utc::now(),
        })
        .await;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (header::CONTENT_LENGTH, rendered.png.len().to_string()),
            (header::CONTENT_DISPOSITION, DOWNLOAD_DISPOSITION.to_string()),
            (CELLS_PLACED_HEADER, rendered.placed.to_string()),
            (CELLS_SKIPPED_HEADER, rendered.skipped.to_string()),
        ],
        Bytes::from(rendered.png),
    )
        .into_response())
}

/// Get the most recent mosaic
///
/// Failed requests never replace it.
#[utoipa::path(
    get,
    path = "/api/mosaic/latest",
    responses(
        (status = 200, description = "Latest mosaic PNG", content_type = "image/png"),
        (status = 404, description = "No mosaic has been created yet"),
    ),
    tag = "Mosaic"
)]
pub async fn handle_latest(State(store): State<Arc<CompositeStore>>) -> Result<Response, ApiError> {
    let latest = store.get().await.ok_or(ApiError::NotFound)?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (header::CONTENT_LENGTH, latest.png_bytes.len().to_string()),
            (CELLS_PLACED_HEADER, latest.placed.to_string()),
            (CELLS_SKIPPED_HEADER, latest.skipped.to_string()),
            (GENERATED_AT_HEADER, latest.generated_at.to_rfc3339()),
        ],
        Bytes::from(latest.png_bytes),
    )
        .into_response())
}

/// Accept `image/*` and `application/octet-stream`, ignoring parameters
fn is_image_content_type(value: &str) -> bool {
    let essence = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence.starts_with("image/") || essence == "application/octet-stream"
}
