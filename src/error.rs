use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use emoji_tiles::{ContainerError, TilesError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request body is empty")]
    MissingBody,

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Not found")]
    NotFound,

    #[error("Mosaic error: {0}")]
    Mosaic(#[from] MosaicError),
}

#[derive(Debug, Error)]
pub enum MosaicError {
    #[error("Invalid emoji library: {0}")]
    Format(String),

    #[error("Truncated emoji library: expected {expected} payload bytes, found {available}")]
    TruncatedData { expected: usize, available: usize },

    #[error("Image decode error: {0}")]
    Decode(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Emoji library not ready: {0}")]
    NotReady(String),

    #[error("Failed to allocate pixmap")]
    PixmapAllocation,

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Render task failed: {0}")]
    Task(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<TilesError> for MosaicError {
    fn from(e: TilesError) -> Self {
        match e {
            TilesError::Container(ContainerError::Truncated {
                expected,
                available,
            }) => MosaicError::TruncatedData {
                expected,
                available,
            },
            TilesError::Container(ContainerError::Format(e)) => MosaicError::Format(e.to_string()),
            TilesError::Palette(e) => MosaicError::Format(e.to_string()),
            TilesError::Atlas(e) => MosaicError::Configuration(e.to_string()),
        }
    }
}

impl From<ContainerError> for MosaicError {
    fn from(e: ContainerError) -> Self {
        TilesError::from(e).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::MissingBody => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::UnsupportedMediaType(_) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, self.to_string())
            }
            ApiError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Mosaic(e @ MosaicError::Decode(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
            }
            ApiError::Mosaic(e @ MosaicError::NotReady(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, e.to_string())
            }
            ApiError::Mosaic(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "error": message,
        }));

        (status, body).into_response()
    }
}
