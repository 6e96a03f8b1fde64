pub mod library;
pub mod mosaic;
pub mod status;

use utoipa::OpenApi;

pub use library::{handle_reload, ReloadResponse, __path_handle_reload};
pub use mosaic::{handle_latest, handle_mosaic, __path_handle_latest, __path_handle_mosaic};
pub use status::{handle_status, MosaicParameters, StatusResponse, __path_handle_status};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Emojify API",
        description = "Photo to emoji mosaic server",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(handle_mosaic, handle_latest, handle_status, handle_reload),
    components(schemas(
        StatusResponse,
        MosaicParameters,
        ReloadResponse,
        crate::services::LibraryInfo,
    )),
    tags(
        (name = "Mosaic", description = "Mosaic creation and retrieval"),
        (name = "Status", description = "Service readiness"),
        (name = "Library", description = "Emoji library management")
    )
)]
pub struct ApiDoc;
