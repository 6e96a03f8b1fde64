//! Integration tests for the /api/mosaic endpoints.

mod common;

use axum::http::StatusCode;
use common::{fixtures, TestApp};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_mosaic_returns_png_download() {
    let app = TestApp::new();

    let response = app.post_photo(fixtures::split_photo()).await;
    common::assert_png(&response);
    common::assert_no_store(&response);

    assert_eq!(
        response.header("content-disposition"),
        Some("attachment; filename=\"emojified_image.png\"")
    );
    assert_eq!(response.header("x-mosaic-cells-placed"), Some("36"));
    assert_eq!(response.header("x-mosaic-cells-skipped"), Some("0"));

    let mosaic = fixtures::decode_png(&response.body);
    assert_eq!(mosaic.dimensions(), (60, 60));
}

#[tokio::test]
async fn test_mosaic_matches_photo_colors() {
    let app = TestApp::new();

    let response = app.post_photo(fixtures::split_photo()).await;
    common::assert_png(&response);

    // Centers of the outermost cells: red tile on the left, blue on the right
    let mosaic = fixtures::decode_png(&response.body);
    assert_eq!(mosaic.get_pixel(5, 30).0, [255, 0, 0, 255]);
    assert_eq!(mosaic.get_pixel(55, 30).0, [0, 0, 255, 255]);
}

#[tokio::test]
async fn test_mosaic_accepts_jpeg() {
    let app = TestApp::new();

    let response = app
        .post_bytes(
            "/api/mosaic",
            Some("image/jpeg"),
            fixtures::jpeg_photo([0, 0, 240]),
        )
        .await;
    common::assert_png(&response);

    let mosaic = fixtures::decode_png(&response.body);
    assert_eq!(mosaic.get_pixel(30, 30).0, [0, 0, 255, 255]);
}

#[tokio::test]
async fn test_mosaic_accepts_missing_and_octet_stream_content_type() {
    let app = TestApp::new();

    let response = app
        .post_bytes("/api/mosaic", None, fixtures::solid_photo(10, 10, [0, 0, 0]))
        .await;
    common::assert_png(&response);

    let response = app
        .post_bytes(
            "/api/mosaic",
            Some("application/octet-stream"),
            fixtures::solid_photo(10, 10, [0, 0, 0]),
        )
        .await;
    common::assert_png(&response);
}

#[tokio::test]
async fn test_mosaic_rejects_non_image_content_type() {
    let app = TestApp::new();

    let response = app
        .post_bytes("/api/mosaic", Some("text/plain"), b"hello".to_vec())
        .await;
    common::assert_json_error(&response, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    common::assert_no_store(&response);
}

#[tokio::test]
async fn test_mosaic_rejects_empty_body() {
    let app = TestApp::new();

    let response = app.post_bytes("/api/mosaic", Some("image/png"), Vec::new()).await;
    common::assert_json_error(&response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_mosaic_rejects_undecodable_image() {
    let app = TestApp::new();

    let response = app.post_photo(b"this is not a png".to_vec()).await;
    common::assert_json_error(&response, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_mosaic_rejects_oversized_upload() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = fixtures::test_config(fixtures::write_library(dir.path()));
    config.output.max_upload_bytes = 1024;
    let app = TestApp::with_config(dir, config);

    let response = app.post_photo(vec![0u8; 4096]).await;
    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_mosaic_without_library_is_unavailable() {
    let app = TestApp::without_library();

    let response = app.post_photo(fixtures::split_photo()).await;
    common::assert_json_error(&response, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_transparent_photo_shows_background() {
    let app = TestApp::new();

    let response = app.post_photo(fixtures::transparent_photo()).await;
    common::assert_png(&response);
    assert_eq!(response.header("x-mosaic-cells-placed"), Some("0"));
    assert_eq!(response.header("x-mosaic-cells-skipped"), Some("36"));

    let mosaic = fixtures::decode_png(&response.body);
    assert!(mosaic.pixels().all(|p| p.0 == [0, 255, 0, 255]));
}

#[tokio::test]
async fn test_skip_probability_one_leaves_background() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = fixtures::test_config(fixtures::write_library(dir.path()));
    config.mosaic.skip_probability = 1.0;
    let app = TestApp::with_config(dir, config);

    let response = app.post_photo(fixtures::solid_photo(20, 20, [255, 0, 0])).await;
    common::assert_png(&response);
    assert_eq!(response.header("x-mosaic-cells-placed"), Some("0"));
    assert_eq!(
        fixtures::decode_png(&response.body).get_pixel(30, 30).0,
        [0, 255, 0, 255]
    );
}

#[tokio::test]
async fn test_seeded_skipping_is_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = fixtures::test_config(fixtures::write_library(dir.path()));
    config.mosaic.skip_probability = 0.5;
    config.mosaic.seed = Some(7);
    let app = TestApp::with_config(dir, config);

    let first = app.post_photo(fixtures::split_photo()).await;
    let second = app.post_photo(fixtures::split_photo()).await;
    common::assert_png(&first);
    common::assert_png(&second);

    assert_eq!(
        first.header("x-mosaic-cells-placed"),
        second.header("x-mosaic-cells-placed")
    );
    assert_eq!(first.body, second.body);
}

#[tokio::test]
async fn test_latest_is_not_found_before_first_mosaic() {
    let app = TestApp::new();

    let response = app.get("/api/mosaic/latest").await;
    common::assert_json_error(&response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_latest_returns_last_mosaic() {
    let app = TestApp::new();

    let created = app.post_photo(fixtures::split_photo()).await;
    common::assert_png(&created);

    let latest = app.get("/api/mosaic/latest").await;
    common::assert_png(&latest);
    assert_eq!(latest.body, created.body);
    assert_eq!(latest.header("x-mosaic-cells-placed"), Some("36"));
    assert!(latest.header("x-mosaic-generated-at").is_some());
}
