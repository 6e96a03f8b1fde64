//! Test fixtures: synthetic emoji libraries and photos.

use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};

use emojify::models::AppConfig;

/// Tile edge used by the test libraries
pub const TILE_EDGE: usize = 4;

/// Solid tiles of the test library: red, green, blue, white, black
pub const LIBRARY_COLORS: [[u8; 4]; 5] = [
    [255, 0, 0, 255],
    [0, 255, 0, 255],
    [0, 0, 255, 255],
    [255, 255, 255, 255],
    [0, 0, 0, 255],
];

/// Version 1 `.npy` container of solid `edge x edge` tiles
pub fn npy_library(colors: &[[u8; 4]], edge: usize) -> Vec<u8> {
    let mut dict = format!(
        "{{'descr': '|u1', 'fortran_order': False, 'shape': ({}, {edge}, {edge}, 4), }}",
        colors.len()
    );
    while (10 + dict.len() + 1) % 64 != 0 {
        dict.push(' ');
    }
    dict.push('\n');

    let mut bytes = b"\x93NUMPY\x01\x00".to_vec();
    bytes.extend((dict.len() as u16).to_le_bytes());
    bytes.extend(dict.as_bytes());
    for c in colors {
        bytes.extend(c.repeat(edge * edge));
    }
    bytes
}

/// Write the standard test library into `dir` and return its path
pub fn write_library(dir: &Path) -> PathBuf {
    let path = dir.join("emojis_4.npy");
    std::fs::write(&path, npy_library(&LIBRARY_COLORS, TILE_EDGE)).expect("write library");
    path
}

/// Small configuration matching the test library: 60x60 px output, 6x6 cells
pub fn test_config(library: PathBuf) -> AppConfig {
    let mut config = AppConfig::default();
    config.library.path = library;
    config.library.tile_edge = TILE_EDGE;
    config.mosaic.target_size = 60;
    config.mosaic.grid_dim = 6;
    config.mosaic.background = "#00FF00".to_string();
    config
}

/// Encode an image as PNG
pub fn png_bytes(img: &RgbaImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).expect("encode png");
    buf.into_inner()
}

/// Opaque photo of a single color
pub fn solid_photo(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    png_bytes(&RgbaImage::from_pixel(
        width,
        height,
        Rgba([rgb[0], rgb[1], rgb[2], 255]),
    ))
}

/// Photo with red left half and blue right half
pub fn split_photo() -> Vec<u8> {
    png_bytes(&RgbaImage::from_fn(120, 60, |x, _| {
        if x < 60 {
            Rgba([250, 5, 5, 255])
        } else {
            Rgba([5, 5, 250, 255])
        }
    }))
}

/// Fully transparent photo
pub fn transparent_photo() -> Vec<u8> {
    png_bytes(&RgbaImage::from_pixel(30, 30, Rgba([0, 0, 0, 0])))
}

/// Opaque JPEG photo
pub fn jpeg_photo(rgb: [u8; 3]) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(32, 32, image::Rgb(rgb));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Jpeg).expect("encode jpeg");
    buf.into_inner()
}

/// Decode a PNG response body
pub fn decode_png(bytes: &[u8]) -> RgbaImage {
    image::load_from_memory(bytes)
        .expect("decode png")
        .to_rgba8()
}
