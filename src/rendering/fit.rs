//! Fit-and-crop and grid sampling.
//!
//! The source is scaled so that it covers the square target completely
//! (`max` of the two axis ratios), then the overflow on the longer axis is
//! cropped away evenly on both sides. Cropping happens in source space
//! before resampling, so every output pixel comes from the photo and there
//! are never blank borders.

use image::imageops::{self, FilterType};
use image::RgbaImage;

/// Scale-to-cover and center-crop `src` to exactly `target × target`.
///
/// `src` must have non-zero dimensions (guaranteed by `decode_image`).
pub fn fit_and_crop(src: &RgbaImage, target: u32) -> RgbaImage {
    let (w, h) = src.dimensions();
    let (x, y, crop_w, crop_h) = crop_window(w, h, target);

    let cropped = imageops::crop_imm(src, x, y, crop_w, crop_h).to_image();
    if crop_w == target && crop_h == target {
        return cropped;
    }
    imageops::resize(&cropped, target, target, FilterType::Triangle)
}

/// Sample the square raster down to `grid × grid`.
pub fn downsample(img: &RgbaImage, grid: u32) -> RgbaImage {
    if img.width() == grid && img.height() == grid {
        return img.clone();
    }
    imageops::resize(img, grid, grid, FilterType::Triangle)
}

/// Centered source-space window `(x, y, width, height)` that scales to the
/// square target.
fn crop_window(w: u32, h: u32, target: u32) -> (u32, u32, u32, u32) {
    let scale = (target as f64 / w as f64).max(target as f64 / h as f64);

    let crop_w = ((target as f64 / scale).round() as u32).clamp(1, w);
    let crop_h = ((target as f64 / scale).round() as u32).clamp(1, h);

    ((w - crop_w) / 2, (h - crop_h) / 2, crop_w, crop_h)
}
