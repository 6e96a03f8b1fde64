use crate::error::MosaicError;
use image::RgbaImage;

/// Decode an uploaded photo (PNG or JPEG) into straight-alpha RGBA.
///
/// Zero-sized images are rejected here so later stages can assume a
/// non-degenerate raster.
pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage, MosaicError> {
    let img = image::load_from_memory(bytes).map_err(|e| MosaicError::Decode(e.to_string()))?;

    if img.width() == 0 || img.height() == 0 {
        return Err(MosaicError::Decode(format!(
            "image has no pixels ({}x{})",
            img.width(),
            img.height()
        )));
    }

    Ok(img.to_rgba8())
}
