use crate::error::MosaicError;
use std::io::Cursor;

/// Encode 8-bit pixel data as a PNG.
///
/// With `fast` set the encoder skips filtering and uses fast deflate,
/// which is what [`optimize_png`] expects as input.
pub fn encode_png(
    width: u32,
    height: u32,
    color_type: png::ColorType,
    data: &[u8],
    fast: bool,
) -> Result<Vec<u8>, MosaicError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(color_type);
        encoder.set_depth(png::BitDepth::Eight);
        if fast {
            encoder.set_compression(png::Compression::Fast);
            encoder.set_filter(png::FilterType::NoFilter);
        }
        let mut writer = encoder
            .write_header()
            .map_err(|e| MosaicError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(data)
            .map_err(|e| MosaicError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

/// Re-compress a PNG with oxipng (zopfli + adaptive filter selection).
///
/// Falls back to the input if optimization fails.
pub fn optimize_png(png_bytes: Vec<u8>) -> Vec<u8> {
    match oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            ..Default::default()
        },
    ) {
        Ok(optimized) => optimized,
        Err(e) => {
            tracing::warn!(%e, "PNG optimization failed, keeping unoptimized output");
            png_bytes
        }
    }
}
