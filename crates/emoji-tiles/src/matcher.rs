//! Nearest-color matching.

use crate::palette::Palette;

/// Squared Euclidean distance between two RGB colors.
#[inline]
pub fn squared_distance(a: [f32; 3], b: [f32; 3]) -> f32 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr * dr + dg * dg + db * db
}

/// Index of the palette entry closest to `rgb`, lowest index on ties.
#[inline]
pub fn nearest(rgb: [u8; 3], palette: &Palette) -> usize {
    palette.find_nearest(rgb).0
}
