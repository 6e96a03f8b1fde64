//! Per-tile representative colors.

use super::{PaletteError, PaletteOptions};
use crate::matcher::squared_distance;
use crate::tiles::{TileSet, CHANNELS};

/// Ordered mapping from tile index to mean RGB color.
///
/// Always holds at least one entry, so [`find_nearest`](Self::find_nearest)
/// has an answer for every query.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<[f32; 3]>,
}

impl Palette {
    /// Compute the mean color of every tile.
    ///
    /// Pixels rejected by [`PaletteOptions::includes`] do not contribute. A
    /// tile with no contributing pixels gets `(0, 0, 0)`.
    ///
    /// # Errors
    ///
    /// [`PaletteError::EmptyTileSet`] if `tiles` holds no tiles.
    ///
    /// # Example
    ///
    /// ```
    /// use emoji_tiles::{Palette, PaletteOptions, TileGeometry, TileSet};
    ///
    /// // One 1x1 tile holding an opaque red pixel
    /// let tiles = TileSet::new(
    ///     TileGeometry::new(1, 1),
    ///     vec![255, 0, 0, 255],
    /// ).unwrap();
    /// let palette = Palette::extract(&tiles, &PaletteOptions::new()).unwrap();
    /// assert_eq!(palette.color(0), Some([255.0, 0.0, 0.0]));
    /// ```
    pub fn extract(tiles: &TileSet, options: &PaletteOptions) -> Result<Self, PaletteError> {
        if tiles.is_empty() {
            return Err(PaletteError::EmptyTileSet);
        }

        let colors = tiles.iter().map(|tile| mean_color(tile, options)).collect();
        Ok(Self { colors })
    }

    /// Build a palette from explicit colors.
    ///
    /// # Errors
    ///
    /// [`PaletteError::EmptyTileSet`] if `colors` is empty.
    pub fn from_colors(colors: Vec<[f32; 3]>) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::EmptyTileSet);
        }
        Ok(Self { colors })
    }

    /// Number of entries (equal to the tile count).
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false for a constructed palette.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color of entry `index`.
    #[inline]
    pub fn color(&self, index: usize) -> Option<[f32; 3]> {
        self.colors.get(index).copied()
    }

    /// All colors in index order.
    #[inline]
    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    /// Find the entry closest to `rgb`.
    ///
    /// Returns the index and squared Euclidean distance. Ties resolve to the
    /// lowest index.
    ///
    /// This is a linear scan over every entry, which is fine for a few
    /// thousand tiles and a grid of a few thousand cells. Libraries with
    /// tens of thousands of tiles would want a spatial index instead.
    pub fn find_nearest(&self, rgb: [u8; 3]) -> (usize, f32) {
        let query = [rgb[0] as f32, rgb[1] as f32, rgb[2] as f32];

        let mut best_idx = 0;
        let mut best_dist = f32::MAX;

        for (i, &color) in self.colors.iter().enumerate() {
            let dist = squared_distance(query, color);
            if dist < best_dist {
                best_dist = dist;
                best_idx = i;
            }
        }

        (best_idx, best_dist)
    }
}

fn mean_color(tile: &[u8], options: &PaletteOptions) -> [f32; 3] {
    let mut sum = [0u64; 3];
    let mut included = 0u64;

    for px in tile.chunks_exact(CHANNELS) {
        if !options.includes(px[3]) {
            continue;
        }
        sum[0] += px[0] as u64;
        sum[1] += px[1] as u64;
        sum[2] += px[2] as u64;
        included += 1;
    }

    if included == 0 {
        return [0.0; 3];
    }

    let n = included as f64;
    [
        (sum[0] as f64 / n) as f32,
        (sum[1] as f64 / n) as f32,
        (sum[2] as f64 / n) as f32,
    ]
}
