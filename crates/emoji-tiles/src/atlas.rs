//! Sprite atlas packing.
//!
//! All tiles are packed row-major into one RGBA raster with a fixed number
//! of columns. Tile `i` sits at column `i % columns`, row `i / columns`.
//! Cells past the last tile in a partial final row stay zero (fully
//! transparent black).

use std::fmt;

use crate::tiles::{TileSet, CHANNELS};

/// Default number of tiles per atlas row.
pub const DEFAULT_ATLAS_COLUMNS: usize = 64;

/// Error type for atlas construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtlasError {
    /// Column count must be positive
    ZeroColumns,
    /// Atlas dimensions overflow `usize`
    TooLarge {
        /// Number of tiles requested
        count: usize,
        /// Tile edge in pixels
        edge: usize,
    },
}

impl fmt::Display for AtlasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtlasError::ZeroColumns => write!(f, "atlas needs at least one column"),
            AtlasError::TooLarge { count, edge } => {
                write!(f, "atlas for {} tiles of {}px is too large", count, edge)
            }
        }
    }
}

impl std::error::Error for AtlasError {}

/// Axis-aligned pixel rectangle inside the atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRect {
    /// Left edge
    pub x: usize,
    /// Top edge
    pub y: usize,
    /// Width and height
    pub edge: usize,
}

/// All tiles packed into one straight-alpha RGBA raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteAtlas {
    columns: usize,
    rows: usize,
    edge: usize,
    count: usize,
    rgba: Vec<u8>,
}

impl SpriteAtlas {
    /// Pack `tiles` into an atlas with `columns` tiles per row.
    ///
    /// The atlas is `columns * edge` wide and `ceil(count / columns) * edge`
    /// tall. Channel values are copied verbatim.
    ///
    /// # Errors
    ///
    /// - [`AtlasError::ZeroColumns`] if `columns == 0`
    /// - [`AtlasError::TooLarge`] if the raster size overflows
    pub fn build(tiles: &TileSet, columns: usize) -> Result<Self, AtlasError> {
        if columns == 0 {
            return Err(AtlasError::ZeroColumns);
        }

        let geometry = tiles.geometry();
        let edge = geometry.edge;
        let count = geometry.count;
        let rows = count.div_ceil(columns);

        let too_large = AtlasError::TooLarge { count, edge };
        let width = columns.checked_mul(edge).ok_or(too_large.clone())?;
        let height = rows.checked_mul(edge).ok_or(too_large.clone())?;
        let len = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(CHANNELS))
            .ok_or(too_large)?;

        let mut rgba = vec![0u8; len];
        let row_bytes = edge * CHANNELS;
        let atlas_stride = width * CHANNELS;

        for (index, tile) in tiles.iter().enumerate() {
            let col = index % columns;
            let row = index / columns;
            let x0 = col * edge;
            let y0 = row * edge;

            for (ty, src) in tile.chunks_exact(row_bytes).enumerate() {
                let start = (y0 + ty) * atlas_stride + x0 * CHANNELS;
                rgba[start..start + row_bytes].copy_from_slice(src);
            }
        }

        Ok(Self {
            columns,
            rows,
            edge,
            count,
            rgba,
        })
    }

    /// Tiles per row.
    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of rows (including a partial last row).
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Tile edge in pixels.
    #[inline]
    pub fn tile_edge(&self) -> usize {
        self.edge
    }

    /// Number of packed tiles.
    #[inline]
    pub fn tile_count(&self) -> usize {
        self.count
    }

    /// Raster width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.columns * self.edge
    }

    /// Raster height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.rows * self.edge
    }

    /// The raster as straight-alpha RGBA, row-major.
    #[inline]
    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// `(column, row)` of tile `index`, or `None` if out of range.
    pub fn grid_position(&self, index: usize) -> Option<(usize, usize)> {
        (index < self.count).then(|| (index % self.columns, index / self.columns))
    }

    /// Pixel origin of tile `index`.
    pub fn origin(&self, index: usize) -> Option<(usize, usize)> {
        self.grid_position(index)
            .map(|(col, row)| (col * self.edge, row * self.edge))
    }

    /// Pixel rectangle of tile `index`.
    pub fn tile_rect(&self, index: usize) -> Option<TileRect> {
        self.origin(index).map(|(x, y)| TileRect {
            x,
            y,
            edge: self.edge,
        })
    }

    /// Copy tile `index` back out of the atlas as a contiguous RGBA block.
    pub fn tile_rgba(&self, index: usize) -> Option<Vec<u8>> {
        let rect = self.tile_rect(index)?;
        let row_bytes = self.edge * CHANNELS;
        let stride = self.width() * CHANNELS;

        let mut out = Vec::with_capacity(row_bytes * self.edge);
        for y in rect.y..rect.y + self.edge {
            let start = y * stride + rect.x * CHANNELS;
            out.extend_from_slice(&self.rgba[start..start + row_bytes]);
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::TileGeometry;

    /// Tiles filled with a solid color derived from the index.
    fn solid_tiles(count: usize, edge: usize) -> TileSet {
        let mut pixels = Vec::new();
        for i in 0..count {
            let v = (i + 1) as u8;
            pixels.extend([v, v, v, 255].repeat(edge * edge));
        }
        TileSet::new(TileGeometry::new(count, edge), pixels).unwrap()
    }

    #[test]
    fn test_dimensions() {
        let atlas = SpriteAtlas::build(&solid_tiles(130, 2), 64).unwrap();
        assert_eq!(atlas.columns(), 64);
        assert_eq!(atlas.rows(), 3);
        assert_eq!(atlas.width(), 128);
        assert_eq!(atlas.height(), 6);
        assert_eq!(atlas.rgba().len(), 128 * 6 * 4);
    }

    #[test]
    fn test_exact_rows() {
        let atlas = SpriteAtlas::build(&solid_tiles(128, 1), 64).unwrap();
        assert_eq!(atlas.rows(), 2);
    }

    #[test]
    fn test_positions() {
        let atlas = SpriteAtlas::build(&solid_tiles(70, 16), 64).unwrap();
        assert_eq!(atlas.grid_position(0), Some((0, 0)));
        assert_eq!(atlas.grid_position(63), Some((63, 0)));
        assert_eq!(atlas.grid_position(64), Some((0, 1)));
        assert_eq!(atlas.origin(65), Some((16, 16)));
        assert_eq!(
            atlas.tile_rect(69),
            Some(TileRect {
                x: 80,
                y: 16,
                edge: 16
            })
        );
        assert_eq!(atlas.grid_position(70), None);
        assert_eq!(atlas.tile_rgba(70), None);
    }

    #[test]
    fn test_tiles_copied_verbatim() {
        let mut pixels = Vec::new();
        for i in 0..3u8 {
            // Distinct values per pixel, including translucent alpha
            pixels.extend((0..16).map(|p| i * 16 + p));
        }
        let tiles = TileSet::new(TileGeometry::new(3, 2), pixels).unwrap();
        let atlas = SpriteAtlas::build(&tiles, 2).unwrap();

        for i in 0..3 {
            assert_eq!(atlas.tile_rgba(i).as_deref(), tiles.get(i));
        }
    }

    #[test]
    fn test_partial_row_is_zero_filled() {
        let atlas = SpriteAtlas::build(&solid_tiles(3, 2), 2).unwrap();
        // Cell (1, 1) has no tile
        let stride = atlas.width() * 4;
        for y in 2..4 {
            let start = y * stride + 2 * 4;
            assert!(atlas.rgba()[start..start + 8].iter().all(|&b| b == 0));
        }
        // Neighbouring cell (0, 1) holds tile 2
        assert_eq!(atlas.rgba()[2 * stride], 3);
    }

    #[test]
    fn test_zero_columns_rejected() {
        assert_eq!(
            SpriteAtlas::build(&solid_tiles(1, 1), 0),
            Err(AtlasError::ZeroColumns)
        );
    }

    #[test]
    fn test_single_column() {
        let atlas = SpriteAtlas::build(&solid_tiles(3, 1), 1).unwrap();
        assert_eq!(atlas.width(), 1);
        assert_eq!(atlas.height(), 3);
        assert_eq!(atlas.rgba(), &[1, 1, 1, 255, 2, 2, 2, 255, 3, 3, 3, 255]);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AtlasError::ZeroColumns.to_string(),
            "atlas needs at least one column"
        );
    }
}
