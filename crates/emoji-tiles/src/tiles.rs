//! Decoded tile bitmaps and their geometry.
//!
//! [`TileGeometry`] is the contract between the container parser and the
//! palette and atlas builders: every stage reads tile count and edge length
//! from it instead of re-deriving them from the raw shape.

/// Channels per pixel (RGBA).
pub const CHANNELS: usize = 4;

/// Shape of a tile set: `count` square RGBA tiles of `edge` pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGeometry {
    /// Number of tiles
    pub count: usize,
    /// Tile width and height in pixels
    pub edge: usize,
}

impl TileGeometry {
    /// Create a geometry for `count` tiles of `edge × edge` pixels.
    #[inline]
    pub fn new(count: usize, edge: usize) -> Self {
        Self { count, edge }
    }

    /// Pixels in one tile.
    #[inline]
    pub fn pixels_per_tile(&self) -> usize {
        self.edge * self.edge
    }

    /// Bytes in one tile.
    #[inline]
    pub fn tile_stride(&self) -> usize {
        self.pixels_per_tile() * CHANNELS
    }

    /// Bytes in the whole set, or `None` on overflow.
    pub fn byte_len(&self) -> Option<usize> {
        self.count
            .checked_mul(self.edge)?
            .checked_mul(self.edge)?
            .checked_mul(CHANNELS)
    }
}

/// Owned RGBA bitmaps for all tiles, row-major, stored contiguously in
/// index order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileSet {
    geometry: TileGeometry,
    pixels: Vec<u8>,
}

impl TileSet {
    /// Wrap a pixel buffer.
    ///
    /// Returns `None` if the edge is zero or the buffer length does not
    /// match the geometry exactly.
    pub fn new(geometry: TileGeometry, pixels: Vec<u8>) -> Option<Self> {
        if geometry.edge == 0 || geometry.byte_len() != Some(pixels.len()) {
            return None;
        }
        Some(Self { geometry, pixels })
    }

    /// Geometry of the set.
    #[inline]
    pub fn geometry(&self) -> TileGeometry {
        self.geometry
    }

    /// Number of tiles.
    #[inline]
    pub fn len(&self) -> usize {
        self.geometry.count
    }

    /// Returns true if the set holds no tiles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.geometry.count == 0
    }

    /// RGBA bytes of tile `index`, or `None` if out of range.
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        if index >= self.geometry.count {
            return None;
        }
        let stride = self.geometry.tile_stride();
        let start = index * stride;
        Some(&self.pixels[start..start + stride])
    }

    /// Iterate over tiles in index order.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.pixels.chunks_exact(self.geometry.tile_stride())
    }

    /// The whole pixel buffer.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }
}
