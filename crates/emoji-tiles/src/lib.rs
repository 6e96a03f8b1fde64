#![allow(clippy::module_inception)]

//! emoji-tiles: emoji tile libraries for photo mosaics
//!
//! This library turns a packed array of emoji bitmaps into the two lookup
//! structures a mosaic renderer needs: a [`Palette`] of representative
//! colors and a [`SpriteAtlas`] holding every bitmap at a known position.
//!
//! # Quick Start
//!
//! ```
//! use emoji_tiles::{Palette, PaletteOptions, SpriteAtlas, TileGeometry, TileSet};
//!
//! // Two 1x1 tiles: red and blue
//! let tiles = TileSet::new(
//!     TileGeometry::new(2, 1),
//!     vec![255, 0, 0, 255, 0, 0, 255, 255],
//! ).unwrap();
//!
//! let palette = Palette::extract(&tiles, &PaletteOptions::new()).unwrap();
//! let atlas = SpriteAtlas::build(&tiles, 64).unwrap();
//!
//! let index = emoji_tiles::nearest([10, 20, 240], &palette);
//! assert_eq!(index, 1);
//! assert_eq!(atlas.origin(index), Some((1, 0)));
//! ```
//!
//! # Container Format
//!
//! Tile libraries are stored in the NumPy `.npy` layout with shape
//! `(count, edge, edge, 4)`:
//!
//! ```text
//! \x93NUMPY  major minor  len  {'descr': '|u1', 'fortran_order': False, 'shape': (N, 16, 16, 4), }  payload
//! ```
//!
//! Versions 1, 2 and 3 are accepted. The payload must be row-major and
//! either unsigned bytes or little-endian float32. Float payloads whose
//! leading values never exceed 1.5 are treated as normalized and scaled by
//! 255. See [`container`] for the details.
//!
//! # Pipeline
//!
//! ```text
//! container bytes
//!     |
//!     v
//! decode_tiles()  ---> TileSet (count, edge, RGBA)
//!     |                    |
//!     v                    v
//! Palette::extract()   SpriteAtlas::build()
//!     |                    |
//!     +---> nearest() ---> tile index ---> atlas.tile_rect()
//! ```
//!
//! # Matching
//!
//! [`nearest`] is a linear scan under squared Euclidean RGB distance. Ties
//! resolve to the lowest index, so the result is fully deterministic for a
//! given library.

pub mod atlas;
pub mod container;
mod error;
pub mod matcher;
pub mod palette;
pub mod tiles;


pub use atlas::{AtlasError, SpriteAtlas, TileRect, DEFAULT_ATLAS_COLUMNS};
pub use container::{decode_tiles, Container, ContainerError, Dtype, FormatError};
pub use error::TilesError;
pub use matcher::{nearest, squared_distance};
pub use palette::{Palette, PaletteError, PaletteOptions};
pub use tiles::{TileGeometry, TileSet, CHANNELS};
