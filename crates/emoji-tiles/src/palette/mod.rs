//! Palette types
//!
//! One representative color per tile, index-aligned with the tile set, plus
//! the options controlling how transparent pixels are treated.

mod error;
mod options;
mod palette;

pub use error::PaletteError;
pub use options::{PaletteOptions, DEFAULT_ALPHA_CUTOFF};
pub use palette::Palette;
