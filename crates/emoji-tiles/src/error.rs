//! Unified error type for the emoji-tiles public API.

use crate::atlas::AtlasError;
use crate::container::{ContainerError, FormatError};
use crate::palette::PaletteError;
use std::fmt;

/// Unified error type for the emoji-tiles public API.
///
/// Wraps every error type of the crate for `?` propagation through a full
/// container → palette → atlas load.
///
/// # Example
///
/// ```
/// use emoji_tiles::{decode_tiles, Palette, PaletteOptions, SpriteAtlas, TilesError};
///
/// fn load(bytes: &[u8]) -> Result<(Palette, SpriteAtlas), TilesError> {
///     let tiles = decode_tiles(bytes, 16)?;
///     let palette = Palette::extract(&tiles, &PaletteOptions::new())?;
///     let atlas = SpriteAtlas::build(&tiles, 64)?;
///     Ok((palette, atlas))
/// }
///
/// assert!(matches!(load(b"not a container"), Err(TilesError::Container(_))));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum TilesError {
    /// Container could not be decoded
    Container(ContainerError),
    /// Palette could not be built
    Palette(PaletteError),
    /// Atlas could not be built
    Atlas(AtlasError),
}

impl fmt::Display for TilesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TilesError::Container(err) => write!(f, "container error: {}", err),
            TilesError::Palette(err) => write!(f, "palette error: {}", err),
            TilesError::Atlas(err) => write!(f, "atlas error: {}", err),
        }
    }
}

impl std::error::Error for TilesError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TilesError::Container(err) => Some(err),
            TilesError::Palette(err) => Some(err),
            TilesError::Atlas(err) => Some(err),
        }
    }
}

impl From<ContainerError> for TilesError {
    fn from(err: ContainerError) -> Self {
        TilesError::Container(err)
    }
}

impl From<FormatError> for TilesError {
    fn from(err: FormatError) -> Self {
        TilesError::Container(ContainerError::Format(err))
    }
}

impl From<PaletteError> for TilesError {
    fn from(err: PaletteError) -> Self {
        TilesError::Palette(err)
    }
}

impl From<AtlasError> for TilesError {
    fn from(err: AtlasError) -> Self {
        TilesError::Atlas(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display_prefixes() {
        let err: TilesError = PaletteError::EmptyTileSet.into();
        assert_eq!(
            err.to_string(),
            "palette error: cannot build a palette from an empty tile set"
        );

        let err: TilesError = AtlasError::ZeroColumns.into();
        assert!(err.to_string().starts_with("atlas error:"));
    }

    #[test]
    fn test_format_error_converts_through_container() {
        let err: TilesError = FormatError::BadMagic.into();
        assert_eq!(
            err,
            TilesError::Container(ContainerError::Format(FormatError::BadMagic))
        );
        assert!(err.source().is_some());
    }
}
