//! Error types for palette extraction

use std::fmt;

/// Error type for palette extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteError {
    /// The tile set holds no tiles, so nothing could ever be matched
    EmptyTileSet,
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaletteError::EmptyTileSet => {
                write!(f, "cannot build a palette from an empty tile set")
            }
        }
    }
}

impl std::error::Error for PaletteError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            PaletteError::EmptyTileSet.to_string(),
            "cannot build a palette from an empty tile set"
        );
    }
}
