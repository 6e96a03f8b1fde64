//! Palette extraction options.

/// Default alpha at or below which a pixel counts as transparent.
pub const DEFAULT_ALPHA_CUTOFF: u8 = 10;

/// Configuration options for palette extraction.
///
/// # Defaults
///
/// - Ignore transparent pixels: enabled
/// - Alpha cutoff: 10 (pixels with alpha `<= 10` are excluded)
///
/// # Example
///
/// ```
/// use emoji_tiles::PaletteOptions;
///
/// let options = PaletteOptions::new().alpha_cutoff(0);
/// assert!(options.ignore_transparent);
///
/// // Average every pixel, whatever its alpha
/// let options = PaletteOptions::new().ignore_transparent(false);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteOptions {
    /// Whether low-alpha pixels are excluded from the mean.
    pub ignore_transparent: bool,

    /// Alpha threshold; pixels with alpha at or below it are excluded
    /// when `ignore_transparent` is set.
    pub alpha_cutoff: u8,
}

impl Default for PaletteOptions {
    fn default() -> Self {
        Self {
            ignore_transparent: true,
            alpha_cutoff: DEFAULT_ALPHA_CUTOFF,
        }
    }
}

impl PaletteOptions {
    /// Create options with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set transparent pixel exclusion.
    #[inline]
    pub fn ignore_transparent(mut self, enabled: bool) -> Self {
        self.ignore_transparent = enabled;
        self
    }

    /// Set the alpha cutoff.
    #[inline]
    pub fn alpha_cutoff(mut self, cutoff: u8) -> Self {
        self.alpha_cutoff = cutoff;
        self
    }

    /// Returns true if a pixel with this alpha contributes to the mean.
    #[inline]
    pub fn includes(&self, alpha: u8) -> bool {
        !self.ignore_transparent || alpha > self.alpha_cutoff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let opts = PaletteOptions::default();
        assert!(opts.ignore_transparent, "ignore_transparent should default to true");
        assert_eq!(opts.alpha_cutoff, 10, "alpha_cutoff should default to 10");
        assert_eq!(PaletteOptions::new(), opts);
    }

    #[test]
    fn test_includes_respects_cutoff() {
        let opts = PaletteOptions::new();
        assert!(!opts.includes(0));
        assert!(!opts.includes(10));
        assert!(opts.includes(11));
        assert!(opts.includes(255));
    }

    #[test]
    fn test_includes_everything_when_disabled() {
        let opts = PaletteOptions::new().ignore_transparent(false);
        assert!(opts.includes(0));
        assert!(opts.includes(10));
    }

    #[test]
    fn test_builder_alpha_cutoff() {
        let opts = PaletteOptions::new().alpha_cutoff(200);
        assert!(!opts.includes(200));
        assert!(opts.includes(201));
    }
}
