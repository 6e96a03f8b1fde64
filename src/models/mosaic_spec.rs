use crate::error::MosaicError;
use crate::models::AppConfig;

/// Output geometry of a mosaic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MosaicSpec {
    /// Output width and height in pixels
    pub target_size: u32,
    /// Cells per row and column
    pub grid_dim: u32,
}

impl MosaicSpec {
    /// The 900x900 output with 75x75 cells
    pub const DEFAULT: Self = Self {
        target_size: 900,
        grid_dim: 75,
    };

    /// Build a spec, rejecting zero sizes and grids finer than the output.
    pub fn new(target_size: u32, grid_dim: u32) -> Result<Self, MosaicError> {
        if target_size == 0 || grid_dim == 0 || grid_dim > target_size {
            return Err(MosaicError::Configuration(format!(
                "unsupported mosaic geometry: {grid_dim}x{grid_dim} cells on {target_size}px"
            )));
        }
        Ok(Self {
            target_size,
            grid_dim,
        })
    }

    /// Spec from the `mosaic` section of the configuration
    pub fn from_config(config: &AppConfig) -> Result<Self, MosaicError> {
        Self::new(config.mosaic.target_size, config.mosaic.grid_dim)
    }

    /// Cell edge in output pixels (may be fractional)
    pub fn cell_size(&self) -> f32 {
        self.target_size as f32 / self.grid_dim as f32
    }

    /// Number of cells in the grid
    pub fn cell_count(&self) -> usize {
        self.grid_dim as usize * self.grid_dim as usize
    }

    /// Top-left output pixel of cell `(x, y)`
    pub fn cell_origin(&self, x: u32, y: u32) -> (f32, f32) {
        let cell = self.cell_size();
        (x as f32 * cell, y as f32 * cell)
    }
}

impl Default for MosaicSpec {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cell_size() {
        let spec = MosaicSpec::DEFAULT;
        assert_eq!(spec.cell_size(), 12.0);
        assert_eq!(spec.cell_count(), 5625);
        assert_eq!(spec.cell_origin(74, 1), (888.0, 12.0));
    }

    #[test]
    fn test_fractional_cells() {
        let spec = MosaicSpec::new(100, 3).unwrap();
        assert!((spec.cell_size() - 33.333_332).abs() < 1e-4);
    }

    #[test]
    fn test_invalid_geometry() {
        assert!(MosaicSpec::new(0, 1).is_err());
        assert!(MosaicSpec::new(10, 0).is_err());
        assert!(MosaicSpec::new(10, 11).is_err());
        assert!(MosaicSpec::new(10, 10).is_ok());
    }

    #[test]
    fn test_from_config() {
        let mut config = AppConfig::default();
        config.mosaic.target_size = 4;
        config.mosaic.grid_dim = 2;
        let spec = MosaicSpec::from_config(&config).unwrap();
        assert_eq!(spec.cell_size(), 2.0);
    }
}
