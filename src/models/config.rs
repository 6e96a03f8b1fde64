use crate::error::MosaicError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    /// Emoji library source and preprocessing
    #[serde(default)]
    pub library: LibraryConfig,

    /// Mosaic geometry and placement
    #[serde(default)]
    pub mosaic: MosaicConfig,

    /// Output encoding and upload limits
    #[serde(default)]
    pub output: OutputConfig,
}

/// Where the emoji library lives and how it is read
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LibraryConfig {
    /// Path to the `.npy` tile container
    #[serde(default = "default_library_path")]
    pub path: PathBuf,

    /// Expected tile edge in pixels
    #[serde(default = "default_tile_edge")]
    pub tile_edge: usize,

    /// Tiles per atlas row
    #[serde(default = "default_atlas_columns")]
    pub atlas_columns: usize,

    /// Exclude low-alpha pixels from tile mean colors
    #[serde(default = "default_true")]
    pub ignore_transparent: bool,

    /// Alpha at or below which a pixel counts as transparent
    #[serde(default = "default_alpha_cutoff")]
    pub alpha_cutoff: u8,
}

fn default_library_path() -> PathBuf {
    PathBuf::from("emojis_16.npy")
}

fn default_tile_edge() -> usize {
    16
}

fn default_atlas_columns() -> usize {
    emoji_tiles::DEFAULT_ATLAS_COLUMNS
}

fn default_true() -> bool {
    true
}

fn default_alpha_cutoff() -> u8 {
    emoji_tiles::palette::DEFAULT_ALPHA_CUTOFF
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            path: default_library_path(),
            tile_edge: default_tile_edge(),
            atlas_columns: default_atlas_columns(),
            ignore_transparent: true,
            alpha_cutoff: default_alpha_cutoff(),
        }
    }
}

/// Mosaic geometry
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MosaicConfig {
    /// Output edge in pixels (the output is square)
    #[serde(default = "default_target_size")]
    pub target_size: u32,

    /// Cells per row and column
    #[serde(default = "default_grid_dim")]
    pub grid_dim: u32,

    /// Canvas color behind the tiles, as `#RRGGBB` or `#RGB`
    #[serde(default = "default_background")]
    pub background: String,

    /// Chance of leaving an opaque cell empty
    #[serde(default)]
    pub skip_probability: f64,

    /// Seed for cell skipping; unset means a fresh seed per request
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_target_size() -> u32 {
    900
}

fn default_grid_dim() -> u32 {
    75
}

fn default_background() -> String {
    "#FFFFFF".to_string()
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            target_size: default_target_size(),
            grid_dim: default_grid_dim(),
            background: default_background(),
            skip_probability: 0.0,
            seed: None,
        }
    }
}

/// Output encoding and request limits
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct OutputConfig {
    /// Re-compress PNGs with oxipng (smaller, slower)
    #[serde(default)]
    pub optimize_png: bool,

    /// Largest accepted upload in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_max_upload_bytes() -> usize {
    20 * 1024 * 1024
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            optimize_png: false,
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl AppConfig {
    /// Parse configuration from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self, MosaicError> {
        serde_yaml::from_str(content).map_err(|e| MosaicError::Configuration(e.to_string()))
    }

    /// Load configuration from a file, falling back to defaults.
    ///
    /// Without a path the defaults are used as-is. An unreadable file or
    /// invalid YAML logs a warning and also yields the defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::debug!("No config file set, using defaults");
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_yaml_str(&content) {
                Ok(config) => {
                    tracing::info!(
                        path = %path.display(),
                        library = %config.library.path.display(),
                        grid = config.mosaic.grid_dim,
                        size = config.mosaic.target_size,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, path = %path.display(), "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Load configuration the way the binary does: `CONFIG_FILE` selects
    /// the file and `EMOJI_LIBRARY` overrides the library path.
    pub fn load_from_env() -> Self {
        let config_file = std::env::var("CONFIG_FILE").ok().map(PathBuf::from);
        let library = std::env::var("EMOJI_LIBRARY").ok().map(PathBuf::from);
        Self::load(config_file.as_deref()).with_library_override(library)
    }

    /// Replace the library path when `path` is set.
    pub fn with_library_override(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.library.path = path;
        }
        self
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), MosaicError> {
        let fail = |msg: String| -> Result<(), MosaicError> { Err(MosaicError::Configuration(msg)) };

        if self.library.tile_edge == 0 {
            return fail("library.tile_edge must be positive".to_string());
        }
        if self.library.atlas_columns == 0 {
            return fail("library.atlas_columns must be positive".to_string());
        }
        if self.mosaic.target_size == 0 {
            return fail("mosaic.target_size must be positive".to_string());
        }
        if self.mosaic.grid_dim == 0 {
            return fail("mosaic.grid_dim must be positive".to_string());
        }
        if self.mosaic.grid_dim > self.mosaic.target_size {
            return fail(format!(
                "mosaic.grid_dim ({}) must not exceed mosaic.target_size ({})",
                self.mosaic.grid_dim, self.mosaic.target_size
            ));
        }
        if !(0.0..=1.0).contains(&self.mosaic.skip_probability) {
            return fail(format!(
                "mosaic.skip_probability must be within [0, 1], got {}",
                self.mosaic.skip_probability
            ));
        }
        self.background_rgb()?;
        Ok(())
    }

    /// Background color as RGB.
    pub fn background_rgb(&self) -> Result<[u8; 3], MosaicError> {
        parse_hex_color(&self.mosaic.background).ok_or_else(|| {
            MosaicError::Configuration(format!(
                "mosaic.background is not a hex color: {:?}",
                self.mosaic.background
            ))
        })
    }
}

/// Parse `#RRGGBB` or `#RGB` (the `#` is optional).
pub fn parse_hex_color(s: &str) -> Option<[u8; 3]> {
    let hex = s.trim().trim_start_matches('#');
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some([r, g, b])
        }
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
            Some([digit(0)?, digit(1)?, digit(2)?])
        }
        _ => None,
    }
}
