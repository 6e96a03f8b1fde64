//! The loaded emoji library and everything derived from it.
//!
//! A [`MosaicEngine`] is built once from a container and never mutated.
//! Readiness is carried by [`EngineState`]: code that needs an engine asks
//! the state for one and gets `NotReady` otherwise, so there is no
//! half-initialized engine to guard against.

use chrono::{DateTime, Utc};
use emoji_tiles::{Container, Palette, PaletteOptions, SpriteAtlas, TilesError};
use image::RgbaImage;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::MosaicError;
use crate::models::{AppConfig, MosaicSpec};
use crate::rendering::{compose, decode_image, AtlasPixmap, Composite, CompositeOptions};

/// Facts about the loaded library, reported by `/api/status` and `inspect`
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LibraryInfo {
    /// Container path as configured
    pub path: String,
    /// Container format version as `major.minor`
    pub version: String,
    /// Element type descriptor (`|u1` or `<f4`)
    pub dtype: String,
    /// Declared array shape
    pub shape: Vec<usize>,
    /// Number of emoji tiles
    pub tile_count: usize,
    /// Tile edge in pixels
    pub tile_edge: usize,
    /// Atlas width in pixels
    pub atlas_width: usize,
    /// Atlas height in pixels
    pub atlas_height: usize,
    /// SHA-256 of the container file, hex encoded
    pub sha256: String,
    /// When the library was loaded
    #[schema(value_type = String)]
    pub loaded_at: DateTime<Utc>,
}

/// Palette, atlas and settings for one library.
pub struct MosaicEngine {
    config: AppConfig,
    spec: MosaicSpec,
    options: CompositeOptions,
    palette: Palette,
    atlas: SpriteAtlas,
    atlas_pixmap: AtlasPixmap,
    info: LibraryInfo,
}

impl MosaicEngine {
    /// Build an engine from container bytes already in memory.
    pub fn from_container_bytes(bytes: &[u8], config: &AppConfig) -> Result<Self, MosaicError> {
        config.validate()?;
        let spec = MosaicSpec::from_config(config)?;
        let options = CompositeOptions::new()
            .background(config.background_rgb()?)
            .skip_probability(config.mosaic.skip_probability)
            .seed(config.mosaic.seed);

        let container = Container::parse(bytes)?;
        let version = format!("{}.{}", container.header.major, container.header.minor);
        let dtype = container.metadata.dtype.descr().to_string();
        let shape = container.metadata.shape.clone();
        let tiles = container.into_tiles(config.library.tile_edge)?;

        let palette_options = PaletteOptions::new()
            .ignore_transparent(config.library.ignore_transparent)
            .alpha_cutoff(config.library.alpha_cutoff);
        let palette = Palette::extract(&tiles, &palette_options).map_err(TilesError::from)?;
        let atlas =
            SpriteAtlas::build(&tiles, config.library.atlas_columns).map_err(TilesError::from)?;
        let atlas_pixmap = AtlasPixmap::from_atlas(&atlas)?;

        let info = LibraryInfo {
            path: config.library.path.display().to_string(),
            version,
            dtype,
            shape,
            tile_count: tiles.len(),
            tile_edge: config.library.tile_edge,
            atlas_width: atlas.width(),
            atlas_height: atlas.height(),
            sha256: hex::encode(Sha256::digest(bytes)),
            loaded_at: Utc::now(),
        };

        Ok(Self {
            config: config.clone(),
            spec,
            options,
            palette,
            atlas,
            atlas_pixmap,
            info,
        })
    }

    /// Read the configured container file and build an engine from it.
    pub fn load(config: &AppConfig) -> Result<Self, MosaicError> {
        let bytes = std::fs::read(&config.library.path)?;
        Self::from_container_bytes(&bytes, config)
    }

    /// Build a mosaic of a decoded photo.
    pub fn compose(&self, source: &RgbaImage) -> Result<Composite, MosaicError> {
        compose(
            source,
            &self.palette,
            &self.atlas_pixmap,
            self.spec,
            &self.options,
        )
    }

    /// Decode an uploaded photo and build its mosaic.
    pub fn compose_bytes(&self, bytes: &[u8]) -> Result<Composite, MosaicError> {
        let source = decode_image(bytes)?;
        self.compose(&source)
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn atlas(&self) -> &SpriteAtlas {
        &self.atlas
    }

    pub fn info(&self) -> &LibraryInfo {
        &self.info
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn spec(&self) -> MosaicSpec {
        self.spec
    }
}

/// Whether a usable engine exists.
#[derive(Clone, Default)]
pub enum EngineState {
    /// Nothing loaded yet
    #[default]
    Uninitialized,
    /// Loading failed; holds the reason
    Failed(String),
    /// Ready for requests
    Ready(Arc<MosaicEngine>),
}

impl EngineState {
    /// Load the configured library, capturing any failure in the state.
    pub fn initialize(config: &AppConfig) -> Self {
        match MosaicEngine::load(config) {
            Ok(engine) => Self::Ready(Arc::new(engine)),
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    /// The engine, or `NotReady` explaining why there is none.
    pub fn engine(&self) -> Result<Arc<MosaicEngine>, MosaicError> {
        match self {
            Self::Ready(engine) => Ok(engine.clone()),
            Self::Failed(reason) => Err(MosaicError::NotReady(reason.clone())),
            Self::Uninitialized => Err(MosaicError::NotReady(
                "emoji library has not been loaded".to_string(),
            )),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Short state name for status output
    pub fn label(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Failed(_) => "failed",
            Self::Ready(_) => "ready",
        }
    }

    /// Failure reason, if loading failed
    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}
