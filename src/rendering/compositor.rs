//! Mosaic composition onto a tiny-skia canvas.
//!
//! The photo is fitted to the square target, sampled down to one pixel per
//! cell, and each opaque cell is replaced by the best-matching emoji from the
//! atlas, scaled to the cell size.

use emoji_tiles::{Palette, SpriteAtlas};
use image::RgbaImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tiny_skia::{Color, ColorU8, FilterQuality, IntRect, Pixmap, PixmapPaint, Transform};

use super::encode::{encode_png, optimize_png};
use super::fit::{downsample, fit_and_crop};
use crate::error::MosaicError;
use crate::models::MosaicSpec;

/// Per-request composition options.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeOptions {
    /// Canvas color behind the tiles
    pub background: [u8; 3],
    /// Chance of leaving an opaque cell empty, in `[0, 1]`
    pub skip_probability: f64,
    /// Seed for skipping; `None` draws a fresh seed
    pub seed: Option<u64>,
}

impl Default for CompositeOptions {
    fn default() -> Self {
        Self {
            background: [255, 255, 255],
            skip_probability: 0.0,
            seed: None,
        }
    }
}

impl CompositeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn background(mut self, rgb: [u8; 3]) -> Self {
        self.background = rgb;
        self
    }

    pub fn skip_probability(mut self, p: f64) -> Self {
        self.skip_probability = p;
        self
    }

    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}

/// The atlas as a premultiplied pixmap, ready for blitting.
pub struct AtlasPixmap {
    pixmap: Pixmap,
    columns: usize,
    edge: u32,
    count: usize,
}

impl AtlasPixmap {
    /// Convert the straight-alpha atlas raster to premultiplied form.
    pub fn from_atlas(atlas: &SpriteAtlas) -> Result<Self, MosaicError> {
        let mut pixmap = Pixmap::new(atlas.width() as u32, atlas.height() as u32)
            .ok_or(MosaicError::PixmapAllocation)?;

        for (dst, src) in pixmap
            .pixels_mut()
            .iter_mut()
            .zip(atlas.rgba().chunks_exact(4))
        {
            *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
        }

        Ok(Self {
            pixmap,
            columns: atlas.columns(),
            edge: atlas.tile_edge() as u32,
            count: atlas.tile_count(),
        })
    }

    /// Tile edge in pixels
    pub fn tile_edge(&self) -> u32 {
        self.edge
    }

    /// Copy tile `index` into its own pixmap.
    ///
    /// Sampling a standalone copy keeps bilinear filtering from pulling in
    /// neighbouring atlas tiles.
    pub fn tile(&self, index: usize) -> Option<Pixmap> {
        if index >= self.count {
            return None;
        }
        let x = (index % self.columns) as u32 * self.edge;
        let y = (index / self.columns) as u32 * self.edge;
        let rect = IntRect::from_xywh(x as i32, y as i32, self.edge, self.edge)?;
        self.pixmap.clone_rect(rect)
    }
}

/// A finished mosaic.
pub struct Composite {
    pixmap: Pixmap,
    spec: MosaicSpec,
    cells: Vec<Option<usize>>,
}

impl Composite {
    /// Output width in pixels
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Output height in pixels
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Geometry the mosaic was built with
    pub fn spec(&self) -> MosaicSpec {
        self.spec
    }

    /// Tile placed in each cell (row-major), `None` where the cell was skipped
    pub fn cells(&self) -> &[Option<usize>] {
        &self.cells
    }

    /// Tile placed at cell `(x, y)`
    pub fn cell(&self, x: u32, y: u32) -> Option<usize> {
        let grid = self.spec.grid_dim;
        if x >= grid || y >= grid {
            return None;
        }
        self.cells[(y * grid + x) as usize]
    }

    /// Number of cells that received a tile
    pub fn placed(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Number of cells left showing the background
    pub fn skipped(&self) -> usize {
        self.cells.len() - self.placed()
    }

    /// Straight-alpha RGBA pixels, row-major
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect()
    }

    /// Encode as an RGB PNG (the canvas is always opaque).
    pub fn encode_png(&self, optimize: bool) -> Result<Vec<u8>, MosaicError> {
        let rgb: Vec<u8> = self
            .pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue()]
            })
            .collect();

        let png = encode_png(
            self.width(),
            self.height(),
            png::ColorType::Rgb,
            &rgb,
            optimize,
        )?;
        Ok(if optimize { optimize_png(png) } else { png })
    }
}

/// Build a mosaic of `source` from the palette and atlas.
///
/// Cells whose sampled alpha is zero are always skipped. With a positive
/// `skip_probability` opaque cells are skipped at random as well; otherwise
/// no random numbers are drawn and the result depends only on the inputs.
pub fn compose(
    source: &RgbaImage,
    palette: &Palette,
    atlas: &AtlasPixmap,
    spec: MosaicSpec,
    options: &CompositeOptions,
) -> Result<Composite, MosaicError> {
    if !(0.0..=1.0).contains(&options.skip_probability) {
        return Err(MosaicError::Configuration(format!(
            "skip probability must be within [0, 1], got {}",
            options.skip_probability
        )));
    }
    if source.width() == 0 || source.height() == 0 {
        return Err(MosaicError::Decode("image has no pixels".to_string()));
    }

    let fitted = fit_and_crop(source, spec.target_size);
    let grid = downsample(&fitted, spec.grid_dim);

    let mut canvas =
        Pixmap::new(spec.target_size, spec.target_size).ok_or(MosaicError::PixmapAllocation)?;
    let [r, g, b] = options.background;
    canvas.fill(Color::from_rgba8(r, g, b, 255));

    let mut rng = (options.skip_probability > 0.0).then(|| match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    });

    let scale = spec.cell_size() / atlas.tile_edge() as f32;
    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..Default::default()
    };

    let mut tiles: HashMap<usize, Pixmap> = HashMap::new();
    let mut cells = Vec::with_capacity(spec.cell_count());

    for (x, y, px) in grid.enumerate_pixels() {
        let [pr, pg, pb, pa] = px.0;
        if pa == 0 {
            cells.push(None);
            continue;
        }
        if let Some(rng) = rng.as_mut() {
            if rng.gen_bool(options.skip_probability) {
                cells.push(None);
                continue;
            }
        }

        let index = emoji_tiles::nearest([pr, pg, pb], palette);
        let tile = match tiles.entry(index) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => e.insert(atlas.tile(index).ok_or_else(|| {
                MosaicError::Format(format!("palette entry {index} has no atlas tile"))
            })?),
        };

        let (ox, oy) = spec.cell_origin(x, y);
        let transform = Transform::from_scale(scale, scale).post_translate(ox, oy);
        canvas.draw_pixmap(0, 0, tile.as_ref(), &paint, transform, None);
        cells.push(Some(index));
    }

    Ok(Composite {
        pixmap: canvas,
        spec,
        cells,
    })
}
