use std::sync::Arc;
use tokio::sync::RwLock;

use super::engine::{EngineState, LibraryInfo, MosaicEngine};
use crate::error::MosaicError;
use crate::models::AppConfig;

/// An encoded mosaic with its cell counts
#[derive(Debug, Clone)]
pub struct RenderedMosaic {
    /// PNG bytes
    pub png: Vec<u8>,
    /// Cells that received a tile
    pub placed: usize,
    /// Cells left showing the background
    pub skipped: usize,
    /// Cells per row and column
    pub grid_dim: u32,
}

/// Owns the engine state and runs mosaic requests against it.
///
/// The lock only guards swapping the engine on reload. Requests clone the
/// `Arc` and release the lock before composing.
pub struct MosaicService {
    config: AppConfig,
    state: RwLock<EngineState>,
}

impl MosaicService {
    /// Load the configured library. A load failure is recorded, not returned.
    pub fn new(config: AppConfig) -> Self {
        let state = EngineState::initialize(&config);
        log_state(&config, &state);
        Self::with_state(config, state)
    }

    /// Service around an existing state, without touching the filesystem
    pub fn with_state(config: AppConfig, state: EngineState) -> Self {
        Self {
            config,
            state: RwLock::new(state),
        }
    }

    /// Decode, compose and encode a mosaic.
    ///
    /// The CPU-bound work runs on the blocking thread pool.
    pub async fn render(&self, image_bytes: Vec<u8>) -> Result<RenderedMosaic, MosaicError> {
        let engine = self.engine().await?;

        tokio::task::spawn_blocking(move || {
            let composite = engine.compose_bytes(&image_bytes)?;
            let png = composite.encode_png(engine.config().output.optimize_png)?;
            Ok(RenderedMosaic {
                png,
                placed: composite.placed(),
                skipped: composite.skipped(),
                grid_dim: composite.spec().grid_dim,
            })
        })
        .await
        .map_err(|e| MosaicError::Task(e.to_string()))?
    }

    /// Rebuild the engine from the configured library file.
    ///
    /// On failure a previously ready engine stays in service.
    pub async fn reload(&self) -> Result<LibraryInfo, MosaicError> {
        let config = self.config.clone();
        let result = tokio::task::spawn_blocking(move || MosaicEngine::load(&config))
            .await
            .map_err(|e| MosaicError::Task(e.to_string()))?;

        let mut state = self.state.write().await;
        match result {
            Ok(engine) => {
                let info = engine.info().clone();
                *state = EngineState::Ready(Arc::new(engine));
                log_state(&self.config, &state);
                Ok(info)
            }
            Err(e) => {
                if state.is_ready() {
                    tracing::warn!(%e, "Library reload failed, keeping previous library");
                } else {
                    *state = EngineState::Failed(e.to_string());
                    log_state(&self.config, &state);
                }
                Err(e)
            }
        }
    }

    /// The ready engine, or `NotReady`
    pub async fn engine(&self) -> Result<Arc<MosaicEngine>, MosaicError> {
        self.state.read().await.engine()
    }

    /// Snapshot of the current state
    pub async fn state(&self) -> EngineState {
        self.state.read().await.clone()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

fn log_state(config: &AppConfig, state: &EngineState) {
    match state {
        EngineState::Ready(engine) => {
            let info = engine.info();
            tracing::info!(
                path = %info.path,
                tiles = info.tile_count,
                edge = info.tile_edge,
                dtype = %info.dtype,
                sha256 = %info.sha256,
                "Loaded emoji library"
            );
        }
        EngineState::Failed(reason) => {
            tracing::error!(
                path = %config.library.path.display(),
                error = %reason,
                "Failed to load emoji library, mosaic requests are disabled"
            );
        }
        EngineState::Uninitialized => {}
    }
}
