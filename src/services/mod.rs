pub mod composite_store;
pub mod engine;
pub mod mosaic_service;

pub use composite_store::{CompositeStore, LatestComposite};
pub use engine::{EngineState, LibraryInfo, MosaicEngine};
pub use mosaic_service::{MosaicService, RenderedMosaic};
