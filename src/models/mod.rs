pub mod config;
pub mod mosaic_spec;

pub use config::{parse_hex_color, AppConfig, LibraryConfig, MosaicConfig, OutputConfig};
pub use mosaic_spec::MosaicSpec;
