pub mod compositor;
pub mod decode;
pub mod encode;
pub mod fit;

pub use compositor::{compose, AtlasPixmap, Composite, CompositeOptions};
pub use decode::decode_image;
pub use encode::{encode_png, optimize_png};
pub use fit::{downsample, fit_and_crop};
