pub mod decode;
pub mod dimensions;
pub mod encode;
pub mod orientation;
pub mod params;
pub mod resize;
pub mod transcoder;

pub use decode::decode_image;
pub use dimensions::{CropBox, calculate_cover_crop};
pub use encode::encode_image;
pub use orientation::Orientation;
pub use params::{Dimensions, OutputFormat, content_type_for_key};
pub use resize::resize_image;
pub use transcoder::{ImageTranscoder, Transcoder};
