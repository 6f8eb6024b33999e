pub mod key;
pub mod params;

pub use key::{upload_key, validate_key};
pub use params::{parse_dimensions, validate_dimensions, validate_quality};
