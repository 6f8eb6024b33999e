pub mod types;

pub use types::{MediaError, StorageError, TransformError};
