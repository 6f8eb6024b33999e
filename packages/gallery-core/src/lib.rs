pub mod cache;
pub mod constants;
pub mod errors;
pub mod gallery;
pub mod settings;
pub mod storage;
pub mod transform;
pub mod validation;

// 公開API
pub use cache::{DerivedAssetCache, derived_key};
pub use constants::{DEFAULT_QUALITY, DERIVED_PREFIX, MAX_DIMENSION, MAX_PIXELS, UPLOAD_PREFIX};
pub use errors::{MediaError, StorageError, TransformError};
pub use gallery::{Gallery, ListedImage, NO_FILES_MESSAGE, UploadFile, UploadedImage};
pub use settings::GallerySettings;
pub use storage::{MemoryObjectStore, ObjectStore, S3ObjectStore};
pub use transform::{
    Dimensions, ImageTranscoder, OutputFormat, Transcoder, content_type_for_key, decode_image,
    encode_image,
};
pub use validation::{parse_dimensions, upload_key, validate_dimensions, validate_key};
