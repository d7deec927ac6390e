//! Client-submitted media handling ahead of AI submission.
//!
//! Images are downscaled and recompressed to fit a size ceiling, checked
//! against fixed submission limits, and tagged by how an AI consumer can use
//! them. Everything here is synchronous and free of I/O so callers can run it
//! on a blocking thread.

pub mod classifier;
pub mod handle;
pub mod model;
pub mod optimizer;
pub mod route;
pub mod validator;

pub use classifier::{ClassifiedMedia, MediaClassification, ProcessingMethod, classify_media};
pub use model::{
    MediaKind, MediaOptimizationOptions, OptimizedMedia, PreparedMedia, RawMedia, estimate_size,
};
pub use optimizer::{OptimizedMediaSet, optimize_image, optimize_media_set};
pub use validator::{MediaValidation, validate_media};

#[derive(thiserror::Error, Debug)]
pub enum MediaError {
    #[error("Media payload is not a data URI")]
    InvalidDataUri,
    #[error("Only base64 encoded data URIs are supported")]
    UnsupportedEncoding,
    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Image could not be decoded: {0}")]
    Decode(image::ImageError),
    #[error("Image could not be encoded: {0}")]
    Encode(image::ImageError),
}
