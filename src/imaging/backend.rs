//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations the library and the
//! transform engine need: decode, resize, and JPEG encode. Everything works on
//! in-memory buffers; nothing here touches the filesystem.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests use the `MockBackend` below to check orchestration logic
//! without paying for real codecs.

use image::RgbImage;
use serde::Serialize;
use thiserror::Error;

use super::params::Quality;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Pixel dimensions of a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn of(image: &RgbImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} x {} px", self.width, self.height)
    }
}

/// Trait for image processing backends.
///
/// Implementations must be deterministic: the same inputs always give
/// byte-identical outputs.
pub trait ImageBackend: Sync {
    /// Decode an encoded image and normalize it to opaque RGB.
    ///
    /// Alpha is discarded, not composited.
    fn decode(&self, bytes: &[u8]) -> Result<RgbImage, BackendError>;

    /// Resample to exactly `width` x `height`. Upscaling is allowed.
    fn resize(&self, source: &RgbImage, width: u32, height: u32)
    -> Result<RgbImage, BackendError>;

    /// Encode as a self-contained JPEG byte buffer.
    fn encode_jpeg(&self, image: &RgbImage, quality: Quality) -> Result<Vec<u8>, BackendError>;
}
