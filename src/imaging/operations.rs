//! The transform engine: resize + JPEG re-encode.
//!
//! Both functions are pure over their inputs and may be called as often as the
//! caller likes; the session re-runs [`transform`] on every parameter change.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{Quality, TransformParams};
use image::RgbImage;
use tracing::debug;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Resized raster plus its JPEG encoding.
#[derive(Debug, Clone)]
pub struct TransformOutput {
    pub raster: RgbImage,
    pub bytes: Vec<u8>,
}

impl TransformOutput {
    /// Encoded size in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::of(&self.raster)
    }
}

/// Resize `source` to the exact target dimensions, then encode as JPEG.
pub fn transform(
    backend: &impl ImageBackend,
    source: &RgbImage,
    params: &TransformParams,
) -> Result<TransformOutput> {
    params.validate()?;
    let raster = backend.resize(source, params.width, params.height)?;
    let bytes = backend.encode_jpeg(&raster, params.quality)?;
    debug!(
        width = params.width,
        height = params.height,
        quality = params.quality.value(),
        bytes = bytes.len(),
        "transformed"
    );
    Ok(TransformOutput { raster, bytes })
}

/// Approximate the "before" size of an already-decoded image.
///
/// The true original byte size is gone once an image is decoded, so this
/// re-encodes at native dimensions with a fixed baseline quality. It is an
/// estimate for comparison, not the on-disk size.
pub fn estimate_baseline_size(
    backend: &impl ImageBackend,
    source: &RgbImage,
    baseline: Quality,
) -> Result<usize> {
    Ok(backend.encode_jpeg(source, baseline)?.len())
}
