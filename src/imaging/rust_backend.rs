//! Pure Rust image processing backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::load_from_memory` (format sniffed from magic bytes) |
//! | Normalize | `DynamicImage::to_rgb8` (drops alpha, widens grayscale) |
//! | Resize | `image::imageops::resize` with a configurable [`ResampleFilter`] |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder::new_with_quality` |

use super::backend::{BackendError, ImageBackend};
use super::params::Quality;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Resampling filter used for resizes.
///
/// All variants are deterministic. The default is Catmull-Rom (bicubic).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResampleFilter {
    Nearest,
    Triangle,
    #[default]
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl ResampleFilter {
    pub fn filter_type(self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Triangle => FilterType::Triangle,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Gaussian => FilterType::Gaussian,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Whether a file extension maps to a format whose decoder is compiled in.
pub fn is_decodable_extension(ext: &str) -> bool {
    ImageFormat::from_extension(ext).is_some_and(|fmt| fmt.reading_enabled())
}

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustBackend {
    filter: ResampleFilter,
}

impl RustBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(filter: ResampleFilter) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> ResampleFilter {
        self.filter
    }
}

/// Force a decoded image into opaque 8-bit RGB.
fn normalize(img: DynamicImage) -> RgbImage {
    match img {
        DynamicImage::ImageRgb8(rgb) => rgb,
        other => {
            if other.color().has_alpha() {
                debug!(color = ?other.color(), "discarding alpha channel");
            }
            other.to_rgb8()
        }
    }
}

impl ImageBackend for RustBackend {
    fn decode(&self, bytes: &[u8]) -> Result<RgbImage, BackendError> {
        let img = image::load_from_memory(bytes).map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(normalize(img))
    }

    fn resize(
        &self,
        source: &RgbImage,
        width: u32,
        height: u32,
    ) -> Result<RgbImage, BackendError> {
        if width == 0 || height == 0 {
            return Err(BackendError::InvalidParameter(format!(
                "cannot resize to {width}x{height}"
            )));
        }
        if source.dimensions() == (width, height) {
            return Ok(source.clone());
        }
        Ok(image::imageops::resize(
            source,
            width,
            height,
            self.filter.filter_type(),
        ))
    }

    fn encode_jpeg(&self, image: &RgbImage, quality: Quality) -> Result<Vec<u8>, BackendError> {
        let mut bytes = Vec::new();
        JpegEncoder::new_with_quality(&mut bytes, quality.value() as u8)
            .write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                ExtendedColorType::Rgb8,
            )
            .map_err(|e| BackendError::Encode(e.to_string()))?;
        Ok(bytes)
    }
}
