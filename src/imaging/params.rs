//! Parameter types for the transform engine.
//!
//! These structs describe *what* to produce, not *how*. They sit between the
//! session (which owns the user's current choices) and the
//! [`backend`](super::backend) (which does the pixel work).
//!
//! ## Types
//!
//! - [`Quality`]: JPEG quality (10–100, default 85). Clamped by [`Quality::new`],
//!   rejected by [`Quality::try_new`].
//! - [`TransformParams`]: target width, height and quality for one preview.

use super::backend::{BackendError, Dimensions};
use serde::{Deserialize, Serialize};

/// JPEG encoding quality (10-100).
///
/// The inner value is private so a `Quality` is always in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quality(u32);

impl Quality {
    pub const MIN: u32 = 10;
    pub const MAX: u32 = 100;

    /// Quality used for the "estimated original size" re-encode.
    pub const BASELINE: Quality = Quality(85);

    /// Clamp any value into the valid range. This is what slider-style input uses.
    pub fn new(value: u32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    /// Validate without clamping.
    pub fn try_new(value: u32) -> Result<Self, BackendError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(BackendError::InvalidParameter(format!(
                "quality must be {}-{}, got {value}",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(85)
    }
}

impl TryFrom<u32> for Quality {
    type Error = BackendError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<Quality> for u32 {
    fn from(q: Quality) -> u32 {
        q.0
    }
}

/// Target of one transform: exact output dimensions plus JPEG quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransformParams {
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
}

impl TransformParams {
    /// Largest width or height a JPEG can hold.
    pub const MAX_DIMENSION: u32 = 65_535;

    pub fn new(width: u32, height: u32, quality: Quality) -> Result<Self, BackendError> {
        let params = Self {
            width,
            height,
            quality,
        };
        params.validate()?;
        Ok(params)
    }

    /// Defaults for a freshly selected image: native size, given quality.
    pub fn native(dims: Dimensions, quality: Quality) -> Self {
        Self {
            width: dims.width,
            height: dims.height,
            quality,
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            height: self.height,
        }
    }

    /// Width and height must be within `1..=MAX_DIMENSION`.
    pub fn validate(&self) -> Result<(), BackendError> {
        let range = 1..=Self::MAX_DIMENSION;
        if !range.contains(&self.width) || !range.contains(&self.height) {
            return Err(BackendError::InvalidParameter(format!(
                "target dimensions must be 1-{}, got {}x{}",
                Self::MAX_DIMENSION,
                self.width,
                self.height
            )));
        }
        Ok(())
    }
}
