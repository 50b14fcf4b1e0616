//! Image processing in pure Rust, entirely in memory.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode + normalize** | `image::load_from_memory` → opaque RGB8 |
//! | **Resize** | `imageops::resize`, exact dimensions, configurable filter |
//! | **Encode** | `JpegEncoder` with quality 10–100 |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for size comparison and aspect math (unit testable)
//! - **Parameters**: [`Quality`] and [`TransformParams`]
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: The transform engine, [`transform`] and [`estimate_baseline_size`]

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{SizeChange, height_for_width, kilobytes, width_for_height};
pub use operations::{TransformOutput, estimate_baseline_size, transform};
pub use params::{Quality, TransformParams};
pub use rust_backend::{ResampleFilter, RustBackend, is_decodable_extension};
