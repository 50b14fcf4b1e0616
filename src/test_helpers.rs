//! Shared test utilities: synthetic images and their encodings.
//!
//! Everything is generated in memory so unit tests never depend on fixture
//! files. Content is a smooth gradient, which keeps JPEG sizes roughly
//! proportional to pixel count.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;

use crate::acquire::Upload;

/// Smooth red/green gradient over a constant blue channel.
pub fn gradient_rgb(width: u32, height: u32) -> RgbImage {
    let w = (width.max(2) - 1) as f32;
    let h = (height.max(2) - 1) as f32;
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x as f32 * 255.0 / w) as u8,
            (y as f32 * 255.0 / h) as u8,
            128,
        ])
    })
}

fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
    bytes
}

/// Encode an RGB raster as PNG.
pub fn png_bytes(img: &RgbImage) -> Vec<u8> {
    encode(DynamicImage::ImageRgb8(img.clone()), ImageFormat::Png)
}

/// An RGBA PNG whose every pixel is fully transparent red.
pub fn rgba_png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 0]));
    encode(DynamicImage::ImageRgba8(img), ImageFormat::Png)
}

/// A gradient encoded as JPEG at the encoder's default quality.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(
        DynamicImage::ImageRgb8(gradient_rgb(width, height)),
        ImageFormat::Jpeg,
    )
}

/// An upload of an opaque gradient PNG.
pub fn png_upload(name: &str, width: u32, height: u32) -> Upload {
    Upload {
        name: name.to_string(),
        bytes: png_bytes(&gradient_rgb(width, height)),
    }
}
