//! Shared test utilities for the image-intake test suite.
//!
//! Synthetic images are generated on the fly so no binary fixtures are
//! needed. Every image is an RGB gradient, which compresses well and makes
//! crop offsets visible when a test inspects pixels.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let bytes = png_bytes(800, 600);
//! let tmp = tempfile::TempDir::new().unwrap();
//! write_png(&tmp.path().join("in/photo.png"), 64, 48);
//! ```

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::path::Path;

// =========================================================================
// Synthetic images
// =========================================================================

/// Gradient image: red follows x, green follows y.
pub fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(gradient(width, height))
        .write_to(&mut Cursor::new(&mut bytes), format)
        .unwrap();
    bytes
}

/// PNG-encoded gradient.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Png)
}

/// JPEG-encoded gradient (default encoder quality).
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Jpeg)
}

// =========================================================================
// Files
// =========================================================================

/// Write a PNG gradient to `path`, creating parent directories.
pub fn write_png(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, png_bytes(width, height)).unwrap();
}
