//! Image codec backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations every backend must
//! support: identify, decode, and encode. Geometry never happens here; the
//! backend only turns bytes into pixels and pixels back into files.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate's pure-Rust codecs.

use super::params::EncodeTarget;
use crate::source::ImageSource;
use image::{DynamicImage, ImageFormat};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}")]
    Decode(String),
    #[error("Failed to encode {}: {message}", path.display())]
    Encode { path: PathBuf, message: String },
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

/// Pixel size of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

impl From<[u32; 2]> for Dimensions {
    fn from([width, height]: [u32; 2]) -> Self {
        Self { width, height }
    }
}

/// A decoded pixel buffer plus the container format it was read from.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pixels: DynamicImage,
    format: Option<ImageFormat>,
}

impl DecodedImage {
    pub fn new(pixels: DynamicImage, format: Option<ImageFormat>) -> Self {
        Self { pixels, format }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width(), self.height())
    }

    pub fn pixels(&self) -> &DynamicImage {
        &self.pixels
    }

    /// Format detected while decoding, if the codec reported one.
    pub fn format(&self) -> Option<ImageFormat> {
        self.format
    }

    /// Same source format, new pixels. Used after resize/crop.
    pub fn with_pixels(&self, pixels: DynamicImage) -> Self {
        Self {
            pixels,
            format: self.format,
        }
    }
}

/// Trait for codec backends.
///
/// Errors come back as [`BackendError`]; the intake decides whether a failure
/// is a decode error (code 12) or a storage error (code 51).
pub trait ImageBackend {
    /// Read image dimensions, decoding as little as the format allows.
    fn identify(&self, source: &ImageSource) -> Result<Dimensions, BackendError>;

    /// Fully decode the source into pixels.
    fn decode(&self, source: &ImageSource) -> Result<DecodedImage, BackendError>;

    /// Write `image` as described by `target`, creating the directory if
    /// missing. Returns the written path.
    fn encode(&self, image: &DecodedImage, target: &EncodeTarget) -> Result<PathBuf, BackendError>;
}
