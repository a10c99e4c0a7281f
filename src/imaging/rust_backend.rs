//! Pure Rust codec backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `ImageReader::into_dimensions` (header only) |
//! | Decode (JPEG, PNG, GIF, BMP, TIFF, WebP) | `ImageReader::with_guessed_format` + `decode` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` with the target quality |
//! | Encode → other formats | `DynamicImage::write_to` (quality does not apply) |
//!
//! The container format is sniffed from the bytes, not taken from the
//! filename, so a PNG uploaded as `photo.jpg` still decodes.

use super::backend::{BackendError, DecodedImage, Dimensions, ImageBackend};
use super::params::{EncodeTarget, Quality};
use crate::source::ImageSource;
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage, ImageFormat, ImageReader};
use std::fs::File;
use std::io::{BufRead, BufWriter, Cursor, Seek, Write};
use std::path::{Path, PathBuf};

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_error(e: image::ImageError) -> BackendError {
    BackendError::Decode(e.to_string())
}

fn decode_reader<R: BufRead + Seek>(reader: ImageReader<R>) -> Result<DecodedImage, BackendError> {
    let reader = reader.with_guessed_format()?;
    let format = reader.format();
    let pixels = reader.decode().map_err(decode_error)?;
    Ok(DecodedImage::new(pixels, format))
}

fn identify_reader<R: BufRead + Seek>(reader: ImageReader<R>) -> Result<Dimensions, BackendError> {
    let (width, height) = reader
        .with_guessed_format()?
        .into_dimensions()
        .map_err(decode_error)?;
    Ok(Dimensions { width, height })
}

/// Pick the encoder: explicit format, else the filename extension.
fn resolve_format(target: &EncodeTarget) -> Result<ImageFormat, BackendError> {
    let format = match target.format {
        Some(format) => format,
        None => ImageFormat::from_path(Path::new(&target.filename))
            .map_err(|_| BackendError::UnsupportedFormat(target.filename.clone()))?,
    };
    if !format.writing_enabled() {
        return Err(BackendError::UnsupportedFormat(format!("{format:?}")));
    }
    Ok(format)
}

/// Create `dir` and any missing parents.
///
/// `create_dir_all` succeeds when the directory already exists, including
/// when a concurrent writer created it between our check and our call.
fn ensure_dir(dir: &Path) -> Result<(), BackendError> {
    std::fs::create_dir_all(dir).map_err(|source| BackendError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

fn write_image<W: Write + Seek>(
    img: &DynamicImage,
    writer: &mut W,
    format: ImageFormat,
    quality: Quality,
) -> image::ImageResult<()> {
    match format {
        ImageFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(writer, quality.as_u8());
            match img.color() {
                ColorType::L8 | ColorType::Rgb8 => img.write_with_encoder(encoder),
                // JPEG has no alpha or 16-bit channels
                _ => DynamicImage::ImageRgb8(img.to_rgb8()).write_with_encoder(encoder),
            }
        }
        other => img.write_to(writer, other),
    }
}

impl ImageBackend for RustBackend {
    fn identify(&self, source: &ImageSource) -> Result<Dimensions, BackendError> {
        match source {
            ImageSource::Buffer(upload) => {
                identify_reader(ImageReader::new(Cursor::new(upload.bytes())))
            }
            ImageSource::File(path) => identify_reader(ImageReader::open(path)?),
        }
    }

    fn decode(&self, source: &ImageSource) -> Result<DecodedImage, BackendError> {
        let decoded = match source {
            ImageSource::Buffer(upload) => {
                decode_reader(ImageReader::new(Cursor::new(upload.bytes())))?
            }
            ImageSource::File(path) => decode_reader(ImageReader::open(path)?)?,
        };
        log::debug!(
            "Decoded {}x{} image ({:?})",
            decoded.width(),
            decoded.height(),
            decoded.format()
        );
        Ok(decoded)
    }

    fn encode(&self, image: &DecodedImage, target: &EncodeTarget) -> Result<PathBuf, BackendError> {
        let format = resolve_format(target)?;
        ensure_dir(&target.dir)?;

        let path = target.path();
        let mut writer = BufWriter::new(File::create(&path)?);
        write_image(image.pixels(), &mut writer, format, target.quality).map_err(|e| {
            BackendError::Encode {
                path: path.clone(),
                message: e.to_string(),
            }
        })?;
        writer.flush()?;
        Ok(path)
    }
}
