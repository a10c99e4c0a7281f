//! Upload limit checks.
//!
//! Each configured key of `[limits]` maps to one [`Limit`] variant and one
//! checker. Limits run cheapest first (extension, declared size, then pixel
//! size, which needs a decode) and the first failure wins.

use std::collections::BTreeSet;

use crate::config::LimitsConfig;
use crate::error::IntakeError;
use crate::imaging::Dimensions;
use crate::naming;
use crate::source::Upload;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// One configured upload constraint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Limit<'a> {
    Formats(&'a BTreeSet<String>),
    MaxFileSize { megabytes: f64 },
    MinImageSize(Dimensions),
}

/// The limits set in `config`, in the order they are checked.
pub fn configured_limits(config: &LimitsConfig) -> Vec<Limit<'_>> {
    let mut limits = Vec::with_capacity(3);
    if let Some(formats) = &config.formats {
        limits.push(Limit::Formats(formats));
    }
    if let Some(megabytes) = config.max_file_size {
        limits.push(Limit::MaxFileSize { megabytes });
    }
    if let Some(min) = config.min_image_size {
        limits.push(Limit::MinImageSize(min.into()));
    }
    limits
}

/// Extension of the declared filename must be in `formats`.
pub fn check_format(filename: &str, formats: &BTreeSet<String>) -> Result<(), IntakeError> {
    let extension = naming::extension_of(filename);
    let allowed = extension.as_deref().is_some_and(|ext| {
        formats
            .iter()
            .any(|f| naming::normalize_extension(f) == ext)
    });
    if allowed {
        Ok(())
    } else {
        Err(IntakeError::UnsupportedFormat { extension })
    }
}

/// Declared size must not exceed `megabytes` MB. Exactly the limit passes.
///
/// Fractional limits are allowed: `0.5` means 512 KiB.
pub fn check_file_size(size: u64, megabytes: f64) -> Result<(), IntakeError> {
    if size as f64 > megabytes * BYTES_PER_MB {
        return Err(IntakeError::FileTooLarge {
            size,
            limit_mb: megabytes,
        });
    }
    Ok(())
}

/// Each axis must reach its minimum independently.
pub fn check_image_size(actual: Dimensions, minimum: Dimensions) -> Result<(), IntakeError> {
    if actual.width < minimum.width || actual.height < minimum.height {
        return Err(IntakeError::ImageTooSmall {
            width: actual.width,
            height: actual.height,
            min_width: minimum.width,
            min_height: minimum.height,
        });
    }
    Ok(())
}

/// Run every configured limit against `upload`.
///
/// `dimensions` is only called when a pixel-size limit is configured; it is
/// expected to decode the image (and cache the result) and may fail with a
/// decode error, which is returned as-is.
pub fn check_upload<F>(
    upload: &Upload,
    config: &LimitsConfig,
    mut dimensions: F,
) -> Result<(), IntakeError>
where
    F: FnMut() -> Result<Dimensions, IntakeError>,
{
    for limit in configured_limits(config) {
        let outcome = match limit {
            Limit::Formats(formats) => check_format(upload.filename(), formats),
            Limit::MaxFileSize { megabytes } => check_file_size(upload.size(), megabytes),
            Limit::MinImageSize(minimum) => check_image_size(dimensions()?, minimum),
        };
        if let Err(err) = outcome {
            log::warn!("Rejected upload {:?}: {}", upload.filename(), err);
            return Err(err);
        }
    }
    Ok(())
}
