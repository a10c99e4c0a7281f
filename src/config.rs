//! Intake configuration module.
//!
//! Handles loading and validating the `intake.toml` file that describes what
//! an upload must satisfy and which files to derive from it.
//!
//! ## Configuration Options
//!
//! ```toml
//! # Every section is optional.
//!
//! [limits]                      # Only applied to uploads, never to local files
//! formats = ["jpg", "png"]      # Allowed filename extensions (case-insensitive)
//! max_file_size = 10            # Megabytes (1 MB = 1024 * 1024 bytes), 0.5 allowed
//! min_image_size = [950, 280]   # Minimum width and height in pixels
//!
//! [origin]                      # Where to keep the full-size upload
//! dir = "media/origin"
//! quality = 100                 # Optional, defaults to 100
//!
//! [dimensions.thumb]            # One table per named variant
//! action = "crop"               # Fill the box exactly, cropping the overflow
//! size = [256, 256]
//! dir = "media/thumb"
//! quality = 90
//!
//! [dimensions.normal]
//! action = "scale"              # Keep aspect ratio; set one axis, leave the other 0
//! size = [950, 0]
//! dir = "media/normal"
//! quality = 90
//! ```
//!
//! ## Parse Time vs. Save Time
//!
//! Every key parses as optional. A variant missing `quality`, or an `origin`
//! without `dir`, loads fine and is reported as a config error (code 41) when
//! `save()` reaches it. Unknown keys, on the other hand, are rejected at load
//! to catch typos early.

use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::imaging::Quality;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Intake configuration loaded from `intake.toml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntakeConfig {
    /// Checks applied to uploads before they are accepted.
    pub limits: Option<LimitsConfig>,
    /// Where to store the full-size upload.
    pub origin: Option<OriginConfig>,
    /// Named variants to derive, processed in name order.
    pub dimensions: Option<BTreeMap<String, DimensionSpec>>,
}

/// Upload constraints. Unset fields are not checked.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    /// Allowed extensions, compared lower-cased without the dot.
    pub formats: Option<BTreeSet<String>>,
    /// Maximum declared size in megabytes. Integers and fractions both parse.
    pub max_file_size: Option<f64>,
    /// Minimum `[width, height]` in pixels.
    pub min_image_size: Option<[u32; 2]>,
}

/// Storage for the full-size image.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OriginConfig {
    pub dir: Option<PathBuf>,
    pub quality: Option<u32>,
}

impl OriginConfig {
    /// Configured quality, clamped to 1-100. Defaults to 100.
    pub fn quality(&self) -> Quality {
        self.quality.map(Quality::new).unwrap_or_default()
    }
}

/// One named variant as written in the config.
///
/// All four keys are required for the variant to be processed; a missing key
/// is reported when saving, not when loading.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DimensionSpec {
    /// `"crop"` or `"scale"`. Other values are skipped.
    pub action: Option<String>,
    /// Target `[width, height]`. For `scale`, leave the derived axis at 0.
    pub size: Option<[u32; 2]>,
    pub dir: Option<PathBuf>,
    pub quality: Option<u32>,
}

impl IntakeConfig {
    /// Parse a config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, or return the empty config if it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("No config at {}, using empty config", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Validate values that can be checked without an image.
    ///
    /// Missing keys are not errors here; see the [module docs](self).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(limits) = &self.limits {
            if limits.formats.as_ref().is_some_and(|f| f.is_empty()) {
                return Err(ConfigError::Validation(
                    "limits.formats must not be empty".into(),
                ));
            }
            if let Some(mb) = limits.max_file_size {
                if !mb.is_finite() || mb < 0.0 {
                    return Err(ConfigError::Validation(format!(
                        "limits.max_file_size must be a non-negative number, got {mb}"
                    )));
                }
            }
        }
        if let Some(q) = self.origin.as_ref().and_then(|o| o.quality) {
            check_quality("origin.quality", q)?;
        }
        for (name, spec) in self.dimensions.iter().flatten() {
            if let Some(q) = spec.quality {
                check_quality(&format!("dimensions.{name}.quality"), q)?;
            }
        }
        Ok(())
    }
}

fn check_quality(key: &str, value: u32) -> Result<(), ConfigError> {
    if !(1..=100).contains(&value) {
        return Err(ConfigError::Validation(format!("{key} must be 1-100")));
    }
    Ok(())
}

/// Returns a fully-commented stock `intake.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Image Intake Configuration
# ==========================
# Every section is optional. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Upload limits
# ---------------------------------------------------------------------------
# Applied only to uploaded buffers. Local files passed with --trusted skip
# these checks.
[limits]
# Allowed filename extensions, compared case-insensitively without the dot.
formats = ["jpg", "jpeg", "png", "gif", "bmp", "webp"]

# Maximum declared upload size in megabytes (1 MB = 1024 * 1024 bytes).
# Fractions are allowed: 0.5 is 512 KiB.
max_file_size = 10

# Minimum [width, height] in pixels. Requires decoding the image.
# min_image_size = [950, 280]

# ---------------------------------------------------------------------------
# Original image
# ---------------------------------------------------------------------------
# Uploads are stored here at full size unless --no-origin is given.
[origin]
dir = "media/origin"
quality = 100

# ---------------------------------------------------------------------------
# Variants
# ---------------------------------------------------------------------------
# One table per named variant. All four keys are required.
#
#   action  "crop"    scale to cover the box, then center-crop to fill it
#           "scale"   keep aspect ratio; set one axis and leave the other 0
#   size    [width, height]
#   dir     output directory (created if missing)
#   quality 1-100, used by lossy encoders (JPEG)
#
# Variants are written in name order. The first write failure stops the run;
# variants already written stay on disk.

[dimensions.thumb]
action = "crop"
size = [256, 256]
dir = "media/thumb"
quality = 90

[dimensions.normal]
action = "scale"
size = [950, 0]
dir = "media/normal"
quality = 90
"##
}
