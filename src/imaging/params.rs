//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the variant pipeline in [`process`](crate::process)
//! (which decides what files to write) and the [`backend`](super::backend)
//! (which does the actual codec work). This separation allows swapping
//! backends (e.g. for testing with a mock) without changing pipeline logic.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 100). Clamped on construction.
//! - [`Action`]: What a named variant does to the source: crop or scale.
//! - [`EncodeTarget`]: Where and how to write one image: directory, filename, format, quality.

use image::ImageFormat;
use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// Quality as the `u8` that encoders take.
    pub fn as_u8(self) -> u8 {
        u8::try_from(self.0.min(100)).unwrap_or(100)
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(100)
    }
}

/// Transformation applied by a named variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Scale to cover the target box, then center-crop to exactly fill it.
    Crop,
    /// Aspect-preserving resize driven by one axis.
    Scale,
}

impl Action {
    /// Parse the config spelling of an action (`"crop"` / `"scale"`).
    ///
    /// Matching is case-insensitive. Unknown names return `None`; the
    /// pipeline skips such variants instead of failing.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "crop" => Some(Self::Crop),
            "scale" => Some(Self::Scale),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Crop => "crop",
            Self::Scale => "scale",
        }
    }
}

/// Full specification for writing one image to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeTarget {
    /// Output directory; created recursively if missing.
    pub dir: PathBuf,
    /// File name inside `dir`. Kept as given even when `format` overrides the codec.
    pub filename: String,
    /// Explicit codec. `None` infers it from the filename extension.
    pub format: Option<ImageFormat>,
    pub quality: Quality,
}

impl EncodeTarget {
    /// Full output path (`dir/filename`).
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn quality_as_u8_never_wraps() {
        assert_eq!(Quality::new(300).as_u8(), 100);
        assert_eq!(Quality::new(0).as_u8(), 1);
        assert_eq!(Quality::new(85).as_u8(), 85);
    }

    #[test]
    fn quality_default_is_100() {
        assert_eq!(Quality::default().value(), 100);
    }

    #[test]
    fn action_names_are_case_insensitive() {
        assert_eq!(Action::from_name("crop"), Some(Action::Crop));
        assert_eq!(Action::from_name("Scale"), Some(Action::Scale));
        assert_eq!(Action::from_name(" CROP "), Some(Action::Crop));
    }

    #[test]
    fn action_unknown_name_is_none() {
        assert_eq!(Action::from_name("rotate"), None);
        assert_eq!(Action::from_name(""), None);
    }

    #[test]
    fn action_round_trips_through_name() {
        for action in [Action::Crop, Action::Scale] {
            assert_eq!(Action::from_name(action.as_str()), Some(action));
        }
    }

    #[test]
    fn encode_target_path_joins_dir_and_filename() {
        let target = EncodeTarget {
            dir: PathBuf::from("/media/thumb"),
            filename: "photo.png".into(),
            format: None,
            quality: Quality::default(),
        };
        assert_eq!(target.path(), PathBuf::from("/media/thumb/photo.png"));
    }
}
