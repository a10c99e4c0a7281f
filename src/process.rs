//! Variant pipeline: writing the origin and the named variants.
//!
//! Takes an already decoded image and the `origin` / `dimensions` config
//! sections and writes one file per variant through the backend.
//!
//! ## Failure Policy
//!
//! Everything here is fail-fast:
//!
//! - A variant missing `size`, `action`, `dir` or `quality` stops the run
//!   with a config error (41).
//! - The first write failure stops the run with a storage error (51).
//!
//! Variants written before the failure stay on disk. There is no rollback.
//!
//! Two situations are *not* failures and only skip the variant:
//!
//! - an `action` other than `crop` / `scale`
//! - a geometry that produces no image (e.g. a `scale` with size `[0, 0]`)
//!
//! ## Output Structure
//!
//! Every file keeps the same name; the directory tells variants apart:
//!
//! ```text
//! media/
//! ├── origin/photo.png    # full size, uploads only
//! ├── normal/photo.png    # scale [950, 0]
//! └── thumb/photo.png     # crop [256, 256]
//! ```

use crate::config::{DimensionSpec, OriginConfig};
use crate::error::IntakeError;
use crate::imaging::{
    Action, BackendError, DecodedImage, Dimensions, EncodeTarget, ImageBackend, Quality,
    render_variant,
};
use image::ImageFormat;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A variant whose config has every required key.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantSpec {
    pub name: String,
    /// `None` when the configured action is not recognized.
    pub action: Option<Action>,
    /// The action exactly as configured.
    pub action_name: String,
    pub size: Dimensions,
    pub dir: PathBuf,
    pub quality: Quality,
}

impl VariantSpec {
    /// Check that `spec` has all required keys.
    pub fn resolve(name: &str, spec: &DimensionSpec) -> Result<Self, IntakeError> {
        let section = format!("dimensions.{name}");
        let missing = |key: &str| IntakeError::config(section.clone(), format!("missing `{key}`"));

        let size = spec.size.ok_or_else(|| missing("size"))?;
        let action_name = spec.action.clone().ok_or_else(|| missing("action"))?;
        let dir = spec.dir.clone().ok_or_else(|| missing("dir"))?;
        let quality = spec.quality.ok_or_else(|| missing("quality"))?;

        Ok(Self {
            name: name.to_string(),
            action: Action::from_name(&action_name),
            action_name,
            size: size.into(),
            dir,
            quality: Quality::new(quality),
        })
    }
}

/// Why a variant produced no file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum SkipReason {
    /// The configured action is neither `crop` nor `scale`.
    UnknownAction(String),
    /// The size leaves nothing to render.
    EmptyGeometry,
}

/// What happened to one named variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum VariantOutcome {
    Written {
        name: String,
        path: PathBuf,
        width: u32,
        height: u32,
    },
    Skipped {
        name: String,
        reason: SkipReason,
    },
}

impl VariantOutcome {
    pub fn name(&self) -> &str {
        match self {
            Self::Written { name, .. } | Self::Skipped { name, .. } => name,
        }
    }
}

/// Everything one `save()` wrote.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SaveReport {
    /// Path of the stored original, if one was written.
    pub origin: Option<PathBuf>,
    /// One entry per configured variant, in name order.
    pub variants: Vec<VariantOutcome>,
}

impl SaveReport {
    /// Paths of every file written, origin first.
    pub fn written_paths(&self) -> Vec<&PathBuf> {
        self.origin
            .iter()
            .chain(self.variants.iter().filter_map(|v| match v {
                VariantOutcome::Written { path, .. } => Some(path),
                VariantOutcome::Skipped { .. } => None,
            }))
            .collect()
    }
}

/// Encode through the backend, turning any failure into a storage error.
///
/// Directory and codec failures share code 51 but log differently.
fn write<B: ImageBackend>(
    backend: &B,
    image: &DecodedImage,
    target: &EncodeTarget,
) -> Result<PathBuf, IntakeError> {
    backend.encode(image, target).map_err(|err| {
        match &err {
            BackendError::CreateDir { path, source } => {
                log::error!("Cannot create output directory {}: {}", path.display(), source);
            }
            other => {
                log::error!("Cannot write {}: {}", target.path().display(), other);
            }
        }
        IntakeError::Storage(err.to_string())
    })
}

/// Store the full-size image under `origin.dir`.
pub fn persist_origin<B: ImageBackend>(
    backend: &B,
    image: &DecodedImage,
    origin: Option<&OriginConfig>,
    filename: &str,
    format: Option<ImageFormat>,
) -> Result<PathBuf, IntakeError> {
    let origin = origin.ok_or_else(|| IntakeError::config("origin", "section is missing"))?;
    let dir = origin
        .dir
        .clone()
        .filter(|d| !d.as_os_str().is_empty())
        .ok_or_else(|| IntakeError::config("origin", "missing `dir`"))?;

    let target = EncodeTarget {
        dir,
        filename: filename.to_string(),
        format,
        quality: origin.quality(),
    };
    let path = write(backend, image, &target)?;
    log::info!(
        "Stored origin {}x{} at {}",
        image.width(),
        image.height(),
        path.display()
    );
    Ok(path)
}

/// Render and store every configured variant, in name order.
pub fn persist_variants<B: ImageBackend>(
    backend: &B,
    image: &DecodedImage,
    dimensions: Option<&BTreeMap<String, DimensionSpec>>,
    filename: &str,
    format: Option<ImageFormat>,
) -> Result<Vec<VariantOutcome>, IntakeError> {
    let dimensions =
        dimensions.ok_or_else(|| IntakeError::config("dimensions", "section is missing"))?;
    let mut outcomes = Vec::with_capacity(dimensions.len());

    for (name, spec) in dimensions {
        let variant = VariantSpec::resolve(name, spec)?;

        let Some(action) = variant.action else {
            log::warn!(
                "Skipping variant {name}: unknown action {:?}",
                variant.action_name
            );
            outcomes.push(VariantOutcome::Skipped {
                name: variant.name,
                reason: SkipReason::UnknownAction(variant.action_name),
            });
            continue;
        };

        let Some(rendered) = render_variant(image, action, variant.size) else {
            log::debug!(
                "Skipping variant {name}: {} to {}x{} renders nothing",
                action.as_str(),
                variant.size.width,
                variant.size.height
            );
            outcomes.push(VariantOutcome::Skipped {
                name: variant.name,
                reason: SkipReason::EmptyGeometry,
            });
            continue;
        };

        let target = EncodeTarget {
            dir: variant.dir,
            filename: filename.to_string(),
            format,
            quality: variant.quality,
        };
        let path = write(backend, &rendered, &target)?;
        log::info!(
            "Wrote {name} ({} {}x{}) to {}",
            action.as_str(),
            rendered.width(),
            rendered.height(),
            path.display()
        );
        outcomes.push(VariantOutcome::Written {
            name: variant.name,
            path,
            width: rendered.width(),
            height: rendered.height(),
        });
    }

    Ok(outcomes)
}
