//! The intake pipeline: one source image, validated once, saved as variants.
//!
//! ```text
//! ImageIntake::new(config, source)
//!        │
//!        ├── validate()   limits (uploads only) → decode (memoized)
//!        │
//!        └── save(opts)   validate if needed → origin (uploads only) → variants
//! ```
//!
//! The image is decoded at most once per instance. When `limits.min_image_size`
//! is set the decode happens during the limit check and is reused by `save()`.
//!
//! ## Error State
//!
//! Every operation returns a `Result`, and the first failure is also kept on
//! the instance. From then on the instance is frozen: further `validate()` or
//! `save()` calls return the same error without doing any work, and
//! [`error_code`](ImageIntake::error_code) / [`error_message`](ImageIntake::error_message)
//! keep reporting it.

use std::path::PathBuf;

use crate::config::IntakeConfig;
use crate::error::{IntakeError, PipelineResult};
use crate::imaging::{DecodedImage, Dimensions, ImageBackend, RustBackend};
use crate::naming;
use crate::process::{self, SaveReport};
use crate::source::ImageSource;
use crate::validate;

/// Options for [`ImageIntake::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOptions {
    /// Output filename for every written file. Defaults to the source's name.
    pub filename: Option<String>,
    /// Output format name (`"png"`, `"jpg"`, ...). Defaults to the filename's
    /// extension. Only the codec changes; the filename is kept as given.
    pub format: Option<String>,
    /// Store the full-size image under `origin.dir`. Only uploads are stored.
    pub save_origin: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            filename: None,
            format: None,
            save_origin: true,
        }
    }
}

impl SaveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn without_origin(mut self) -> Self {
        self.save_origin = false;
        self
    }
}

/// Validate-then-save pipeline for a single image.
pub struct ImageIntake<B: ImageBackend = RustBackend> {
    config: IntakeConfig,
    source: Option<ImageSource>,
    backend: B,
    image: Option<DecodedImage>,
    filename: Option<String>,
    validated: bool,
    failure: Option<IntakeError>,
}

impl ImageIntake<RustBackend> {
    pub fn new(config: IntakeConfig, source: Option<ImageSource>) -> Self {
        Self::with_backend(config, source, RustBackend::new())
    }

    /// Intake for an untrusted upload. Declared size is the buffer length.
    pub fn from_buffer(config: IntakeConfig, bytes: Vec<u8>, filename: impl Into<String>) -> Self {
        Self::new(config, Some(ImageSource::from_buffer(bytes, filename)))
    }

    /// Intake for a trusted local file. Limits are not applied.
    pub fn from_file(config: IntakeConfig, path: impl Into<PathBuf>) -> Self {
        Self::new(config, Some(ImageSource::from_path(path)))
    }
}

impl<B: ImageBackend> ImageIntake<B> {
    pub fn with_backend(config: IntakeConfig, source: Option<ImageSource>, backend: B) -> Self {
        let filename = source.as_ref().and_then(ImageSource::filename);
        Self {
            config,
            source,
            backend,
            image: None,
            filename,
            validated: false,
            failure: None,
        }
    }

    /// Check the source against the configured limits and decode it.
    ///
    /// Limits apply to uploads only. Calling this again after success is a
    /// no-op.
    pub fn validate(&mut self) -> Result<(), IntakeError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        if self.validated {
            return Ok(());
        }
        let outcome = self.run_validation();
        self.record(outcome)?;
        self.validated = true;
        Ok(())
    }

    fn run_validation(&mut self) -> Result<(), IntakeError> {
        let Some(source) = self.source.as_ref().filter(|s| !s.is_empty()) else {
            return Err(IntakeError::NoFileSupplied);
        };
        let backend = &self.backend;
        let slot = &mut self.image;

        if let (ImageSource::Buffer(upload), Some(limits)) = (source, self.config.limits.as_ref()) {
            validate::check_upload(upload, limits, || {
                decode_once(backend, source, slot).map(DecodedImage::dimensions)
            })?;
        }
        decode_once(backend, source, slot)?;
        Ok(())
    }

    /// Write the origin (uploads only) and every configured variant.
    ///
    /// Runs [`validate`](Self::validate) first if it has not succeeded yet.
    pub fn save(&mut self, options: &SaveOptions) -> Result<SaveReport, IntakeError> {
        self.validate()?;
        let outcome = self.run_save(options);
        self.record(outcome)
    }

    fn run_save(&mut self, options: &SaveOptions) -> Result<SaveReport, IntakeError> {
        if let Some(name) = options.filename.as_deref().filter(|n| !n.is_empty()) {
            let plain = naming::plain_file_name(name).ok_or_else(|| {
                IntakeError::Storage(format!("Invalid output filename: {name}"))
            })?;
            self.filename = Some(plain.to_string());
        }
        let filename = self
            .filename
            .clone()
            .ok_or_else(|| IntakeError::Storage("Cannot determine an output filename.".into()))?;
        let format = options
            .format
            .as_deref()
            .map(|name| {
                naming::parse_format(name).ok_or_else(|| {
                    IntakeError::Storage(format!("Unsupported output format: {name}"))
                })
            })
            .transpose()?;

        let Some(source) = self.source.as_ref() else {
            return Err(IntakeError::NoFileSupplied);
        };
        let image = decode_once(&self.backend, source, &mut self.image)?;

        let mut report = SaveReport::default();
        if options.save_origin && source.is_upload() {
            let path = process::persist_origin(
                &self.backend,
                image,
                self.config.origin.as_ref(),
                &filename,
                format,
            )?;
            report.origin = Some(path);
        }
        report.variants = process::persist_variants(
            &self.backend,
            image,
            self.config.dimensions.as_ref(),
            &filename,
            format,
        )?;
        Ok(report)
    }

    fn record<T>(&mut self, outcome: Result<T, IntakeError>) -> Result<T, IntakeError> {
        if let Err(err) = &outcome {
            log::debug!("Intake failed with code {}: {}", err.code().as_i32(), err);
            self.failure = Some(err.clone());
        }
        outcome
    }

    /// `0` until something fails, then the failure's code.
    pub fn error_code(&self) -> i32 {
        self.failure.as_ref().map_or(0, |e| e.code().as_i32())
    }

    /// Empty until something fails, then the failure's message.
    pub fn error_message(&self) -> String {
        self.failure
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    pub fn error(&self) -> Option<&IntakeError> {
        self.failure.as_ref()
    }

    pub fn result(&self) -> PipelineResult {
        PipelineResult::from(self.failure.as_ref())
    }

    /// The decoded image, once validation has decoded it.
    pub fn image(&self) -> Option<&DecodedImage> {
        self.image.as_ref()
    }

    /// Filename used for written files.
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn source(&self) -> Option<&ImageSource> {
        self.source.as_ref()
    }

    pub fn config(&self) -> &IntakeConfig {
        &self.config
    }

    /// Pixel size of the source without a full decode.
    ///
    /// Uses the decoded image when there is one, otherwise asks the backend
    /// to read only the header. Does not affect the error state.
    pub fn probe_dimensions(&self) -> Result<Dimensions, IntakeError> {
        if let Some(image) = &self.image {
            return Ok(image.dimensions());
        }
        let source = self
            .source
            .as_ref()
            .filter(|s| !s.is_empty())
            .ok_or(IntakeError::NoFileSupplied)?;
        self.backend
            .identify(source)
            .map_err(|e| IntakeError::Decode(e.to_string()))
    }
}

/// Decode `source` into `slot` unless it already holds the image.
fn decode_once<'a, B: ImageBackend>(
    backend: &B,
    source: &ImageSource,
    slot: &'a mut Option<DecodedImage>,
) -> Result<&'a DecodedImage, IntakeError> {
    let image = match slot.take() {
        Some(image) => image,
        None => backend
            .decode(source)
            .map_err(|e| IntakeError::Decode(e.to_string()))?,
    };
    Ok(slot.insert(image))
}
