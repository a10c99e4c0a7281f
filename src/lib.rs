//! # Image Intake
//!
//! Accepts one image (an untrusted upload or a trusted local file), checks it
//! against configurable limits, and writes a set of named resized or cropped
//! variants plus, for uploads, the original.
//!
//! # Architecture: Validate, Then Save
//!
//! ```text
//! ImageSource ──► validate()                       ──► save()
//!                 1. limits (uploads only)             3. origin   (uploads only)
//!                    formats → size → pixel size       4. variants (name order)
//!                 2. decode (once, memoized)              geometry → encode
//! ```
//!
//! Every failure maps to a fixed numeric code (see [`error`]). The first
//! failure freezes the [`ImageIntake`]: later calls return it again.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`intake`] | [`ImageIntake`]: the validate/save entry point, memoized decode, error state |
//! | [`validate`] | Upload limits as a closed enumeration plus one checker per limit |
//! | [`process`] | Variant pipeline: origin and named variants, fail-fast |
//! | [`imaging`] | Crop/scale geometry, pixel operations, codec backend |
//! | [`config`] | `intake.toml` loading, validation, stock documented config |
//! | [`source`] | Upload buffer vs. local file |
//! | [`naming`] | Extension and output format helpers |
//! | [`error`] | Error codes, [`IntakeError`], [`PipelineResult`] |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Crop Fills, Scale Fits
//!
//! A `crop` variant always comes out at exactly the configured size: the image
//! is scaled until it covers the box, then the overflow is cut off equally on
//! both sides. A `scale` variant never crops; one axis is configured and the
//! other follows the aspect ratio. All geometry lives in pure functions in
//! [`imaging`] and uses truncating integer arithmetic, so the same input
//! always yields the same pixels.
//!
//! ## Extension, Not Content, Decides the Format Check
//!
//! `limits.formats` is compared against the extension of the *declared*
//! filename. The decoder then sniffs the real format from the bytes. A file
//! named `.jpg` that holds PNG data passes the check and decodes as PNG.
//!
//! ## Fail-Fast Variants
//!
//! The first malformed variant or failed write stops the run. Files already
//! written stay on disk; callers who need all-or-nothing semantics write to a
//! staging directory.
//!
//! ## Pure-Rust Codecs
//!
//! Decoding and encoding use the `image` crate's pure-Rust codecs. No system
//! libraries are needed, and the [`imaging::ImageBackend`] trait lets tests
//! swap in a recording mock.

pub mod config;
pub mod error;
pub mod imaging;
pub mod intake;
pub mod naming;
pub mod output;
pub mod process;
pub mod source;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use config::IntakeConfig;
pub use error::{ErrorCode, IntakeError, PipelineResult};
pub use intake::{ImageIntake, SaveOptions};
pub use process::{SaveReport, SkipReason, VariantOutcome};
pub use source::{ImageSource, Upload};
