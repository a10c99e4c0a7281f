//! Image processing in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `ImageReader::into_dimensions` |
//! | **Decode** | `image` crate decoders, format sniffed from bytes |
//! | **Scale** | `resize_exact` with `Lanczos3` to truncated aspect-preserving size |
//! | **Crop** | scale-to-cover + centered `crop_imm` |
//! | **Encode** | `JpegEncoder` with quality, `write_to` for everything else |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for crop/scale geometry (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: Functions applying calculations to decoded pixels

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, DecodedImage, Dimensions, ImageBackend};
pub use calculations::{CropPlan, CropRegion, calculate_auto_crop, calculate_scale_dimensions};
pub use operations::{auto_crop, crop_region, render_variant, scale};
pub use params::{Action, EncodeTarget, Quality};
pub use rust_backend::RustBackend;
