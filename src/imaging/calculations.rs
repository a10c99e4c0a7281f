//! Pure calculation functions for variant geometry.
//!
//! All functions here are pure and testable without any I/O or images.
//!
//! Every division truncates toward zero. A 3:2 source scaled to a width of
//! 100 becomes `100x66`, never `100x67`; the crop step is computed on that
//! same truncated grid so the two never disagree about where the pixels are.

use super::backend::Dimensions;

/// Rectangle inside a resized image, in pixels from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    /// Region covering an entire image of the given size.
    pub fn full(dims: Dimensions) -> Self {
        Self {
            x: 0,
            y: 0,
            width: dims.width,
            height: dims.height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// The region as a `(left, top, right, bottom)` box.
    pub fn as_box(&self) -> (u32, u32, u32, u32) {
        (self.x, self.y, self.right(), self.bottom())
    }
}

/// Two-step recipe for a crop variant: resize to `resize`, then cut `region`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropPlan {
    /// Uniformly scaled size that covers the target box.
    pub resize: Dimensions,
    /// Centered region of the resized image with exactly the target size.
    pub region: CropRegion,
}

impl CropPlan {
    /// The part of a `source`-sized image that ends up in `region`.
    ///
    /// Cropping this out of the source and resizing it to the target gives
    /// the same framing as resizing first, without ever holding the full
    /// resized image. The result is at least one pixel on each axis and
    /// lies inside `source`.
    pub fn source_region(&self, source: Dimensions) -> CropRegion {
        let resize_w = self.resize.width.max(1);
        let resize_h = self.resize.height.max(1);
        let x = truncating_ratio(self.region.x, source.width, resize_w)
            .min(source.width.saturating_sub(1));
        let y = truncating_ratio(self.region.y, source.height, resize_h)
            .min(source.height.saturating_sub(1));
        let width = truncating_ratio(self.region.width, source.width, resize_w)
            .clamp(1, (source.width - x).max(1));
        let height = truncating_ratio(self.region.height, source.height, resize_h)
            .clamp(1, (source.height - y).max(1));
        CropRegion {
            x,
            y,
            width,
            height,
        }
    }
}

fn truncating_ratio(value: u32, numerator: u32, denominator: u32) -> u32 {
    let scaled = u64::from(value) * u64::from(numerator) / u64::from(denominator);
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// Scale so the width becomes `width`, deriving the height.
fn scale_to_width(source: Dimensions, width: u32) -> Dimensions {
    Dimensions {
        width,
        height: truncating_ratio(source.height, width, source.width),
    }
}

/// Scale so the height becomes `height`, deriving the width.
fn scale_to_height(source: Dimensions, height: u32) -> Dimensions {
    Dimensions {
        width: truncating_ratio(source.width, height, source.height),
        height,
    }
}

/// Offset that centers `span` inside `extent`, using the half-extent minus
/// half-span rule (`extent / 2 - span / 2`).
fn center_offset(extent: u32, span: u32) -> u32 {
    (extent / 2).saturating_sub(span / 2)
}

/// Calculate the output size of an aspect-preserving scale.
///
/// The non-zero axis of `target` drives the scale and the other axis is
/// derived from the source aspect ratio. When both are non-zero, width wins.
///
/// # Returns
/// * `None` if neither target axis is set or the source is empty
/// * `Some(dims)` otherwise; a derived axis that truncates to zero is
///   raised to one pixel
///
/// # Examples
/// ```
/// # use image_intake::imaging::{Dimensions, calculate_scale_dimensions};
/// let source = Dimensions { width: 800, height: 600 };
/// let scaled = calculate_scale_dimensions(source, Dimensions { width: 400, height: 0 });
/// assert_eq!(scaled, Some(Dimensions { width: 400, height: 300 }));
/// ```
pub fn calculate_scale_dimensions(source: Dimensions, target: Dimensions) -> Option<Dimensions> {
    if source.width == 0 || source.height == 0 {
        return None;
    }

    let scaled = if target.width > 0 {
        scale_to_width(source, target.width)
    } else if target.height > 0 {
        scale_to_height(source, target.height)
    } else {
        return None;
    };

    Some(Dimensions {
        width: scaled.width.max(1),
        height: scaled.height.max(1),
    })
}

/// Calculate the scale-to-cover and centered crop for a crop variant.
///
/// Portrait and square sources try a width-driven scale first; landscape
/// sources try height-driven. If that first scale leaves the other axis short
/// of the target, the other axis drives instead. The overflowing axis is then
/// cropped around the center, so the region always has exactly the target size.
///
/// # Returns
/// * `None` if either target axis is zero (nothing sensible to fill) or the
///   source is empty
/// * `Some(plan)` otherwise
///
/// # Examples
/// ```
/// # use image_intake::imaging::{Dimensions, calculate_auto_crop};
/// // 800x600 landscape into a 100x100 box: scale to 133x100, cut x=16..116
/// let plan = calculate_auto_crop(
///     Dimensions { width: 800, height: 600 },
///     Dimensions { width: 100, height: 100 },
/// )
/// .unwrap();
/// assert_eq!(plan.resize, Dimensions { width: 133, height: 100 });
/// assert_eq!(plan.region.as_box(), (16, 0, 116, 100));
/// ```
pub fn calculate_auto_crop(source: Dimensions, target: Dimensions) -> Option<CropPlan> {
    if target.width == 0 || target.height == 0 {
        return None;
    }
    if source.width == 0 || source.height == 0 {
        return None;
    }

    let resize = if source.width <= source.height {
        let by_width = scale_to_width(source, target.width);
        if by_width.height < target.height {
            scale_to_height(source, target.height)
        } else {
            by_width
        }
    } else {
        let by_height = scale_to_height(source, target.height);
        if by_height.width < target.width {
            scale_to_width(source, target.width)
        } else {
            by_height
        }
    };

    let region = CropRegion {
        x: center_offset(resize.width, target.width),
        y: center_offset(resize.height, target.height),
        width: target.width,
        height: target.height,
    };

    Some(CropPlan { resize, region })
}
