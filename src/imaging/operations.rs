//! High-level image operations.
//!
//! These functions combine the pure [`calculations`](super::calculations)
//! with pixel work on an already decoded image. They never touch the
//! filesystem; writing is the backend's job.

use super::backend::{DecodedImage, Dimensions};
use super::calculations::{CropRegion, calculate_auto_crop, calculate_scale_dimensions};
use super::params::Action;
use image::DynamicImage;
use image::imageops::FilterType;

/// Resampling filter for every resize.
const FILTER: FilterType = FilterType::Lanczos3;

fn resize_exact(image: &DecodedImage, size: Dimensions) -> DynamicImage {
    if image.dimensions() == size {
        log::debug!("Image already {}x{}, skipping resize", size.width, size.height);
        return image.pixels().clone();
    }
    log::debug!(
        "Resizing image from {}x{} to {}x{}",
        image.width(),
        image.height(),
        size.width,
        size.height
    );
    image.pixels().resize_exact(size.width, size.height, FILTER)
}

/// Aspect-preserving resize driven by whichever axis of `target` is set.
///
/// Returns `None` when neither axis is set.
pub fn scale(image: &DecodedImage, target: Dimensions) -> Option<DecodedImage> {
    let size = calculate_scale_dimensions(image.dimensions(), target)?;
    Some(image.with_pixels(resize_exact(image, size)))
}

/// Cut `region` out of `image`.
///
/// The region is clipped to the image bounds.
pub fn crop_region(image: &DecodedImage, region: CropRegion) -> DecodedImage {
    image.with_pixels(
        image
            .pixels()
            .crop_imm(region.x, region.y, region.width, region.height),
    )
}

/// Scale to cover `target`, then center-crop to exactly `target`.
///
/// The centered region is cut from the source first and only that part is
/// resized, so memory stays bounded by the source and the target even for
/// extreme aspect ratios.
///
/// Returns `None` when either axis of `target` is zero.
pub fn auto_crop(image: &DecodedImage, target: Dimensions) -> Option<DecodedImage> {
    let plan = calculate_auto_crop(image.dimensions(), target)?;
    let cropped = crop_region(image, plan.source_region(image.dimensions()));
    Some(cropped.with_pixels(resize_exact(&cropped, target)))
}

/// Render one variant of `image` according to its action.
pub fn render_variant(image: &DecodedImage, action: Action, size: Dimensions) -> Option<DecodedImage> {
    match action {
        Action::Crop => auto_crop(image, size),
        Action::Scale => scale(image, size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};

    fn decoded(width: u32, height: u32) -> DecodedImage {
        DecodedImage::new(
            DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
                Rgb([(x % 256) as u8, (y % 256) as u8, 128])
            })),
            Some(ImageFormat::Png),
        )
    }

    #[test]
    fn scale_by_width() {
        let out = scale(&decoded(800, 600), Dimensions::new(400, 0)).unwrap();
        assert_eq!(out.dimensions(), Dimensions::new(400, 300));
    }

    #[test]
    fn scale_by_height() {
        let out = scale(&decoded(800, 600), Dimensions::new(0, 150)).unwrap();
        assert_eq!(out.dimensions(), Dimensions::new(200, 150));
    }

    #[test]
    fn scale_without_target_is_none() {
        assert!(scale(&decoded(800, 600), Dimensions::new(0, 0)).is_none());
    }

    #[test]
    fn scale_keeps_source_format() {
        let out = scale(&decoded(40, 40), Dimensions::new(20, 0)).unwrap();
        assert_eq!(out.format(), Some(ImageFormat::Png));
    }

    #[test]
    fn auto_crop_fills_target_exactly() {
        let out = auto_crop(&decoded(800, 600), Dimensions::new(100, 100)).unwrap();
        assert_eq!(out.dimensions(), Dimensions::new(100, 100));
    }

    #[test]
    fn auto_crop_portrait_to_banner() {
        let out = auto_crop(&decoded(300, 900), Dimensions::new(200, 50)).unwrap();
        assert_eq!(out.dimensions(), Dimensions::new(200, 50));
    }

    #[test]
    fn auto_crop_exact_size_is_unchanged() {
        let source = decoded(64, 48);
        let out = auto_crop(&source, Dimensions::new(64, 48)).unwrap();
        assert_eq!(out.pixels().as_bytes(), source.pixels().as_bytes());
    }

    #[test]
    fn auto_crop_extreme_aspect_stays_bounded() {
        let out = auto_crop(&decoded(1, 20000), Dimensions::new(256, 256)).unwrap();
        assert_eq!(out.dimensions(), Dimensions::new(256, 256));
        // the one source pixel of the middle row, stretched
        let rgb = out.pixels().to_rgb8();
        assert_eq!(rgb.get_pixel(128, 128), &Rgb([0, (9999 % 256) as u8, 128]));
    }

    #[test]
    fn auto_crop_zero_axis_is_none() {
        assert!(auto_crop(&decoded(64, 48), Dimensions::new(0, 10)).is_none());
    }

    #[test]
    fn crop_region_takes_pixels_from_offset() {
        let source = decoded(50, 50);
        let out = crop_region(
            &source,
            CropRegion {
                x: 10,
                y: 20,
                width: 5,
                height: 5,
            },
        );
        assert_eq!(out.dimensions(), Dimensions::new(5, 5));
        let rgb = out.pixels().to_rgb8();
        assert_eq!(rgb.get_pixel(0, 0), &Rgb([10, 20, 128]));
    }

    #[test]
    fn crop_region_is_clipped_to_bounds() {
        let out = crop_region(
            &decoded(10, 10),
            CropRegion {
                x: 8,
                y: 8,
                width: 5,
                height: 5,
            },
        );
        assert_eq!(out.dimensions(), Dimensions::new(2, 2));
    }

    #[test]
    fn render_variant_dispatches_on_action() {
        let source = decoded(800, 600);
        let cropped = render_variant(&source, Action::Crop, Dimensions::new(50, 50)).unwrap();
        assert_eq!(cropped.dimensions(), Dimensions::new(50, 50));
        let scaled = render_variant(&source, Action::Scale, Dimensions::new(50, 0)).unwrap();
        assert_eq!(scaled.dimensions(), Dimensions::new(50, 37));
    }
}
