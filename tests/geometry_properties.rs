//! Property tests for crop and scale geometry.
//!
//! Sizes are kept small enough that pixel-level checks on real images stay
//! fast; the pure calculations are also exercised at larger sizes.

use image::{DynamicImage, ImageFormat, RgbImage};
use image_intake::imaging::{
    DecodedImage, Dimensions, auto_crop, calculate_auto_crop, calculate_scale_dimensions,
};
use proptest::prelude::*;

fn create_test_image(width: u32, height: u32) -> DecodedImage {
    DecodedImage::new(
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        })),
        Some(ImageFormat::Png),
    )
}

fn dims() -> impl Strategy<Value = Dimensions> {
    (1u32..=4000, 1u32..=4000).prop_map(Dimensions::from)
}

proptest! {
    #[test]
    fn auto_crop_region_is_exact_target(source in dims(), target in dims()) {
        let plan = calculate_auto_crop(source, target).unwrap();
        prop_assert_eq!(plan.region.width, target.width);
        prop_assert_eq!(plan.region.height, target.height);
    }

    #[test]
    fn auto_crop_region_fits_inside_resize(source in dims(), target in dims()) {
        let plan = calculate_auto_crop(source, target).unwrap();
        prop_assert!(plan.resize.width >= target.width);
        prop_assert!(plan.resize.height >= target.height);
        prop_assert!(plan.region.right() <= plan.resize.width);
        prop_assert!(plan.region.bottom() <= plan.resize.height);
    }

    #[test]
    fn auto_crop_crops_one_axis_only(source in dims(), target in dims()) {
        let plan = calculate_auto_crop(source, target).unwrap();
        prop_assert!(
            plan.resize.width == target.width || plan.resize.height == target.height,
            "resize {:?} matches neither axis of {:?}",
            plan.resize,
            target
        );
    }

    #[test]
    fn auto_crop_region_is_centered(source in dims(), target in dims()) {
        let plan = calculate_auto_crop(source, target).unwrap();
        let left = plan.region.x;
        let right = plan.resize.width - plan.region.right();
        let top = plan.region.y;
        let bottom = plan.resize.height - plan.region.bottom();
        prop_assert!(left.abs_diff(right) <= 1);
        prop_assert!(top.abs_diff(bottom) <= 1);
    }

    #[test]
    fn auto_crop_source_region_lies_inside_source(source in dims(), target in dims()) {
        let region = calculate_auto_crop(source, target).unwrap().source_region(source);
        prop_assert!(region.width >= 1 && region.height >= 1);
        prop_assert!(region.right() <= source.width);
        prop_assert!(region.bottom() <= source.height);
    }

    #[test]
    fn auto_crop_of_exact_size_is_full_image(source in dims()) {
        let plan = calculate_auto_crop(source, source).unwrap();
        prop_assert_eq!(plan.resize, source);
        prop_assert_eq!(plan.region.as_box(), (0, 0, source.width, source.height));
    }

    #[test]
    fn auto_crop_zero_axis_is_noop(source in dims(), side in 0u32..=4000) {
        prop_assert!(calculate_auto_crop(source, Dimensions::new(0, side)).is_none());
        prop_assert!(calculate_auto_crop(source, Dimensions::new(side, 0)).is_none());
    }

    #[test]
    fn scale_width_driven_keeps_aspect(source in dims(), width in 1u32..=4000) {
        let out = calculate_scale_dimensions(source, Dimensions::new(width, 0)).unwrap();
        prop_assert_eq!(out.width, width);
        let exact = u64::from(source.height) * u64::from(width);
        let got = u64::from(out.height) * u64::from(source.width);
        if out.height > 1 {
            // truncation loses less than one pixel of height
            prop_assert!(got <= exact && exact - got < u64::from(source.width));
        }
    }

    #[test]
    fn scale_height_driven_keeps_aspect(source in dims(), height in 1u32..=4000) {
        let out = calculate_scale_dimensions(source, Dimensions::new(0, height)).unwrap();
        prop_assert_eq!(out.height, height);
        let exact = u64::from(source.width) * u64::from(height);
        let got = u64::from(out.width) * u64::from(source.height);
        if out.width > 1 {
            prop_assert!(got <= exact && exact - got < u64::from(source.height));
        }
    }

    #[test]
    fn scale_never_yields_empty_axis(source in dims(), target in dims()) {
        let out = calculate_scale_dimensions(source, target).unwrap();
        prop_assert!(out.width >= 1 && out.height >= 1);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn auto_crop_pixels_match_target(
        source in (1u32..=96, 1u32..=96).prop_map(Dimensions::from),
        target in (1u32..=48, 1u32..=48).prop_map(Dimensions::from),
    ) {
        let image = create_test_image(source.width, source.height);
        let out = auto_crop(&image, target).unwrap();
        prop_assert_eq!(out.dimensions(), target);
    }
}
