//! Image resampling to a W×H grid of RGB samples.

use crate::grid::SampleGrid;
use crate::{AsciiError, Result};
use image::imageops::{self, FilterType};
use image::DynamicImage;

/// Column cap used for the default grid size.
pub const MAX_COLS: u32 = 120;

/// Largest accepted grid width or height.
pub const MAX_DIMENSION: u32 = 1024;

/// Default grid size for a source image: `MAX_COLS` columns and a row count
/// that keeps the source aspect ratio.
pub fn default_dimensions(src_w: u32, src_h: u32) -> (u32, u32) {
    if src_w == 0 || src_h == 0 {
        return (MAX_COLS, 1);
    }
    let aspect = src_h as f64 / src_w as f64;
    let rows = (MAX_COLS as f64 * aspect).round().clamp(1.0, MAX_DIMENSION as f64) as u32;
    (MAX_COLS, rows)
}

/// Parse a user supplied grid dimension.
///
/// Accepts decimal integers surrounded by optional whitespace. Anything
/// non-numeric, non-finite, not strictly positive or above `MAX_DIMENSION`
/// is rejected.
pub fn parse_dimension(input: &str) -> Result<u32> {
    let invalid = || AsciiError::InvalidDimension { value: input.to_string() };
    let value: i64 = input.trim().parse().map_err(|_| invalid())?;
    if value <= 0 || value > MAX_DIMENSION as i64 {
        return Err(invalid());
    }
    u32::try_from(value).map_err(|_| invalid())
}

fn check_dimension(value: u32) -> Result<()> {
    if value == 0 || value > MAX_DIMENSION {
        return Err(AsciiError::InvalidDimension { value: value.to_string() });
    }
    Ok(())
}

/// Scale `source` to exactly `width × height` and collect its RGB samples.
///
/// The scale is not aspect preserving. Alpha is discarded. Both dimensions
/// must lie in `1..=MAX_DIMENSION`.
pub fn resample(source: &DynamicImage, width: u32, height: u32) -> Result<SampleGrid> {
    check_dimension(width)?;
    check_dimension(height)?;

    let rgb = source.to_rgb8();
    let scaled = if rgb.dimensions() == (width, height) {
        rgb
    } else {
        imageops::resize(&rgb, width, height, FilterType::Triangle)
    };

    let samples = scaled.pixels().map(|p| p.0).collect();
    log::debug!(
        "resampled {}x{} source to {}x{} grid",
        source.width(),
        source.height(),
        width,
        height
    );
    SampleGrid::from_samples(width, height, samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn checker(size: u32) -> DynamicImage {
        let img = RgbImage::from_fn(size, size, |x, y| {
            if (x + y) % 2 == 0 { Rgb([255, 255, 255]) } else { Rgb([0, 0, 0]) }
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn downscales_and_upscales_to_exact_size() {
        let grid = resample(&checker(4), 2, 2).unwrap();
        assert_eq!(grid.sample_count(), 4);

        let grid = resample(&checker(2), 4, 4).unwrap();
        assert_eq!(grid.sample_count(), 16);

        let grid = resample(&checker(3), 7, 2).unwrap();
        assert_eq!((grid.width(), grid.height(), grid.sample_count()), (7, 2, 14));
    }

    #[test]
    fn same_size_keeps_pixels() {
        let img = RgbImage::from_vec(
            2,
            2,
            vec![255, 255, 255, 0, 0, 0, 128, 128, 128, 255, 0, 0],
        )
        .unwrap();
        let grid = resample(&DynamicImage::ImageRgb8(img), 2, 2).unwrap();
        assert_eq!(
            grid.samples(),
            &[[255, 255, 255], [0, 0, 0], [128, 128, 128], [255, 0, 0]]
        );
    }

    #[test]
    fn is_deterministic() {
        let source = checker(9);
        assert_eq!(resample(&source, 4, 3).unwrap(), resample(&source, 4, 3).unwrap());
    }

    #[test]
    fn zero_dimension_is_rejected() {
        assert!(matches!(
            resample(&checker(2), 0, 2),
            Err(AsciiError::InvalidDimension { .. })
        ));
        assert!(matches!(
            resample(&checker(2), 2, 0),
            Err(AsciiError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn oversized_dimension_is_rejected_before_resizing() {
        assert!(matches!(
            resample(&checker(2), u32::MAX, u32::MAX),
            Err(AsciiError::InvalidDimension { .. })
        ));
        assert!(matches!(
            resample(&checker(2), 4, MAX_DIMENSION + 1),
            Err(AsciiError::InvalidDimension { .. })
        ));
        assert_eq!(resample(&checker(2), MAX_DIMENSION, 1).unwrap().sample_count(), MAX_DIMENSION as usize);
    }

    #[test]
    fn parses_dimensions() {
        assert_eq!(parse_dimension(" 80 ").unwrap(), 80);
        assert_eq!(parse_dimension("1024").unwrap(), MAX_DIMENSION);
        for bad in ["0", "-3", "abc", "", "NaN", "inf", "1e3", "1025", "4294967295", "99999999999"] {
            assert!(
                matches!(parse_dimension(bad), Err(AsciiError::InvalidDimension { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn default_dimensions_follow_aspect() {
        assert_eq!(default_dimensions(640, 480), (120, 90));
        assert_eq!(default_dimensions(100, 100), (120, 120));
        assert_eq!(default_dimensions(10_000, 1), (120, 1));
        assert_eq!(default_dimensions(1, 10_000), (120, MAX_DIMENSION));
    }
}
