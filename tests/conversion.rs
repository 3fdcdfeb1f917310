use asciify::markup::{to_glyphs, to_text};
use asciify::ramp::{self, RAMP};
use asciify::render::{to_bitmap, BitmapFont};
use asciify::resample::resample;
use asciify::{AsciiError, Mode, SampleGrid, Viewport};
use image::{DynamicImage, RgbImage};
use proptest::prelude::*;

fn arb_grid() -> impl Strategy<Value = SampleGrid> {
    (1u32..12, 1u32..8).prop_flat_map(|(w, h)| {
        prop::collection::vec(any::<[u8; 3]>(), (w * h) as usize)
            .prop_map(move |samples| SampleGrid::from_samples(w, h, samples).unwrap())
    })
}

proptest! {
    #[test]
    fn glyph_index_is_monotonic_and_bounded(a in 0u8..=255, b in 0u8..=255) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let lo_idx = ramp::glyph_index(lo as f64);
        let hi_idx = ramp::glyph_index(hi as f64);
        prop_assert!(lo_idx <= hi_idx);
        prop_assert!(hi_idx < RAMP.len());
        prop_assert_eq!(lo_idx, (lo as f64 / 255.0 * 10.0).floor() as usize);
    }

    #[test]
    fn plain_text_has_grid_shape(grid in arb_grid()) {
        let text = to_text(&to_glyphs(&grid, Mode::Plain)).unwrap();
        prop_assert!(text.ends_with('\n'));
        let lines: Vec<&str> = text.lines().collect();
        prop_assert_eq!(lines.len(), grid.height() as usize);
        for line in lines {
            prop_assert_eq!(line.chars().count(), grid.width() as usize);
            prop_assert!(line.chars().all(ramp::contains));
        }
    }

    #[test]
    fn color_markup_recovers_every_sample(grid in arb_grid()) {
        let out = to_glyphs(&grid, Mode::Color);
        let recovered: Vec<[u8; 3]> = out
            .glyph_rows()
            .unwrap()
            .into_iter()
            .flatten()
            .map(|g| g.rgb)
            .collect();
        prop_assert_eq!(recovered.as_slice(), grid.samples());
        prop_assert_eq!(
            to_text(&out).unwrap(),
            to_text(&to_glyphs(&grid, Mode::Plain)).unwrap()
        );
    }

    #[test]
    fn resample_yields_exact_sample_count(
        src_w in 1u32..20, src_h in 1u32..20, w in 1u32..30, h in 1u32..30
    ) {
        let source = DynamicImage::ImageRgb8(RgbImage::from_fn(src_w, src_h, |x, y| {
            image::Rgb([(x * 13) as u8, (y * 7) as u8, 99])
        }));
        let grid = resample(&source, w, h).unwrap();
        prop_assert_eq!(grid.sample_count(), (w * h) as usize);
    }
}

#[test]
fn color_bitmap_paints_cells_in_their_source_color() {
    // All samples are dark enough to land on inked glyphs.
    let samples = vec![[200, 0, 0], [0, 90, 40], [10, 10, 10], [60, 60, 200], [0, 0, 0], [120, 50, 0]];
    let grid = SampleGrid::from_samples(3, 2, samples).unwrap();
    let out = to_glyphs(&grid, Mode::Color);
    let pitch = 8;
    let image = to_bitmap(&out, Viewport::new(3 * pitch, 2 * pitch), &BitmapFont).unwrap();
    assert_eq!(image.dimensions(), (3 * pitch, 2 * pitch));

    for cy in 0..2 {
        for cx in 0..3 {
            let expected = grid.get(cx, cy).unwrap();
            let mut inked = 0;
            for y in cy * pitch..(cy + 1) * pitch {
                for x in cx * pitch..(cx + 1) * pitch {
                    let px = image.get_pixel(x, y).0;
                    if px != [255, 255, 255] {
                        assert_eq!(px, expected, "cell ({cx},{cy}) pixel ({x},{y})");
                        inked += 1;
                    }
                }
            }
            assert!(inked > 0, "cell ({cx},{cy}) has no ink");
        }
    }
}

#[test]
fn oversized_grid_is_rejected_for_export() {
    let grid = SampleGrid::from_samples(1000, 1, vec![[0, 0, 0]; 1000]).unwrap();
    let out = to_glyphs(&grid, Mode::Plain);
    assert!(matches!(
        to_bitmap(&out, Viewport::new(10, 10), &BitmapFont),
        Err(AsciiError::ResolutionTooLarge { .. })
    ));
}

#[test]
fn tampered_markup_rejects_whole_export() {
    let grid = SampleGrid::from_samples(2, 1, vec![[0, 0, 0], [0, 0, 0]]).unwrap();
    let out = to_glyphs(&grid, Mode::Color);
    let tampered = out.as_str().replacen("</span><span", "</span>!<span", 1);
    let tampered = asciify::RenderedOutput::from_parts(Mode::Color, 2, 1, tampered);
    assert!(matches!(
        to_bitmap(&tampered, Viewport::new(100, 100), &BitmapFont),
        Err(AsciiError::MalformedMarkup { line: 1, .. })
    ));
}
