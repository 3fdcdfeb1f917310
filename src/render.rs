//! Rasterize rendered output into a bitmap for PNG export.

use crate::markup::{Mode, RenderedOutput};
use crate::{AsciiError, Result};
use font8x8::UnicodeFonts;
use image::{Rgb, RgbImage};
use std::collections::HashMap;

/// Smallest glyph pitch that is still legible.
pub const MIN_PITCH: u32 = 4;

/// Largest glyph pitch used for export, however big the viewport.
pub const MAX_PITCH: u32 = 64;

/// Viewport sides are clamped to this before choosing a pitch, which bounds
/// the exported bitmap to `MAX_EXPORT_SIDE²` pixels.
pub const MAX_EXPORT_SIDE: u32 = 4096;

/// Space kept free around the exported image when sizing from a window.
pub const WINDOW_MARGIN: u32 = 40;

const BACKGROUND: [u8; 3] = [255, 255, 255];
const PLAIN_FOREGROUND: [u8; 3] = [0, 0, 0];

/// Area the exported image has to fit in, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Viewport for a window of the given size, minus `WINDOW_MARGIN`.
    pub fn from_window(width: u32, height: u32) -> Self {
        Self {
            width: width.saturating_sub(WINDOW_MARGIN),
            height: height.saturating_sub(WINDOW_MARGIN),
        }
    }

    /// Largest square pitch that fits `cols × rows` glyphs, at most
    /// `MAX_PITCH`.
    pub fn pitch_for(&self, cols: u32, rows: u32) -> Result<u32> {
        if cols == 0 || rows == 0 {
            return Err(AsciiError::InvalidDimension { value: format!("{cols}x{rows}") });
        }
        let width = self.width.min(MAX_EXPORT_SIDE);
        let height = self.height.min(MAX_EXPORT_SIDE);
        let pitch = (width / cols).min(height / rows);
        if pitch < MIN_PITCH {
            return Err(AsciiError::ResolutionTooLarge { pitch, min: MIN_PITCH });
        }
        Ok(pitch.min(MAX_PITCH))
    }
}

/// Produces a `pitch × pitch` coverage mask (0 = background, 255 = ink)
/// for a glyph.
pub trait GlyphRasterizer {
    fn rasterize(&self, ch: char, pitch: u32) -> Vec<u8>;
}

/// Built-in 8×8 bitmap font, scaled nearest-neighbour. Coverage is either
/// 0 or 255, so glyph colors come out exact.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitmapFont;

impl GlyphRasterizer for BitmapFont {
    fn rasterize(&self, ch: char, pitch: u32) -> Vec<u8> {
        let glyph = font8x8::BASIC_FONTS.get(ch).unwrap_or([0; 8]);
        let mut mask = vec![0u8; (pitch * pitch) as usize];
        for y in 0..pitch {
            let row_bits = glyph[(y * 8 / pitch) as usize];
            for x in 0..pitch {
                let gx = x * 8 / pitch;
                if (row_bits >> gx) & 1 == 1 {
                    mask[(y * pitch + x) as usize] = 255;
                }
            }
        }
        mask
    }
}

/// TrueType font rasterized with fontdue. Anti-aliased.
#[cfg(not(target_arch = "wasm32"))]
pub struct TrueTypeFont {
    font: fontdue::Font,
}

#[cfg(not(target_arch = "wasm32"))]
impl TrueTypeFont {
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let font = fontdue::Font::from_bytes(data, fontdue::FontSettings::default())
            .map_err(|e| AsciiError::Font(e.to_string()))?;
        Ok(Self { font })
    }

    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Self::from_bytes(std::fs::read(path)?)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl GlyphRasterizer for TrueTypeFont {
    fn rasterize(&self, ch: char, pitch: u32) -> Vec<u8> {
        let size = pitch as i32;
        let mut mask = vec![0u8; (pitch * pitch) as usize];
        // ~87.5% of the cell to leave room for descenders
        let (metrics, bitmap) = self.font.rasterize(ch, pitch as f32 * 0.875);
        if metrics.width == 0 || metrics.height == 0 {
            return mask;
        }

        // Baseline at ~80% down, centered horizontally
        let baseline_y = (pitch as f32 * 0.8) as i32;
        let y_offset = baseline_y - metrics.height as i32 - metrics.ymin;
        let x_offset = (size - metrics.width as i32) / 2;

        for sy in 0..metrics.height {
            for sx in 0..metrics.width {
                let tx = x_offset + sx as i32;
                let ty = y_offset + sy as i32;
                if tx >= 0 && tx < size && ty >= 0 && ty < size {
                    mask[(ty * size + tx) as usize] = bitmap[sy * metrics.width + sx];
                }
            }
        }
        mask
    }
}

/// Draw `output` at a fixed glyph pitch chosen to fit `viewport`.
///
/// The result is exactly `width * pitch × height * pitch` on a white
/// background. Plain glyphs are black; color glyphs use the color recovered
/// from the markup. Malformed markup rejects the whole bitmap.
pub fn to_bitmap(
    output: &RenderedOutput,
    viewport: Viewport,
    font: &dyn GlyphRasterizer,
) -> Result<RgbImage> {
    let pitch = viewport.pitch_for(output.width(), output.height())?;
    let rows = output.glyph_rows()?;
    log::debug!(
        "rendering {}x{} {} output at pitch {}",
        output.width(),
        output.height(),
        output.mode(),
        pitch
    );

    let mut image = RgbImage::from_pixel(
        output.width() * pitch,
        output.height() * pitch,
        Rgb(BACKGROUND),
    );
    let mut masks: HashMap<char, Vec<u8>> = HashMap::new();

    for (row_idx, row) in rows.iter().enumerate() {
        let y0 = row_idx as u32 * pitch;
        for (col_idx, glyph) in row.iter().enumerate() {
            let x0 = col_idx as u32 * pitch;
            let mask = masks
                .entry(glyph.ch)
                .or_insert_with(|| font.rasterize(glyph.ch, pitch));
            let color = match output.mode() {
                Mode::Plain => PLAIN_FOREGROUND,
                Mode::Color => glyph.rgb,
            };
            draw_mask(&mut image, x0, y0, pitch, mask, color);
        }
    }

    Ok(image)
}

fn draw_mask(image: &mut RgbImage, x0: u32, y0: u32, pitch: u32, mask: &[u8], color: [u8; 3]) {
    for y in 0..pitch {
        for x in 0..pitch {
            let alpha = mask[(y * pitch + x) as usize];
            if alpha == 0 {
                continue;
            }
            let pixel = image.get_pixel_mut(x0 + x, y0 + y);
            pixel.0 = blend(pixel.0, color, alpha);
        }
    }
}

fn blend(bg: [u8; 3], fg: [u8; 3], alpha: u8) -> [u8; 3] {
    let a = alpha as u32;
    let mix = |b: u8, f: u8| ((f as u32 * a + b as u32 * (255 - a) + 127) / 255) as u8;
    [mix(bg[0], fg[0]), mix(bg[1], fg[1]), mix(bg[2], fg[2])]
}
