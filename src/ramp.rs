//! Brightness to glyph quantization.

/// Glyph ramp ordered from densest to sparsest.
pub const RAMP: [char; 11] = ['@', '&', '$', '%', '#', 'x', '+', ':', '-', '.', ' '];

/// Simple channel average. Not perceptual luminance.
pub fn brightness(rgb: [u8; 3]) -> f64 {
    (rgb[0] as f64 + rgb[1] as f64 + rgb[2] as f64) / 3.0
}

/// Ramp index for a brightness value, clamped to the ramp bounds.
pub fn glyph_index(brightness: f64) -> usize {
    let last = RAMP.len() - 1;
    if !brightness.is_finite() || brightness <= 0.0 {
        return 0;
    }
    let index = ((brightness / 255.0) * last as f64).floor() as usize;
    index.min(last)
}

pub fn glyph_for(rgb: [u8; 3]) -> char {
    RAMP[glyph_index(brightness(rgb))]
}

/// Whether `ch` is one of the ramp glyphs.
pub fn contains(ch: char) -> bool {
    RAMP.contains(&ch)
}
