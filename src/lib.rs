//! Image to ASCII art converter.
//!
//! An image is resampled to a grid of RGB samples, each sample is mapped to a
//! glyph of a fixed density ramp, and the result is emitted either as plain
//! text or as color markup that can be rasterized back into a PNG.

pub mod export;
pub mod grid;
pub mod markup;
pub mod preferences;
pub mod ramp;
pub mod render;
pub mod resample;
pub mod session;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use export::ExportedAsset;
pub use grid::SampleGrid;
pub use markup::{Mode, RenderedOutput};
pub use preferences::{PreferenceStore, Preferences, Theme, ThemeSettings};
pub use render::{BitmapFont, GlyphRasterizer, Viewport};
pub use session::Session;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AsciiError {
    #[error("Load an image first")]
    NoImageLoaded,
    #[error("Convert an image to ASCII first")]
    NothingToExport,
    #[error("Invalid dimension {value:?}: expected a positive integer")]
    InvalidDimension { value: String },
    #[error("Malformed markup at line {line}, column {column}: {reason}")]
    MalformedMarkup {
        line: usize,
        column: usize,
        reason: String,
    },
    #[error("ASCII resolution too large for the viewport (glyph pitch {pitch}px, minimum {min}px)")]
    ResolutionTooLarge { pitch: u32, min: u32 },
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Font error: {0}")]
    Font(String),
    #[error("Preferences error: {0}")]
    Preferences(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AsciiError>;
