//! Conversion session: the loaded image and the most recent output.

use crate::export::ExportedAsset;
use crate::markup::{self, Mode, RenderedOutput};
use crate::render::{self, GlyphRasterizer, Viewport};
use crate::resample::{self, parse_dimension};
use crate::{AsciiError, Result};
use image::DynamicImage;

/// Owns at most one source image and one rendered output.
///
/// Failed operations leave both untouched.
#[derive(Default)]
pub struct Session {
    image: Option<DynamicImage>,
    output: Option<RenderedOutput>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the source image. Returns the default grid size for it.
    pub fn load_image(&mut self, image: DynamicImage) -> (u32, u32) {
        let dims = resample::default_dimensions(image.width(), image.height());
        log::debug!(
            "loaded {}x{} image, default grid {}x{}",
            image.width(),
            image.height(),
            dims.0,
            dims.1
        );
        self.image = Some(image);
        dims
    }

    /// Decode an encoded image and load it.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<(u32, u32)> {
        let image = image::load_from_memory(bytes)?;
        Ok(self.load_image(image))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_path(&mut self, path: impl AsRef<std::path::Path>) -> Result<(u32, u32)> {
        let image = image::open(path)?;
        Ok(self.load_image(image))
    }

    pub fn image(&self) -> Option<&DynamicImage> {
        self.image.as_ref()
    }

    pub fn output(&self) -> Option<&RenderedOutput> {
        self.output.as_ref()
    }

    /// Resample the loaded image to `width × height` and map it to glyphs.
    pub fn convert(&mut self, width: u32, height: u32, mode: Mode) -> Result<&RenderedOutput> {
        let image = self.image.as_ref().ok_or(AsciiError::NoImageLoaded)?;
        let grid = resample::resample(image, width, height)?;
        let output = markup::to_glyphs(&grid, mode);
        log::debug!("converted to {}x{} {} output", width, height, mode);
        Ok(&*self.output.insert(output))
    }

    /// `convert` with dimensions as typed by the user.
    pub fn convert_input(&mut self, width: &str, height: &str, mode: Mode) -> Result<&RenderedOutput> {
        if self.image.is_none() {
            return Err(AsciiError::NoImageLoaded);
        }
        let width = parse_dimension(width)?;
        let height = parse_dimension(height)?;
        self.convert(width, height, mode)
    }

    fn current_output(&self) -> Result<&RenderedOutput> {
        self.output.as_ref().ok_or(AsciiError::NothingToExport)
    }

    /// Rasterize the current output to a PNG asset.
    pub fn export_png(
        &self,
        viewport: Viewport,
        font: &dyn GlyphRasterizer,
        timestamp_ms: i64,
    ) -> Result<ExportedAsset> {
        let output = self.current_output()?;
        let bitmap = render::to_bitmap(output, viewport, font)?;
        ExportedAsset::png(&bitmap, timestamp_ms)
    }

    /// Current output as plain glyph text.
    pub fn export_text(&self, timestamp_ms: i64) -> Result<ExportedAsset> {
        let output = self.current_output()?;
        Ok(ExportedAsset::text(markup::to_text(output)?, timestamp_ms))
    }
}
