//! Downloadable PNG and text assets.

use crate::Result;
use image::{ImageFormat, RgbImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};

pub const PNG_MIME: &str = "image/png";
pub const TEXT_MIME: &str = "text/plain";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedAsset {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportedAsset {
    /// Encode `image` as `ascii_image_<unix-ms>.png`.
    pub fn png(image: &RgbImage, timestamp_ms: i64) -> Result<Self> {
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(Self { file_name: png_file_name(timestamp_ms), mime: PNG_MIME, bytes })
    }

    /// UTF-8 text as `ascii_<unix-ms>.txt`.
    pub fn text(text: String, timestamp_ms: i64) -> Self {
        Self { file_name: text_file_name(timestamp_ms), mime: TEXT_MIME, bytes: text.into_bytes() }
    }

    /// Write the asset into `dir` under its file name.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir.as_ref().join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        log::info!("wrote {} ({} bytes)", path.display(), self.bytes.len());
        Ok(path)
    }
}

pub fn png_file_name(timestamp_ms: i64) -> String {
    format!("ascii_image_{timestamp_ms}.png")
}

pub fn text_file_name(timestamp_ms: i64) -> String {
    format!("ascii_{timestamp_ms}.txt")
}

/// Current unix time in milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn file_names_carry_timestamp() {
        assert_eq!(png_file_name(1700000000123), "ascii_image_1700000000123.png");
        assert_eq!(text_file_name(42), "ascii_42.txt");
    }

    #[test]
    fn png_asset_decodes_back() {
        let image = RgbImage::from_pixel(3, 2, Rgb([10, 20, 30]));
        let asset = ExportedAsset::png(&image, 7).unwrap();
        assert_eq!(asset.mime, PNG_MIME);
        let decoded = image::load_from_memory(&asset.bytes).unwrap().to_rgb8();
        assert_eq!(decoded, image);
    }

    #[test]
    fn writes_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let asset = ExportedAsset::text("@ \n".to_string(), 5);
        let path = asset.write_to(dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "ascii_5.txt");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "@ \n");
    }
}
