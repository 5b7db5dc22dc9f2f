//! PNG and JPEG encoding of rendered previews.
//!
//! | Format | Color type | Notes                         |
//! |--------|------------|-------------------------------|
//! | PNG    | RGBA8      | Lossless, alpha kept          |
//! | JPEG   | RGB8       | Alpha dropped, quality 1..100 |

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use tracing::{debug, instrument};

use super::PixelBuffer;
use crate::error::ExportError;

/// JPEG quality used when none is given (0.8 on a unit scale).
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

/// An output image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Lossless PNG.
    Png,
    /// Lossy JPEG.
    Jpeg,
}

impl ExportFormat {
    /// Picks the format from a path's extension (`png`, `jpg` or `jpeg`,
    /// case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::UnsupportedFormat`] for any other extension or
    /// none at all.
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        match extension.as_str() {
            "png" => Ok(ExportFormat::Png),
            "jpg" | "jpeg" => Ok(ExportFormat::Jpeg),
            _ => Err(ExportError::UnsupportedFormat { extension }),
        }
    }

    /// Returns the canonical file extension.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
        }
    }

    /// Returns the file name offered when the user has not picked one.
    #[must_use]
    pub const fn default_file_name(self) -> &'static str {
        match self {
            ExportFormat::Png => "warcraft2_map.png",
            ExportFormat::Jpeg => "warcraft2_map.jpg",
        }
    }
}

impl PixelBuffer {
    /// Encodes the buffer as an RGBA PNG.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Image`] if the encoder rejects the buffer.
    pub fn encode_png(&self) -> Result<Vec<u8>, ExportError> {
        let mut out = Vec::new();
        PngEncoder::new(&mut out).write_image(
            self.as_raw(),
            self.width(),
            self.height(),
            ExtendedColorType::Rgba8,
        )?;
        Ok(out)
    }

    /// Encodes the buffer as an RGB JPEG at `quality` (clamped to 1..=100).
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Image`] if the encoder rejects the buffer.
    pub fn encode_jpeg(&self, quality: u8) -> Result<Vec<u8>, ExportError> {
        let rgb: Vec<u8> = self
            .as_raw()
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();

        let mut out = Vec::new();
        JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100)).write_image(
            &rgb,
            self.width(),
            self.height(),
            ExtendedColorType::Rgb8,
        )?;
        Ok(out)
    }

    /// Encodes the buffer in `format`, using [`DEFAULT_JPEG_QUALITY`] for
    /// JPEG.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Image`] if the encoder rejects the buffer.
    pub fn encode(&self, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
        match format {
            ExportFormat::Png => self.encode_png(),
            ExportFormat::Jpeg => self.encode_jpeg(DEFAULT_JPEG_QUALITY),
        }
    }

    /// Encodes the buffer and writes it to `writer`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Image`] on encoder failure and
    /// [`ExportError::Io`] on write failure.
    pub fn write_to<W: Write>(&self, writer: &mut W, format: ExportFormat) -> Result<(), ExportError> {
        let bytes = self.encode(format)?;
        writer.write_all(&bytes)?;
        Ok(())
    }

    /// Saves the buffer to `path`, picking the format from its extension.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::UnsupportedFormat`] for unknown extensions,
    /// otherwise the errors of [`PixelBuffer::write_to`].
    #[instrument(level = "debug", skip(self), fields(width = self.width(), height = self.height()))]
    pub fn save(&self, path: &Path) -> Result<ExportFormat, ExportError> {
        let format = ExportFormat::from_path(path)?;
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer, format)?;
        writer.flush()?;
        debug!(?format, "preview written");
        Ok(format)
    }
}
