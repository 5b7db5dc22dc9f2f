//! Error types for the PUD map decoder and preview exporter.
//!
//! Decoding has exactly two fatal outcomes, both carried by [`DecodeError`]:
//! the file is not a recognized map, or a chunk that was located runs past
//! the end of the buffer. The low-level [`OutOfBounds`] produced by
//! [`ByteCursor`](crate::binary::ByteCursor) is always converted into one of
//! those before it leaves the decoder.
//!
//! Encoding a rendered preview to PNG/JPEG has its own error type,
//! [`ExportError`], since it involves codecs and I/O that the decoder never
//! touches. [`RenderError`] covers the one way rasterization can refuse a
//! map: an output image too large to allocate.

use thiserror::Error;

use crate::chunk::ChunkTag;

/// The error type for decoding a PUD map file.
///
/// A decode that fails never yields a partially populated
/// [`MapDescription`](crate::map::MapDescription).
///
/// # Example
///
/// ```
/// use pud_parser::error::{DecodeError, Result};
///
/// fn example_operation() -> Result<()> {
///     Err(DecodeError::InvalidFormat {
///         reason: "missing TYPE chunk".to_string(),
///     })
/// }
/// assert!(example_operation().is_err());
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The mandatory `TYPE` chunk is missing or its signature does not match.
    ///
    /// Surfaced to users as "not a recognized map file".
    #[error("Not a recognized map file: {reason}")]
    InvalidFormat {
        /// A description of what makes the file unrecognizable.
        reason: String,
    },

    /// A chunk was located but its declared or implied length exceeds the
    /// remaining buffer.
    #[error("Truncated chunk '{tag}'")]
    Truncated {
        /// The tag of the chunk whose payload ran past the end of the buffer.
        tag: ChunkTag,
    },
}

impl DecodeError {
    /// Creates an `InvalidFormat` error with the given reason.
    #[must_use]
    pub fn invalid_format(reason: impl Into<String>) -> Self {
        DecodeError::InvalidFormat {
            reason: reason.into(),
        }
    }

    /// Creates a `Truncated` error for the given chunk tag.
    #[must_use]
    pub fn truncated(tag: ChunkTag) -> Self {
        DecodeError::Truncated { tag }
    }
}

/// A read past the end of the underlying buffer.
///
/// Returned by [`ByteCursor`](crate::binary::ByteCursor). The decoder maps it
/// to [`DecodeError::Truncated`] for the chunk being read.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Read out of bounds: needed {expected} bytes, but only {available} available")]
pub struct OutOfBounds {
    /// Buffer length that would have been needed for the read to succeed.
    pub expected: usize,
    /// The actual buffer length.
    pub available: usize,
}

/// Errors produced while encoding or saving a rendered preview.
#[derive(Error, Debug)]
pub enum ExportError {
    /// An I/O error occurred while writing the image file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image codec rejected the pixel data.
    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    /// The output path names a format other than PNG or JPEG.
    #[error("Unsupported image format: {extension}")]
    UnsupportedFormat {
        /// The extension (or format name) that was requested.
        extension: String,
    },
}

/// Errors produced while allocating a preview.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderError {
    /// The requested image exceeds
    /// [`MAX_DIMENSION`](crate::render::MAX_DIMENSION) on a side, or its
    /// byte length does not fit in memory.
    #[error("Preview too large: {width}x{height} pixels")]
    TooLarge {
        /// Requested width in pixels.
        width: u64,
        /// Requested height in pixels.
        height: u64,
    },
}

/// A specialized Result type for PUD decoding operations.
pub type Result<T> = std::result::Result<T, DecodeError>;
