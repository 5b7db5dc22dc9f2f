//! PUD map decoding.
//!
//! [`decode`] turns the raw bytes of a `.pud` file into a
//! [`MapDescription`]. Only the `TYPE` chunk is mandatory; every other chunk
//! falls back to a documented default when absent:
//!
//! | Chunk | Default |
//! |-------|---------|
//! | `VER ` | version 0 |
//! | `DESC` | empty description |
//! | `ERAX` / `ERA ` | Forest |
//! | `DIM ` | 32x32, Custom |
//! | `MTXM` | empty tile grid |
//! | `UNIT` | no units |
//!
//! Once a chunk has been located, a read that runs past the end of the
//! buffer aborts the whole decode with [`DecodeError::Truncated`]; defaults
//! are never substituted for a chunk that is present.
//!
//! A few irregularities are tolerated and reported as [`DecodeWarning`]s
//! through [`decode_with_report`]: a `UNIT` length that is not a multiple of
//! 8, an odd `MTXM` length, a tile count that disagrees with the dimensions,
//! and zero-length optional chunks (treated as absent).
//!
//! # Example
//!
//! ```
//! use pud_parser::decode::decode;
//! use pud_parser::format::{Era, SizeClass};
//!
//! let mut data = Vec::new();
//! data.extend_from_slice(b"TYPE");
//! data.extend_from_slice(&16u32.to_le_bytes());
//! data.extend_from_slice(b"WAR2 MAP\0\0\x0A\xFF");
//! data.extend_from_slice(&0x11u32.to_le_bytes());
//! data.extend_from_slice(b"DIM ");
//! data.extend_from_slice(&4u32.to_le_bytes());
//! data.extend_from_slice(&64u16.to_le_bytes());
//! data.extend_from_slice(&64u16.to_le_bytes());
//! data.extend_from_slice(&[0; 8]);
//!
//! let map = decode(&data)?;
//! assert_eq!(map.format_tag, 0x11);
//! assert_eq!(map.era, Era::Forest);
//! assert_eq!((map.width, map.height), (64, 64));
//! assert_eq!(map.size_class, SizeClass::Small);
//! # Ok::<(), pud_parser::error::DecodeError>(())
//! ```

use std::fmt;

use tracing::{debug, instrument, warn};

use crate::binary::ByteCursor;
use crate::chunk::{find_chunk, tags, ChunkSection, ChunkTag};
use crate::error::{DecodeError, OutOfBounds, Result};
use crate::format::{
    Era, SizeClass, DEFAULT_DIMENSION, DESCRIPTION_LEN, FORMAT_TAG_OFFSET, PUD_SIGNATURE,
    TILE_ENTRY_SIZE, UNIT_RECORD_SIZE,
};
use crate::map::{MapDescription, Unit};

/// A non-fatal irregularity found while decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeWarning {
    /// An optional chunk was found with a zero length and ignored.
    EmptyChunk {
        /// The ignored chunk.
        tag: ChunkTag,
    },
    /// The `UNIT` length is not a multiple of 8; the trailing bytes were dropped.
    PartialUnitRecord {
        /// Number of dropped bytes (1..=7).
        trailing: usize,
    },
    /// The `MTXM` length is odd; the dangling byte was dropped.
    OddTileLength {
        /// Declared `MTXM` length.
        length: u32,
    },
    /// The tile grid does not have `width * height` entries.
    TileCountMismatch {
        /// `width * height`.
        expected: usize,
        /// Decoded tile entries.
        found: usize,
    },
}

impl fmt::Display for DecodeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeWarning::EmptyChunk { tag } => {
                write!(f, "chunk '{tag}' has zero length and was ignored")
            }
            DecodeWarning::PartialUnitRecord { trailing } => {
                write!(f, "UNIT chunk has {trailing} trailing bytes after the last whole record")
            }
            DecodeWarning::OddTileLength { length } => {
                write!(f, "MTXM chunk length {length} is odd; last byte ignored")
            }
            DecodeWarning::TileCountMismatch { expected, found } => {
                write!(f, "tile grid has {found} entries, dimensions call for {expected}")
            }
        }
    }
}

/// A decoded map together with the warnings collected on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeReport {
    /// The decoded map.
    pub map: MapDescription,
    /// Non-fatal irregularities, in the order they were found.
    pub warnings: Vec<DecodeWarning>,
}

/// Decodes a complete PUD file.
///
/// # Errors
///
/// - `DecodeError::InvalidFormat` if `TYPE` is missing or its signature is
///   not `"WAR2 MAP\0\0"`
/// - `DecodeError::Truncated` if a located chunk runs past the end of `data`
pub fn decode(data: &[u8]) -> Result<MapDescription> {
    decode_with_report(data).map(|report| report.map)
}

/// Decodes a complete PUD file and returns the non-fatal warnings as well.
///
/// # Errors
///
/// Same as [`decode`].
#[instrument(level = "debug", skip(data), fields(len = data.len()))]
pub fn decode_with_report(data: &[u8]) -> Result<DecodeReport> {
    let mut warnings = Vec::new();

    let format_tag = read_type(data)?;

    let version = match locate_optional(data, tags::VER, &mut warnings)? {
        Some(mut reader) => reader.read_u16_le()?,
        None => 0,
    };

    let description = match locate_optional(data, tags::DESC, &mut warnings)? {
        Some(mut reader) => reader.read_fixed_string(DESCRIPTION_LEN)?,
        None => String::new(),
    };

    let era_reader = match locate_optional(data, tags::ERAX, &mut warnings)? {
        Some(reader) => Some(reader),
        None => locate_optional(data, tags::ERA, &mut warnings)?,
    };
    let era = match era_reader {
        Some(mut reader) => Era::from_code(reader.read_u16_le()?),
        None => Era::Forest,
    };

    let (width, height) = match locate_optional(data, tags::DIM, &mut warnings)? {
        Some(mut reader) => (reader.read_u16_le()?, reader.read_u16_le()?),
        None => (DEFAULT_DIMENSION, DEFAULT_DIMENSION),
    };
    let size_class = SizeClass::from_dimensions(width, height);

    let tiles = match locate_optional(data, tags::MTXM, &mut warnings)? {
        Some(reader) => {
            let tiles = read_tiles(reader, &mut warnings)?;
            let expected = usize::from(width) * usize::from(height);
            if tiles.len() != expected {
                push_warning(
                    &mut warnings,
                    DecodeWarning::TileCountMismatch {
                        expected,
                        found: tiles.len(),
                    },
                );
            }
            tiles
        }
        None => Vec::new(),
    };

    let units = match locate_optional(data, tags::UNIT, &mut warnings)? {
        Some(reader) => read_units(reader, &mut warnings)?,
        None => Vec::new(),
    };

    debug!(
        %era,
        width,
        height,
        tiles = tiles.len(),
        units = units.len(),
        "decoded map"
    );

    Ok(DecodeReport {
        map: MapDescription {
            format_tag,
            version,
            description,
            era,
            width,
            height,
            size_class,
            tiles,
            units,
        },
        warnings,
    })
}

impl MapDescription {
    /// Decodes a complete PUD file. Equivalent to [`decode`].
    ///
    /// # Errors
    ///
    /// See [`decode`].
    pub fn parse(data: &[u8]) -> Result<Self> {
        decode(data)
    }
}

/// Reads the chunk located by `find_chunk`, mapping cursor failures to
/// `Truncated` for that chunk.
struct ChunkReader<'a> {
    tag: ChunkTag,
    section: ChunkSection,
    cursor: ByteCursor<'a>,
}

impl<'a> ChunkReader<'a> {
    fn new(data: &'a [u8], tag: ChunkTag, section: ChunkSection) -> Self {
        ChunkReader {
            tag,
            section,
            cursor: ByteCursor::at(data, section.payload_offset),
        }
    }

    fn map_err(&self, _: OutOfBounds) -> DecodeError {
        DecodeError::truncated(self.tag)
    }

    fn read_u8(&mut self) -> Result<u8> {
        self.cursor.read_u8().map_err(|e| self.map_err(e))
    }

    fn read_u16_le(&mut self) -> Result<u16> {
        self.cursor.read_u16_le().map_err(|e| self.map_err(e))
    }

    fn read_u32_le(&mut self) -> Result<u32> {
        self.cursor.read_u32_le().map_err(|e| self.map_err(e))
    }

    fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.cursor.read_bytes(len).map_err(|e| self.map_err(e))
    }

    fn read_fixed_string(&mut self, len: usize) -> Result<String> {
        self.cursor.read_fixed_string(len).map_err(|e| self.map_err(e))
    }
}

/// Locates `tag` and checks its declared payload against the buffer.
fn locate(data: &[u8], tag: ChunkTag) -> Result<Option<ChunkReader<'_>>> {
    let Some(section) = find_chunk(data, tag) else {
        return Ok(None);
    };

    debug!(%tag, offset = section.payload_offset, length = section.length, "located chunk");

    if !section.fits_within(data.len()) {
        return Err(DecodeError::truncated(tag));
    }

    Ok(Some(ChunkReader::new(data, tag, section)))
}

/// Like [`locate`], but treats a zero-length chunk as absent.
fn locate_optional<'a>(
    data: &'a [u8],
    tag: ChunkTag,
    warnings: &mut Vec<DecodeWarning>,
) -> Result<Option<ChunkReader<'a>>> {
    match locate(data, tag)? {
        Some(reader) if reader.section.length == 0 => {
            push_warning(warnings, DecodeWarning::EmptyChunk { tag });
            Ok(None)
        }
        other => Ok(other),
    }
}

/// Verifies the `TYPE` signature and returns the format tag.
///
/// The payload starts with a 12-byte header block whose first 10 bytes are
/// the signature. The tag follows the block at [`FORMAT_TAG_OFFSET`],
/// independent of the declared chunk length.
fn read_type(data: &[u8]) -> Result<u32> {
    let Some(mut reader) = locate(data, tags::TYPE)? else {
        return Err(DecodeError::invalid_format("missing TYPE chunk"));
    };

    let header = reader.read_bytes(FORMAT_TAG_OFFSET)?;
    if &header[..PUD_SIGNATURE.len()] != PUD_SIGNATURE {
        return Err(DecodeError::invalid_format("bad signature"));
    }

    reader.read_u32_le()
}

fn read_tiles(mut reader: ChunkReader<'_>, warnings: &mut Vec<DecodeWarning>) -> Result<Vec<u16>> {
    let length = reader.section.length;
    if length as usize % TILE_ENTRY_SIZE != 0 {
        push_warning(warnings, DecodeWarning::OddTileLength { length });
    }

    let count = length as usize / TILE_ENTRY_SIZE;
    let mut tiles = Vec::with_capacity(count);
    for _ in 0..count {
        tiles.push(reader.read_u16_le()?);
    }
    Ok(tiles)
}

fn read_units(mut reader: ChunkReader<'_>, warnings: &mut Vec<DecodeWarning>) -> Result<Vec<Unit>> {
    let length = reader.section.length as usize;
    let trailing = length % UNIT_RECORD_SIZE;
    if trailing != 0 {
        push_warning(warnings, DecodeWarning::PartialUnitRecord { trailing });
    }

    let count = length / UNIT_RECORD_SIZE;
    let mut units = Vec::with_capacity(count);
    for _ in 0..count {
        units.push(Unit {
            x: reader.read_u16_le()?,
            y: reader.read_u16_le()?,
            unit_type: reader.read_u8()?,
            player: reader.read_u8()?,
            alteration: reader.read_u16_le()?,
        });
    }
    Ok(units)
}

fn push_warning(warnings: &mut Vec<DecodeWarning>, warning: DecodeWarning) {
    warn!("{warning}");
    warnings.push(warning);
}
