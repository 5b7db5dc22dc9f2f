//! Chunk location for PUD map files.
//!
//! A PUD file is a sequence of sections, each introduced by an 8-byte
//! header:
//!
//! | Offset | Size | Type | Field |
//! |--------|------|------|-------|
//! | 0x00 | 4 | ASCII | Tag (space padded, e.g. `DIM `) |
//! | 0x04 | 4 | u32 LE | Payload length |
//! | 0x08 | len | bytes | Payload |
//!
//! Sections are not guaranteed to be contiguous or ordered, so
//! [`find_chunk`] does not walk section headers. It scans every candidate
//! offset for the tag bytes and takes the first match, so a tag may be found
//! at any byte offset, aligned or not.
//!
//! # Example
//!
//! ```
//! use pud_parser::chunk::{find_chunk, tags};
//!
//! let mut data = Vec::new();
//! data.extend_from_slice(b"DIM ");
//! data.extend_from_slice(&4u32.to_le_bytes());
//! data.extend_from_slice(&[64, 0, 64, 0]);
//! data.extend_from_slice(&[0; 4]);
//!
//! let section = find_chunk(&data, tags::DIM).unwrap();
//! assert_eq!(section.payload_offset, 8);
//! assert_eq!(section.length, 4);
//! ```

use std::fmt;

use tracing::trace;

/// Size of a chunk header (tag + length) in bytes.
pub const CHUNK_HEADER_SIZE: usize = 8;

/// A 4-byte chunk tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkTag([u8; 4]);

impl ChunkTag {
    /// Creates a tag from its four bytes.
    #[must_use]
    pub const fn new(bytes: [u8; 4]) -> Self {
        ChunkTag(bytes)
    }

    /// Returns the raw tag bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for ChunkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{b:02X}")?;
            }
        }
        Ok(())
    }
}

/// The chunk tags the decoder consumes.
pub mod tags {
    use super::ChunkTag;

    /// File type and signature (mandatory).
    pub const TYPE: ChunkTag = ChunkTag::new(*b"TYPE");
    /// Format version.
    pub const VER: ChunkTag = ChunkTag::new(*b"VER ");
    /// Map description text.
    pub const DESC: ChunkTag = ChunkTag::new(*b"DESC");
    /// Terrain era.
    pub const ERA: ChunkTag = ChunkTag::new(*b"ERA ");
    /// Expansion terrain era, preferred over `ERA `.
    pub const ERAX: ChunkTag = ChunkTag::new(*b"ERAX");
    /// Map dimensions.
    pub const DIM: ChunkTag = ChunkTag::new(*b"DIM ");
    /// Tile matrix.
    pub const MTXM: ChunkTag = ChunkTag::new(*b"MTXM");
    /// Unit placements.
    pub const UNIT: ChunkTag = ChunkTag::new(*b"UNIT");

    /// All consumed tags, in decode order.
    pub const ALL: [ChunkTag; 8] = [TYPE, VER, DESC, ERAX, ERA, DIM, MTXM, UNIT];
}

/// Location of a chunk payload inside the file buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSection {
    /// Offset of the first payload byte (tag offset + 8).
    pub payload_offset: usize,
    /// Declared payload length.
    pub length: u32,
}

impl ChunkSection {
    /// Returns the offset one past the last declared payload byte.
    #[must_use]
    pub fn payload_end(&self) -> usize {
        self.payload_offset.saturating_add(self.length as usize)
    }

    /// Returns whether the declared payload fits inside a buffer of `len` bytes.
    #[must_use]
    pub fn fits_within(&self, len: usize) -> bool {
        self.payload_end() <= len
    }

    /// Returns the declared payload as a slice, or `None` if it runs past
    /// the end of `data`.
    #[must_use]
    pub fn payload<'a>(&self, data: &'a [u8]) -> Option<&'a [u8]> {
        data.get(self.payload_offset..self.payload_end())
    }
}

/// Finds the first occurrence of `tag` in `data`.
///
/// Candidate offsets are `0..data.len() - 8`; a tag matching there has its
/// length read from the following four bytes (little-endian). The first
/// match wins, since tags are assumed unique per file.
///
/// The returned section is not checked against the buffer length; callers
/// decide whether an oversized declaration is an error.
#[must_use]
pub fn find_chunk(data: &[u8], tag: ChunkTag) -> Option<ChunkSection> {
    let needle = tag.as_bytes();

    for offset in 0..data.len().saturating_sub(CHUNK_HEADER_SIZE) {
        if &data[offset..offset + 4] == needle {
            let len_bytes = [
                data[offset + 4],
                data[offset + 5],
                data[offset + 6],
                data[offset + 7],
            ];
            let section = ChunkSection {
                payload_offset: offset + CHUNK_HEADER_SIZE,
                length: u32::from_le_bytes(len_bytes),
            };
            trace!(%tag, offset, length = section.length, "chunk tag matched");
            return Some(section);
        }
    }

    None
}

/// Locates every tag in [`tags::ALL`], in decode order.
///
/// Useful for diagnostics: a tag that is absent maps to `None`.
#[must_use]
pub fn scan_known_chunks(data: &[u8]) -> Vec<(ChunkTag, Option<ChunkSection>)> {
    tags::ALL
        .iter()
        .map(|&tag| (tag, find_chunk(data, tag)))
        .collect()
}
