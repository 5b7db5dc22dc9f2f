//! Format constants and enumerations for PUD map files.
//!
//! This module holds the fixed values of the legacy format: the `TYPE`
//! signature, the era codes, the size classes derived from map dimensions,
//! and the unit type codes that the preview renderer distinguishes.
//!
//! # Example
//!
//! ```
//! use pud_parser::format::{Era, SizeClass};
//!
//! assert_eq!(Era::from_code(1), Era::Winter);
//! assert_eq!(Era::from_code(7), Era::Forest);
//! assert_eq!(SizeClass::from_dimensions(96, 96), SizeClass::Medium);
//! assert_eq!(SizeClass::from_dimensions(96, 64), SizeClass::Custom);
//! ```

use std::fmt;

/// The 10-byte signature at the start of the `TYPE` payload.
pub const PUD_SIGNATURE: &[u8; 10] = b"WAR2 MAP\0\0";

/// Offset of the format tag within the `TYPE` payload.
///
/// The signature occupies the first 10 bytes of a 12-byte header block; the
/// two bytes after it (commonly `0A FF`) are not interpreted.
pub const FORMAT_TAG_OFFSET: usize = 12;

/// Width and height assumed when the `DIM ` chunk is absent.
pub const DEFAULT_DIMENSION: u16 = 32;

/// Size of the `DESC` text field in bytes.
pub const DESCRIPTION_LEN: usize = 32;

/// Size of one `UNIT` record in bytes.
pub const UNIT_RECORD_SIZE: usize = 8;

/// Size of one `MTXM` tile entry in bytes.
pub const TILE_ENTRY_SIZE: usize = 2;

/// Unit type codes with special meaning for the preview.
pub mod unit_types {
    /// Gold mine resource node.
    pub const GOLD_MINE: u8 = 0x5C;
    /// Oil patch resource node.
    pub const OIL_PATCH: u8 = 0x5D;
    /// Human player start location.
    pub const HUMAN_START: u8 = 0x5E;
    /// Orc player start location.
    pub const ORC_START: u8 = 0x5F;
}

/// The terrain theme of a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Era {
    /// Forest terrain (code 0, and the fallback for unknown codes).
    #[default]
    Forest = 0,
    /// Winter terrain (code 1).
    Winter = 1,
    /// Wasteland terrain (code 2).
    Wasteland = 2,
    /// Swamp terrain (code 3).
    Swamp = 3,
}

impl Era {
    /// Maps a raw era code to an era. Any value outside `{1, 2, 3}` is Forest.
    #[must_use]
    pub const fn from_code(code: u16) -> Self {
        match code {
            1 => Era::Winter,
            2 => Era::Wasteland,
            3 => Era::Swamp,
            _ => Era::Forest,
        }
    }

    /// Returns the display name of the era.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Era::Forest => "Forest",
            Era::Winter => "Winter",
            Era::Wasteland => "Wasteland",
            Era::Swamp => "Swamp",
        }
    }
}

impl fmt::Display for Era {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Standard map sizes, derived purely from width and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SizeClass {
    /// Any size other than the three standard squares.
    #[default]
    Custom = 0,
    /// 64x64 tiles.
    Small = 1,
    /// 96x96 tiles.
    Medium = 2,
    /// 128x128 tiles.
    Large = 3,
}

impl SizeClass {
    /// Classifies map dimensions using an exact-match table.
    #[must_use]
    pub const fn from_dimensions(width: u16, height: u16) -> Self {
        match (width, height) {
            (64, 64) => SizeClass::Small,
            (96, 96) => SizeClass::Medium,
            (128, 128) => SizeClass::Large,
            _ => SizeClass::Custom,
        }
    }

    /// Returns the display name of the size class.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            SizeClass::Custom => "Custom",
            SizeClass::Small => "Small",
            SizeClass::Medium => "Medium",
            SizeClass::Large => "Large",
        }
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
