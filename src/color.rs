//! Display colors for tiles, players and units.
//!
//! Everything here is a pure function over constant tables, so the policy
//! is safe to share between threads without synchronization.
//!
//! # Tile colors
//!
//! A tile code is masked with `0xFFF0` to get its base tile. Nine base tiles
//! (`0x0010` to `0x0090`) have fixed colors shared by every era; any other
//! base tile is drawn in a flat color that depends on the era.
//!
//! ```
//! use pud_parser::color::{tile_color, Rgba};
//! use pud_parser::format::Era;
//!
//! assert_eq!(tile_color(Era::Swamp, 0x0057), Rgba::opaque(0x28, 0x55, 0x0C));
//! assert_eq!(tile_color(Era::Winter, 0x1234), Rgba::opaque(200, 200, 220));
//! ```

use crate::format::Era;
use crate::map::UnitKind;

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha (255 = opaque).
    pub a: u8,
}

impl Rgba {
    /// Opaque black.
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);

    /// Creates a color from all four channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba { r, g, b, a }
    }

    /// Creates a fully opaque color.
    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Rgba { r, g, b, a: 255 }
    }

    /// Returns the same color with its alpha replaced.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Rgba { a, ..self }
    }

    /// Returns the channels as `[r, g, b, a]`.
    #[must_use]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[u8; 4]> for Rgba {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Rgba { r, g, b, a }
    }
}

impl From<Rgba> for [u8; 4] {
    fn from(c: Rgba) -> Self {
        c.to_array()
    }
}

/// Mask applied to a tile code to get its base tile.
pub const BASE_TILE_MASK: u16 = 0xFFF0;

/// Base tiles with era-independent colors: water, coast, ground, forest and
/// rock.
const TERRAIN_COLORS: [(u16, Rgba); 9] = [
    (0x0010, Rgba::opaque(0x04, 0x38, 0x75)),
    (0x0020, Rgba::opaque(0x04, 0x34, 0x71)),
    (0x0030, Rgba::opaque(0x6D, 0x41, 0x00)),
    (0x0040, Rgba::opaque(0x61, 0x38, 0x00)),
    (0x0050, Rgba::opaque(0x28, 0x55, 0x0C)),
    (0x0060, Rgba::opaque(0x24, 0x49, 0x04)),
    (0x0070, Rgba::opaque(0x00, 0x4D, 0x00)),
    (0x0080, Rgba::opaque(0x18, 0x18, 0x18)),
    (0x0090, Rgba::opaque(0x51, 0x51, 0x51)),
];

/// Player colors, indexed by `player % 8`.
const PLAYER_COLORS: [Rgba; 8] = [
    Rgba::opaque(255, 0, 0),     // red
    Rgba::opaque(0, 0, 255),     // blue
    Rgba::opaque(0, 255, 0),     // green
    Rgba::opaque(255, 255, 0),   // yellow
    Rgba::opaque(255, 165, 0),   // orange
    Rgba::opaque(128, 0, 128),   // purple
    Rgba::opaque(255, 255, 255), // white
    Rgba::opaque(0, 0, 0),       // black
];

const GOLD_MINE_COLOR: Rgba = Rgba::opaque(255, 255, 0);
const OIL_PATCH_COLOR: Rgba = Rgba::opaque(0, 0, 0);

/// Returns the flat color used for tiles without a table entry.
#[must_use]
pub const fn era_fallback_color(era: Era) -> Rgba {
    match era {
        Era::Winter => Rgba::opaque(200, 200, 220),
        Era::Wasteland => Rgba::opaque(150, 100, 60),
        Era::Swamp => Rgba::opaque(80, 120, 60),
        Era::Forest => Rgba::opaque(60, 120, 40),
    }
}

/// Returns the display color of a tile.
///
/// The shared terrain table takes precedence over the era.
#[must_use]
pub fn tile_color(era: Era, tile_id: u16) -> Rgba {
    let base = tile_id & BASE_TILE_MASK;
    TERRAIN_COLORS
        .iter()
        .find(|(tile, _)| *tile == base)
        .map_or_else(|| era_fallback_color(era), |&(_, color)| color)
}

/// Returns the palette color for a player index (wrapping every 8).
#[must_use]
pub fn player_color(player: u8) -> Rgba {
    PLAYER_COLORS[usize::from(player) % PLAYER_COLORS.len()]
}

/// Returns the color a unit is drawn with.
///
/// Gold mines are bright yellow and oil patches black regardless of owner;
/// every other unit takes its player's color.
#[must_use]
pub fn unit_color(unit_type: u8, player: u8) -> Rgba {
    match classify(unit_type) {
        UnitKind::GoldMine => GOLD_MINE_COLOR,
        UnitKind::OilPatch => OIL_PATCH_COLOR,
        _ => player_color(player),
    }
}

/// Classifies a unit type code.
#[must_use]
pub const fn classify(unit_type: u8) -> UnitKind {
    UnitKind::from_type(unit_type)
}

/// True for gold mines (`0x5C`) and oil patches (`0x5D`).
#[must_use]
pub fn is_resource_node(unit_type: u8) -> bool {
    UnitKind::from_type(unit_type).is_resource_node()
}

/// True for human (`0x5E`) and orc (`0x5F`) start locations.
#[must_use]
pub fn is_start_location(unit_type: u8) -> bool {
    UnitKind::from_type(unit_type).is_start_location()
}
