//! The decoded map model.
//!
//! [`MapDescription`] is what [`decode`](crate::decode::decode) produces: a
//! plain value built once per file and never mutated afterwards. Its shape is
//! fixed by the binary format.
//!
//! # Example
//!
//! ```
//! use pud_parser::map::{Unit, UnitKind};
//!
//! let unit = Unit { x: 10, y: 12, unit_type: 0x5C, player: 15, alteration: 0 };
//! assert_eq!(unit.kind(), UnitKind::GoldMine);
//! assert!(unit.kind().is_resource_node());
//! ```

use std::collections::BTreeSet;

use crate::format::{unit_types, Era, SizeClass};

/// One unit placement from the `UNIT` chunk.
///
/// # Format
///
/// | Offset | Size | Type | Field |
/// |--------|------|------|-------|
/// | 0x00 | 2 | u16 LE | X (tiles) |
/// | 0x02 | 2 | u16 LE | Y (tiles) |
/// | 0x04 | 1 | u8 | Unit type |
/// | 0x05 | 1 | u8 | Owning player |
/// | 0x06 | 2 | u16 LE | Alteration (resource amount, etc.) |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Unit {
    /// X coordinate in tiles.
    pub x: u16,
    /// Y coordinate in tiles.
    pub y: u16,
    /// Unit type code.
    pub unit_type: u8,
    /// Owning player index.
    pub player: u8,
    /// Per-unit alteration value. Decoded but not interpreted.
    pub alteration: u16,
}

impl Unit {
    /// Returns the preview classification of this unit.
    #[must_use]
    pub fn kind(&self) -> UnitKind {
        UnitKind::from_type(self.unit_type)
    }
}

/// How the preview treats a unit type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    /// Gold mine (`0x5C`).
    GoldMine,
    /// Oil patch (`0x5D`).
    OilPatch,
    /// Human start location (`0x5E`).
    HumanStart,
    /// Orc start location (`0x5F`).
    OrcStart,
    /// Any other unit. Never drawn by the preview.
    Other,
}

impl UnitKind {
    /// Classifies a raw unit type code.
    #[must_use]
    pub const fn from_type(unit_type: u8) -> Self {
        match unit_type {
            unit_types::GOLD_MINE => UnitKind::GoldMine,
            unit_types::OIL_PATCH => UnitKind::OilPatch,
            unit_types::HUMAN_START => UnitKind::HumanStart,
            unit_types::ORC_START => UnitKind::OrcStart,
            _ => UnitKind::Other,
        }
    }

    /// Gold mine or oil patch.
    #[must_use]
    pub const fn is_resource_node(&self) -> bool {
        matches!(self, UnitKind::GoldMine | UnitKind::OilPatch)
    }

    /// Human or orc start location.
    #[must_use]
    pub const fn is_start_location(&self) -> bool {
        matches!(self, UnitKind::HumanStart | UnitKind::OrcStart)
    }
}

/// A fully decoded PUD map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapDescription {
    /// Value read at offset 12 of the `TYPE` payload.
    pub format_tag: u32,
    /// From `VER `, 0 if absent.
    pub version: u16,
    /// From `DESC`, NUL truncated; empty if absent.
    pub description: String,
    /// From `ERAX`, else `ERA `, else Forest.
    pub era: Era,
    /// Width in tiles, 32 if `DIM ` is absent.
    pub width: u16,
    /// Height in tiles, 32 if `DIM ` is absent.
    pub height: u16,
    /// Derived from `(width, height)`.
    pub size_class: SizeClass,
    /// Row-major tile codes, index `y * width + x`. May be shorter than
    /// `width * height` (or empty) when `MTXM` is short or absent.
    pub tiles: Vec<u16>,
    /// Unit placements in file order.
    pub units: Vec<Unit>,
}

impl MapDescription {
    /// Returns the number of tiles the dimensions call for.
    #[must_use]
    pub fn expected_tile_count(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Returns the tile code at `(x, y)`, if the grid covers that cell.
    #[must_use]
    pub fn tile_at(&self, x: u16, y: u16) -> Option<u16> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = usize::from(y) * usize::from(self.width) + usize::from(x);
        self.tiles.get(index).copied()
    }

    /// Returns whether the tile grid covers every cell exactly.
    #[must_use]
    pub fn has_complete_tile_grid(&self) -> bool {
        self.tiles.len() == self.expected_tile_count()
    }

    /// Returns the dimensions as `"WxH"`.
    #[must_use]
    pub fn dimensions_string(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    /// Returns the format tag as upper-case hex, e.g. `0x20524556`.
    #[must_use]
    pub fn tag_hex(&self) -> String {
        format!("0x{:X}", self.format_tag)
    }

    /// Iterates over units of the given kind.
    pub fn units_of_kind(&self, kind: UnitKind) -> impl Iterator<Item = &Unit> + '_ {
        self.units.iter().filter(move |u| u.kind() == kind)
    }

    /// Iterates over gold mines and oil patches.
    pub fn resource_nodes(&self) -> impl Iterator<Item = &Unit> + '_ {
        self.units.iter().filter(|u| u.kind().is_resource_node())
    }

    /// Iterates over start locations.
    pub fn start_locations(&self) -> impl Iterator<Item = &Unit> + '_ {
        self.units.iter().filter(|u| u.kind().is_start_location())
    }

    /// Computes the summary counts shown alongside a preview.
    #[must_use]
    pub fn stats(&self) -> MapStats {
        MapStats::from_map(self)
    }
}

/// Unit counts by classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MapStats {
    /// All decoded units.
    pub total_units: usize,
    /// Gold mines.
    pub gold_mines: usize,
    /// Oil patches.
    pub oil_patches: usize,
    /// Human and orc start locations.
    pub start_locations: usize,
    /// Distinct players owning at least one start location.
    pub players: usize,
}

impl MapStats {
    /// Counts the units of `map`.
    #[must_use]
    pub fn from_map(map: &MapDescription) -> Self {
        let owners: BTreeSet<u8> = map.start_locations().map(|u| u.player).collect();

        MapStats {
            total_units: map.units.len(),
            gold_mines: map.units_of_kind(UnitKind::GoldMine).count(),
            oil_patches: map.units_of_kind(UnitKind::OilPatch).count(),
            start_locations: map.start_locations().count(),
            players: owners.len(),
        }
    }

    /// Gold mines plus oil patches.
    #[must_use]
    pub fn resource_nodes(&self) -> usize {
        self.gold_mines + self.oil_patches
    }
}
