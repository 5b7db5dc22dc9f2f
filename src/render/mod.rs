//! Map preview rasterization.
//!
//! [`render`] turns a [`MapDescription`] into a [`PixelBuffer`] in two
//! passes:
//!
//! 1. **Tiles**: every cell covered by the tile grid becomes a
//!    `tile_pixel_size` square in its [`tile_color`]. Cells the grid does not
//!    reach keep the black background.
//! 2. **Overlay**: start locations and resource nodes are drawn in file
//!    order, later units over earlier ones. Ordinary units are never drawn.
//!
//! A short or missing tile grid only leaves background pixels. The one
//! failure is an output larger than [`MAX_DIMENSION`] on a side:
//! [`try_render`] reports it as a [`RenderError`], while [`render`] logs it
//! and returns an empty buffer. The finished buffer can be encoded with the
//! functions in [`export`].
//!
//! # Example
//!
//! ```
//! use pud_parser::format::{Era, SizeClass};
//! use pud_parser::map::MapDescription;
//! use pud_parser::render::{render, RenderOptions};
//!
//! let map = MapDescription {
//!     format_tag: 0,
//!     version: 0,
//!     description: String::new(),
//!     era: Era::Forest,
//!     width: 2,
//!     height: 2,
//!     size_class: SizeClass::Custom,
//!     tiles: vec![0x0010; 4],
//!     units: Vec::new(),
//! };
//!
//! let buf = render(&map, &RenderOptions::default());
//! assert_eq!((buf.width(), buf.height()), (8, 8));
//! ```

mod buffer;
pub mod export;
mod shapes;

pub use buffer::{PixelBuffer, MAX_DIMENSION};
pub use export::{ExportFormat, DEFAULT_JPEG_QUALITY};

use std::num::NonZeroU32;

use tracing::{debug, warn};

use crate::color::{tile_color, unit_color, Rgba};
use crate::error::RenderError;
use crate::map::{MapDescription, UnitKind};

/// Default edge length of one tile in pixels.
pub const DEFAULT_TILE_PIXEL_SIZE: NonZeroU32 = match NonZeroU32::new(4) {
    Some(n) => n,
    None => unreachable!(),
};

/// Color of pixels not covered by the tile grid.
pub const BACKGROUND: Rgba = Rgba::BLACK;

/// Overlay markers span this many tiles.
pub const MARKER_TILES: u32 = 3;

/// Opacity of the start location fill (0.6).
pub const START_LOCATION_ALPHA: u8 = 153;

/// Minimum start location radius in pixels.
pub const MIN_START_RADIUS: f64 = 4.0;

/// Per-call render settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Edge length of one tile in pixels.
    pub tile_pixel_size: NonZeroU32,
    /// Draw gold mines and oil patches.
    pub show_resources: bool,
    /// Draw player start locations.
    pub show_start_locations: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            tile_pixel_size: DEFAULT_TILE_PIXEL_SIZE,
            show_resources: true,
            show_start_locations: true,
        }
    }
}

impl RenderOptions {
    /// Sets the tile size.
    #[must_use]
    pub fn with_tile_pixel_size(mut self, size: NonZeroU32) -> Self {
        self.tile_pixel_size = size;
        self
    }

    /// Enables or disables resource node markers.
    #[must_use]
    pub fn with_resources(mut self, show: bool) -> Self {
        self.show_resources = show;
        self
    }

    /// Enables or disables start location markers.
    #[must_use]
    pub fn with_start_locations(mut self, show: bool) -> Self {
        self.show_start_locations = show;
        self
    }

    /// Returns whether units of `kind` are drawn with these options.
    #[must_use]
    pub fn shows(&self, kind: UnitKind) -> bool {
        (kind.is_resource_node() && self.show_resources)
            || (kind.is_start_location() && self.show_start_locations)
    }

    /// Radius of a start location marker: `max(4, tile * 3 * 0.8)`.
    #[must_use]
    pub fn start_location_radius(&self) -> f64 {
        (f64::from(self.tile_pixel_size.get()) * f64::from(MARKER_TILES) * 0.8)
            .max(MIN_START_RADIUS)
    }

    /// Side of a resource marker: `max(1, tile * 3)`.
    #[must_use]
    pub fn resource_side(&self) -> i64 {
        (i64::from(self.tile_pixel_size.get()) * i64::from(MARKER_TILES)).max(1)
    }
}

/// Rasterizes `map` with the given options.
///
/// An output too large to allocate is logged and yields an empty buffer; use
/// [`try_render`] to handle that case.
#[must_use]
pub fn render(map: &MapDescription, options: &RenderOptions) -> PixelBuffer {
    try_render(map, options).unwrap_or_else(|err| {
        warn!(%err, "preview not rendered");
        PixelBuffer::empty()
    })
}

/// Rasterizes `map` with the given options.
///
/// # Errors
///
/// Returns [`RenderError::TooLarge`] if the map dimensions times the tile
/// size exceed [`MAX_DIMENSION`] on either side.
pub fn try_render(
    map: &MapDescription,
    options: &RenderOptions,
) -> Result<PixelBuffer, RenderError> {
    let tile = options.tile_pixel_size.get();
    let width = u64::from(map.width) * u64::from(tile);
    let height = u64::from(map.height) * u64::from(tile);
    debug!(width, height, tile, "rendering map");

    let (Ok(w), Ok(h)) = (u32::try_from(width), u32::try_from(height)) else {
        return Err(RenderError::TooLarge { width, height });
    };

    let mut buf = PixelBuffer::new(w, h, BACKGROUND)?;
    draw_tiles(&mut buf, map, i64::from(tile));
    draw_overlay(&mut buf, map, options);
    Ok(buf)
}

fn draw_tiles(buf: &mut PixelBuffer, map: &MapDescription, tile: i64) {
    for y in 0..map.height {
        for x in 0..map.width {
            // Row-major grid: the first uncovered cell ends it
            let Some(tile_id) = map.tile_at(x, y) else {
                return;
            };
            let (px, py) = (i64::from(x) * tile, i64::from(y) * tile);
            buf.fill_rect(px, py, tile, tile, tile_color(map.era, tile_id));
        }
    }
}

fn draw_overlay(buf: &mut PixelBuffer, map: &MapDescription, options: &RenderOptions) {
    let tile = i64::from(options.tile_pixel_size.get());
    let radius = options.start_location_radius();
    let side = options.resource_side();

    for unit in &map.units {
        let kind = unit.kind();
        if !options.shows(kind) {
            continue;
        }

        let cx = i64::from(unit.x) * tile;
        let cy = i64::from(unit.y) * tile;
        let color = unit_color(unit.unit_type, unit.player);

        if kind.is_start_location() {
            #[allow(clippy::cast_precision_loss)]
            shapes::draw_start_location(
                buf,
                cx as f64,
                cy as f64,
                radius,
                color.with_alpha(START_LOCATION_ALPHA),
            );
        } else {
            shapes::draw_resource(buf, cx, cy, side, color);
        }
    }
}
