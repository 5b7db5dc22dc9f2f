//! Integration tests for rendering decoded maps and exporting previews.

use std::num::NonZeroU32;

use pud_parser::color::{tile_color, unit_color};
use pud_parser::format::PUD_SIGNATURE;
use pud_parser::render::BACKGROUND;
use pud_parser::{
    decode, render, try_render, ExportFormat, MapDescription, PixelBuffer, RenderError,
    RenderOptions, Rgba,
};

// ============================================================================
// Buffer Builders
// ============================================================================

fn chunk(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + payload.len());
    out.extend_from_slice(tag);
    out.extend_from_slice(&u32::try_from(payload.len()).unwrap().to_le_bytes());
    out.extend_from_slice(payload);
    out
}

fn u16_payload(values: &[u16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn unit_record(x: u16, y: u16, unit_type: u8, player: u8) -> Vec<u8> {
    let mut out = Vec::with_capacity(8);
    out.extend_from_slice(&x.to_le_bytes());
    out.extend_from_slice(&y.to_le_bytes());
    out.push(unit_type);
    out.push(player);
    out.extend_from_slice(&0u16.to_le_bytes());
    out
}

/// A 16x16 Winter map of rock tiles with one start location, one gold mine
/// and one oil patch, well apart from each other.
fn overlay_map() -> MapDescription {
    let mut type_payload = PUD_SIGNATURE.to_vec();
    type_payload.extend_from_slice(&[0x0A, 0xFF]);
    type_payload.extend_from_slice(&0u32.to_le_bytes());

    let units = [
        unit_record(3, 3, 0x5E, 0),
        unit_record(12, 12, 0x5C, 1),
        unit_record(12, 3, 0x5D, 2),
        unit_record(3, 12, 0x02, 4),
    ]
    .concat();

    let mut data = [
        chunk(b"TYPE", &type_payload),
        chunk(b"ERA ", &u16_payload(&[1])),
        chunk(b"DIM ", &u16_payload(&[16, 16])),
        chunk(b"MTXM", &u16_payload(&[0x0090; 256])),
        chunk(b"UNIT", &units),
    ]
    .concat();
    data.extend_from_slice(&[0u8; 8]);

    decode(&data).unwrap()
}

/// Pixel bounds `(x0, y0, x1, y1)` inclusive of the resource square at tile
/// `(tx, ty)` with the default tile size.
fn resource_bounds(tx: i64, ty: i64) -> (i64, i64, i64, i64) {
    let (cx, cy) = (tx * 4, ty * 4);
    (cx - 6, cy - 6, cx + 5, cy + 5)
}

fn inside(bounds: (i64, i64, i64, i64), x: u32, y: u32) -> bool {
    let (x, y) = (i64::from(x), i64::from(y));
    (bounds.0..=bounds.2).contains(&x) && (bounds.1..=bounds.3).contains(&y)
}

fn pixels(buf: &PixelBuffer) -> impl Iterator<Item = (u32, u32)> + '_ {
    (0..buf.height()).flat_map(move |y| (0..buf.width()).map(move |x| (x, y)))
}

// ============================================================================
// Overlay Toggles
// ============================================================================

#[test]
fn test_hiding_resources_leaves_everything_else() {
    let map = overlay_map();
    let full = render(&map, &RenderOptions::default());
    let no_resources = render(&map, &RenderOptions::default().with_resources(false));
    let tiles_only = render(
        &map,
        &RenderOptions::default()
            .with_resources(false)
            .with_start_locations(false),
    );

    let gold = resource_bounds(12, 12);
    let oil = resource_bounds(12, 3);

    for (x, y) in pixels(&full) {
        if inside(gold, x, y) || inside(oil, x, y) {
            assert_eq!(no_resources.pixel(x, y), tiles_only.pixel(x, y), "({x}, {y})");
        } else {
            assert_eq!(no_resources.pixel(x, y), full.pixel(x, y), "({x}, {y})");
        }
    }

    // Resource markers were actually present in the full render
    assert_ne!(full.pixel(48, 48), tiles_only.pixel(48, 48));
    assert_eq!(full.pixel(48, 48), Some(unit_color(0x5C, 1)));
    assert_eq!(full.pixel(48, 12), Some(unit_color(0x5D, 2)));
}

#[test]
fn test_hiding_start_locations() {
    let map = overlay_map();
    let full = render(&map, &RenderOptions::default());
    let no_starts = render(&map, &RenderOptions::default().with_start_locations(false));

    let rock = tile_color(map.era, 0x0090);
    assert_ne!(full.pixel(12, 12), Some(rock));
    assert_eq!(no_starts.pixel(12, 12), Some(rock));
    assert_eq!(no_starts.pixel(48, 48), full.pixel(48, 48));
}

#[test]
fn test_tiles_only_render_is_flat() {
    let map = overlay_map();
    let tiles_only = render(
        &map,
        &RenderOptions::default()
            .with_resources(false)
            .with_start_locations(false),
    );

    let rock = tile_color(map.era, 0x0090);
    assert!(pixels(&tiles_only).all(|(x, y)| tiles_only.pixel(x, y) == Some(rock)));
}

#[test]
fn test_start_location_outer_ring_is_white() {
    let map = overlay_map();
    let buf = render(&map, &RenderOptions::default());

    // Centre (12, 12), radius 9.6: pixel centre 22.5 is 10.5 away
    assert_eq!(buf.pixel(22, 11), Some(Rgba::WHITE));
    // Pixel centre 21.5 is 9.5 away: inner black ring
    assert_eq!(buf.pixel(21, 11), Some(Rgba::BLACK));
}

// ============================================================================
// Degraded Inputs
// ============================================================================

#[test]
fn test_missing_tile_grid_renders_background() {
    let mut type_payload = PUD_SIGNATURE.to_vec();
    type_payload.extend_from_slice(&[0x0A, 0xFF]);
    type_payload.extend_from_slice(&0u32.to_le_bytes());
    let mut data = chunk(b"TYPE", &type_payload);
    data.extend_from_slice(&[0u8; 8]);

    let map = decode(&data).unwrap();
    let buf = render(&map, &RenderOptions::default());
    assert_eq!((buf.width(), buf.height()), (128, 128));
    assert!(pixels(&buf).all(|(x, y)| buf.pixel(x, y) == Some(BACKGROUND)));
}

#[test]
fn test_huge_dimensions_fail_to_render() {
    let mut type_payload = PUD_SIGNATURE.to_vec();
    type_payload.extend_from_slice(&[0x0A, 0xFF]);
    type_payload.extend_from_slice(&0u32.to_le_bytes());
    let mut data = [
        chunk(b"TYPE", &type_payload),
        chunk(b"DIM ", &u16_payload(&[0xFFFF, 0xFFFF])),
    ]
    .concat();
    data.extend_from_slice(&[0u8; 8]);

    let map = decode(&data).unwrap();
    let size = NonZeroU32::new(65_537).unwrap();
    let options = RenderOptions::default().with_tile_pixel_size(size);
    assert!(matches!(
        try_render(&map, &options),
        Err(RenderError::TooLarge { .. })
    ));
    assert!(try_render(&map, &RenderOptions::default()).is_err());

    let buf = render(&map, &options);
    assert!(buf.as_raw().is_empty());
}

#[test]
fn test_tile_size_scales_output() {
    let map = overlay_map();
    let size = NonZeroU32::new(1).unwrap();
    let buf = render(&map, &RenderOptions::default().with_tile_pixel_size(size));
    assert_eq!((buf.width(), buf.height()), (16, 16));
}

// ============================================================================
// Export
// ============================================================================

#[test]
fn test_png_export_roundtrip() {
    let buf = render(&overlay_map(), &RenderOptions::default());
    let bytes = buf.encode(ExportFormat::Png).unwrap();

    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (64, 64));
    assert_eq!(decoded.as_raw().as_slice(), buf.as_raw());
}

#[test]
fn test_jpeg_export_dimensions() {
    let buf = render(&overlay_map(), &RenderOptions::default());
    let bytes = buf.encode(ExportFormat::Jpeg).unwrap();

    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (64, 64));
}

#[test]
fn test_save_picks_format_from_extension() {
    let buf = render(&overlay_map(), &RenderOptions::default());
    let dir = std::env::temp_dir();

    let png_path = dir.join(format!("pud_parser_render_{}.png", std::process::id()));
    assert_eq!(buf.save(&png_path).unwrap(), ExportFormat::Png);
    let written = std::fs::read(&png_path).unwrap();
    assert_eq!(&written[..4], b"\x89PNG");
    std::fs::remove_file(&png_path).unwrap();

    let jpg_path = dir.join(format!("pud_parser_render_{}.jpeg", std::process::id()));
    assert_eq!(buf.save(&jpg_path).unwrap(), ExportFormat::Jpeg);
    let written = std::fs::read(&jpg_path).unwrap();
    assert_eq!(&written[..2], &[0xFF, 0xD8]);
    std::fs::remove_file(&jpg_path).unwrap();
}
