//! Overlay shapes for start locations and resource nodes.
//!
//! Coverage is decided per pixel against the pixel's centre
//! `(px + 0.5, py + 0.5)`; there is no anti-aliasing.

use super::buffer::PixelBuffer;
use crate::color::Rgba;

/// Width of each ring around a start location marker.
const RING_WIDTH: f64 = 1.0;

/// Draws a start location marker: a filled disc of `radius` centred at
/// `(cx, cy)`, a black inner ring just inside the edge and a white outer ring
/// just outside it.
///
/// `fill` is composited over the existing pixels; the rings are opaque.
pub fn draw_start_location(buf: &mut PixelBuffer, cx: f64, cy: f64, radius: f64, fill: Rgba) {
    let reach = radius + RING_WIDTH;
    #[allow(clippy::cast_possible_truncation)]
    let (x0, x1, y0, y1) = (
        (cx - reach).floor() as i64,
        (cx + reach).ceil() as i64,
        (cy - reach).floor() as i64,
        (cy + reach).ceil() as i64,
    );

    for py in y0..=y1 {
        for px in x0..=x1 {
            #[allow(clippy::cast_precision_loss)]
            let d = (px as f64 + 0.5 - cx).hypot(py as f64 + 0.5 - cy);
            if d <= radius - RING_WIDTH {
                buf.blend_pixel(px, py, fill);
            } else if d <= radius {
                buf.put_pixel(px, py, Rgba::BLACK);
            } else if d <= reach {
                buf.put_pixel(px, py, Rgba::WHITE);
            }
        }
    }
}

/// Draws a resource marker: an opaque square of `side` pixels centred at
/// `(cx, cy)` with a 1-pixel black border on its outermost pixels.
pub fn draw_resource(buf: &mut PixelBuffer, cx: i64, cy: i64, side: i64, fill: Rgba) {
    let left = cx - side / 2;
    let top = cy - side / 2;

    buf.fill_rect(left, top, side, side, Rgba::BLACK);
    if side > 2 {
        buf.fill_rect(left + 1, top + 1, side - 2, side - 2, fill);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = Rgba::opaque(255, 0, 0);
    const GREEN: Rgba = Rgba::opaque(0, 255, 0);

    #[test]
    fn test_resource_square_layout() {
        let mut buf = PixelBuffer::new(20, 20, GREEN).unwrap();
        draw_resource(&mut buf, 10, 10, 6, RED);

        // Square spans 7..13 on both axes
        assert_eq!(buf.pixel(6, 10), Some(GREEN));
        assert_eq!(buf.pixel(7, 10), Some(Rgba::BLACK));
        assert_eq!(buf.pixel(8, 10), Some(RED));
        assert_eq!(buf.pixel(11, 11), Some(RED));
        assert_eq!(buf.pixel(12, 12), Some(Rgba::BLACK));
        assert_eq!(buf.pixel(13, 10), Some(GREEN));
        assert_eq!(buf.pixel(10, 7), Some(Rgba::BLACK));
        assert_eq!(buf.pixel(10, 13), Some(GREEN));
    }

    #[test]
    fn test_resource_square_clipped_at_corner() {
        let mut buf = PixelBuffer::new(8, 8, GREEN).unwrap();
        draw_resource(&mut buf, 0, 0, 6, RED);
        assert_eq!(buf.pixel(0, 0), Some(RED));
        assert_eq!(buf.pixel(1, 1), Some(RED));
        assert_eq!(buf.pixel(2, 0), Some(Rgba::BLACK));
        assert_eq!(buf.pixel(3, 3), Some(GREEN));
    }

    #[test]
    fn test_start_location_rings() {
        let mut buf = PixelBuffer::new(40, 40, GREEN).unwrap();
        draw_start_location(&mut buf, 20.0, 20.0, 8.0, RED.with_alpha(153));

        // Centre pixel is the fill blended over green
        let centre = buf.pixel(20, 20).unwrap();
        assert_eq!(centre, Rgba::opaque(153, 102, 0));

        // Pixel centre 27.5 is 7.5 from the centre: inner black ring
        assert_eq!(buf.pixel(27, 19), Some(Rgba::BLACK));
        // Pixel centre 28.5 is 8.5 away: outer white ring
        assert_eq!(buf.pixel(28, 19), Some(Rgba::WHITE));
        // Pixel centre 29.5 is 9.5 away: untouched
        assert_eq!(buf.pixel(29, 19), Some(GREEN));
        // Corner of the bounding box stays untouched
        assert_eq!(buf.pixel(11, 11), Some(GREEN));
    }

    #[test]
    fn test_start_location_clipped() {
        let mut buf = PixelBuffer::new(10, 10, GREEN).unwrap();
        draw_start_location(&mut buf, 0.0, 0.0, 4.0, RED.with_alpha(153));
        assert_eq!(buf.pixel(0, 0), Some(Rgba::opaque(153, 102, 0)));
        assert_eq!(buf.pixel(9, 9), Some(GREEN));
    }
}
