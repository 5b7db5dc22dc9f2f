//! RGBA pixel storage for rendered previews.

use crate::color::Rgba;
use crate::error::RenderError;

/// Largest accepted width or height in pixels.
pub const MAX_DIMENSION: u32 = 16_384;

/// A `width * height` grid of RGBA pixels, row-major, 4 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Creates a buffer with every pixel set to `fill`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::TooLarge`] if either side exceeds
    /// [`MAX_DIMENSION`] or the byte length overflows `usize`.
    pub fn new(width: u32, height: u32, fill: Rgba) -> Result<Self, RenderError> {
        let too_large = RenderError::TooLarge {
            width: u64::from(width),
            height: u64::from(height),
        };
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(too_large);
        }
        let pixels = usize::try_from(width)
            .ok()
            .zip(usize::try_from(height).ok())
            .and_then(|(w, h)| w.checked_mul(h))
            .filter(|p| p.checked_mul(4).is_some())
            .ok_or(too_large)?;

        Ok(PixelBuffer {
            width,
            height,
            data: fill.to_array().repeat(pixels),
        })
    }

    /// Creates a zero-sized buffer.
    #[must_use]
    pub const fn empty() -> Self {
        PixelBuffer {
            width: 0,
            height: 0,
            data: Vec::new(),
        }
    }

    /// Returns the width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Returns the raw RGBA bytes.
    #[must_use]
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Returns the pixel at `(x, y)`, or `None` outside the buffer.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        let offset = self.offset(i64::from(x), i64::from(y))?;
        let px: [u8; 4] = self.data[offset..offset + 4].try_into().ok()?;
        Some(Rgba::from(px))
    }

    /// Overwrites the pixel at `(x, y)`. Coordinates outside the buffer are
    /// ignored.
    pub fn put_pixel(&mut self, x: i64, y: i64, color: Rgba) {
        if let Some(offset) = self.offset(x, y) {
            self.data[offset..offset + 4].copy_from_slice(&color.to_array());
        }
    }

    /// Composites `color` over the pixel at `(x, y)` (source-over).
    /// Coordinates outside the buffer are ignored.
    pub fn blend_pixel(&mut self, x: i64, y: i64, color: Rgba) {
        if color.a == u8::MAX {
            self.put_pixel(x, y, color);
            return;
        }
        let Some(offset) = self.offset(x, y) else {
            return;
        };

        let src_a = u32::from(color.a);
        let inv_a = 255 - src_a;
        let dst = &mut self.data[offset..offset + 4];
        for (d, s) in dst.iter_mut().zip([color.r, color.g, color.b]) {
            *d = mix(u32::from(s), u32::from(*d), src_a, inv_a);
        }
        dst[3] = u8::try_from(src_a + (u32::from(dst[3]) * inv_a + 127) / 255).unwrap_or(u8::MAX);
    }

    /// Fills the rectangle with top-left `(x, y)` and size `w * h`, clipped
    /// to the buffer.
    pub fn fill_rect(&mut self, x: i64, y: i64, w: i64, h: i64, color: Rgba) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(i64::from(self.width));
        let y1 = (y + h).min(i64::from(self.height));
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let rgba = color.to_array();
        for row in y0..y1 {
            let (Some(start), Some(end)) = (self.offset(x0, row), self.offset(x1 - 1, row)) else {
                continue;
            };
            for px in self.data[start..end + 4].chunks_exact_mut(4) {
                px.copy_from_slice(&rgba);
            }
        }
    }

    fn offset(&self, x: i64, y: i64) -> Option<usize> {
        let x = u32::try_from(x).ok().filter(|&x| x < self.width)?;
        let y = u32::try_from(y).ok().filter(|&y| y < self.height)?;
        Some((y as usize * self.width as usize + x as usize) * 4)
    }
}

fn mix(src: u32, dst: u32, src_a: u32, inv_a: u32) -> u8 {
    u8::try_from((src * src_a + dst * inv_a + 127) / 255).unwrap_or(u8::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_fills_every_pixel() {
        let buf = PixelBuffer::new(3, 2, Rgba::new(1, 2, 3, 4)).unwrap();
        assert_eq!(buf.as_raw().len(), 3 * 2 * 4);
        assert!(buf.as_raw().chunks_exact(4).all(|p| p == [1, 2, 3, 4]));
    }

    #[test]
    fn test_empty_buffer() {
        let buf = PixelBuffer::new(0, 5, Rgba::BLACK).unwrap();
        assert!(buf.as_raw().is_empty());
        assert_eq!(buf.pixel(0, 0), None);
    }

    #[test]
    fn test_new_rejects_oversized() {
        assert_eq!(
            PixelBuffer::new(u32::MAX, u32::MAX, Rgba::BLACK),
            Err(RenderError::TooLarge {
                width: u64::from(u32::MAX),
                height: u64::from(u32::MAX),
            })
        );
        assert!(PixelBuffer::new(MAX_DIMENSION + 1, 1, Rgba::BLACK).is_err());
        assert!(PixelBuffer::new(1, MAX_DIMENSION + 1, Rgba::BLACK).is_err());
    }

    #[test]
    fn test_new_accepts_max_side() {
        let buf = PixelBuffer::new(MAX_DIMENSION, 1, Rgba::BLACK).unwrap();
        assert_eq!(buf.as_raw().len(), MAX_DIMENSION as usize * 4);
    }

    #[test]
    fn test_empty_constructor() {
        let buf = PixelBuffer::empty();
        assert_eq!((buf.width(), buf.height()), (0, 0));
        assert!(buf.as_raw().is_empty());
    }

    #[test]
    fn test_put_and_get_pixel() {
        let mut buf = PixelBuffer::new(4, 4, Rgba::BLACK).unwrap();
        buf.put_pixel(2, 3, Rgba::WHITE);
        assert_eq!(buf.pixel(2, 3), Some(Rgba::WHITE));
        assert_eq!(buf.pixel(3, 2), Some(Rgba::BLACK));
        assert_eq!(buf.pixel(4, 0), None);
    }

    #[test]
    fn test_put_pixel_out_of_bounds_ignored() {
        let mut buf = PixelBuffer::new(2, 2, Rgba::BLACK).unwrap();
        let before = buf.clone();
        buf.put_pixel(-1, 0, Rgba::WHITE);
        buf.put_pixel(0, 2, Rgba::WHITE);
        buf.blend_pixel(5, 5, Rgba::WHITE.with_alpha(10));
        assert_eq!(buf, before);
    }

    #[test]
    fn test_blend_pixel_source_over() {
        let mut buf = PixelBuffer::new(1, 1, Rgba::BLACK).unwrap();
        buf.blend_pixel(0, 0, Rgba::new(255, 0, 100, 153));
        // 255 * 0.6 = 153, 100 * 0.6 = 60
        assert_eq!(buf.pixel(0, 0), Some(Rgba::new(153, 0, 60, 255)));
    }

    #[test]
    fn test_blend_pixel_transparent_is_noop() {
        let mut buf = PixelBuffer::new(1, 1, Rgba::opaque(10, 20, 30)).unwrap();
        buf.blend_pixel(0, 0, Rgba::new(255, 255, 255, 0));
        assert_eq!(buf.pixel(0, 0), Some(Rgba::opaque(10, 20, 30)));
    }

    #[test]
    fn test_fill_rect_clipped() {
        let mut buf = PixelBuffer::new(4, 4, Rgba::BLACK).unwrap();
        buf.fill_rect(-2, 2, 4, 10, Rgba::WHITE);
        for y in 0..4 {
            for x in 0..4 {
                let expected = if x < 2 && y >= 2 { Rgba::WHITE } else { Rgba::BLACK };
                assert_eq!(buf.pixel(x, y), Some(expected), "({x}, {y})");
            }
        }
    }

    #[test]
    fn test_fill_rect_fully_outside() {
        let mut buf = PixelBuffer::new(2, 2, Rgba::BLACK).unwrap();
        let before = buf.clone();
        buf.fill_rect(2, 0, 3, 3, Rgba::WHITE);
        buf.fill_rect(0, 0, 0, 2, Rgba::WHITE);
        assert_eq!(buf, before);
    }
}
