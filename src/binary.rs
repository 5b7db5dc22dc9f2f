//! Sequential binary reading for PUD map files.
//!
//! [`ByteCursor`] wraps an immutable byte buffer and a read position that
//! starts at 0. Every read is bounds checked and fails with
//! [`OutOfBounds`] instead of panicking.
//!
//! # Endianness
//!
//! All multi-byte integers in the PUD format are stored little-endian. This
//! is a fixed property of the file format, not of the host platform.
//!
//! # Example
//!
//! ```
//! use pud_parser::binary::ByteCursor;
//!
//! let data = [0x34, 0x12, 0x78, 0x56, 0x34, 0x12, b'H', b'i', 0x00, 0x00];
//! let mut cursor = ByteCursor::new(&data);
//!
//! assert_eq!(cursor.read_u16_le().unwrap(), 0x1234);
//! assert_eq!(cursor.read_u32_le().unwrap(), 0x1234_5678);
//! assert_eq!(cursor.read_fixed_string(4).unwrap(), "Hi");
//! assert_eq!(cursor.position(), 10);
//! ```

use crate::error::OutOfBounds;

/// A bounds-checked little-endian reader over a borrowed buffer.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteCursor<'a> {
    /// Creates a cursor positioned at the start of `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        ByteCursor { data, position: 0 }
    }

    /// Creates a cursor positioned at `offset`.
    ///
    /// The offset is not validated here; the first read past the end fails.
    #[must_use]
    pub fn at(data: &'a [u8], offset: usize) -> Self {
        ByteCursor {
            data,
            position: offset,
        }
    }

    /// Returns the current read position.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Reads one byte and advances by 1.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfBounds`] if the position is at or past the end.
    pub fn read_u8(&mut self) -> Result<u8, OutOfBounds> {
        match self.data.get(self.position) {
            Some(&b) => {
                self.position += 1;
                Ok(b)
            }
            None => Err(self.out_of_bounds(1)),
        }
    }

    /// Reads a little-endian u16 as `low | (high << 8)`.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfBounds`] if either byte is missing.
    pub fn read_u16_le(&mut self) -> Result<u16, OutOfBounds> {
        let low = self.read_u8()?;
        let high = self.read_u8()?;
        Ok(u16::from(low) | (u16::from(high) << 8))
    }

    /// Reads a little-endian u32 as `b0 | b1<<8 | b2<<16 | b3<<24`.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfBounds`] if any of the four bytes is missing.
    pub fn read_u32_le(&mut self) -> Result<u32, OutOfBounds> {
        let b0 = self.read_u8()?;
        let b1 = self.read_u8()?;
        let b2 = self.read_u8()?;
        let b3 = self.read_u8()?;
        Ok(u32::from(b0) | (u32::from(b1) << 8) | (u32::from(b2) << 16) | (u32::from(b3) << 24))
    }

    /// Reads the next `len` bytes as a borrowed slice and advances by `len`.
    ///
    /// On failure the position is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfBounds`] if `position + len` exceeds the buffer length.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], OutOfBounds> {
        let end = self
            .position
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| self.out_of_bounds(len))?;
        let slice = &self.data[self.position..end];
        self.position = end;
        Ok(slice)
    }

    /// Reads a fixed-size text field of `len` bytes.
    ///
    /// The field is cut at the first NUL byte (or kept whole if there is
    /// none) and decoded as UTF-8, replacing invalid sequences.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfBounds`] if fewer than `len` bytes remain.
    pub fn read_fixed_string(&mut self, len: usize) -> Result<String, OutOfBounds> {
        let slice = self.read_bytes(len)?;
        let string_len = slice.iter().position(|&b| b == 0).unwrap_or(len);
        Ok(String::from_utf8_lossy(&slice[..string_len]).into_owned())
    }

    fn out_of_bounds(&self, len: usize) -> OutOfBounds {
        OutOfBounds {
            expected: self.position.saturating_add(len),
            available: self.data.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================
    // read_u8 tests
    // ========================

    #[test]
    fn test_read_u8_advances() {
        let data = [0xAB, 0xCD];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_u8().unwrap(), 0xAB);
        assert_eq!(cursor.read_u8().unwrap(), 0xCD);
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn test_read_u8_at_end() {
        let data = [0xAB];
        let mut cursor = ByteCursor::at(&data, 1);
        assert_eq!(
            cursor.read_u8(),
            Err(OutOfBounds {
                expected: 2,
                available: 1
            })
        );
    }

    #[test]
    fn test_read_u8_empty() {
        let mut cursor = ByteCursor::new(&[]);
        assert!(cursor.read_u8().is_err());
    }

    // ========================
    // read_u16_le / read_u32_le tests
    // ========================

    #[test]
    fn test_read_u16_le_basic() {
        let data = [0x34, 0x12, 0xFF, 0xFF];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_u16_le().unwrap(), 0x1234);
        assert_eq!(cursor.read_u16_le().unwrap(), 0xFFFF);
    }

    #[test]
    fn test_read_u16_le_overflow() {
        let data = [0x34];
        let mut cursor = ByteCursor::new(&data);
        assert!(cursor.read_u16_le().is_err());
    }

    #[test]
    fn test_read_u32_le_basic() {
        let data = [0x78, 0x56, 0x34, 0x12];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_u32_le().unwrap(), 0x1234_5678);
    }

    #[test]
    fn test_read_u32_le_high_bit() {
        // The top byte must not sign-extend
        let data = [0x00, 0x00, 0x00, 0x80];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_u32_le().unwrap(), 0x8000_0000);
    }

    #[test]
    fn test_read_u32_le_too_short() {
        let data = [0x78, 0x56, 0x34];
        let mut cursor = ByteCursor::new(&data);
        assert!(matches!(
            cursor.read_u32_le(),
            Err(OutOfBounds {
                expected: 4,
                available: 3
            })
        ));
    }

    // ========================
    // read_bytes tests
    // ========================

    #[test]
    fn test_read_bytes_basic() {
        let data = b"MTXM\x02\x00\x00\x00";
        let mut cursor = ByteCursor::new(data);
        assert_eq!(cursor.read_bytes(4).unwrap(), b"MTXM");
        assert_eq!(cursor.position(), 4);
    }

    #[test]
    fn test_read_bytes_failure_keeps_position() {
        let data = b"UNIT";
        let mut cursor = ByteCursor::at(data, 2);
        assert_eq!(
            cursor.read_bytes(4),
            Err(OutOfBounds {
                expected: 6,
                available: 4
            })
        );
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn test_read_bytes_zero_length() {
        let data = b"UNIT";
        let mut cursor = ByteCursor::at(data, 4);
        assert_eq!(cursor.read_bytes(0).unwrap(), &[] as &[u8]);
    }

    #[test]
    fn test_read_bytes_huge_length_does_not_overflow() {
        let data = b"UNIT";
        let mut cursor = ByteCursor::at(data, 1);
        assert!(cursor.read_bytes(usize::MAX).is_err());
        assert_eq!(cursor.position(), 1);
    }

    // ========================
    // read_fixed_string tests
    // ========================

    #[test]
    fn test_read_fixed_string_nul_truncated() {
        let data = b"Hi\x00junk\x00\x00";
        let mut cursor = ByteCursor::new(data);
        assert_eq!(cursor.read_fixed_string(8).unwrap(), "Hi");
        assert_eq!(cursor.position(), 8);
    }

    #[test]
    fn test_read_fixed_string_full_length() {
        let data = b"HelloWor";
        let mut cursor = ByteCursor::new(data);
        assert_eq!(cursor.read_fixed_string(8).unwrap(), "HelloWor");
    }

    #[test]
    fn test_read_fixed_string_invalid_utf8_is_replaced() {
        let data = [b'A', 0xFF, b'B', 0x00];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_fixed_string(4).unwrap(), "A\u{FFFD}B");
    }

    #[test]
    fn test_read_fixed_string_overflow() {
        let data = b"Hi";
        let mut cursor = ByteCursor::new(data);
        assert!(cursor.read_fixed_string(32).is_err());
        assert_eq!(cursor.position(), 0);
    }
}
