//! Cursor-based byte stream parser for signature database decoding.
//!
//! This module provides the [`crate::file::parser::Parser`] type, a bounds-checked
//! binary reader used to decode `EFI_SIGNATURE_LIST` headers and entry records.
//! The parser maintains a position within a borrowed byte slice; every read
//! validates data availability first, so a header field that lies about sizes can
//! never cause a read past the buffer end.
//!
//! # Key Components
//!
//! - [`crate::file::parser::Parser`] - Main cursor struct over a borrowed buffer
//! - [`crate::file::parser::Parser::read_le`] - Read primitive types (little-endian)
//! - [`crate::file::parser::Parser::read_guid`] - Read a 16-byte GUID in its on-disk layout
//! - [`crate::file::parser::Parser::read_bytes`] - Borrow a raw byte slice of a given length
//!
//! # Usage Examples
//!
//! ```rust
//! use sigscope::Parser;
//!
//! let data = [0x01, 0x02, 0x03, 0x04];
//! let mut parser = Parser::new(&data);
//!
//! let value = parser.read_le::<u16>()?;
//! assert_eq!(value, 0x0201);
//! assert_eq!(parser.remaining(), 2);
//! # Ok::<(), sigscope::Error>(())
//! ```

use uguid::Guid;

use crate::{file::io::{read_le_at, SigIO}, Error::OutOfBounds, Result};

/// A bounds-checked binary reader over a borrowed byte buffer.
///
/// `Parser` provides a cursor-based interface for sequential decoding of
/// firmware-originated binary structures. It maintains an internal position and
/// validates every access, which is the load-bearing property here: signature
/// database size fields are attacker-controlled, so nothing may be trusted until
/// it has been checked against the real buffer length.
///
/// # Examples
///
/// ```rust
/// use sigscope::Parser;
///
/// let data = [0x1C, 0x00, 0x00, 0x00, 0xAA, 0xBB];
/// let mut parser = Parser::new(&data);
///
/// let size = parser.read_le::<u32>()?;
/// assert_eq!(size, 0x1C);
///
/// let tail = parser.read_bytes(2)?;
/// assert_eq!(tail, &[0xAA, 0xBB]);
/// # Ok::<(), sigscope::Error>(())
/// ```
pub struct Parser<'a> {
    /// The binary data being parsed
    data: &'a [u8],
    /// Current position within the data buffer
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new [`crate::file::parser::Parser`] from a byte slice.
    ///
    /// # Arguments
    /// * `data` - The byte slice to read from
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Returns the length of the underlying data buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the parser has no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if there is more data available to parse.
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Move the current position to the specified index.
    ///
    /// # Arguments
    /// * `pos` - The position to move the cursor to
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if position is beyond the data length.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos >= self.data.len() {
            return Err(OutOfBounds);
        }

        self.position = pos;
        Ok(())
    }

    /// Move the position forward by the specified number of bytes.
    ///
    /// # Arguments
    /// * `step` - Amount of bytes to advance
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if advancing by step would exceed the data length.
    pub fn advance_by(&mut self, step: usize) -> Result<()> {
        let end = self.calc_end_position(step)?;
        self.position = end;
        Ok(())
    }

    /// Get the current position of the parser within the data buffer.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Get access to the underlying data buffer.
    #[must_use]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Peek at the next byte without advancing the position.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if position is at or beyond the data length.
    pub fn peek_byte(&self) -> Result<u8> {
        if self.position >= self.data.len() {
            return Err(OutOfBounds);
        }
        Ok(self.data[self.position])
    }

    /// Read a type `T` from the current position in little-endian format and advance the position.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if reading would exceed the data length.
    pub fn read_le<T: SigIO>(&mut self) -> Result<T> {
        read_le_at::<T>(self.data, &mut self.position)
    }

    /// Read a 16-byte GUID in its on-disk (little-endian mixed) layout and advance the position.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than 16 bytes remain.
    pub fn read_guid(&mut self) -> Result<Guid> {
        let raw = self.read_bytes(16)?;
        let Ok(bytes) = <[u8; 16]>::try_from(raw) else {
            return Err(OutOfBounds);
        };
        Ok(Guid::from_bytes(bytes))
    }

    /// Returns the number of bytes remaining from the current position.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Ensures that at least `needed` bytes are available from the current position.
    ///
    /// # Arguments
    /// * `needed` - The number of bytes required from the current position
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than `needed` bytes remain.
    pub fn ensure_remaining(&self, needed: usize) -> Result<()> {
        if self.remaining() < needed {
            return Err(OutOfBounds);
        }
        Ok(())
    }

    /// Calculates an end position safely with overflow checking.
    ///
    /// Computes `self.position + length` while checking for arithmetic overflow
    /// and ensuring the result doesn't exceed the data bounds.
    ///
    /// # Arguments
    /// * `length` - The length to add to the current position
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the calculation would overflow
    /// or if the resulting position exceeds the data length.
    pub fn calc_end_position(&self, length: usize) -> Result<usize> {
        let end = self
            .position
            .checked_add(length)
            .ok_or(OutOfBounds)?;

        if end > self.data.len() {
            return Err(OutOfBounds);
        }

        Ok(end)
    }

    /// Reads a slice of bytes of the specified length from the current position.
    ///
    /// This method performs bounds checking and advances the position after reading.
    /// The returned slice borrows from the underlying buffer; nothing is copied.
    ///
    /// # Arguments
    /// * `length` - The number of bytes to read
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if reading `length` bytes would exceed the data.
    pub fn read_bytes(&mut self, length: usize) -> Result<&'a [u8]> {
        let end = self.calc_end_position(length)?;
        let bytes = &self.data[self.position..end];
        self.position = end;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use uguid::guid;

    #[test]
    fn sequential_reads() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
        let mut parser = Parser::new(&data);

        let first = parser.read_le::<u32>().unwrap();
        assert_eq!(first, 0x0403_0201);
        assert_eq!(parser.pos(), 4);

        let second = parser.read_le::<u16>().unwrap();
        assert_eq!(second, 0x0605);
        assert_eq!(parser.remaining(), 2);
    }

    #[test]
    fn read_guid_on_disk_layout() {
        // EFI_CERT_X509_GUID as it appears on disk
        let data = [
            0xa1, 0x59, 0xc0, 0xa5, 0xe4, 0x94, 0xa7, 0x4a,
            0x87, 0xb5, 0xab, 0x15, 0x5c, 0x2b, 0xf0, 0x72,
        ];
        let mut parser = Parser::new(&data);
        let parsed = parser.read_guid().unwrap();
        assert_eq!(parsed, guid!("a5c059a1-94e4-4aa7-87b5-ab155c2bf072"));
        assert!(!parser.has_more_data());
    }

    #[test]
    fn read_guid_truncated() {
        let data = [0x00_u8; 15];
        let mut parser = Parser::new(&data);
        assert!(matches!(parser.read_guid(), Err(Error::OutOfBounds)));
        assert_eq!(parser.pos(), 0);
    }

    #[test]
    fn read_bytes_is_borrowed() {
        let data = [0x10, 0x20, 0x30, 0x40];
        let mut parser = Parser::new(&data);
        let bytes = parser.read_bytes(3).unwrap();
        assert_eq!(bytes, &[0x10, 0x20, 0x30]);
        assert_eq!(parser.pos(), 3);

        assert!(matches!(parser.read_bytes(2), Err(Error::OutOfBounds)));
    }

    #[test]
    fn seek_and_advance() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let mut parser = Parser::new(&data);

        parser.seek(2).unwrap();
        assert_eq!(parser.peek_byte().unwrap(), 0x03);

        parser.advance_by(2).unwrap();
        assert!(!parser.has_more_data());
        assert!(matches!(parser.seek(4), Err(Error::OutOfBounds)));
        assert!(matches!(parser.advance_by(1), Err(Error::OutOfBounds)));
    }

    #[test]
    fn end_position_overflow() {
        let data = [0x01];
        let parser = Parser::new(&data);
        assert!(matches!(
            parser.calc_end_position(usize::MAX),
            Err(Error::OutOfBounds)
        ));
    }
}
