#![doc = r#"
Contains the [`Reader`], a bounds-checked cursor over file bytes.

Every read either advances the cursor or fails with a
[`ReaderErrorKind::Truncated`] error carrying the offset it failed at.
Nothing is read past the end of the slice the reader was created with, so
a track's reader can never wander into the next chunk.
"#]

mod error;
pub use error::*;

use crate::vlq;

/// A cursor over a borrowed byte slice.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    position: usize,
    /// Added to `position` when reporting errors, so a reader over a
    /// sub-slice still reports offsets into the whole file.
    base: usize,
}

impl<'a> Reader<'a> {
    /// Create a reader positioned at the start of `bytes`
    pub const fn from_byte_slice(bytes: &'a [u8]) -> Self {
        Self {
            data: bytes,
            position: 0,
            base: 0,
        }
    }

    /// Create a reader over `bytes`, which begin at `base` within some larger buffer.
    pub(crate) const fn with_base(bytes: &'a [u8], base: usize) -> Self {
        Self {
            data: bytes,
            position: 0,
            base,
        }
    }

    /// The absolute offset of the cursor
    pub const fn buffer_position(&self) -> usize {
        self.base + self.position
    }

    /// Bytes left to read
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// True when every byte has been consumed
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the next byte without consuming it.
    pub fn peek_u8(&self) -> ReadResult<u8> {
        self.data
            .get(self.position)
            .copied()
            .ok_or_else(|| self.oob(1))
    }

    /// Reads one byte
    pub fn read_u8(&mut self) -> ReadResult<u8> {
        let byte = self.peek_u8()?;
        self.position += 1;
        Ok(byte)
    }

    /// Reads `len` bytes, borrowing them from the underlying slice.
    pub fn read_slice(&mut self, len: usize) -> ReadResult<&'a [u8]> {
        if self.remaining() < len {
            return Err(self.oob(len));
        }
        let slice = &self.data[self.position..self.position + len];
        self.position += len;
        Ok(slice)
    }

    /// Reads a fixed number of bytes into an array
    pub fn read_exact_size<const SIZE: usize>(&mut self) -> ReadResult<[u8; SIZE]> {
        let slice = self.read_slice(SIZE)?;
        let mut out = [0; SIZE];
        out.copy_from_slice(slice);
        Ok(out)
    }

    /// Reads a big-endian `u16`
    pub fn read_u16_be(&mut self) -> ReadResult<u16> {
        self.read_exact_size().map(u16::from_be_bytes)
    }

    /// Reads a big-endian `u32`
    pub fn read_u32_be(&mut self) -> ReadResult<u32> {
        self.read_exact_size().map(u32::from_be_bytes)
    }

    /// Reads a variable length quantity.
    pub fn read_vlq(&mut self) -> ReadResult<u32> {
        let (value, next) = vlq::decode(self.data, self.position)
            .map_err(|e| ReaderError::new(self.base + e.position(), e.kind))?;
        self.position = next;
        Ok(value)
    }

    /// Advances past `len` bytes without looking at them.
    pub fn skip(&mut self, len: usize) -> ReadResult<()> {
        self.read_slice(len).map(|_| ())
    }

    fn oob(&self, needed: usize) -> ReaderError {
        ReaderError::truncated(self.buffer_position(), needed, self.remaining())
    }
}

#[test]
fn reads_big_endian_fields() {
    let mut reader = Reader::from_byte_slice(&[0x00, 0x06, 0x00, 0x00, 0x01, 0xE0, 0x7F]);
    assert_eq!(reader.read_u16_be().unwrap(), 6);
    assert_eq!(reader.read_u32_be().unwrap(), 0x01E0);
    assert_eq!(reader.remaining(), 1);
    assert_eq!(reader.read_u8().unwrap(), 0x7F);
    assert!(reader.is_empty());
}

#[test]
fn out_of_bounds_reports_absolute_offset() {
    let mut reader = Reader::with_base(&[0x90, 0x3C], 22);
    reader.skip(1).unwrap();

    let err = reader.read_slice(2).unwrap_err();
    assert!(err.is_truncated());
    assert_eq!(err.position(), 23);
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::Truncated {
            needed: 2,
            available: 1
        }
    );
}

#[test]
fn vlq_errors_are_rebased() {
    let mut reader = Reader::with_base(&[0x81, 0x80], 100);
    let err = reader.read_vlq().unwrap_err();
    assert!(err.is_truncated());
    assert_eq!(err.position(), 102);
}
