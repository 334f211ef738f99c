use crate::{
    file::{
        chunk::{HEADER_LENGTH, MTHD, read_chunk},
        timing::read_division,
    },
    prelude::*,
    reader::Reader,
};
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The format field of the header.
///
/// Only [`FormatType::Simultaneous`] is written. The reader merges every
/// track regardless of format, so a format 0 file reads the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u16)]
pub enum FormatType {
    /// Format 0
    SingleMultiChannel = 0,
    /// Format 1
    Simultaneous = 1,
    /// Format 2
    SequentiallyIndependent = 2,
}

#[doc = r#"
The contents of the `MThd` chunk
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    format: u16,
    num_tracks: u16,
    ticks_per_quarter: u16,
}

impl Header {
    /// Create a new header
    pub const fn new(format: FormatType, num_tracks: u16, ticks_per_quarter: u16) -> Self {
        Self {
            format: format as u16,
            num_tracks,
            ticks_per_quarter,
        }
    }

    /// Reads the header chunk at the reader's position.
    ///
    /// Header chunks longer than six bytes are accepted and the extra
    /// bytes are ignored.
    pub fn read(reader: &mut Reader<'_>) -> ReadResult<Self> {
        let (base, data) = read_chunk(reader, MTHD)?;
        if data.len() < HEADER_LENGTH as usize {
            return Err(ReaderError::format(
                base - 4,
                FormatError::HeaderLength(data.len() as u32),
            ));
        }
        let mut fields = Reader::with_base(data, base);
        let format = fields.read_u16_be()?;
        let num_tracks = fields.read_u16_be()?;
        let ticks_per_quarter = read_division(&mut fields)?;

        Ok(Self {
            format,
            num_tracks,
            ticks_per_quarter,
        })
    }

    /// The raw format number
    pub const fn format(&self) -> u16 {
        self.format
    }

    /// The format, if it is one of the three defined ones
    pub fn format_type(&self) -> Option<FormatType> {
        FormatType::try_from(self.format).ok()
    }

    /// The number of track chunks that follow the header
    pub const fn num_tracks(&self) -> u16 {
        self.num_tracks
    }

    /// The division: ticks per quarter note
    pub const fn ticks_per_quarter(&self) -> u16 {
        self.ticks_per_quarter
    }

    /// The six data bytes of the header chunk
    pub fn to_bytes(&self) -> [u8; 6] {
        let [f0, f1] = self.format.to_be_bytes();
        let [n0, n1] = self.num_tracks.to_be_bytes();
        let [d0, d1] = self.ticks_per_quarter.to_be_bytes();
        [f0, f1, n0, n1, d0, d1]
    }
}

#[test]
fn reads_a_header() {
    let bytes = [
        b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 1, 0, 3, 0x01, 0xE0,
    ];
    let mut reader = Reader::from_byte_slice(&bytes);
    let header = Header::read(&mut reader).unwrap();

    assert_eq!(header.format_type(), Some(FormatType::Simultaneous));
    assert_eq!(header.num_tracks(), 3);
    assert_eq!(header.ticks_per_quarter(), 480);
    assert!(reader.is_empty());
}

#[test]
fn long_header_is_skipped_past() {
    let bytes = [
        b'M', b'T', b'h', b'd', 0, 0, 0, 8, 0, 0, 0, 1, 0x00, 0x60, 0xAA, 0xBB, b'M',
    ];
    let mut reader = Reader::from_byte_slice(&bytes);
    let header = Header::read(&mut reader).unwrap();

    assert_eq!(header.format_type(), Some(FormatType::SingleMultiChannel));
    assert_eq!(header.ticks_per_quarter(), 96);
    assert_eq!(reader.buffer_position(), 16);
}

#[test]
fn short_header_is_a_format_error() {
    let bytes = [b'M', b'T', b'h', b'd', 0, 0, 0, 4, 0, 1, 0, 1];
    let mut reader = Reader::from_byte_slice(&bytes);
    let err = Header::read(&mut reader).unwrap_err();

    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::Format(FormatError::HeaderLength(4))
    );
}

#[test]
fn header_bytes() {
    let header = Header::new(FormatType::Simultaneous, 2, 480);
    assert_eq!(header.to_bytes(), [0, 1, 0, 2, 0x01, 0xE0]);
}
