#![doc = r#"
Chunk framing: a four byte type, a big-endian `u32` length, then the data.

A file is one `MThd` chunk followed by the `MTrk` chunks it announces.
[`read_chunk`] checks the type and hands back the data without copying it;
[`write_chunk`] frames already-serialized data.
"#]

use alloc::vec::Vec;

use crate::reader::{FormatError, ReadResult, Reader, ReaderError};

/// Identifies the header chunk
pub const MTHD: [u8; 4] = *b"MThd";
/// Identifies a track chunk
pub const MTRK: [u8; 4] = *b"MTrk";
/// The length of the header chunk's data
pub const HEADER_LENGTH: u32 = 6;

/// Reads a chunk that must be of type `magic`.
///
/// Returns the absolute offset of the chunk's data and the data itself.
/// Fails with a format error if the type does not match and with a
/// truncation error if the declared length runs past the input.
pub fn read_chunk<'a>(reader: &mut Reader<'a>, magic: [u8; 4]) -> ReadResult<(usize, &'a [u8])> {
    let position = reader.buffer_position();
    let found: [u8; 4] = reader.read_exact_size()?;
    if found != magic {
        return Err(ReaderError::format(
            position,
            FormatError::InvalidMagic {
                expected: magic,
                found,
            },
        ));
    }
    let len = reader.read_u32_be()? as usize;
    let base = reader.buffer_position();
    let data = reader.read_slice(len)?;
    Ok((base, data))
}

/// Appends a chunk of type `magic` holding `data` to `out`.
pub fn write_chunk(magic: [u8; 4], data: &[u8], out: &mut Vec<u8>) {
    out.extend_from_slice(&magic);
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(data);
}

#[test]
fn chunk_framing() {
    let mut out = Vec::new();
    write_chunk(MTRK, &[0x00, 0xFF, 0x2F, 0x00], &mut out);
    assert_eq!(
        out,
        [b'M', b'T', b'r', b'k', 0, 0, 0, 4, 0x00, 0xFF, 0x2F, 0x00]
    );

    let mut reader = Reader::from_byte_slice(&out);
    let (base, data) = read_chunk(&mut reader, MTRK).unwrap();
    assert_eq!(base, 8);
    assert_eq!(data, &[0x00, 0xFF, 0x2F, 0x00]);
}

#[test]
fn wrong_magic() {
    let mut reader = Reader::from_byte_slice(b"RIFF\0\0\0\0");
    let err = read_chunk(&mut reader, MTHD).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &crate::reader::ReaderErrorKind::Format(FormatError::InvalidMagic {
            expected: MTHD,
            found: *b"RIFF",
        })
    );
}

#[test]
fn chunk_longer_than_input() {
    let mut reader = Reader::from_byte_slice(&[b'M', b'T', b'r', b'k', 0, 0, 0, 9, 0x00]);
    let err = read_chunk(&mut reader, MTRK).unwrap_err();
    assert!(err.is_truncated());
    assert_eq!(err.position(), 8);
}
