#![doc = r#"
Variable length quantities

Delta-times and meta/sysex lengths are stored as big-endian groups of seven
bits. Every byte but the last has its high bit set:

```text
value        bytes
0x00000000   00
0x0000007F   7F
0x00000080   81 00
0x00003FFF   FF 7F
0x00004000   81 80 00
0x0FFFFFFF   FF FF FF 7F
```

The file format limits a quantity to four bytes, i.e. [`VLQ_MAX`].
"#]

use alloc::vec::Vec;

use crate::reader::{FormatError, ReadResult, ReaderError};

/// The largest value representable in four groups of seven bits.
pub const VLQ_MAX: u32 = 0x0FFF_FFFF;

const MAX_BYTES: usize = 4;

/// Decodes the quantity starting at `offset`.
///
/// Returns the value and the offset of the first byte after it. Fails if the
/// bytes run out before a terminating byte, or if no terminating byte shows
/// up within four bytes.
pub fn decode(bytes: &[u8], offset: usize) -> ReadResult<(u32, usize)> {
    let mut value: u32 = 0;
    let mut cursor = offset;
    for _ in 0..MAX_BYTES {
        let Some(&byte) = bytes.get(cursor) else {
            return Err(ReaderError::truncated(
                cursor,
                1,
                bytes.len().saturating_sub(cursor),
            ));
        };
        cursor += 1;
        value = (value << 7) | (byte & 0x7F) as u32;
        if byte & 0x80 == 0 {
            return Ok((value, cursor));
        }
    }
    Err(ReaderError::format(offset, FormatError::VlqTooLong))
}

/// Appends the minimal encoding of `value` to `buffer`.
///
/// Values above [`VLQ_MAX`] need a fifth byte, which no reader of the format
/// will accept; callers are expected to stay in range.
pub fn write(value: u32, buffer: &mut Vec<u8>) {
    let mut groups = [0u8; 5];
    let mut len = 0;
    let mut rest = value;
    loop {
        groups[len] = (rest & 0x7F) as u8;
        len += 1;
        rest >>= 7;
        if rest == 0 {
            break;
        }
    }
    for i in (1..len).rev() {
        buffer.push(groups[i] | 0x80);
    }
    buffer.push(groups[0]);
}

/// Returns the minimal encoding of `value`.
pub fn encode(value: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(MAX_BYTES);
    write(value, &mut out);
    out
}

/// The number of bytes [`encode`] emits for `value`.
pub const fn encoded_len(value: u32) -> usize {
    match value {
        0..=0x7F => 1,
        0x80..=0x3FFF => 2,
        0x4000..=0x1F_FFFF => 3,
        0x20_0000..=VLQ_MAX => 4,
        _ => 5,
    }
}

#[cfg(test)]
use alloc::vec;

#[test]
fn encodes_table_values() {
    assert_eq!(encode(0), vec![0x00]);
    assert_eq!(encode(0x40), vec![0x40]);
    assert_eq!(encode(0x7F), vec![0x7F]);
    assert_eq!(encode(0x80), vec![0x81, 0x00]);
    assert_eq!(encode(0x2000), vec![0xC0, 0x00]);
    assert_eq!(encode(0x3FFF), vec![0xFF, 0x7F]);
    assert_eq!(encode(0x4000), vec![0x81, 0x80, 0x00]);
    assert_eq!(encode(0x1F_FFFF), vec![0xFF, 0xFF, 0x7F]);
    assert_eq!(encode(0x20_0000), vec![0x81, 0x80, 0x80, 0x00]);
    assert_eq!(encode(VLQ_MAX), vec![0xFF, 0xFF, 0xFF, 0x7F]);
}

#[test]
fn decodes_at_offset() {
    let bytes = [0xAA, 0x81, 0x80, 0x00, 0x05];
    assert_eq!(decode(&bytes, 1).unwrap(), (0x4000, 4));
    assert_eq!(decode(&bytes, 4).unwrap(), (5, 5));
}

#[test]
fn truncated_quantity() {
    let err = decode(&[0xFF, 0xFF], 0).unwrap_err();
    assert!(err.is_truncated());
    assert_eq!(err.position(), 2);

    let err = decode(&[], 0).unwrap_err();
    assert!(err.is_truncated());
}

#[test]
fn five_byte_quantity_is_rejected() {
    let err = decode(&[0x81, 0x80, 0x80, 0x80, 0x00], 0).unwrap_err();
    assert!(err.is_format());
    assert_eq!(err.position(), 0);
}

#[test]
fn encoded_len_matches_encode() {
    for value in [0, 1, 0x7F, 0x80, 0x3FFF, 0x4000, 0x1F_FFFF, 0x20_0000, VLQ_MAX] {
        assert_eq!(encode(value).len(), encoded_len(value), "value {value:#X}");
    }
}
