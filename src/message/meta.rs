use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The meta event types the codec reads or writes.
///
/// Every other type is consumed and discarded by the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum MetaType {
    /// `FF 2F 00`
    EndOfTrack = 0x2F,
    /// `FF 51 03 tt tt tt`: microseconds per quarter note
    Tempo = 0x51,
    /// `FF 58 04 nn dd cc bb`
    TimeSignature = 0x58,
}

impl MetaType {
    /// Returns the known meta type for a type byte, if any
    pub fn from_byte(byte: u8) -> Option<Self> {
        Self::try_from(byte).ok()
    }
}

/// `FF 58 04 04 02 18 08`: 4/4, 24 clocks per click, 8 32nds per quarter.
pub const TIME_SIGNATURE_4_4: [u8; 7] = [0xFF, 0x58, 0x04, 0x04, 0x02, 0x18, 0x08];

/// `FF 2F 00`
pub const END_OF_TRACK: [u8; 3] = [0xFF, 0x2F, 0x00];

/// `FF 51 03` followed by the low three bytes of `micros_per_quarter`, big-endian
pub const fn tempo_event(micros_per_quarter: u32) -> [u8; 6] {
    let [_, a, b, c] = micros_per_quarter.to_be_bytes();
    [0xFF, 0x51, 0x03, a, b, c]
}

#[test]
fn known_meta_types() {
    assert_eq!(MetaType::from_byte(0x51), Some(MetaType::Tempo));
    assert_eq!(MetaType::from_byte(0x2F), Some(MetaType::EndOfTrack));
    assert_eq!(MetaType::from_byte(0x03), None);
    assert_eq!(u8::from(MetaType::TimeSignature), TIME_SIGNATURE_4_4[1]);
}

#[test]
fn tempo_event_bytes() {
    assert_eq!(tempo_event(500_000), [0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20]);
    assert_eq!(tempo_event(508_475), [0xFF, 0x51, 0x03, 0x07, 0xC2, 0x3B]);
}
