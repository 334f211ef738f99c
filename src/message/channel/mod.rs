#![doc = r#"
Channel voice status kinds

A channel message's status byte carries the kind of message in its high
nibble and the channel in its low nibble:

```text
|-----------------|
| 1 k k k c c c c |
|-----------------|
  kind    channel
```
"#]

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The high nibble of a channel message's status byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum VoiceKind {
    /// `0x8n`: key, velocity
    NoteOff = 0x8,
    /// `0x9n`: key, velocity. Velocity 0 releases the key.
    NoteOn = 0x9,
    /// `0xAn`: key, pressure
    KeyPressure = 0xA,
    /// `0xBn`: controller, value
    ControlChange = 0xB,
    /// `0xCn`: program
    ProgramChange = 0xC,
    /// `0xDn`: pressure
    ChannelPressure = 0xD,
    /// `0xEn`: lsb, msb
    PitchBend = 0xE,
}

impl VoiceKind {
    /// Decode the kind from a full status byte.
    ///
    /// Returns `None` for system messages (`0xF0..=0xFF`) and data bytes.
    pub fn from_status(status: u8) -> Option<Self> {
        Self::try_from(status >> 4).ok()
    }

    /// The number of data bytes that follow the status byte
    pub const fn data_len(&self) -> usize {
        match self {
            Self::ProgramChange | Self::ChannelPressure => 1,
            _ => 2,
        }
    }

    /// Build a status byte for this kind on `channel` (masked to 0..=15)
    pub fn status(self, channel: u8) -> u8 {
        (u8::from(self) << 4) | (channel & 0x0F)
    }
}

/// Extracts the channel (0..=15) of a channel message status byte
pub const fn channel_of(status: u8) -> u8 {
    status & 0x0F
}

#[test]
fn kinds_from_status() {
    assert_eq!(VoiceKind::from_status(0x93), Some(VoiceKind::NoteOn));
    assert_eq!(VoiceKind::from_status(0x80), Some(VoiceKind::NoteOff));
    assert_eq!(VoiceKind::from_status(0xEF), Some(VoiceKind::PitchBend));
    assert_eq!(VoiceKind::from_status(0xFF), None);
    assert_eq!(VoiceKind::from_status(0x3C), None);
    assert_eq!(channel_of(0x9A), 10);
}

#[test]
fn status_round_trip() {
    assert_eq!(VoiceKind::ProgramChange.status(3), 0xC3);
    assert_eq!(VoiceKind::NoteOn.status(0x1F), 0x9F);
    assert_eq!(VoiceKind::ChannelPressure.data_len(), 1);
    assert_eq!(VoiceKind::ControlChange.data_len(), 2);
}
