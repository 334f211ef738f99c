//! Division, tempo, and conversions between ticks and seconds

use crate::reader::{FormatError, ReadResult, Reader, ReaderError};

/// Microseconds per quarter note used when a file has no tempo event (120 BPM)
pub const DEFAULT_TEMPO_MICROS: u32 = 500_000;

/// The resolution [`OutputFile`](crate::OutputFile)s use unless told otherwise
pub const DEFAULT_TICKS_PER_QUARTER: u16 = 480;

/// Reads the division field of the header as ticks per quarter note.
///
/// A division with its top bit set describes SMPTE time code and is
/// rejected, as is a division of zero.
pub(crate) fn read_division(reader: &mut Reader<'_>) -> ReadResult<u16> {
    let position = reader.buffer_position();
    let division = reader.read_u16_be()?;
    if division & 0x8000 != 0 {
        return Err(ReaderError::format(
            position,
            FormatError::SmpteDivision(division),
        ));
    }
    if division == 0 {
        return Err(ReaderError::format(position, FormatError::ZeroDivision));
    }
    Ok(division)
}

#[doc = r#"
The speed of a file, stored the way the file stores it: microseconds per
quarter note.

Conversions:

```text
seconds = ticks * (micros_per_quarter / 1_000_000) / ticks_per_quarter
ticks   = round(seconds * ticks_per_quarter * bpm / 60)
bpm     = 60_000_000 / micros_per_quarter
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tempo(u32);

impl Default for Tempo {
    fn default() -> Self {
        Self(DEFAULT_TEMPO_MICROS)
    }
}

impl Tempo {
    /// Create a tempo from microseconds per quarter note
    pub const fn new(micros_per_quarter_note: u32) -> Self {
        Self(micros_per_quarter_note)
    }

    /// Create a tempo from the three data bytes of a tempo meta event
    pub const fn new_from_bytes(bytes: &[u8; 3]) -> Self {
        Self(u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]))
    }

    /// Create a tempo from beats per minute.
    ///
    /// The result is rounded to the nearest microsecond and clamped to the
    /// three bytes a tempo event can hold.
    pub fn from_bpm(bpm: f64) -> Self {
        let micros = round_to_u32(60_000_000.0 / bpm, 0x00FF_FFFF);
        Self(micros.max(1))
    }

    /// Microseconds per quarter note
    pub const fn micros_per_quarter_note(&self) -> u32 {
        self.0
    }

    /// Beats (quarter notes) per minute
    pub fn bpm(&self) -> f64 {
        60_000_000.0 / self.0 as f64
    }

    /// Converts an absolute tick to seconds.
    pub fn ticks_to_seconds(&self, ticks: u32, ticks_per_quarter: u16) -> f64 {
        ticks as f64 * (self.0 as f64 / 1_000_000.0) / ticks_per_quarter as f64
    }
}

/// Converts seconds to the nearest tick at `bpm`.
///
/// Negative times land on tick 0; times past the largest encodable tick
/// land on [`VLQ_MAX`](crate::vlq::VLQ_MAX).
pub fn seconds_to_ticks(seconds: f64, bpm: f64, ticks_per_quarter: u16) -> u32 {
    round_to_u32(
        seconds * ticks_per_quarter as f64 * bpm / 60.0,
        crate::vlq::VLQ_MAX,
    )
}

/// Rounds half away from zero into `0..=max`. NaN and negatives become 0.
fn round_to_u32(value: f64, max: u32) -> u32 {
    if !(value > 0.0) {
        return 0;
    }
    let rounded = value + 0.5;
    if rounded >= max as f64 {
        max
    } else {
        rounded as u32
    }
}

#[test]
fn default_tempo_is_120_bpm() {
    assert_eq!(Tempo::default().micros_per_quarter_note(), 500_000);
    assert_eq!(Tempo::default().bpm(), 120.0);
}

#[test]
fn tick_conversions() {
    let tempo = Tempo::default();
    assert_eq!(tempo.ticks_to_seconds(480, 480), 0.5);
    assert_eq!(tempo.ticks_to_seconds(0, 96), 0.0);
    assert_eq!(seconds_to_ticks(0.5, 120.0, 480), 480);
    assert_eq!(seconds_to_ticks(-1.0, 120.0, 480), 0);
    assert_eq!(seconds_to_ticks(60.0 / 118.0 * 4.0, 118.0, 480), 1920);
}

#[test]
fn rounding_edges() {
    assert_eq!(round_to_u32(f64::NAN, 10), 0);
    assert_eq!(round_to_u32(2.5, 10), 3);
    assert_eq!(round_to_u32(2.49, 10), 2);
    assert_eq!(round_to_u32(f64::INFINITY, 10), 10);
}

#[test]
fn tempo_from_bpm_rounds() {
    assert_eq!(Tempo::from_bpm(118.0).micros_per_quarter_note(), 508_475);
    assert_eq!(Tempo::new_from_bytes(&[0x07, 0xA1, 0x20]), Tempo::default());
}

#[test]
fn invalid_divisions_are_rejected() {
    let mut reader = Reader::from_byte_slice(&[0xE7, 0x28]);
    let err = read_division(&mut reader).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &crate::reader::ReaderErrorKind::Format(FormatError::SmpteDivision(0xE728))
    );

    let mut reader = Reader::from_byte_slice(&[0x00, 0x00]);
    assert!(read_division(&mut reader).unwrap_err().is_format());

    let mut reader = Reader::from_byte_slice(&[0x01, 0xE0]);
    assert_eq!(read_division(&mut reader).unwrap(), 480);
}
