use alloc::vec::Vec;

use crate::{
    file::Tempo,
    message::{
        META, MetaType, SYSEX, SYSEX_ESCAPE,
        channel::{VoiceKind, channel_of},
    },
    reader::{FormatError, ReadResult, Reader, ReaderError},
};

/// An event paired with the absolute tick it occurs at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticked<E> {
    accumulated_ticks: u32,
    event: E,
}

impl<E> Ticked<E> {
    /// Pair `event` with a tick
    pub const fn new(accumulated_ticks: u32, event: E) -> Self {
        Self {
            accumulated_ticks,
            event,
        }
    }

    /// The sum of every delta-time up to and including this event's
    pub const fn accumulated_ticks(&self) -> u32 {
        self.accumulated_ticks
    }

    /// The event
    pub const fn event(&self) -> &E {
        &self.event
    }

    /// Unwraps the event
    pub fn into_event(self) -> E {
        self.event
    }
}

#[doc = r#"
The events a track parse keeps.

Everything else in a track (other meta events, system exclusive messages,
controllers, pressure, pitch bend) is consumed so the cursor stays
aligned, and then dropped.

A note-on with velocity zero is reported as a [`TrackEvent::NoteOff`].
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackEvent {
    /// A key was pressed
    NoteOn {
        /// 0-15
        channel: u8,
        /// The key
        pitch: u8,
        /// Strictly positive
        velocity: u8,
    },
    /// A key was released
    NoteOff {
        /// 0-15
        channel: u8,
        /// The key
        pitch: u8,
        /// Release velocity
        velocity: u8,
    },
    /// A tempo meta event with exactly three data bytes
    Tempo(Tempo),
    /// A program change. Kept for completeness, the reader ignores it.
    ProgramChange {
        /// 0-15
        channel: u8,
        /// 0-127
        program: u8,
    },
}

#[doc = r#"
Parses one track chunk's data into its kept events, in file order.

`base` is the absolute offset of `data` within the file and is only used
for error positions.

Running status is local to this call: a track may omit a repeated status
byte, but never inherit one from a previous track. Reading past the end
of `data` in the middle of an event is a truncation error.
"#]
pub fn parse_track(data: &[u8], base: usize) -> ReadResult<Vec<Ticked<TrackEvent>>> {
    let mut reader = Reader::with_base(data, base);
    let mut events = Vec::with_capacity(data.len() / 3);
    let mut ticks: u32 = 0;
    let mut running_status: Option<u8> = None;

    while !reader.is_empty() {
        ticks = ticks.saturating_add(reader.read_vlq()?);

        let position = reader.buffer_position();
        let byte = reader.peek_u8()?;
        let status = if byte & 0x80 != 0 {
            reader.read_u8()?;
            running_status = Some(byte);
            byte
        } else {
            running_status.ok_or_else(|| {
                ReaderError::format(position, FormatError::MissingRunningStatus(byte))
            })?
        };

        if let Some(event) = read_event(&mut reader, status, position)? {
            events.push(Ticked::new(ticks, event));
        }
    }

    #[cfg(feature = "tracing")]
    tracing::trace!(
        offset = base,
        kept = events.len(),
        end_tick = ticks,
        "parsed track"
    );

    Ok(events)
}

/// Reads the body of an event whose status byte is `status`.
///
/// `position` is where the event starts, for error reporting.
fn read_event(
    reader: &mut Reader<'_>,
    status: u8,
    position: usize,
) -> ReadResult<Option<TrackEvent>> {
    match status {
        META => {
            let meta_type = reader.read_u8()?;
            let len = reader.read_vlq()? as usize;
            let data = reader.read_slice(len)?;
            match (MetaType::from_byte(meta_type), data) {
                (Some(MetaType::Tempo), &[0, 0, 0]) => {
                    Err(ReaderError::format(position, FormatError::ZeroTempo))
                }
                (Some(MetaType::Tempo), &[a, b, c]) => {
                    Ok(Some(TrackEvent::Tempo(Tempo::new_from_bytes(&[a, b, c]))))
                }
                _ => Ok(None),
            }
        }
        SYSEX | SYSEX_ESCAPE => {
            let len = reader.read_vlq()? as usize;
            reader.skip(len)?;
            Ok(None)
        }
        _ => {
            let Some(kind) = VoiceKind::from_status(status) else {
                // system common and real-time bytes have no place in a file;
                // step over a single data byte
                reader.skip(1)?;
                return Ok(None);
            };
            let channel = channel_of(status);
            match kind {
                VoiceKind::NoteOn | VoiceKind::NoteOff => {
                    let [pitch, velocity] = reader.read_exact_size::<2>()?;
                    let event = if kind == VoiceKind::NoteOn && velocity > 0 {
                        TrackEvent::NoteOn {
                            channel,
                            pitch,
                            velocity,
                        }
                    } else {
                        TrackEvent::NoteOff {
                            channel,
                            pitch,
                            velocity,
                        }
                    };
                    Ok(Some(event))
                }
                VoiceKind::ProgramChange => {
                    let program = reader.read_u8()?;
                    Ok(Some(TrackEvent::ProgramChange { channel, program }))
                }
                other => {
                    reader.skip(other.data_len())?;
                    Ok(None)
                }
            }
        }
    }
}

#[cfg(test)]
fn note_on(tick: u32, channel: u8, pitch: u8, velocity: u8) -> Ticked<TrackEvent> {
    Ticked::new(
        tick,
        TrackEvent::NoteOn {
            channel,
            pitch,
            velocity,
        },
    )
}

#[cfg(test)]
fn note_off(tick: u32, channel: u8, pitch: u8, velocity: u8) -> Ticked<TrackEvent> {
    Ticked::new(
        tick,
        TrackEvent::NoteOff {
            channel,
            pitch,
            velocity,
        },
    )
}

#[test]
fn test_note_events_accumulate_ticks() {
    let data = [
        0x00, 0x90, 60, 100, //
        0x83, 0x60, 0x80, 60, 64, //
        0x81, 0x70, 0x91, 62, 80,
    ];
    let events = parse_track(&data, 0).unwrap();
    assert_eq!(
        events,
        alloc::vec![
            note_on(0, 0, 60, 100),
            note_off(480, 0, 60, 64),
            note_on(720, 1, 62, 80),
        ]
    );
}

#[test]
fn test_running_status_matches_explicit_status() {
    let explicit = [
        0x00, 0x90, 60, 100, //
        0x00, 0x90, 64, 100, //
        0x60, 0x90, 60, 0, //
        0x00, 0x90, 64, 0,
    ];
    let running = [
        0x00, 0x90, 60, 100, //
        0x00, 64, 100, //
        0x60, 60, 0, //
        0x00, 64, 0,
    ];
    let explicit = parse_track(&explicit, 0).unwrap();
    let running = parse_track(&running, 0).unwrap();

    assert_eq!(explicit, running);
    assert_eq!(running.len(), 4);
    assert_eq!(running[2], note_off(96, 0, 60, 0));
}

#[test]
fn test_data_byte_without_running_status() {
    let err = parse_track(&[0x00, 0x3C, 0x40], 40).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &crate::reader::ReaderErrorKind::Format(FormatError::MissingRunningStatus(0x3C))
    );
    assert_eq!(err.position(), 41);
}

#[test]
fn test_meta_events() {
    let data = [
        0x00, 0xFF, 0x03, 0x04, b'l', b'o', b'o', b'p', // track name
        0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, // tempo
        0x00, 0xFF, 0x51, 0x02, 0x07, 0xA1, // malformed tempo, ignored
        0x00, 0xFF, 0x58, 0x04, 0x04, 0x02, 0x18, 0x08, // time signature
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let events = parse_track(&data, 0).unwrap();
    assert_eq!(
        events,
        alloc::vec![Ticked::new(0, TrackEvent::Tempo(Tempo::new(500_000)))]
    );
}

#[test]
fn test_skipped_events_keep_cursor_aligned() {
    let data = [
        0x00, 0xF0, 0x03, 0x43, 0x12, 0xF7, // sysex
        0x00, 0xB0, 0x40, 0x7F, // control change
        0x00, 0xE0, 0x00, 0x40, // pitch bend
        0x00, 0xD0, 0x20, // channel pressure
        0x00, 0xA0, 60, 0x10, // key pressure
        0x00, 0xC5, 33, // program change
        0x00, 0x95, 60, 90,
    ];
    let events = parse_track(&data, 0).unwrap();
    assert_eq!(
        events,
        alloc::vec![
            Ticked::new(
                0,
                TrackEvent::ProgramChange {
                    channel: 5,
                    program: 33
                }
            ),
            note_on(0, 5, 60, 90),
        ]
    );
}

#[test]
fn test_truncated_note() {
    let err = parse_track(&[0x00, 0x90, 60], 10).unwrap_err();
    assert!(err.is_truncated());
    assert_eq!(err.position(), 12);
}

#[test]
fn test_zero_tempo_is_rejected() {
    let data = [
        0x00, 0x90, 60, 100, //
        0x00, 0xFF, 0x51, 0x03, 0x00, 0x00, 0x00,
    ];
    let err = parse_track(&data, 10).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &crate::reader::ReaderErrorKind::Format(FormatError::ZeroTempo)
    );
    assert_eq!(err.position(), 15);
}

#[test]
fn test_truncated_meta_payload() {
    let err = parse_track(&[0x00, 0xFF, 0x51, 0x03, 0x07], 0).unwrap_err();
    assert!(err.is_truncated());
}

#[test]
fn test_delta_without_event() {
    let err = parse_track(&[0x00, 0x90, 60, 100, 0x10], 0).unwrap_err();
    assert!(err.is_truncated());
}

#[test]
fn test_ticked_accessors() {
    let ticked = note_on(960, 2, 64, 30);
    assert_eq!(ticked.accumulated_ticks(), 960);
    assert_eq!(
        ticked.into_event(),
        TrackEvent::NoteOn {
            channel: 2,
            pitch: 64,
            velocity: 30
        }
    );
}

#[test]
fn test_empty_track() {
    assert!(parse_track(&[], 0).unwrap().is_empty());
}
