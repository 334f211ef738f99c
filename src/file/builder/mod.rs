#![doc = r#"
Synthesizes the bytes of a format 1 MIDI file.

The file holds one conductor track followed by one track per instrument:

```text
MThd  format 1, tracks = instruments + 1, division = ticks per quarter
MTrk  0: time signature 4/4, 0: tempo, 0: end of track
MTrk  0: program change, note-ons and note-offs..., end of track
...
```

Within an instrument track, events are ordered by tick. Events sharing a
tick are written program change first, then note-ons, then note-offs.
"#]

use alloc::vec::Vec;

use crate::{
    Note,
    file::{
        FormatType, Header, Tempo,
        chunk::{MTHD, MTRK, write_chunk},
        timing::seconds_to_ticks,
    },
    instrument::Instrument,
    message::{END_OF_TRACK, TIME_SIGNATURE_4_4, channel::VoiceKind, tempo_event},
    vlq,
};

/// A channel event queued for writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteEvent {
    ProgramChange { channel: u8, program: u8 },
    NoteOn { channel: u8, pitch: u8, velocity: u8 },
    NoteOff { channel: u8, pitch: u8 },
}

impl WriteEvent {
    /// Lower is written first at equal ticks
    const fn priority(&self) -> u8 {
        match self {
            Self::ProgramChange { .. } => 0,
            Self::NoteOn { .. } => 1,
            Self::NoteOff { .. } => 2,
        }
    }

    fn write(&self, buffer: &mut Vec<u8>) {
        match *self {
            Self::ProgramChange { channel, program } => {
                buffer.extend_from_slice(&[VoiceKind::ProgramChange.status(channel), program]);
            }
            Self::NoteOn {
                channel,
                pitch,
                velocity,
            } => {
                buffer.extend_from_slice(&[VoiceKind::NoteOn.status(channel), pitch, velocity]);
            }
            Self::NoteOff { channel, pitch } => {
                buffer.extend_from_slice(&[VoiceKind::NoteOff.status(channel), pitch, 0]);
            }
        }
    }
}

/// Collects the events of one instrument track.
#[derive(Debug, Default)]
pub struct TrackBuilder {
    events: Vec<(u32, WriteEvent)>,
}

impl TrackBuilder {
    /// Create an empty track
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a program change. `channel` and `program` are masked into range.
    pub fn program_change(&mut self, tick: u32, channel: u8, program: u8) -> &mut Self {
        self.events.push((
            tick,
            WriteEvent::ProgramChange {
                channel: channel & 0x0F,
                program: program & 0x7F,
            },
        ));
        self
    }

    /// Queue a note-on at `start` and a note-off at `end`.
    ///
    /// `end` is pushed to at least `start + 1` so no note has zero length.
    /// Velocity is clamped to 127.
    ///
    /// A velocity of 0 is written as is. Readers take a note-on with
    /// velocity 0 as a note-off, so such a note does not survive a reload.
    pub fn note(
        &mut self,
        start: u32,
        end: u32,
        channel: u8,
        pitch: u8,
        velocity: u8,
    ) -> &mut Self {
        let channel = channel & 0x0F;
        let pitch = pitch & 0x7F;
        let end = end.max(start.saturating_add(1));
        self.events.push((
            start,
            WriteEvent::NoteOn {
                channel,
                pitch,
                velocity: velocity.min(127),
            },
        ));
        self.events.push((end, WriteEvent::NoteOff { channel, pitch }));
        self
    }

    /// Orders the queued events and serializes them, closing the track.
    pub fn finish(mut self) -> Vec<u8> {
        self.events.sort_by_key(|(tick, event)| (*tick, event.priority()));

        let mut buffer = Vec::with_capacity(self.events.len() * 4 + END_OF_TRACK.len() + 1);
        let mut last_tick = 0;
        for (tick, event) in &self.events {
            vlq::write(tick - last_tick, &mut buffer);
            event.write(&mut buffer);
            last_tick = *tick;
        }
        vlq::write(0, &mut buffer);
        buffer.extend_from_slice(&END_OF_TRACK);
        buffer
    }
}

/// The data of the conductor track: 4/4, the tempo, end of track. All at tick 0.
pub fn tempo_track(tempo: Tempo) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(20);
    vlq::write(0, &mut buffer);
    buffer.extend_from_slice(&TIME_SIGNATURE_4_4);
    vlq::write(0, &mut buffer);
    buffer.extend_from_slice(&tempo_event(tempo.micros_per_quarter_note()));
    vlq::write(0, &mut buffer);
    buffer.extend_from_slice(&END_OF_TRACK);
    buffer
}

/// The data of one instrument's track.
///
/// Note times are converted to ticks at `bpm`; negative times land on tick 0.
pub fn instrument_track(instrument: &Instrument, bpm: f64, ticks_per_quarter: u16) -> Vec<u8> {
    let mut track = TrackBuilder::new();
    track.program_change(0, instrument.channel(), instrument.program());
    for note in instrument.notes() {
        let (start, end) = note_ticks(note, bpm, ticks_per_quarter);
        track.note(
            start,
            end,
            instrument.channel(),
            note.pitch(),
            note.velocity(),
        );
    }
    track.finish()
}

fn note_ticks(note: &Note, bpm: f64, ticks_per_quarter: u16) -> (u32, u32) {
    (
        seconds_to_ticks(note.start(), bpm, ticks_per_quarter),
        seconds_to_ticks(note.end(), bpm, ticks_per_quarter),
    )
}

/// Builds a complete file from a tempo, a resolution and a set of instruments.
///
/// Instruments beyond the 65534 a header can count are not written.
pub fn build(tempo_bpm: f64, ticks_per_quarter: u16, instruments: &[Instrument]) -> Vec<u8> {
    let instruments = &instruments[..instruments.len().min(u16::MAX as usize - 1)];
    let header = Header::new(
        FormatType::Simultaneous,
        instruments.len() as u16 + 1,
        ticks_per_quarter,
    );

    let mut out = Vec::new();
    write_chunk(MTHD, &header.to_bytes(), &mut out);
    write_chunk(MTRK, &tempo_track(Tempo::from_bpm(tempo_bpm)), &mut out);

    for instrument in instruments {
        let data = instrument_track(instrument, tempo_bpm, ticks_per_quarter);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            name = instrument.name(),
            channel = instrument.channel(),
            program = instrument.program(),
            notes = instrument.notes().len(),
            bytes = data.len(),
            "writing instrument track"
        );

        write_chunk(MTRK, &data, &mut out);
    }
    out
}

#[cfg(test)]
use alloc::vec;
#[cfg(test)]
use pretty_assertions::assert_eq;

#[test]
fn conductor_track_bytes() {
    assert_eq!(
        tempo_track(Tempo::new(500_000)),
        vec![
            0x00, 0xFF, 0x58, 0x04, 0x04, 0x02, 0x18, 0x08, //
            0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, //
            0x00, 0xFF, 0x2F, 0x00,
        ]
    );
}

#[test]
fn equal_ticks_put_note_on_before_note_off() {
    let mut track = TrackBuilder::new();
    track
        .note(480, 960, 0, 62, 90)
        .note(0, 480, 0, 60, 100)
        .program_change(0, 0, 5);

    assert_eq!(
        track.finish(),
        vec![
            0x00, 0xC0, 5, //
            0x00, 0x90, 60, 100, //
            0x83, 0x60, 0x90, 62, 90, //
            0x00, 0x80, 60, 0, //
            0x83, 0x60, 0x80, 62, 0, //
            0x00, 0xFF, 0x2F, 0x00,
        ]
    );
}

#[test]
fn zero_length_notes_last_one_tick() {
    let mut track = TrackBuilder::new();
    track.note(10, 10, 3, 64, 200);

    assert_eq!(
        track.finish(),
        vec![
            0x0A, 0x93, 64, 127, //
            0x01, 0x83, 64, 0, //
            0x00, 0xFF, 0x2F, 0x00,
        ]
    );
}

#[test]
fn silent_note_is_written_as_is() {
    let mut track = TrackBuilder::new();
    track.note(0, 48, 0, 60, 0);

    assert_eq!(
        track.finish(),
        vec![
            0x00, 0x90, 60, 0, //
            0x30, 0x80, 60, 0, //
            0x00, 0xFF, 0x2F, 0x00,
        ]
    );
}

#[test]
fn out_of_range_fields_are_masked() {
    let mut track = TrackBuilder::new();
    track.program_change(0, 0x12, 0x85);
    assert_eq!(
        track.finish(),
        vec![0x00, 0xC2, 0x05, 0x00, 0xFF, 0x2F, 0x00]
    );
}

#[test]
fn instrument_track_converts_seconds() {
    let instrument = Instrument::with_notes(
        "Bass",
        33,
        1,
        vec![Note::new(36, 0.0, 0.25, 110), Note::new(36, -1.0, 0.0, 90)],
    );
    // 120 BPM at 96 ticks per quarter: 0.25 s is 48 ticks
    assert_eq!(
        instrument_track(&instrument, 120.0, 96),
        vec![
            0x00, 0xC1, 33, //
            0x00, 0x91, 36, 110, //
            0x00, 0x91, 36, 90, //
            0x01, 0x81, 36, 0, //
            0x2F, 0x81, 36, 0, //
            0x00, 0xFF, 0x2F, 0x00,
        ]
    );
}

#[test]
fn file_layout() {
    let bytes = build(120.0, 480, &[Instrument::new("Empty", 0, 0)]);

    assert_eq!(&bytes[..14], b"MThd\0\0\0\x06\0\x01\0\x02\x01\xE0");
    assert_eq!(&bytes[14..22], b"MTrk\0\0\0\x13");
    assert_eq!(&bytes[41..49], b"MTrk\0\0\0\x07");
    assert_eq!(bytes.len(), 56);
}

#[test]
fn instruments_past_the_track_limit_are_dropped() {
    let instruments = vec![Instrument::new("Empty", 0, 0); 65_535];
    let bytes = build(120.0, 480, &instruments);

    assert_eq!(&bytes[10..12], &[0xFF, 0xFF]);
    // header, conductor track, then 65534 seven-byte instrument tracks
    assert_eq!(bytes.len(), 14 + 27 + 65_534 * 15);
}
