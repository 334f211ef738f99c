#![doc = r#"
Reading and writing whole files: [`LoadedFile`] and [`OutputFile`]
"#]

/// Contains [`OutputFile`]'s track synthesis.
pub mod builder;

pub mod chunk;

mod header;
pub use header::*;

mod reconstruct;
pub use reconstruct::*;

pub mod timing;
pub use timing::{DEFAULT_TEMPO_MICROS, DEFAULT_TICKS_PER_QUARTER, Tempo};

mod track;
pub use track::*;

use alloc::vec::Vec;

use crate::{
    Note,
    instrument::Instrument,
    reader::{ReadResult, Reader},
};

#[doc = r#"
The result of reading a file: one tempo, the resolution, and every note of
every track, ordered by start time.

Channel and track attribution is not kept.
"#]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoadedFile {
    tempo: Tempo,
    ticks_per_quarter: u16,
    notes: Vec<Note>,
}

impl LoadedFile {
    /// The tempo in beats per minute
    pub fn tempo_bpm(&self) -> f64 {
        self.tempo.bpm()
    }

    /// The tempo as stored in the file
    pub const fn tempo(&self) -> Tempo {
        self.tempo
    }

    /// The file's division
    pub const fn ticks_per_quarter(&self) -> u16 {
        self.ticks_per_quarter
    }

    /// The notes, ordered by start time, then pitch
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Takes the notes
    pub fn into_notes(self) -> Vec<Note> {
        self.notes
    }
}

/// Parse the bytes of a MIDI file into its notes.
///
/// Any malformed or truncated input fails the whole parse.
pub fn parse(bytes: &[u8]) -> ReadResult<LoadedFile> {
    let mut reader = Reader::from_byte_slice(bytes);
    let header = Header::read(&mut reader)?;
    let ticks_per_quarter = header.ticks_per_quarter();

    #[cfg(feature = "tracing")]
    tracing::debug!(
        format = header.format(),
        tracks = header.num_tracks(),
        ticks_per_quarter,
        "read header"
    );

    let mut tracks = Vec::with_capacity(header.num_tracks() as usize);
    for _ in 0..header.num_tracks() {
        let (base, data) = chunk::read_chunk(&mut reader, chunk::MTRK)?;
        tracks.push(parse_track(data, base)?);
    }

    let events = merge_tracks(tracks);
    let tempo = match first_tempo(&events) {
        Some(tempo) => tempo,
        None => {
            #[cfg(feature = "tracing")]
            tracing::debug!("no tempo event, using 120 BPM");
            Tempo::default()
        }
    };

    #[cfg(feature = "tracing")]
    {
        let ignored = events
            .iter()
            .filter(|e| matches!(e.event(), TrackEvent::Tempo(_)))
            .count()
            .saturating_sub(1);
        if ignored > 0 {
            tracing::debug!(ignored, "ignoring tempo changes after the first");
        }
    }

    let notes = reconstruct_notes(&events, tempo, ticks_per_quarter);
    Ok(LoadedFile {
        tempo,
        ticks_per_quarter,
        notes,
    })
}

/// Read and parse the MIDI file at `path`.
#[cfg(feature = "std")]
pub fn load(path: impl AsRef<std::path::Path>) -> Result<LoadedFile, crate::Error> {
    let bytes = std::fs::read(path)?;
    Ok(parse(&bytes)?)
}

#[doc = r#"
A file to be written: a tempo, a resolution, and the instruments, each of
which becomes one track.

# Example
```rust
# use loopmidi::prelude::*;
let mut lead = Instrument::new("Lead", instrument_name_to_program("Lead 1 (square)").unwrap(), 2);
lead.push(Note::new(72, 0.0, 0.25, 110));

let bytes = OutputFile::new(128.0, DEFAULT_TICKS_PER_QUARTER, vec![lead]).to_bytes();
assert_eq!(&bytes[..4], b"MThd");
```
"#]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutputFile {
    tempo_bpm: f64,
    ticks_per_quarter: u16,
    instruments: Vec<Instrument>,
}

impl OutputFile {
    /// Create a file description
    pub fn new(tempo_bpm: f64, ticks_per_quarter: u16, instruments: Vec<Instrument>) -> Self {
        Self {
            tempo_bpm,
            ticks_per_quarter,
            instruments,
        }
    }

    /// The tempo in beats per minute
    pub const fn tempo_bpm(&self) -> f64 {
        self.tempo_bpm
    }

    /// The division written to the header
    pub const fn ticks_per_quarter(&self) -> u16 {
        self.ticks_per_quarter
    }

    /// The instruments, in track order
    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    /// Adds an instrument as the last track
    pub fn push(&mut self, instrument: Instrument) {
        self.instruments.push(instrument);
    }

    /// Serialize the file.
    ///
    /// A header counts at most 65535 tracks, one of which is the conductor
    /// track, so instruments past the first 65534 are not written.
    pub fn to_bytes(&self) -> Vec<u8> {
        builder::build(self.tempo_bpm, self.ticks_per_quarter, &self.instruments)
    }

    /// Serialize the file and write it to `path`, replacing any existing file.
    ///
    /// The same instrument limit as [`OutputFile::to_bytes`] applies.
    #[cfg(feature = "std")]
    pub fn write(&self, path: impl AsRef<std::path::Path>) -> Result<(), crate::Error> {
        std::fs::write(path, self.to_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
fn two_track_file() -> alloc::vec::Vec<u8> {
    let mut bytes = alloc::vec::Vec::new();
    chunk::write_chunk(chunk::MTHD, &[0, 1, 0, 2, 0x00, 0x60], &mut bytes);
    chunk::write_chunk(
        chunk::MTRK,
        &[
            0x00, 0x90, 60, 100, //
            0x60, 0x80, 60, 0, //
            0x00, 0xFF, 0x2F, 0x00,
        ],
        &mut bytes,
    );
    chunk::write_chunk(
        chunk::MTRK,
        &[
            0x30, 0xFF, 0x51, 0x03, 0x0F, 0x42, 0x40, // 60 BPM at tick 48
            0x00, 0x91, 48, 80, //
            0x30, 0x91, 48, 0, //
            0x00, 0xFF, 0x2F, 0x00,
        ],
        &mut bytes,
    );
    bytes
}

#[test]
fn test_parse_merges_tracks() {
    let loaded = parse(&two_track_file()).unwrap();

    assert_eq!(loaded.ticks_per_quarter(), 96);
    assert_eq!(loaded.tempo_bpm(), 60.0);
    // one second per quarter: 48 ticks is half a second
    assert_eq!(
        loaded.notes(),
        &[Note::new(60, 0.0, 1.0, 100), Note::new(48, 0.5, 1.0, 80)]
    );
}

#[test]
fn test_missing_track_is_truncation() {
    let bytes = two_track_file();
    let header_and_first = 14 + 8 + 12;
    let err = parse(&bytes[..header_and_first]).unwrap_err();
    assert!(err.is_truncated());
    assert_eq!(err.position(), header_and_first);
}

#[test]
fn test_running_status_does_not_cross_tracks() {
    let mut bytes = alloc::vec::Vec::new();
    chunk::write_chunk(chunk::MTHD, &[0, 1, 0, 2, 0x00, 0x60], &mut bytes);
    chunk::write_chunk(chunk::MTRK, &[0x00, 0x90, 60, 100], &mut bytes);
    chunk::write_chunk(chunk::MTRK, &[0x10, 60, 0], &mut bytes);

    let err = parse(&bytes).unwrap_err();
    assert!(err.is_format());
}
