#![doc = r#"
Write-side instruments and the General MIDI program table.

Program names are matched exactly. There is no fuzzy matching and no
fallback program: an unknown name is an [`UnknownInstrument`] error.

```rust
# use loopmidi::prelude::*;
assert_eq!(instrument_name_to_program("Lead 1 (square)"), Ok(80));
assert_eq!(program_name(62), Some("SynthBrass 1"));
assert!(instrument_name_to_program("lead 1 (square)").is_err());
```
"#]

use alloc::{string::String, vec::Vec};
use thiserror::Error;

use crate::Note;

/// A name was not found in the program table
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown General MIDI instrument name: {0}")]
pub struct UnknownInstrument(pub String);

/// One output track: a program on a channel, and the notes it plays.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instrument {
    name: String,
    program: u8,
    channel: u8,
    notes: Vec<Note>,
}

impl Instrument {
    /// Create an instrument with no notes.
    ///
    /// `name` is informational only and is not written to the file.
    pub fn new(name: impl Into<String>, program: u8, channel: u8) -> Self {
        Self {
            name: name.into(),
            program,
            channel,
            notes: Vec::new(),
        }
    }

    /// Create an instrument with a set of notes
    pub fn with_notes(
        name: impl Into<String>,
        program: u8,
        channel: u8,
        notes: Vec<Note>,
    ) -> Self {
        Self {
            name: name.into(),
            program,
            channel,
            notes,
        }
    }

    /// Appends a note
    pub fn push(&mut self, note: Note) {
        self.notes.push(note);
    }

    /// The display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The program number, 0-127
    pub const fn program(&self) -> u8 {
        self.program
    }

    /// The channel, 0-15
    pub const fn channel(&self) -> u8 {
        self.channel
    }

    /// The notes in the order they were added
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }
}

/// General MIDI program names, indexed by program number.
pub const GM_PROGRAMS: [&str; 128] = [
    // Piano
    "Acoustic Grand Piano",
    "Bright Acoustic Piano",
    "Electric Grand Piano",
    "Honky-tonk Piano",
    "Electric Piano 1",
    "Electric Piano 2",
    "Harpsichord",
    "Clavinet",
    // Chromatic percussion
    "Celesta",
    "Glockenspiel",
    "Music Box",
    "Vibraphone",
    "Marimba",
    "Xylophone",
    "Tubular Bells",
    "Dulcimer",
    // Organ
    "Drawbar Organ",
    "Percussive Organ",
    "Rock Organ",
    "Church Organ",
    "Reed Organ",
    "Accordion",
    "Harmonica",
    "Tango Accordion",
    // Guitar
    "Acoustic Guitar (nylon)",
    "Acoustic Guitar (steel)",
    "Electric Guitar (jazz)",
    "Electric Guitar (clean)",
    "Electric Guitar (muted)",
    "Overdriven Guitar",
    "Distortion Guitar",
    "Guitar Harmonics",
    // Bass
    "Acoustic Bass",
    "Electric Bass (finger)",
    "Electric Bass (pick)",
    "Fretless Bass",
    "Slap Bass 1",
    "Slap Bass 2",
    "Synth Bass 1",
    "Synth Bass 2",
    // Strings
    "Violin",
    "Viola",
    "Cello",
    "Contrabass",
    "Tremolo Strings",
    "Pizzicato Strings",
    "Orchestral Harp",
    "Timpani",
    // Ensemble
    "String Ensemble 1",
    "String Ensemble 2",
    "Synth Strings 1",
    "Synth Strings 2",
    "Choir Aahs",
    "Voice Oohs",
    "Synth Choir",
    "Orchestra Hit",
    // Brass
    "Trumpet",
    "Trombone",
    "Tuba",
    "Muted Trumpet",
    "French Horn",
    "Brass Section",
    "SynthBrass 1",
    "SynthBrass 2",
    // Reed
    "Soprano Sax",
    "Alto Sax",
    "Tenor Sax",
    "Baritone Sax",
    "Oboe",
    "English Horn",
    "Bassoon",
    "Clarinet",
    // Pipe
    "Piccolo",
    "Flute",
    "Recorder",
    "Pan Flute",
    "Blown bottle",
    "Shakuhachi",
    "Whistle",
    "Ocarina",
    // Synth lead
    "Lead 1 (square)",
    "Lead 2 (sawtooth)",
    "Lead 3 (calliope)",
    "Lead 4 (chiff)",
    "Lead 5 (charang)",
    "Lead 6 (voice)",
    "Lead 7 (fifths)",
    "Lead 8 (bass + lead)",
    // Synth pad
    "Pad 1 (new age)",
    "Pad 2 (warm)",
    "Pad 3 (polysynth)",
    "Pad 4 (choir)",
    "Pad 5 (bowed)",
    "Pad 6 (metallic)",
    "Pad 7 (halo)",
    "Pad 8 (sweep)",
    // Synth effects
    "FX 1 (rain)",
    "FX 2 (soundtrack)",
    "FX 3 (crystal)",
    "FX 4 (atmosphere)",
    "FX 5 (brightness)",
    "FX 6 (goblins)",
    "FX 7 (echoes)",
    "FX 8 (sci-fi)",
    // Ethnic
    "Sitar",
    "Banjo",
    "Shamisen",
    "Koto",
    "Kalimba",
    "Bagpipe",
    "Fiddle",
    "Shanai",
    // Percussive
    "Tinkle Bell",
    "Agogo",
    "Steel Drums",
    "Woodblock",
    "Taiko Drum",
    "Melodic Tom",
    "Synth Drum",
    "Reverse Cymbal",
    // Sound effects
    "Guitar Fret Noise",
    "Breath Noise",
    "Seashore",
    "Bird Tweet",
    "Telephone Ring",
    "Helicopter",
    "Applause",
    "Gunshot",
];

/// Extra names accepted by [`instrument_name_to_program`].
const ALIASES: [(&str, u8); 1] = [("Synth Pad 2 (warm)", 89)];

/// Looks up the program number for a General MIDI instrument name.
pub fn instrument_name_to_program(name: &str) -> Result<u8, UnknownInstrument> {
    GM_PROGRAMS
        .iter()
        .position(|candidate| *candidate == name)
        .map(|program| program as u8)
        .or_else(|| {
            ALIASES
                .iter()
                .find(|(alias, _)| *alias == name)
                .map(|(_, program)| *program)
        })
        .ok_or_else(|| UnknownInstrument(name.into()))
}

/// The General MIDI name of a program, if it is in range.
pub fn program_name(program: u8) -> Option<&'static str> {
    GM_PROGRAMS.get(program as usize).copied()
}

#[test]
fn looks_up_loop_programs() {
    assert_eq!(instrument_name_to_program("Acoustic Grand Piano"), Ok(0));
    assert_eq!(instrument_name_to_program("SynthBrass 1"), Ok(62));
    assert_eq!(instrument_name_to_program("Lead 1 (square)"), Ok(80));
    assert_eq!(instrument_name_to_program("Synth Pad 2 (warm)"), Ok(89));
    assert_eq!(instrument_name_to_program("Pad 2 (warm)"), Ok(89));
    assert_eq!(instrument_name_to_program("Gunshot"), Ok(127));
}

#[test]
fn unknown_names_fail() {
    assert_eq!(
        instrument_name_to_program("Kazoo"),
        Err(UnknownInstrument("Kazoo".into()))
    );
    assert!(instrument_name_to_program("acoustic grand piano").is_err());
    assert!(instrument_name_to_program("").is_err());
}

#[test]
fn names_by_program() {
    assert_eq!(program_name(0), Some("Acoustic Grand Piano"));
    assert_eq!(program_name(89), Some("Pad 2 (warm)"));
    assert_eq!(program_name(128), None);
}
