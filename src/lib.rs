#![doc = r#"
A minimal Standard MIDI File codec.

`loopmidi` does two things:

- **Read**: turn the bytes of a format 1 (multi-track) MIDI file into a
  [`LoadedFile`]: one tempo, the file's ticks-per-quarter-note, and a flat
  list of absolutely-timed [`Note`]s merged across every track and channel.
- **Write**: turn an [`OutputFile`] (a tempo, a resolution and a set of
  [`Instrument`]s with their notes) back into the bytes of a format 1 file.

Only a single tempo per file is modeled. The first tempo event in global
tick order wins, and a file without one plays at 120 BPM.

# Example
```rust
use loopmidi::prelude::*;

let mut piano = Instrument::new(
    "Piano",
    instrument_name_to_program("Acoustic Grand Piano").unwrap(),
    0,
);
piano.push(Note::new(60, 0.0, 0.5, 100));
piano.push(Note::new(64, 0.5, 1.0, 90));

let file = OutputFile::new(120.0, 480, vec![piano]);
let bytes = file.to_bytes();

let loaded = loopmidi::parse(&bytes).unwrap();
assert_eq!(loaded.notes().len(), 2);
assert_eq!(loaded.tempo_bpm(), 120.0);
```
"#]
#![no_std]
#![warn(missing_docs)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod error;
pub use error::*;

pub mod file;
pub mod instrument;
pub mod message;
pub mod reader;
pub mod vlq;

mod note;
pub use note::*;

pub use file::{LoadedFile, OutputFile, parse};
#[cfg(feature = "std")]
pub use file::load;
pub use instrument::{Instrument, instrument_name_to_program, program_name};

/// Commonly used types and functions
pub mod prelude {
    pub use crate::{
        Error, Note,
        file::{DEFAULT_TICKS_PER_QUARTER, LoadedFile, OutputFile, Tempo, parse},
        instrument::{Instrument, UnknownInstrument, instrument_name_to_program, program_name},
        reader::{FormatError, ReadResult, ReaderError, ReaderErrorKind},
    };

    #[cfg(feature = "std")]
    pub use crate::file::load;
}
