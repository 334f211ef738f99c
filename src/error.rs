use thiserror::Error;

use crate::{instrument::UnknownInstrument, reader::ReaderError};

/// Every error the crate's entry points return
#[derive(Debug, Error)]
pub enum Error {
    /// The file bytes could not be read as a MIDI file
    #[error(transparent)]
    Read(#[from] ReaderError),
    /// An instrument name was not in the program table
    #[error(transparent)]
    UnknownInstrument(#[from] UnknownInstrument),
    /// Opening, reading or writing the file failed
    #[cfg(feature = "std")]
    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// The reader error, if this is one
    pub fn as_reader_error(&self) -> Option<&ReaderError> {
        match self {
            Self::Read(e) => Some(e),
            _ => None,
        }
    }
}
