use thiserror::Error;

#[doc = r#"
A set of errors that can occur while reading file bytes into notes
"#]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Reading at Position {position}, {kind}")]
pub struct ReaderError {
    position: usize,
    pub(crate) kind: ReaderErrorKind,
}

/// A kind of error that a reader can produce
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReaderErrorKind {
    /// The bytes do not describe a file this codec understands
    #[error("Format {0}")]
    Format(#[from] FormatError),
    /// The cursor ran past the end of the available bytes
    /// in the middle of an event or chunk.
    #[error("Truncated: needed {needed} byte(s), {available} available")]
    Truncated {
        /// Bytes the read required
        needed: usize,
        /// Bytes left in the buffer when the read was attempted
        available: usize,
    },
}

/// Errors for malformed, but not truncated, input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// A chunk did not start with the expected four byte identifier
    #[error("Expected chunk {expected:?}, found {found:?}")]
    InvalidMagic {
        /// The identifier that should have been there
        expected: [u8; 4],
        /// The bytes that were there instead
        found: [u8; 4],
    },
    /// The header chunk declared fewer than six bytes
    #[error("Header chunk length {0} is shorter than 6")]
    HeaderLength(u32),
    /// The division uses SMPTE time code (top bit set)
    #[error("SMPTE time code division {0:#06X} is not supported")]
    SmpteDivision(u16),
    /// The division is zero ticks per quarter note
    #[error("Division of zero ticks per quarter note")]
    ZeroDivision,
    /// A data byte appeared where a status byte was required and no
    /// earlier status byte exists in the track
    #[error("Data byte {0:#04X} with no running status")]
    MissingRunningStatus(u8),
    /// A tempo event set zero microseconds per quarter note
    #[error("Tempo of zero microseconds per quarter note")]
    ZeroTempo,
    /// A variable length quantity did not terminate within four bytes
    #[error("Variable length quantity exceeds four bytes")]
    VlqTooLong,
}

impl ReaderError {
    /// Create a reader error from a position and kind
    pub const fn new(position: usize, kind: ReaderErrorKind) -> Self {
        Self { position, kind }
    }
    /// True if the input ended in the middle of an event or chunk
    pub const fn is_truncated(&self) -> bool {
        matches!(self.kind, ReaderErrorKind::Truncated { .. })
    }
    /// True if the input was malformed
    pub const fn is_format(&self) -> bool {
        matches!(self.kind, ReaderErrorKind::Format(_))
    }
    /// Returns the error kind of the reader.
    pub fn error_kind(&self) -> &ReaderErrorKind {
        &self.kind
    }
    /// Returns the position where the read error occurred.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Create a new format error
    pub const fn format(position: usize, error: FormatError) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::Format(error),
        }
    }

    /// Create a new truncation error
    pub const fn truncated(position: usize, needed: usize, available: usize) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::Truncated { needed, available },
        }
    }
}

/// The Read Result type (see [`ReaderError`])
pub type ReadResult<T> = Result<T, ReaderError>;

#[test]
fn display_includes_position() {
    use alloc::string::ToString;

    let err = ReaderError::truncated(12, 2, 1);
    assert_eq!(
        err.to_string(),
        "Reading at Position 12, Truncated: needed 2 byte(s), 1 available"
    );

    let err = ReaderError::format(0, FormatError::SmpteDivision(0xE728));
    assert!(err.is_format());
    assert!(!err.is_truncated());
    assert_eq!(err.position(), 0);
}
