mod common;

use common::file_from_tracks;
use loopmidi::prelude::*;

const NOTE_TRACK: &[u8] = &[0x00, 0x90, 60, 100, 0x60, 0x80, 60, 0, 0x00, 0xFF, 0x2F, 0x00];

#[test]
fn smpte_division_is_rejected() {
    let mut bytes = file_from_tracks(480, &[NOTE_TRACK]);
    // -25 fps, 40 ticks per frame
    bytes[12] = 0xE7;
    bytes[13] = 0x28;

    let err = parse(&bytes).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::Format(FormatError::SmpteDivision(0xE728))
    );
    assert_eq!(err.position(), 12);
}

#[test]
fn missing_header_magic() {
    let mut bytes = file_from_tracks(480, &[NOTE_TRACK]);
    bytes[..4].copy_from_slice(b"RIFF");

    let err = parse(&bytes).unwrap_err();
    assert!(err.is_format());
    assert_eq!(err.position(), 0);
}

#[test]
fn bad_track_magic() {
    let mut bytes = file_from_tracks(480, &[NOTE_TRACK]);
    bytes[14..18].copy_from_slice(b"MTrx");

    let err = parse(&bytes).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::Format(FormatError::InvalidMagic {
            expected: *b"MTrk",
            found: *b"MTrx",
        })
    );
    assert_eq!(err.position(), 14);
}

#[test]
fn zero_tempo_is_rejected() {
    let track: &[u8] = &[
        0x00, 0xFF, 0x51, 0x03, 0x00, 0x00, 0x00, //
        0x00, 0x90, 60, 100, //
        0x60, 0x80, 60, 0,
    ];
    let err = parse(&file_from_tracks(96, &[track])).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::Format(FormatError::ZeroTempo)
    );
    // header chunk, track chunk header, one delta byte
    assert_eq!(err.position(), 14 + 8 + 1);
}

#[test]
fn empty_input() {
    assert!(parse(&[]).unwrap_err().is_truncated());
}

#[test]
fn track_length_past_end_of_file() {
    let mut bytes = file_from_tracks(480, &[NOTE_TRACK]);
    bytes.truncate(bytes.len() - 1);

    let err = parse(&bytes).unwrap_err();
    assert!(err.is_truncated());
}

#[test]
fn event_cut_off_by_chunk_length() {
    // the chunk length is honest, the note-off inside it is not complete
    let bytes = file_from_tracks(480, &[&[0x00, 0x90, 60, 100, 0x60, 0x80, 60]]);

    let err = parse(&bytes).unwrap_err();
    assert!(err.is_truncated());
    assert_eq!(err.position(), 22 + 6);
}

#[test]
fn track_count_beyond_chunks() {
    let mut bytes = file_from_tracks(480, &[NOTE_TRACK]);
    bytes[11] = 2;

    assert!(parse(&bytes).unwrap_err().is_truncated());
}

#[test]
fn load_missing_file_is_io() {
    let dir = tempfile::tempdir().unwrap();
    let err = load(dir.path().join("missing.mid")).unwrap_err();

    assert!(matches!(err, Error::Io(_)));
    assert!(err.as_reader_error().is_none());
}

#[test]
fn load_malformed_file_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.mid");
    std::fs::write(&path, b"MThd\0\0\0\x06\0\x01\0\x01\x80\x00").unwrap();

    let err = load(&path).unwrap_err();
    assert!(err.as_reader_error().is_some_and(ReaderError::is_format));
}

#[test]
fn unknown_instrument_converts_into_error() {
    fn program_for(name: &str) -> Result<u8, Error> {
        Ok(instrument_name_to_program(name)?)
    }

    assert_eq!(program_for("SynthBrass 1").unwrap(), 62);
    assert!(matches!(
        program_for("Theremin"),
        Err(Error::UnknownInstrument(UnknownInstrument(name))) if name == "Theremin"
    ));
}
