mod common;

use common::assert_close;
use loopmidi::prelude::*;
use pretty_assertions::assert_eq;

const TEMPO: f64 = 118.0;

fn bar_length() -> f64 {
    60.0 / TEMPO * 4.0
}

fn four_chords() -> Instrument {
    let mut piano = Instrument::new(
        "Test Piano",
        instrument_name_to_program("Acoustic Grand Piano").unwrap(),
        0,
    );
    let chords = [
        [60, 64, 67], // C major
        [62, 65, 69], // D minor
        [55, 59, 62], // G major
        [57, 60, 64], // A minor
    ];
    for (index, chord) in chords.iter().enumerate() {
        let start = index as f64 * bar_length();
        let end = start + bar_length();
        for &pitch in chord {
            piano.push(Note::new(pitch, start, end, 90));
        }
    }
    piano
}

#[test]
fn four_bar_chord_loop() {
    let bytes = OutputFile::new(TEMPO, 480, vec![four_chords()]).to_bytes();
    let loaded = parse(&bytes).unwrap();

    assert_eq!(loaded.notes().len(), 12);
    assert_eq!(loaded.ticks_per_quarter(), 480);
    // 118 BPM is stored as 508475 µs per quarter
    assert_eq!(loaded.tempo().micros_per_quarter_note(), 508_475);
    assert_close(loaded.tempo_bpm(), TEMPO, 1e-3);

    let last_end = loaded
        .notes()
        .iter()
        .map(Note::end)
        .fold(0.0_f64, f64::max);
    assert_close(last_end, 4.0 * bar_length(), 0.01);
}

#[test]
fn pitches_and_velocities_survive() {
    let mut bass = Instrument::new("Bass", 38, 1);
    let mut lead = Instrument::new("Lead", 80, 2);
    for step in 0..16u8 {
        let start = step as f64 * 0.25;
        bass.push(Note::new(36 + step % 5, start, start + 0.2, 60 + step));
        lead.push(Note::new(72 + step % 7, start + 0.1, start + 0.35, 100 - step));
    }

    let file = OutputFile::new(124.0, 960, vec![bass.clone(), lead.clone()]);
    let loaded = parse(&file.to_bytes()).unwrap();

    let tick = 60.0 / 124.0 / 960.0;
    let mut expected: Vec<Note> = bass.notes().iter().chain(lead.notes()).copied().collect();
    expected.sort_by(|a, b| a.start().total_cmp(&b.start()).then(a.pitch().cmp(&b.pitch())));

    assert_eq!(loaded.notes().len(), expected.len());
    for (actual, expected) in loaded.notes().iter().zip(&expected) {
        assert_eq!(
            (actual.pitch(), actual.velocity()),
            (expected.pitch(), expected.velocity())
        );
        assert_close(actual.start(), expected.start(), tick);
        assert_close(actual.end(), expected.end(), tick);
    }
}

#[test]
fn zero_length_note_comes_back_one_tick_long() {
    let notes = vec![Note::new(60, 1.0, 1.0, 100)];
    let file = OutputFile::new(120.0, 480, vec![Instrument::with_notes("Blip", 0, 0, notes)]);
    let loaded = parse(&file.to_bytes()).unwrap();

    assert_eq!(loaded.notes(), &[Note::new(60, 1.0, 1.0 + 1.0 / 960.0, 100)]);
}

#[test]
fn silent_note_does_not_come_back() {
    let notes = vec![Note::new(60, 0.0, 0.5, 0), Note::new(64, 0.0, 0.5, 100)];
    let file = OutputFile::new(120.0, 480, vec![Instrument::with_notes("Keys", 0, 0, notes)]);
    let loaded = parse(&file.to_bytes()).unwrap();

    assert_eq!(loaded.notes(), &[Note::new(64, 0.0, 0.5, 100)]);
}

#[test]
fn instruments_pushed_later_become_tracks() {
    let mut file = OutputFile::new(120.0, 480, Vec::new());
    file.push(Instrument::with_notes("A", 0, 0, vec![Note::new(48, 0.5, 1.0, 70)]));
    file.push(Instrument::with_notes("B", 40, 1, vec![Note::new(72, 0.0, 0.25, 90)]));
    assert_eq!(file.instruments().len(), 2);

    let bytes = file.to_bytes();
    // conductor track plus one per instrument
    assert_eq!(&bytes[10..12], &[0, 3]);

    let notes = parse(&bytes).unwrap().into_notes();
    assert_eq!(
        notes,
        vec![Note::new(72, 0.0, 0.25, 90), Note::new(48, 0.5, 1.0, 70)]
    );
}

#[test]
fn same_pitch_on_two_channels_stays_two_notes() {
    let a = Instrument::with_notes("A", 0, 0, vec![Note::new(60, 0.0, 1.0, 100)]);
    let b = Instrument::with_notes("B", 0, 9, vec![Note::new(60, 0.5, 0.75, 50)]);
    let loaded = parse(&OutputFile::new(120.0, 480, vec![a, b]).to_bytes()).unwrap();

    assert_eq!(
        loaded.notes(),
        &[Note::new(60, 0.0, 1.0, 100), Note::new(60, 0.5, 0.75, 50)]
    );
}

#[test]
fn back_to_back_same_pitch_pairs_last_in_first_out() {
    // The second note-on is written before the first note-off at tick 480,
    // so the reader pairs that note-off with the second note-on.
    let notes = vec![Note::new(60, 0.0, 0.5, 100), Note::new(60, 0.5, 1.0, 80)];
    let file = OutputFile::new(120.0, 480, vec![Instrument::with_notes("Keys", 0, 0, notes)]);
    let loaded = parse(&file.to_bytes()).unwrap();

    assert_eq!(
        loaded.notes(),
        &[Note::new(60, 0.0, 1.0, 100), Note::new(60, 0.5, 0.5, 80)]
    );
}

#[test]
fn write_then_load_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loop.mid");

    OutputFile::new(TEMPO, 480, vec![four_chords()])
        .write(&path)
        .unwrap();
    let loaded = load(&path).unwrap();

    assert_eq!(loaded.notes().len(), 12);
    assert_eq!(loaded.notes()[0].pitch(), 60);
    assert_close(loaded.notes()[11].start(), 3.0 * bar_length(), 0.01);
}

#[test]
fn empty_output_file() {
    let bytes = OutputFile::new(90.0, 96, Vec::new()).to_bytes();
    let loaded = parse(&bytes).unwrap();

    assert!(loaded.notes().is_empty());
    assert_eq!(loaded.ticks_per_quarter(), 96);
    assert_close(loaded.tempo_bpm(), 90.0, 1e-3);
}
