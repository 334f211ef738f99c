mod common;

use common::file_from_tracks;
use loopmidi::{prelude::*, vlq};
use pretty_assertions::assert_eq;

// 96 ticks per quarter at 120 BPM: 96 ticks is half a second
const TPQ: u16 = 96;

#[test]
fn running_status_reads_like_explicit_status() {
    let explicit: &[u8] = &[
        0x00, 0x92, 60, 100, //
        0x00, 0x92, 64, 90, //
        0x60, 0x92, 60, 0, //
        0x00, 0x92, 64, 0, //
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let running: &[u8] = &[
        0x00, 0x92, 60, 100, //
        0x00, 64, 90, //
        0x60, 60, 0, //
        0x00, 64, 0, //
        0x00, 0xFF, 0x2F, 0x00,
    ];

    let explicit = parse(&file_from_tracks(TPQ, &[explicit])).unwrap();
    let running = parse(&file_from_tracks(TPQ, &[running])).unwrap();

    assert_eq!(explicit, running);
    assert_eq!(
        running.notes(),
        &[Note::new(60, 0.0, 0.5, 100), Note::new(64, 0.0, 0.5, 90)]
    );
}

#[test]
fn overlapping_same_pitch_pairs_last_in_first_out() {
    let track: &[u8] = &[
        0x00, 0x90, 60, 100, // on at 0
        0x30, 0x90, 60, 70, // on at 48
        0x30, 0x80, 60, 0, // off at 96 closes the second on
        0x60, 0x80, 60, 0, // off at 192 closes the first on
    ];
    let loaded = parse(&file_from_tracks(TPQ, &[track])).unwrap();

    assert_eq!(
        loaded.notes(),
        &[Note::new(60, 0.0, 1.0, 100), Note::new(60, 0.25, 0.5, 70)]
    );
}

#[test]
fn dangling_note_on_is_dropped() {
    let track: &[u8] = &[
        0x00, 0x90, 60, 100, //
        0x00, 0x90, 67, 100, //
        0x60, 0x80, 67, 0, //
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let loaded = parse(&file_from_tracks(TPQ, &[track])).unwrap();

    assert_eq!(loaded.notes(), &[Note::new(67, 0.0, 0.5, 100)]);
}

#[test]
fn note_off_in_another_track_still_pairs() {
    let ons: &[u8] = &[0x00, 0x93, 50, 100];
    let offs: &[u8] = &[0x60, 0x83, 50, 0];
    let loaded = parse(&file_from_tracks(TPQ, &[ons, offs])).unwrap();

    assert_eq!(loaded.notes(), &[Note::new(50, 0.0, 0.5, 100)]);
}

#[test]
fn no_tempo_event_means_120_bpm() {
    let track: &[u8] = &[0x00, 0x90, 60, 100, 0x60, 0x80, 60, 0];
    let loaded = parse(&file_from_tracks(TPQ, &[track])).unwrap();

    assert_eq!(loaded.tempo_bpm(), 120.0);
    assert_eq!(loaded.tempo().micros_per_quarter_note(), 500_000);
}

#[test]
fn first_tempo_across_tracks_wins() {
    // 100 BPM at tick 10 in the second track, 60 BPM at tick 20 in the first
    let first: &[u8] = &[
        0x00, 0x90, 60, 100, //
        0x14, 0xFF, 0x51, 0x03, 0x0F, 0x42, 0x40, //
        0x4C, 0x80, 60, 0,
    ];
    let second: &[u8] = &[0x0A, 0xFF, 0x51, 0x03, 0x09, 0x27, 0xC0];
    let loaded = parse(&file_from_tracks(TPQ, &[first, second])).unwrap();

    assert_eq!(loaded.tempo().micros_per_quarter_note(), 600_000);
    assert_eq!(loaded.tempo_bpm(), 100.0);
    // 96 ticks at 0.6 s per quarter
    assert_eq!(loaded.notes(), &[Note::new(60, 0.0, 0.6, 100)]);
}

#[test]
fn vlq_round_trips_and_is_minimal() {
    let mut buffer = Vec::with_capacity(4);
    let boundaries = [0x7F, 0x3FFF, 0x1F_FFFF, vlq::VLQ_MAX];
    let edges = boundaries
        .iter()
        .flat_map(|&b| [b.saturating_sub(1), b, (b + 1).min(vlq::VLQ_MAX)]);
    let sampled = (0..=vlq::VLQ_MAX).step_by(9_973);

    for value in edges.chain(sampled).chain(0..=0x4100) {
        buffer.clear();
        vlq::write(value, &mut buffer);

        let minimal = match value {
            0..=0x7F => 1,
            0x80..=0x3FFF => 2,
            0x4000..=0x1F_FFFF => 3,
            _ => 4,
        };
        assert_eq!(buffer.len(), minimal, "length of {value:#X}");
        assert_eq!(vlq::decode(&buffer, 0).unwrap(), (value, minimal));
    }
}
