#![doc = r#"
Pairs note-on and note-off events into [`Note`]s.

Events from every track are merged into one timeline ordered by tick. At
equal ticks, earlier tracks come first, and within a track file order is
kept.

Sounding notes are kept per `(channel, pitch)` as a stack, since a key may
be struck again before it is released:

```text
tick   event        stack for (0, 60)
0      on  60       [0]
10     on  60       [0, 10]
20     off 60       [0]        -> note 10..20
30     off 60       []         -> note 0..30
```

A note-on that is never released is dropped.
"#]

use alloc::{collections::BTreeMap, vec::Vec};

use crate::{
    Note,
    file::{Tempo, Ticked, TrackEvent},
};

/// Sounding notes: `(start tick, velocity)` stacks keyed by `(channel, pitch)`.
#[derive(Debug, Default)]
pub(crate) struct ActiveNotes {
    stacks: BTreeMap<(u8, u8), Vec<(u32, u8)>>,
}

impl ActiveNotes {
    pub(crate) fn press(&mut self, channel: u8, pitch: u8, tick: u32, velocity: u8) {
        self.stacks
            .entry((channel, pitch))
            .or_default()
            .push((tick, velocity));
    }

    /// Pops the most recent press of `(channel, pitch)`.
    pub(crate) fn release(&mut self, channel: u8, pitch: u8) -> Option<(u32, u8)> {
        self.stacks.get_mut(&(channel, pitch))?.pop()
    }

    /// The number of presses still waiting for a release
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    pub(crate) fn dangling(&self) -> usize {
        self.stacks.values().map(Vec::len).sum()
    }
}

/// Merges per-track events into one timeline ordered by tick.
pub fn merge_tracks(tracks: Vec<Vec<Ticked<TrackEvent>>>) -> Vec<Ticked<TrackEvent>> {
    let mut merged: Vec<_> = tracks.into_iter().flatten().collect();
    // stable: ties keep track order, then file order
    merged.sort_by_key(Ticked::accumulated_ticks);
    merged
}

/// The first tempo event in a merged timeline.
pub fn first_tempo(events: &[Ticked<TrackEvent>]) -> Option<Tempo> {
    events.iter().find_map(|e| match e.event() {
        TrackEvent::Tempo(tempo) => Some(*tempo),
        _ => None,
    })
}

/// Pairs the note events of a merged timeline.
///
/// Every note is timed with `tempo`. Notes are returned ordered by start,
/// then pitch.
pub fn reconstruct_notes(
    events: &[Ticked<TrackEvent>],
    tempo: Tempo,
    ticks_per_quarter: u16,
) -> Vec<Note> {
    let mut active = ActiveNotes::default();
    let mut finished: Vec<(u32, u32, u8, u8)> = Vec::new();

    for timed in events {
        let tick = timed.accumulated_ticks();
        match *timed.event() {
            TrackEvent::NoteOn {
                channel,
                pitch,
                velocity,
            } => active.press(channel, pitch, tick, velocity),
            TrackEvent::NoteOff { channel, pitch, .. } => {
                if let Some((start, velocity)) = active.release(channel, pitch) {
                    finished.push((start, tick, pitch, velocity));
                }
            }
            TrackEvent::Tempo(_) | TrackEvent::ProgramChange { .. } => {}
        }
    }

    #[cfg(feature = "tracing")]
    {
        let dangling = active.dangling();
        if dangling > 0 {
            tracing::debug!(dangling, "dropping note-ons that were never released");
        }
    }

    finished.sort_by_key(|&(start, _, pitch, _)| (start, pitch));
    finished
        .into_iter()
        .map(|(start, end, pitch, velocity)| {
            Note::new(
                pitch,
                tempo.ticks_to_seconds(start, ticks_per_quarter),
                tempo.ticks_to_seconds(end, ticks_per_quarter),
                velocity,
            )
        })
        .collect()
}

#[cfg(test)]
use alloc::vec;
#[cfg(test)]
use pretty_assertions::assert_eq;

#[cfg(test)]
fn on(tick: u32, channel: u8, pitch: u8, velocity: u8) -> Ticked<TrackEvent> {
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
fn off(tick: u32, channel: u8, pitch: u8) -> Ticked<TrackEvent> {
    Ticked::new(
        tick,
        TrackEvent::NoteOff {
            channel,
            pitch,
            velocity: 0,
        },
    )
}

// 480 ticks per quarter at 120 BPM: one tick is 1/960 s
#[cfg(test)]
fn secs(ticks: u32) -> f64 {
    Tempo::default().ticks_to_seconds(ticks, 480)
}

#[test]
fn overlapping_presses_pair_last_in_first_out() {
    let events = [on(0, 0, 60, 100), on(10, 0, 60, 90), off(20, 0, 60), off(30, 0, 60)];
    let notes = reconstruct_notes(&events, Tempo::default(), 480);

    assert_eq!(
        notes,
        vec![
            Note::new(60, secs(0), secs(30), 100),
            Note::new(60, secs(10), secs(20), 90),
        ]
    );
}

#[test]
fn active_notes_stack() {
    let mut active = ActiveNotes::default();
    active.press(0, 60, 0, 100);
    active.press(0, 60, 10, 90);
    active.press(2, 60, 10, 90);
    assert_eq!(active.dangling(), 3);

    assert_eq!(active.release(0, 60), Some((10, 90)));
    assert_eq!(active.release(0, 60), Some((0, 100)));
    assert_eq!(active.release(0, 60), None);
    assert_eq!(active.release(1, 60), None);
    assert_eq!(active.dangling(), 1);
}

#[test]
fn dangling_press_is_dropped() {
    let events = [on(0, 0, 60, 100), on(0, 0, 64, 100), off(480, 0, 64)];
    let notes = reconstruct_notes(&events, Tempo::default(), 480);

    assert_eq!(notes, vec![Note::new(64, 0.0, 0.5, 100)]);
}

#[test]
fn channels_do_not_share_stacks() {
    let events = [on(0, 0, 60, 100), on(0, 1, 60, 50), off(240, 1, 60), off(480, 0, 60)];
    let notes = reconstruct_notes(&events, Tempo::default(), 480);

    assert_eq!(
        notes,
        vec![
            Note::new(60, 0.0, 0.25, 50),
            Note::new(60, 0.0, 0.5, 100),
        ]
    );
}

#[test]
fn release_without_press_is_ignored() {
    let events = [off(0, 0, 60), on(10, 0, 60, 1), off(20, 0, 60)];
    let notes = reconstruct_notes(&events, Tempo::default(), 480);
    assert_eq!(notes, vec![Note::new(60, secs(10), secs(20), 1)]);
}

#[test]
fn merge_is_stable_across_tracks() {
    let first = vec![on(0, 0, 60, 100), off(480, 0, 60)];
    let second = vec![on(0, 1, 48, 80), off(240, 1, 48), off(480, 1, 50)];
    let merged = merge_tracks(vec![first, second]);

    assert_eq!(
        merged,
        vec![
            on(0, 0, 60, 100),
            on(0, 1, 48, 80),
            off(240, 1, 48),
            off(480, 0, 60),
            off(480, 1, 50),
        ]
    );
}

#[test]
fn first_tempo_in_tick_order_wins() {
    let conductor = vec![
        Ticked::new(960, TrackEvent::Tempo(Tempo::new(400_000))),
    ];
    let melody = vec![
        on(0, 0, 60, 100),
        Ticked::new(480, TrackEvent::Tempo(Tempo::new(600_000))),
    ];
    let merged = merge_tracks(vec![conductor, melody]);
    assert_eq!(first_tempo(&merged), Some(Tempo::new(600_000)));
    assert_eq!(first_tempo(&[on(0, 0, 60, 1)]), None);
}

#[test]
fn notes_are_ordered_by_start_then_pitch() {
    let events = [
        on(0, 0, 67, 100),
        on(0, 0, 60, 100),
        on(10, 0, 50, 100),
        off(20, 0, 50),
        off(30, 0, 60),
        off(30, 0, 67),
    ];
    let pitches: Vec<u8> = reconstruct_notes(&events, Tempo::default(), 480)
        .iter()
        .map(Note::pitch)
        .collect();
    assert_eq!(pitches, vec![60, 67, 50]);
}
