#[doc = r#"
A sounding note with absolute start and end times.

Times are in seconds from the start of the file. `end` is never before
`start`; a zero-length note is allowed, and the writer stretches it to one
tick so the key is actually released.

# Example
```rust
# use loopmidi::prelude::*;
let note = Note::new(60, 1.0, 1.5, 100);

assert_eq!(note.pitch(), 60);
assert_eq!(note.duration(), 0.5);
```
"#]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Note {
    pitch: u8,
    start: f64,
    end: f64,
    velocity: u8,
}

impl Note {
    /// Create a new note.
    ///
    /// `end` is raised to `start` if it would come first.
    pub fn new(pitch: u8, start: f64, end: f64, velocity: u8) -> Self {
        Self {
            pitch,
            start,
            end: end.max(start),
            velocity,
        }
    }

    /// The key, 0-127
    #[inline]
    pub const fn pitch(&self) -> u8 {
        self.pitch
    }

    /// Start time in seconds
    #[inline]
    pub const fn start(&self) -> f64 {
        self.start
    }

    /// End time in seconds
    #[inline]
    pub const fn end(&self) -> f64 {
        self.end
    }

    /// Note-on velocity, 0-127
    #[inline]
    pub const fn velocity(&self) -> u8 {
        self.velocity
    }

    /// `end - start`
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

#[test]
fn end_never_precedes_start() {
    let note = Note::new(64, 2.0, 1.0, 80);
    assert_eq!(note.start(), 2.0);
    assert_eq!(note.end(), 2.0);
    assert_eq!(note.duration(), 0.0);
}
