//! Provides [`KeyRange`], an inclusive span of MIDI note numbers displayed by a single tier of keys.

use core::fmt;
use wmidi::Note;

/// Highest MIDI note number.
const MIDI_MAX: i32 = 127;

/// An inclusive range of MIDI note numbers.
///
/// Both bounds are clamped independently to `0..=127` on construction. Clamping never reorders the bounds: a range whose
/// start lies above its end is degenerate, contains no notes, and is hidden rather than flipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyRange {
    start: u8,
    end: u8,
}

impl KeyRange {
    /// Constructs a [`KeyRange`], clamping each bound to the MIDI note domain.
    pub const fn new(start: i32, end: i32) -> Self {
        Self {
            start: clamp_to_midi(start),
            end: clamp_to_midi(end),
        }
    }

    /// Returns a copy transposed by `semitones`, clamping each bound independently.
    pub const fn shifted(self, semitones: i32) -> Self {
        Self::new(self.start as i32 + semitones, self.end as i32 + semitones)
    }

    /// Lowest note number (inclusive).
    pub fn start(&self) -> u8 {
        self.start
    }

    /// Highest note number (inclusive).
    pub fn end(&self) -> u8 {
        self.end
    }

    /// Returns `true` for a degenerate range, i.e., one whose start lies above its end.
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Determine whether a [`Note`] lies within the range.
    pub fn contains(&self, note: Note) -> bool {
        (self.start..=self.end).contains(&u8::from(note))
    }

    /// Returns an [`Iterator`] over every [`Note`] in the range, ascending.
    pub fn notes(&self) -> impl Iterator<Item = Note> + use<> {
        (self.start..=self.end).map(Note::from_u8_lossy)
    }
}

const fn clamp_to_midi(n: i32) -> u8 {
    if n < 0 {
        0
    } else if n > MIDI_MAX {
        MIDI_MAX as u8
    } else {
        n as u8
    }
}

impl fmt::Display for KeyRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_each_bound() {
        let range = KeyRange::new(-5, 140);
        assert_eq!(0, range.start());
        assert_eq!(127, range.end());
    }

    #[test]
    fn shift_up_an_octave() {
        assert_eq!(
            KeyRange::new(84, 108),
            KeyRange::new(72, 96).shifted(12),
            "Expected left but got right"
        );
    }

    #[test]
    fn shift_clamps_without_reordering() {
        let range = KeyRange::new(120, 126).shifted(12);
        assert_eq!(KeyRange::new(127, 127), range, "Expected left but got right");
        assert!(!range.is_empty());

        let range = KeyRange::new(0, 5).shifted(-12);
        assert_eq!(KeyRange::new(0, 0), range, "Expected left but got right");
    }

    #[test]
    fn degenerate_range_is_empty() {
        let range = KeyRange::new(72, 60);
        assert!(range.is_empty());
        assert_eq!(0, range.notes().count());
        assert!(!range.contains(Note::C4));
    }

    #[test]
    fn contains() {
        let range = KeyRange::new(60, 72);
        assert!(range.contains(Note::C4));
        assert!(range.contains(Note::C5));
        assert!(!range.contains(Note::B3));
        assert!(!range.contains(Note::Db5));
    }
}
