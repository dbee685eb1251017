//! Pitch-class helpers and human-readable labels for [`Note`]s.

use core::fmt;
use wmidi::Note;

/// Names of the twelve pitch classes, spelled with sharps.
const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Pitch classes which fall on white keys.
const WHITE_PITCH_CLASSES: [u8; 7] = [0, 2, 4, 5, 7, 9, 11];

/// Pitch class of G♯, the lone black key of the three-key cluster that sits in a narrower column.
pub const G_SHARP: u8 = 8;

/// Returns the pitch class (0 = C through 11 = B) of a [`Note`].
pub fn pitch_class(note: Note) -> u8 {
    u8::from(note) % 12
}

/// Determine whether a [`Note`] falls on a white key.
pub fn is_white(note: Note) -> bool {
    WHITE_PITCH_CLASSES.contains(&pitch_class(note))
}

/// Determine whether a [`Note`] falls on a black key.
pub fn is_black(note: Note) -> bool {
    !is_white(note)
}

/// Black keys other than G♯ are drawn wide: C♯, D♯, F♯ and A♯.
pub fn is_wide_black(note: Note) -> bool {
    matches!(pitch_class(note), 1 | 3 | 6 | 10)
}

/// A printable note name such as `C4` or `F#-1`, where middle C (60) is `C4`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoteLabel {
    name: &'static str,
    octave: i8,
}

impl NoteLabel {
    /// Label a [`Note`].
    pub fn new(note: Note) -> Self {
        let midi = u8::from(note);
        Self {
            name: NOTE_NAMES[usize::from(midi % 12)],
            // MIDI numbers are non-negative, so integer division is already the floor
            octave: (midi / 12) as i8 - 1,
        }
    }

    /// The letter and accidental, without the octave.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The octave number.
    pub fn octave(&self) -> i8 {
        self.octave
    }
}

impl From<Note> for NoteLabel {
    fn from(note: Note) -> Self {
        Self::new(note)
    }
}

impl fmt::Display for NoteLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.octave)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for NoteLabel {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}{}", self.name, self.octave);
    }
}
