//! Turns a [`KeyRange`] into the white and black keys of one tier, with the column weights needed to line the two rows up.
//!
//! The white row is a uniform grid, one column per white key. The black row is laid out independently as a grid whose
//! columns are weighted in half-white-key units: every white key spans two units, a black key claims the columns from
//! the middle of its left neighbour to the middle of the next gap. Because black keys cluster in groups of two and
//! three per octave, G♯ (which shares its group with F♯ and A♯) gets 2 units and every other black key 3. Whatever is
//! left over at the end of the row becomes a trailing spacer so both rows come out exactly the same width.

use crate::{
    note::{self, NoteLabel},
    range::KeyRange,
};
use wmidi::Note;

/// Which row a key sits in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyColor {
    /// Natural notes, on the bottom row.
    White,
    /// Sharps, on the top row.
    Black,
}

/// Everything the view needs to draw one key.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyDescriptor {
    note: Note,
    color: KeyColor,
    label: NoteLabel,
    edge_c: bool,
    wide: bool,
    column_weight: u16,
}

impl KeyDescriptor {
    fn white(note: Note, range: &KeyRange) -> Self {
        Self {
            note,
            color: KeyColor::White,
            label: NoteLabel::new(note),
            edge_c: note::pitch_class(note) == 0 && u8::from(note) == range.end(),
            wide: false,
            column_weight: 1,
        }
    }

    fn black(note: Note) -> Self {
        Self {
            note,
            color: KeyColor::Black,
            label: NoteLabel::new(note),
            edge_c: false,
            wide: note::is_wide_black(note),
            column_weight: if note::pitch_class(note) == note::G_SHARP {
                2
            } else {
                3
            },
        }
    }

    /// The note this key plays.
    pub fn note(&self) -> Note {
        self.note
    }

    /// The row the key sits in.
    pub fn color(&self) -> KeyColor {
        self.color
    }

    /// The note name, e.g. `C#4`.
    pub fn label(&self) -> NoteLabel {
        self.label
    }

    /// Returns `true` for a C at the very top of its tier, which is styled differently.
    pub fn is_edge_c(&self) -> bool {
        self.edge_c
    }

    /// Returns `true` for the black keys drawn wide (every black key except G♯).
    pub fn is_wide(&self) -> bool {
        self.wide
    }

    /// Only C keys print their name on the key face; every key still carries its label as a tooltip.
    pub fn shows_label(&self) -> bool {
        self.color == KeyColor::White && note::pitch_class(self.note) == 0
    }

    /// Width of the key's grid column: white keys take 1 column of the white row, black keys their weight in the
    /// black row.
    pub fn column_weight(&self) -> u16 {
        self.column_weight
    }
}

/// The keys of a single tier.
#[derive(Clone, Debug, PartialEq)]
pub struct TierLayout {
    range: KeyRange,
    white_keys: Vec<KeyDescriptor>,
    black_keys: Vec<KeyDescriptor>,
    spacer: u16,
}

impl TierLayout {
    /// The range this tier was built from.
    pub fn range(&self) -> KeyRange {
        self.range
    }

    /// White keys, lowest first.
    pub fn white_keys(&self) -> &[KeyDescriptor] {
        &self.white_keys
    }

    /// Black keys, lowest first.
    pub fn black_keys(&self) -> &[KeyDescriptor] {
        &self.black_keys
    }

    /// Number of columns in the white row.
    pub fn white_columns(&self) -> usize {
        self.white_keys.len()
    }

    /// Column weights of the black row in half-white-key units, one per black key followed by the trailing spacer
    /// (if any). The weights always add up to twice the number of white keys.
    pub fn black_columns(&self) -> impl Iterator<Item = u16> + '_ {
        self.black_keys
            .iter()
            .map(KeyDescriptor::column_weight)
            .chain((self.spacer > 0).then_some(self.spacer))
    }

    /// Weight of the trailing spacer column in the black row; zero when there is none.
    pub fn spacer(&self) -> u16 {
        self.spacer
    }

    /// Returns `true` when the tier has no keys to show.
    pub fn is_empty(&self) -> bool {
        self.white_keys.is_empty() && self.black_keys.is_empty()
    }

    /// Every key in the tier, black row first, matching the order keys are registered in.
    pub fn keys(&self) -> impl Iterator<Item = &KeyDescriptor> {
        self.black_keys.iter().chain(self.white_keys.iter())
    }
}

/// Builds the layout of one tier.
///
/// A black key is placed after a white key only when the next white key is more than a semitone away (so never between
/// E and F or B and C) and the black key itself lies inside the range, which clips black keys at range boundaries that
/// don't fall on an octave. Degenerate ranges, and ranges without a single white key, produce an empty tier.
pub fn build_tier(range: KeyRange) -> TierLayout {
    let white_notes: Vec<Note> = range.notes().filter(|&n| note::is_white(n)).collect();

    let black_keys: Vec<KeyDescriptor> = white_notes
        .windows(2)
        .filter_map(|pair| {
            let candidate = u8::from(pair[0]) + 1;
            (candidate < u8::from(pair[1]))
                .then(|| Note::from_u8_lossy(candidate))
                .filter(|&n| range.contains(n))
        })
        .map(KeyDescriptor::black)
        .collect();

    let white_keys: Vec<KeyDescriptor> = white_notes
        .into_iter()
        .map(|n| KeyDescriptor::white(n, &range))
        .collect();

    let black_weight: u16 = black_keys.iter().map(KeyDescriptor::column_weight).sum();
    let spacer = (2 * white_keys.len() as u16).saturating_sub(black_weight);

    TierLayout {
        range,
        white_keys,
        black_keys,
        spacer,
    }
}
