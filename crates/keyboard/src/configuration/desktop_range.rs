use num_derive::{FromPrimitive, ToPrimitive};

/// Selects which pair of ranges the two desktop tiers display.
///
/// Both pairs keep C5–C7 in the upper tier; they differ in how far the lower tier reaches. With the default pair the lower
/// tier (C4–C6) overlaps the upper one by an octave, so notes in C5–C6 appear on both tiers at once.
#[derive(Debug, Default, Clone, Copy, ToPrimitive, FromPrimitive, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DesktopRange {
    /// Upper tier C5–C7, lower tier C4–C6.
    #[default]
    C4C6,
    /// Upper tier C5–C7, lower tier C3–C5.
    C3C5,
}

impl DesktopRange {
    /// The value written to the settings store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::C4C6 => "c4c6",
            Self::C3C5 => "c3c5",
        }
    }

    /// Parses a stored value; anything other than the two known identifiers is rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "c4c6" => Some(Self::C4C6),
            "c3c5" => Some(Self::C3C5),
            _ => None,
        }
    }
}

impl super::CycleConfig for DesktopRange {}
