use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive as _;

/// Transposes the desktop tiers by whole octaves.
#[derive(Debug, Default, Clone, Copy, ToPrimitive, FromPrimitive, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OctaveShift {
    /// One octave down.
    Down = -1,
    /// No transposition.
    #[default]
    Neutral = 0,
    /// One octave up.
    Up = 1,
}

impl OctaveShift {
    /// Converts a requested shift, clamping anything beyond a single octave in either direction.
    pub fn clamped(octaves: i32) -> Self {
        Self::from_i32(octaves.clamp(-1, 1)).unwrap_or_default()
    }

    /// The shift expressed in octaves.
    pub fn octaves(&self) -> i32 {
        *self as i32
    }

    /// The shift expressed in semitones.
    pub fn semitones(&self) -> i32 {
        self.octaves() * 12
    }
}
