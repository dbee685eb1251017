use crate::range::KeyRange;

/// Fixed tiers shown on compact screens, highest first. Neighbouring tiers share their boundary C so each tier ends on
/// an edge C.
pub const COMPACT_RANGES: [KeyRange; 5] = [
    KeyRange::new(96, 108), // C7-C8
    KeyRange::new(84, 96),  // C6-C7
    KeyRange::new(72, 84),  // C5-C6
    KeyRange::new(60, 72),  // C4-C5
    KeyRange::new(48, 60),  // C3-C4
];

/// Desktop tiers for [`DesktopRange::C4C6`](super::DesktopRange::C4C6).
pub const DESKTOP_RANGES: [KeyRange; 2] = [
    KeyRange::new(72, 96), // C5-C7
    KeyRange::new(60, 84), // C4-C6
];

/// Desktop tiers for [`DesktopRange::C3C5`](super::DesktopRange::C3C5).
pub const DESKTOP_ALT_RANGES: [KeyRange; 2] = [
    KeyRange::new(72, 96), // C5-C7
    KeyRange::new(48, 72), // C3-C5
];

/// Static configuration of the keyboard: which ranges each device class shows and how input sources strike notes.
///
/// The ranges are data rather than constants baked into the layout code. The default desktop pairs overlap (C5–C6 is
/// shown on both tiers); whether that overlap is wanted is left to whoever builds the configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyboardConfig {
    /// Viewports at most this many pixels wide use the compact layout.
    pub compact_max_width: u32,
    /// Tiers shown on compact screens, in display-slot order.
    pub compact_ranges: [KeyRange; 5],
    /// Desktop tiers for the default range selection, in display-slot order.
    pub desktop_ranges: [KeyRange; 2],
    /// Desktop tiers for the alternate range selection, in display-slot order.
    pub desktop_alt_ranges: [KeyRange; 2],
    /// Velocity used when a pointer gesture strikes a key.
    pub pointer_velocity: f32,
    /// Velocity used by the test sequence.
    pub test_velocity: f32,
    /// Velocity assumed when a MIDI source doesn't supply one.
    pub default_velocity: f32,
    /// When `true`, pointer input is ignored until the audio output has been unlocked by a user gesture.
    pub require_unlock: bool,
}

impl KeyboardConfig {
    /// The number of display slots needed to show every tier of either device class.
    pub fn required_slots(&self) -> usize {
        self.compact_ranges.len().max(self.desktop_ranges.len())
    }
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            compact_max_width: 599,
            compact_ranges: COMPACT_RANGES,
            desktop_ranges: DESKTOP_RANGES,
            desktop_alt_ranges: DESKTOP_ALT_RANGES,
            pointer_velocity: 0.9,
            test_velocity: 0.9,
            default_velocity: 0.85,
            require_unlock: true,
        }
    }
}
