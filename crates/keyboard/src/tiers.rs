//! Chooses the ranges shown by each display slot.

use crate::{
    configuration::{DesktopRange, DeviceClass, KeyboardConfig, OctaveShift},
    range::KeyRange,
};

/// Computes the ranges to render, one per display slot, in slot order.
///
/// Compact screens always show the configured compact tiers, whatever the range selection or octave shift. Desktops show
/// the pair of ranges picked by `desktop_range`, each transposed by `octave_shift` and clamped to the MIDI note domain
/// bound by bound. A range which clamping leaves degenerate is still returned (so slot positions don't move) and ends up
/// hidden by the layout.
pub fn compute_tiers(
    device_class: DeviceClass,
    desktop_range: DesktopRange,
    octave_shift: OctaveShift,
    config: &KeyboardConfig,
) -> Vec<KeyRange> {
    match device_class {
        DeviceClass::Compact => config.compact_ranges.to_vec(),
        DeviceClass::Desktop => {
            let base = match desktop_range {
                DesktopRange::C4C6 => &config.desktop_ranges,
                DesktopRange::C3C5 => &config.desktop_alt_ranges,
            };
            base.iter()
                .map(|range| range.shifted(octave_shift.semitones()))
                .collect()
        }
    }
}
