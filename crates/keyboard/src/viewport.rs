//! Keeps the installed tiers in step with the viewport and the range selection.

use crate::{
    arbitration::NoteArbitrator,
    audio::AudioEngine,
    configuration::{DesktopRange, DeviceClass, KeyboardConfig, OctaveShift},
    keyboard::Keyboard,
    layout::{TierLayout, build_tier},
    pointer::PointerGestures,
    tiers::compute_tiers,
};

/// Remembers the device class currently laid out and rebuilds the keyboard when it has to change.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewportAdapter {
    width: u32,
    active: Option<DeviceClass>,
    desktop_range: DesktopRange,
    octave_shift: OctaveShift,
}

impl ViewportAdapter {
    /// Constructs an adapter for a viewport `width` pixels wide. Nothing is laid out until the first
    /// [`refresh`](Self::refresh).
    pub fn new(width: u32, desktop_range: DesktopRange) -> Self {
        Self {
            width,
            active: None,
            desktop_range,
            octave_shift: OctaveShift::default(),
        }
    }

    /// Records a new viewport width. Takes effect on the next refresh.
    pub fn resize(&mut self, width: u32) {
        self.width = width;
    }

    /// Selects the desktop range pair. Returns `true` if the selection changed.
    pub fn set_desktop_range(&mut self, range: DesktopRange) -> bool {
        let changed = self.desktop_range != range;
        self.desktop_range = range;
        changed
    }

    /// Selects the desktop octave shift. Returns `true` if the shift changed.
    pub fn set_octave_shift(&mut self, shift: OctaveShift) -> bool {
        let changed = self.octave_shift != shift;
        self.octave_shift = shift;
        changed
    }

    /// The device class implied by the current width.
    pub fn device_class(&self, config: &KeyboardConfig) -> DeviceClass {
        DeviceClass::for_width(self.width, config.compact_max_width)
    }

    /// The device class currently laid out, if any layout has been installed.
    pub fn active(&self) -> Option<DeviceClass> {
        self.active
    }

    /// The current viewport width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// The selected desktop range pair.
    pub fn desktop_range(&self) -> DesktopRange {
        self.desktop_range
    }

    /// The selected desktop octave shift.
    pub fn octave_shift(&self) -> OctaveShift {
        self.octave_shift
    }

    /// Rebuilds the keyboard if the device class changed since the last build, or unconditionally when `force` is set.
    /// Returns `true` if a rebuild happened.
    ///
    /// A rebuild first releases every held note and forgets every pointer, so no note can outlive the key it was played
    /// on, then replaces every key visual.
    pub fn refresh<A: AudioEngine>(
        &mut self,
        force: bool,
        config: &KeyboardConfig,
        arbitrator: &mut NoteArbitrator<A>,
        pointers: &mut PointerGestures,
        keys: &mut Keyboard,
    ) -> bool {
        let class = self.device_class(config);
        if !force && self.active == Some(class) {
            return false;
        }

        arbitrator.all_off(keys);
        pointers.clear();
        keys.clear();

        let tiers: Vec<TierLayout> =
            compute_tiers(class, self.desktop_range, self.octave_shift, config)
                .into_iter()
                .map(build_tier)
                .collect();
        keys.install(&tiers);
        self.active = Some(class);

        info!(
            "Laid out {:?} keyboard ({} px, {} tiers, range {}, shift {})",
            class,
            self.width,
            tiers.len(),
            self.desktop_range.as_str(),
            self.octave_shift.octaves()
        );
        true
    }
}
