//! The [`Engine`] owns every piece of keyboard state and processes input one event at a time.

use crate::{
    arbitration::{HeldNotes, NoteArbitrator, PointerId, SourceId},
    audio::AudioEngine,
    configuration::{DesktopRange, InstrumentType, KeyboardConfig, OctaveShift},
    error::{Error, Result},
    event::InputEvent,
    key_height::ViewportMetrics,
    keyboard::{KeyHandle, Keyboard},
    note::NoteLabel,
    pointer::PointerGestures,
    settings::{Settings, SettingsStore},
    viewport::ViewportAdapter,
};
use wmidi::Note;

/// The keyboard engine.
///
/// Every input source (the view's pointer handlers, a MIDI service, the test sequence, the host's lifecycle hooks) feeds
/// [`InputEvent`]s to [`dispatch`](Self::dispatch), which applies each one completely before returning. Nothing else
/// mutates the held notes, pointer bindings or key visuals.
pub struct Engine<A, S> {
    config: KeyboardConfig,
    arbitrator: NoteArbitrator<A>,
    pointers: PointerGestures,
    keys: Keyboard,
    viewport: ViewportAdapter,
    metrics: ViewportMetrics,
    store: S,
    settings: Settings,
    last_audible_volume: f32,
    unlocked: bool,
}

impl<A: AudioEngine, S: SettingsStore> Engine<A, S> {
    /// Constructs an `Engine` for a view with `slots` display slots, `width` pixels wide.
    ///
    /// Restores persisted settings (falling back to defaults for anything unreadable), pushes the instrument and volume
    /// to `audio`, writes the normalized settings back to `store`, and lays out the keyboard.
    ///
    /// # Errors
    ///
    /// [`Error::MissingSlots`] if the view binds fewer display slots than the largest tier list needs.
    pub fn new(
        mut audio: A,
        mut store: S,
        config: KeyboardConfig,
        slots: usize,
        width: u32,
        metrics: ViewportMetrics,
    ) -> Result<Self> {
        let required = config.required_slots();
        if slots < required {
            error!("View binds {} display slots, {} needed", slots, required);
            return Err(Error::MissingSlots {
                required,
                available: slots,
            });
        }

        let settings = Settings::restore(&store, &metrics);
        audio.set_instrument_type(settings.instrument.as_str());
        audio.set_master_volume(settings.volume);
        settings.persist(&mut store);

        let mut engine = Self {
            pointers: PointerGestures::new(config.pointer_velocity),
            keys: Keyboard::new(slots),
            viewport: ViewportAdapter::new(width, settings.desktop_range),
            arbitrator: NoteArbitrator::new(audio),
            unlocked: !config.require_unlock,
            last_audible_volume: if settings.volume > 0.0 { settings.volume } else { 1.0 },
            config,
            metrics,
            store,
            settings,
        };
        engine.relayout(false);
        Ok(engine)
    }

    /// Enables pointer input once the audio engine is ready. Idempotent.
    ///
    /// # Errors
    ///
    /// [`Error::Audio`] if the audio engine can't be readied; the keyboard stays locked.
    pub fn unlock(&mut self) -> Result<()> {
        if self.unlocked {
            return Ok(());
        }
        self.prepare_audio()?;
        self.unlocked = true;
        info!("Keyboard unlocked");
        Ok(())
    }

    /// Readies the audio engine without touching the pointer lock, as the MIDI service and the test sequence need.
    ///
    /// # Errors
    ///
    /// [`Error::Audio`] if the audio engine can't be readied.
    pub fn prepare_audio(&mut self) -> Result<()> {
        self.arbitrator.audio_mut().ensure_audio_ready().map_err(|e| {
            warn!("Audio not ready: {}", e);
            Error::from(e)
        })
    }

    /// Returns `true` once pointer input is accepted.
    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Applies one input event.
    pub fn dispatch(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { pointer, key } => self.pointer_down(pointer, key),
            InputEvent::PointerMove { pointer, key } => self.pointer_move(pointer, key),
            InputEvent::PointerUp { pointer } | InputEvent::PointerCancel { pointer } => {
                self.pointers.up(pointer, &mut self.arbitrator, &mut self.keys);
            }
            InputEvent::MidiNoteOn { note, velocity } => {
                let velocity = if velocity.is_finite() {
                    velocity.clamp(0.0, 1.0)
                } else {
                    self.config.default_velocity
                };
                self.arbitrator
                    .note_on(note, SourceId::Midi, velocity, &mut self.keys);
            }
            InputEvent::MidiNoteOff { note } => {
                self.arbitrator.note_off(note, SourceId::Midi, &mut self.keys);
            }
            InputEvent::TestNoteOn { note } => {
                self.arbitrator
                    .note_on(note, SourceId::Test, self.config.test_velocity, &mut self.keys);
            }
            InputEvent::TestNoteOff { note } => {
                self.arbitrator.note_off(note, SourceId::Test, &mut self.keys);
            }
            InputEvent::ViewportChanged { width } => {
                self.viewport.resize(width);
                self.relayout(false);
            }
            InputEvent::VisibilityLost => {
                self.pointers.clear();
                self.arbitrator.all_off(&mut self.keys);
            }
            InputEvent::MidiPanic | InputEvent::Panic => {
                self.arbitrator.all_off(&mut self.keys);
            }
        }
    }

    fn pointer_down(&mut self, pointer: PointerId, key: KeyHandle) {
        if !self.unlocked {
            debug!("Ignoring pointer {} down: keyboard locked", pointer.0);
            return;
        }
        let Some(note) = self.keys.resolve(key) else {
            debug!("Ignoring pointer {} down on a stale key", pointer.0);
            return;
        };
        if let Err(e) = self.arbitrator.audio_mut().ensure_audio_ready() {
            warn!("Dropping pointer {} down: {}", pointer.0, e);
            return;
        }
        self.pointers
            .down(pointer, note, &mut self.arbitrator, &mut self.keys);
    }

    fn pointer_move(&mut self, pointer: PointerId, key: Option<KeyHandle>) {
        if !self.unlocked {
            return;
        }
        // a stale handle is no longer a key, so it counts as sliding off
        let note = key.and_then(|handle| self.keys.resolve(handle));
        self.pointers
            .moved(pointer, note, &mut self.arbitrator, &mut self.keys);
    }

    fn relayout(&mut self, force: bool) -> bool {
        self.viewport.refresh(
            force,
            &self.config,
            &mut self.arbitrator,
            &mut self.pointers,
            &mut self.keys,
        )
    }

    /// Selects the desktop range pair, rebuilding the layout and persisting the choice if it changed.
    pub fn set_desktop_range(&mut self, range: DesktopRange) {
        if !self.viewport.set_desktop_range(range) {
            return;
        }
        self.settings.desktop_range = range;
        self.settings.persist_desktop_range(&mut self.store);
        info!("Desktop range {}", range.as_str());
        self.relayout(true);
    }

    /// Transposes the desktop tiers, rebuilding the layout if the shift changed. Shifts beyond one octave are clamped.
    pub fn set_octave_shift(&mut self, octaves: i32) {
        let shift = OctaveShift::clamped(octaves);
        if !self.viewport.set_octave_shift(shift) {
            return;
        }
        info!("Octave shift {}", shift.octaves());
        self.relayout(true);
    }

    /// Selects the instrument type and persists it.
    pub fn set_instrument(&mut self, instrument: InstrumentType) {
        self.settings.instrument = instrument;
        self.arbitrator
            .audio_mut()
            .set_instrument_type(instrument.as_str());
        self.settings.persist_instrument(&mut self.store);
        info!("Instrument {}", instrument.as_str());
    }

    /// Sets the master volume, clamped to `0.0..=1.0`, and persists it.
    pub fn set_volume(&mut self, level: f32) {
        let level = if level.is_nan() { 0.0 } else { level.clamp(0.0, 1.0) };
        if level > 0.0 {
            self.last_audible_volume = level;
        }
        self.settings.volume = level;
        self.arbitrator.audio_mut().set_master_volume(level);
        self.settings.persist_volume(&mut self.store);
        info!("Volume {}", level);
    }

    /// Mutes when audible; otherwise restores the last audible level.
    pub fn toggle_mute(&mut self) {
        if self.settings.volume > 0.0 {
            self.set_volume(0.0);
        } else {
            self.set_volume(self.last_audible_volume);
        }
    }

    /// Sets the key height, clamped to what the viewport allows and snapped to whole pixels, and persists it. Returns
    /// the height applied.
    pub fn set_key_height(&mut self, px: f32) -> f32 {
        let px = self.metrics.clamp_key_height(px);
        self.settings.key_height = px;
        self.settings.persist_key_height(&mut self.store);
        info!("Key height {} px", px);
        px
    }

    /// Updates the viewport measurements, re-clamping the key height to the new bounds. The height is persisted only if
    /// it had to change.
    pub fn set_metrics(&mut self, metrics: ViewportMetrics) {
        self.metrics = metrics;
        let px = metrics.clamp_key_height(self.settings.key_height);
        if px != self.settings.key_height {
            self.settings.key_height = px;
            self.settings.persist_key_height(&mut self.store);
        }
    }

    /// The key visuals currently on screen.
    pub fn keyboard(&self) -> &Keyboard {
        &self.keys
    }

    /// The held-note registry.
    pub fn held(&self) -> &HeldNotes {
        self.arbitrator.held()
    }

    /// Labels of the sounding notes, lowest first.
    pub fn held_notes(&self) -> Vec<NoteLabel> {
        self.arbitrator.held().iter().map(NoteLabel::new).collect()
    }

    /// The note held by `pointer`, if any.
    pub fn pointer_note(&self, pointer: PointerId) -> Option<Note> {
        self.pointers.bound(pointer)
    }

    /// The current settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The current desktop octave shift.
    pub fn octave_shift(&self) -> OctaveShift {
        self.viewport.octave_shift()
    }

    /// The viewport adapter, for the active device class and width.
    pub fn viewport(&self) -> &ViewportAdapter {
        &self.viewport
    }

    /// The view scale factor for the current key height.
    pub fn key_height_scale(&self) -> f32 {
        self.metrics.scale_for(self.settings.key_height)
    }

    /// The keyboard configuration.
    pub fn config(&self) -> &KeyboardConfig {
        &self.config
    }

    /// The audio engine.
    pub fn audio(&self) -> &A {
        self.arbitrator.audio()
    }

    /// The settings store.
    pub fn store(&self) -> &S {
        &self.store
    }
}
