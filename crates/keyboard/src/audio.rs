//! The interface to the sound-producing backend.
//!
//! Synthesis itself (oscillators, voices, envelopes) happens elsewhere; the engine only asks for notes to start and stop.

use crate::error::AudioError;
use wmidi::Note;

/// A backend which turns note requests into sound.
///
/// Calls are requests: the engine never waits on them to keep its own state consistent.
pub trait AudioEngine {
    /// Prepares audio output. Idempotent; must succeed before any note can be heard. The first call may require a
    /// preceding user gesture on platforms which restrict audio playback.
    fn ensure_audio_ready(&mut self) -> Result<(), AudioError>;

    /// Begins sounding `note` at `velocity` (`0.0..=1.0`).
    fn start_note(&mut self, note: Note, velocity: f32);

    /// Stops sounding `note`.
    fn stop_note(&mut self, note: Note);

    /// Silences every note at once.
    fn all_notes_off(&mut self);

    /// Selects the voice used for subsequent notes.
    fn set_instrument_type(&mut self, name: &str);

    /// Sets the output level (`0.0..=1.0`).
    fn set_master_volume(&mut self, level: f32);
}

impl<T: AudioEngine + ?Sized> AudioEngine for &mut T {
    fn ensure_audio_ready(&mut self) -> Result<(), AudioError> {
        (**self).ensure_audio_ready()
    }

    fn start_note(&mut self, note: Note, velocity: f32) {
        (**self).start_note(note, velocity)
    }

    fn stop_note(&mut self, note: Note) {
        (**self).stop_note(note)
    }

    fn all_notes_off(&mut self) {
        (**self).all_notes_off()
    }

    fn set_instrument_type(&mut self, name: &str) {
        (**self).set_instrument_type(name)
    }

    fn set_master_volume(&mut self, level: f32) {
        (**self).set_master_volume(level)
    }
}
