//! An [`AudioEngine`] with no sound card behind it: every request is logged.

use log::{info, trace};
use pianokeys_lib::{audio::AudioEngine, error::AudioError, note::NoteLabel};
use wmidi::Note;

/// Logs what a synthesizer would play.
#[derive(Debug, Default)]
pub struct LoggingAudio {
    ready: bool,
    voices: usize,
}

impl AudioEngine for LoggingAudio {
    fn ensure_audio_ready(&mut self) -> Result<(), AudioError> {
        if !self.ready {
            self.ready = true;
            info!("audio output started");
        }
        Ok(())
    }

    fn start_note(&mut self, note: Note, velocity: f32) {
        self.voices += 1;
        trace!("voice on {} vel={:.2} ({} sounding)", NoteLabel::new(note), velocity, self.voices);
    }

    fn stop_note(&mut self, note: Note) {
        self.voices = self.voices.saturating_sub(1);
        trace!("voice off {} ({} sounding)", NoteLabel::new(note), self.voices);
    }

    fn all_notes_off(&mut self) {
        self.voices = 0;
        trace!("all voices off");
    }

    fn set_instrument_type(&mut self, name: &str) {
        info!("instrument {name}");
    }

    fn set_master_volume(&mut self, level: f32) {
        info!("master volume {level:.2}");
    }
}
