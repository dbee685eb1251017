//! The single point through which every input source requests sound.
//!
//! Pointer gestures, an external MIDI controller and the test sequence may all hold the same note at once. The
//! [`NoteArbitrator`] reference-counts those holds per note so that the audio engine hears exactly one start when the
//! first source presses a note and exactly one stop when the last source lets go.

mod held_notes;
pub use held_notes::*;

mod source;
pub use source::*;

use crate::{audio::AudioEngine, keyboard::Keyboard, note::NoteLabel};
use wmidi::Note;

/// A change in whether a note is sounding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// The note went from held by no source to held by one.
    Activation,
    /// The note went from held by one source to held by none.
    Deactivation,
}

/// Owns the [`HeldNotes`] registry and the [`AudioEngine`], translating holds and releases into start and stop requests.
pub struct NoteArbitrator<A> {
    audio: A,
    held: HeldNotes,
}

impl<A: AudioEngine> NoteArbitrator<A> {
    /// Constructs a `NoteArbitrator` with nothing held.
    pub fn new(audio: A) -> Self {
        Self {
            audio,
            held: HeldNotes::new(),
        }
    }

    /// `source` presses `note`.
    ///
    /// Only the first hold of a note starts it, at the given `velocity`; later holds (by other sources, or repeated by the
    /// same one) neither retrigger the note nor change its velocity.
    pub fn note_on(
        &mut self,
        note: Note,
        source: SourceId,
        velocity: f32,
        keys: &mut Keyboard,
    ) -> Option<Edge> {
        if !self.held.add(note, source) {
            return None;
        }
        self.audio.start_note(note, velocity);
        keys.set_sounding(note, true);
        info!(
            "NOTE ON {} vel={} src={}",
            NoteLabel::new(note),
            velocity,
            source.tag()
        );
        Some(Edge::Activation)
    }

    /// `source` releases `note`. Releasing a note the source doesn't hold does nothing.
    pub fn note_off(&mut self, note: Note, source: SourceId, keys: &mut Keyboard) -> Option<Edge> {
        if !self.held.remove(note, source) {
            return None;
        }
        self.audio.stop_note(note);
        keys.set_sounding(note, false);
        info!("NOTE OFF {} src={}", NoteLabel::new(note), source.tag());
        Some(Edge::Deactivation)
    }

    /// Releases every note regardless of which sources hold it, returning the notes which were sounding.
    ///
    /// Each of those notes takes its deactivation edge here, but the audio engine is silenced with a single
    /// [`all_notes_off`](AudioEngine::all_notes_off) rather than a stop per note. The audio engine is told even when
    /// nothing was held, so this doubles as a panic button for stuck voices.
    pub fn all_off(&mut self, keys: &mut Keyboard) -> Vec<Note> {
        let released = self.held.clear();
        self.audio.all_notes_off();
        keys.clear_sounding();
        info!("PANIC all notes off ({} released)", released.len());
        released
    }

    /// The notes currently held.
    pub fn held(&self) -> &HeldNotes {
        &self.held
    }

    /// The audio engine.
    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// The audio engine, mutably, for requests which don't concern notes (volume, instrument).
    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        audio::recording::{Call, Recorder},
        layout::build_tier,
        range::KeyRange,
    };

    const PTR_1: SourceId = SourceId::Pointer(PointerId(1));
    const PTR_2: SourceId = SourceId::Pointer(PointerId(2));

    fn keys() -> Keyboard {
        let mut keys = Keyboard::new(2);
        keys.install(&[build_tier(KeyRange::new(72, 96)), build_tier(KeyRange::new(60, 84))]);
        keys
    }

    #[test]
    fn shared_note_sounds_once() {
        let mut keys = keys();
        let mut arb = NoteArbitrator::new(Recorder::default());

        assert_eq!(Some(Edge::Activation), arb.note_on(Note::C4, SourceId::Midi, 0.8, &mut keys));
        assert_eq!(None, arb.note_on(Note::C4, PTR_1, 0.9, &mut keys));
        assert_eq!(None, arb.note_off(Note::C4, SourceId::Midi, &mut keys));
        assert!(keys.is_sounding(Note::C4), "Still held by the pointer");
        assert_eq!(Some(Edge::Deactivation), arb.note_off(Note::C4, PTR_1, &mut keys));

        assert_eq!(
            vec![Call::Start(60, 0.8), Call::Stop(60)],
            arb.audio().note_calls(),
            "Expected left but got right"
        );
        assert!(!keys.is_sounding(Note::C4));
    }

    #[test]
    fn repeated_hold_keeps_first_velocity() {
        let mut keys = keys();
        let mut arb = NoteArbitrator::new(Recorder::default());
        arb.note_on(Note::E4, SourceId::Midi, 0.3, &mut keys);
        arb.note_on(Note::E4, SourceId::Midi, 1.0, &mut keys);

        assert_eq!(vec![Call::Start(64, 0.3)], arb.audio().note_calls());
    }

    #[test]
    fn unmatched_release_is_a_no_op() {
        let mut keys = keys();
        let mut arb = NoteArbitrator::new(Recorder::default());
        assert_eq!(None, arb.note_off(Note::C4, SourceId::Midi, &mut keys));

        arb.note_on(Note::C4, SourceId::Midi, 0.8, &mut keys);
        let before = arb.held().clone();
        assert_eq!(None, arb.note_off(Note::C4, PTR_2, &mut keys));
        assert_eq!(&before, arb.held(), "Expected left but got right");
        assert_eq!(vec![Call::Start(60, 0.8)], arb.audio().note_calls());
    }

    #[test]
    fn edges_balance_under_every_interleaving() {
        // every ordering of two sources pressing and releasing the same note, respecting press-before-release per source
        let ops: [(SourceId, bool); 4] = [
            (SourceId::Midi, true),
            (SourceId::Midi, false),
            (PTR_1, true),
            (PTR_1, false),
        ];
        let orders: [[usize; 4]; 6] = [
            [0, 1, 2, 3],
            [0, 2, 1, 3],
            [0, 2, 3, 1],
            [2, 0, 1, 3],
            [2, 0, 3, 1],
            [2, 3, 0, 1],
        ];

        for order in orders {
            let mut keys = keys();
            let mut arb = NoteArbitrator::new(Recorder::default());
            let mut balance = 0_i32;
            for index in order {
                let (source, press) = ops[index];
                let edge = if press {
                    arb.note_on(Note::G4, source, 0.5, &mut keys)
                } else {
                    arb.note_off(Note::G4, source, &mut keys)
                };
                match edge {
                    Some(Edge::Activation) => balance += 1,
                    Some(Edge::Deactivation) => balance -= 1,
                    None => {}
                }
                let held = arb.held().is_held(Note::G4);
                assert_eq!(i32::from(held), balance, "Order {order:?}");
                assert_eq!(held, keys.is_sounding(Note::G4), "Order {order:?}");
            }
            let audio = arb.audio();
            assert_eq!(audio.starts(67), audio.stops(67), "Order {order:?}");
            assert!(audio.starts(67) >= 1, "Order {order:?}");
        }
    }

    #[test]
    fn overlapping_visuals_toggle_together() {
        let mut keys = keys();
        let mut arb = NoteArbitrator::new(Recorder::default());
        // C5 sits on both desktop tiers
        assert_eq!(2, keys.handles_for(Note::C5).count());

        arb.note_on(Note::C5, SourceId::Test, 0.9, &mut keys);
        assert!(
            keys.handles_for(Note::C5)
                .all(|h| keys.key(h).is_some_and(|k| k.is_sounding()))
        );

        arb.note_off(Note::C5, SourceId::Test, &mut keys);
        assert!(
            keys.handles_for(Note::C5)
                .all(|h| keys.key(h).is_some_and(|k| !k.is_sounding()))
        );
    }

    #[test]
    fn all_off_silences_in_one_batch() {
        let mut keys = keys();
        let mut arb = NoteArbitrator::new(Recorder::default());
        arb.note_on(Note::C4, SourceId::Midi, 0.8, &mut keys);
        arb.note_on(Note::E4, PTR_1, 0.9, &mut keys);
        arb.note_on(Note::E4, PTR_2, 0.9, &mut keys);
        arb.audio_mut().clear();

        assert_eq!(vec![Note::C4, Note::E4], arb.all_off(&mut keys));
        assert_eq!(vec![Call::AllOff], arb.audio().note_calls(), "Expected left but got right");
        assert!(arb.held().is_empty());
        assert!(!keys.is_sounding(Note::C4));
        assert!(!keys.is_sounding(Note::E4));

        // released sources no longer count against anything
        assert_eq!(None, arb.note_off(Note::E4, PTR_1, &mut keys));
        assert_eq!(Some(Edge::Activation), arb.note_on(Note::E4, PTR_1, 0.9, &mut keys));
    }
}
