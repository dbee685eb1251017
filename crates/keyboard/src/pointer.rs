//! Translates continuous pointer movement over the keys into discrete note requests.
//!
//! Each pointer holds at most one note. Dragging it across the keyboard releases the note it leaves and presses the one it
//! arrives at, so sliding a finger along the keys plays a glide without lifting it.

use crate::{
    arbitration::{NoteArbitrator, PointerId, SourceId},
    audio::AudioEngine,
    keyboard::Keyboard,
};
use std::collections::BTreeMap;
use wmidi::Note;

/// Tracks which note, if any, each active pointer is holding.
///
/// A pointer becomes active when it goes down on a key and stays active (possibly holding nothing, after sliding off the
/// keys) until it is lifted or cancelled.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointerGestures {
    bindings: BTreeMap<PointerId, Option<Note>>,
    velocity: f32,
}

impl PointerGestures {
    /// Constructs a tracker whose gestures strike notes at `velocity`.
    pub fn new(velocity: f32) -> Self {
        Self {
            bindings: BTreeMap::new(),
            velocity,
        }
    }

    /// A pointer went down on a key playing `note`.
    ///
    /// If the pointer somehow still holds a note (e.g., its release was never delivered), a different note is released
    /// first and the same note is kept as it is.
    pub fn down<A: AudioEngine>(
        &mut self,
        pointer: PointerId,
        note: Note,
        arbitrator: &mut NoteArbitrator<A>,
        keys: &mut Keyboard,
    ) {
        let previous = self.bound(pointer);
        self.rebind(pointer, previous, Some(note), arbitrator, keys);
    }

    /// An active pointer moved; `note` is the note of the key now under it, if any. Moves of inactive pointers
    /// (hovering without pressing) are ignored.
    pub fn moved<A: AudioEngine>(
        &mut self,
        pointer: PointerId,
        note: Option<Note>,
        arbitrator: &mut NoteArbitrator<A>,
        keys: &mut Keyboard,
    ) {
        let Some(&current) = self.bindings.get(&pointer) else {
            debug!("Ignoring move of untracked pointer {}", pointer.0);
            return;
        };
        self.rebind(pointer, current, note, arbitrator, keys);
    }

    /// A pointer was lifted or its gesture cancelled; whatever it held is released.
    pub fn up<A: AudioEngine>(
        &mut self,
        pointer: PointerId,
        arbitrator: &mut NoteArbitrator<A>,
        keys: &mut Keyboard,
    ) {
        if let Some(Some(note)) = self.bindings.remove(&pointer) {
            arbitrator.note_off(note, SourceId::Pointer(pointer), keys);
        }
    }

    /// Forgets every pointer without releasing anything. Only valid alongside
    /// [`NoteArbitrator::all_off`], which releases the notes themselves.
    pub fn clear(&mut self) {
        self.bindings.clear();
    }

    /// The note held by `pointer`, if it is active and over a key.
    pub fn bound(&self, pointer: PointerId) -> Option<Note> {
        self.bindings.get(&pointer).copied().flatten()
    }

    /// Returns `true` if no pointer is active.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn rebind<A: AudioEngine>(
        &mut self,
        pointer: PointerId,
        current: Option<Note>,
        next: Option<Note>,
        arbitrator: &mut NoteArbitrator<A>,
        keys: &mut Keyboard,
    ) {
        self.bindings.insert(pointer, next);
        if current == next {
            return;
        }
        let source = SourceId::Pointer(pointer);
        // release before press so the pointer never holds two notes
        if let Some(note) = current {
            arbitrator.note_off(note, source, keys);
        }
        if let Some(note) = next {
            arbitrator.note_on(note, source, self.velocity, keys);
        }
    }
}
