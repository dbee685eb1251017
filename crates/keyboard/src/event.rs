//! The typed input events every source feeds into the [`Engine`](crate::engine::Engine).

use crate::{arbitration::PointerId, keyboard::KeyHandle};
use wmidi::Note;

/// One unit of input, processed synchronously and in arrival order by
/// [`Engine::dispatch`](crate::engine::Engine::dispatch).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    /// A pointer went down on a key.
    PointerDown {
        /// The pointer.
        pointer: PointerId,
        /// The key under it.
        key: KeyHandle,
    },
    /// A pointer moved.
    PointerMove {
        /// The pointer.
        pointer: PointerId,
        /// The key now under it, if any.
        key: Option<KeyHandle>,
    },
    /// A pointer was lifted.
    PointerUp {
        /// The pointer.
        pointer: PointerId,
    },
    /// The platform took a pointer gesture away (e.g., for scrolling). Treated as a lift.
    PointerCancel {
        /// The pointer.
        pointer: PointerId,
    },
    /// An external controller pressed a note.
    MidiNoteOn {
        /// The note.
        note: Note,
        /// Velocity, `0.0..=1.0`.
        velocity: f32,
    },
    /// An external controller released a note.
    MidiNoteOff {
        /// The note.
        note: Note,
    },
    /// An external controller asked for every note to stop.
    MidiPanic,
    /// The test sequence pressed a note.
    TestNoteOn {
        /// The note.
        note: Note,
    },
    /// The test sequence released a note.
    TestNoteOff {
        /// The note.
        note: Note,
    },
    /// The viewport was resized.
    ViewportChanged {
        /// New width in pixels.
        width: u32,
    },
    /// The keyboard was hidden (e.g., the app went to the background).
    VisibilityLost,
    /// The user pressed the panic button.
    Panic,
}
