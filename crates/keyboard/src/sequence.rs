//! The built-in test sequence: a short arpeggio for checking that sound comes out.

use crate::event::InputEvent;
use embassy_time::{Duration, Instant};
use wmidi::Note;

/// An event and the delay, from the start of its sequence, after which it is due.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScheduledEvent {
    /// Offset from the start of the sequence.
    pub at: Duration,
    /// The event to dispatch.
    pub event: InputEvent,
}

/// A run of notes played one after another from the test source, each released before the next begins.
#[derive(Clone, Debug, PartialEq)]
pub struct TestSequence {
    notes: Vec<Note>,
    spacing: Duration,
    hold: Duration,
}

impl Default for TestSequence {
    /// C4 E4 G4 C5 E5 G5, a note every 220 ms, each held for 180 ms.
    fn default() -> Self {
        Self::new(
            vec![Note::C4, Note::E4, Note::G4, Note::C5, Note::E5, Note::G5],
            Duration::from_millis(220),
            Duration::from_millis(180),
        )
    }
}

impl TestSequence {
    /// Constructs a sequence starting a note every `spacing` and holding each for `hold`.
    pub fn new(notes: Vec<Note>, spacing: Duration, hold: Duration) -> Self {
        Self {
            notes,
            spacing,
            hold,
        }
    }

    /// The notes played, in order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Every press and release of the sequence, ordered by offset. A release due at the same time as the next press
    /// comes first.
    pub fn events(&self) -> Vec<ScheduledEvent> {
        let mut events: Vec<ScheduledEvent> = self
            .notes
            .iter()
            .enumerate()
            .flat_map(|(i, &note)| {
                let start = self.spacing * i as u32;
                [
                    ScheduledEvent {
                        at: start,
                        event: InputEvent::TestNoteOn { note },
                    },
                    ScheduledEvent {
                        at: start + self.hold,
                        event: InputEvent::TestNoteOff { note },
                    },
                ]
            })
            .collect();
        // releases go ahead of presses due at the same instant
        events.sort_by_key(|e| (e.at, !matches!(e.event, InputEvent::TestNoteOff { .. })));
        events
    }

    /// Starts playing the sequence at `now`.
    pub fn start(&self, now: Instant) -> Playback {
        Playback {
            started: now,
            events: self.events(),
            next: 0,
        }
    }
}

/// A sequence being played: hands out its events as they fall due.
#[derive(Clone, Debug, PartialEq)]
pub struct Playback {
    started: Instant,
    events: Vec<ScheduledEvent>,
    next: usize,
}

impl Playback {
    /// When the next pending event falls due, or `None` once every event has been handed out.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.events.get(self.next).map(|e| self.started + e.at)
    }

    /// Takes every pending event due at or before `now`, in order.
    pub fn due(&mut self, now: Instant) -> Vec<InputEvent> {
        let pending = &self.events[self.next..];
        let count = pending
            .iter()
            .take_while(|e| self.started + e.at <= now)
            .count();
        self.next += count;
        pending[..count].iter().map(|e| e.event).collect()
    }

    /// Returns `true` once every event has been handed out.
    pub fn is_finished(&self) -> bool {
        self.next >= self.events.len()
    }
}
