//! Interprets MIDI messages from an external controller as [`InputEvent`]s.

use crate::event::InputEvent;
use wmidi::{Channel, ControlFunction, MidiMessage, U7};

/// Which MIDI channels are listened to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChannelFilter {
    /// Messages on every channel.
    #[default]
    All,
    /// Messages on one channel only.
    Only(Channel),
}

impl ChannelFilter {
    /// Returns `true` if messages on `channel` pass the filter.
    pub fn accepts(&self, channel: Channel) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => *only == channel,
        }
    }

    /// Parses a channel selection: `all`, or a channel number from 1 to 16.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.eq_ignore_ascii_case("all") {
            return Some(Self::All);
        }
        let number: u8 = raw.parse().ok()?;
        let index = number.checked_sub(1)?;
        Channel::from_index(index).ok().map(Self::Only)
    }
}

/// Turns MIDI messages into note requests from the MIDI source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MidiInput {
    filter: ChannelFilter,
}

impl MidiInput {
    /// Constructs an interpreter listening to the channels `filter` accepts.
    pub fn new(filter: ChannelFilter) -> Self {
        Self { filter }
    }

    /// Changes which channels are listened to.
    pub fn set_filter(&mut self, filter: ChannelFilter) {
        self.filter = filter;
    }

    /// The current channel filter.
    pub fn filter(&self) -> ChannelFilter {
        self.filter
    }

    /// Interprets one message. Returns `None` for messages on filtered-out channels and for messages which don't
    /// concern the keyboard.
    ///
    /// A NoteOn with velocity 0 is a release. "All sound off" (CC 120) and "all notes off" (CC 123) are panics.
    pub fn interpret(&self, message: &MidiMessage<'_>) -> Option<InputEvent> {
        let (channel, event) = match *message {
            MidiMessage::NoteOn(channel, note, velocity) if u8::from(velocity) == 0 => {
                (channel, InputEvent::MidiNoteOff { note })
            }
            MidiMessage::NoteOn(channel, note, velocity) => (
                channel,
                InputEvent::MidiNoteOn {
                    note,
                    velocity: normalize(velocity),
                },
            ),
            MidiMessage::NoteOff(channel, note, _) => (channel, InputEvent::MidiNoteOff { note }),
            MidiMessage::ControlChange(
                channel,
                ControlFunction::ALL_SOUND_OFF | ControlFunction::ALL_NOTES_OFF,
                _,
            ) => (channel, InputEvent::MidiPanic),
            _ => return None,
        };
        if !self.filter.accepts(channel) {
            debug!("Ignoring MIDI message on channel {}", channel.number());
            return None;
        }
        Some(event)
    }

    /// Parses and interprets raw message bytes. Malformed data is logged and dropped.
    pub fn interpret_bytes(&self, bytes: &[u8]) -> Option<InputEvent> {
        match MidiMessage::from_bytes(bytes) {
            Ok(message) => self.interpret(&message),
            Err(_) => {
                error!("Dropping malformed MIDI message ({} bytes)", bytes.len());
                None
            }
        }
    }
}

fn normalize(velocity: U7) -> f32 {
    f32::from(u8::from(velocity)) / 127.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use wmidi::{ControlValue, Note, Velocity};

    fn vel(v: u8) -> Velocity {
        U7::from_u8_lossy(v)
    }

    mod messages {
        use super::*;

        #[test]
        fn note_on() {
            let midi = MidiInput::default();
            assert_eq!(
                Some(InputEvent::MidiNoteOn {
                    note: Note::C4,
                    velocity: 1.0
                }),
                midi.interpret(&MidiMessage::NoteOn(Channel::Ch1, Note::C4, vel(127))),
                "Expected left but got right"
            );
        }

        #[test]
        fn zero_velocity_note_on_is_a_release() {
            let midi = MidiInput::default();
            assert_eq!(
                Some(InputEvent::MidiNoteOff { note: Note::E4 }),
                midi.interpret(&MidiMessage::NoteOn(Channel::Ch3, Note::E4, vel(0)))
            );
        }

        #[test]
        fn note_off() {
            let midi = MidiInput::default();
            assert_eq!(
                Some(InputEvent::MidiNoteOff { note: Note::E4 }),
                midi.interpret(&MidiMessage::NoteOff(Channel::Ch1, Note::E4, vel(64)))
            );
        }

        #[test]
        fn panics() {
            let midi = MidiInput::default();
            for function in [ControlFunction::ALL_SOUND_OFF, ControlFunction::ALL_NOTES_OFF] {
                assert_eq!(
                    Some(InputEvent::MidiPanic),
                    midi.interpret(&MidiMessage::ControlChange(
                        Channel::Ch1,
                        function,
                        ControlValue::from_u8_lossy(0)
                    ))
                );
            }
        }

        #[test]
        fn unrelated_messages_are_ignored() {
            let midi = MidiInput::default();
            assert_eq!(
                None,
                midi.interpret(&MidiMessage::ControlChange(
                    Channel::Ch1,
                    ControlFunction::MODULATION_WHEEL,
                    ControlValue::from_u8_lossy(10)
                ))
            );
            assert_eq!(None, midi.interpret(&MidiMessage::TimingClock));
        }

        #[test]
        fn raw_bytes() {
            let midi = MidiInput::default();
            assert_eq!(
                Some(InputEvent::MidiNoteOff { note: Note::C4 }),
                midi.interpret_bytes(&[0x80, 60, 0])
            );
            assert_eq!(None, midi.interpret_bytes(&[0x90]));
        }
    }

    mod filter {
        use super::*;

        #[test]
        fn single_channel() {
            let midi = MidiInput::new(ChannelFilter::Only(Channel::Ch2));
            assert_eq!(
                None,
                midi.interpret(&MidiMessage::NoteOn(Channel::Ch1, Note::C4, vel(100)))
            );
            assert!(
                midi.interpret(&MidiMessage::NoteOn(Channel::Ch2, Note::C4, vel(100)))
                    .is_some()
            );
        }

        #[test]
        fn parse() {
            assert_eq!(Some(ChannelFilter::All), ChannelFilter::parse("all"));
            assert_eq!(Some(ChannelFilter::Only(Channel::Ch1)), ChannelFilter::parse("1"));
            assert_eq!(Some(ChannelFilter::Only(Channel::Ch16)), ChannelFilter::parse("16"));
            assert_eq!(None, ChannelFilter::parse("0"));
            assert_eq!(None, ChannelFilter::parse("17"));
            assert_eq!(None, ChannelFilter::parse("bass"));
        }
    }
}
