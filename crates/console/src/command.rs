//! Parses console input lines into [`Command`]s.

use pianokeys_lib::{
    arbitration::PointerId,
    configuration::{DesktopRange, InstrumentType},
    midi::ChannelFilter,
};
use wmidi::Note;

/// Help text listing every command.
pub const HELP: &str = "\
commands:
  unlock                       unlock pointer input
  down <ptr> <slot> <note>     pointer goes down on a key
  move <ptr> <slot> <note>     pointer moves onto a key
  move <ptr> off               pointer slides off the keys
  up <ptr> | cancel <ptr>      pointer is lifted or cancelled
  on <note> [velocity]         MIDI note on (velocity 0-127, default 108)
  off <note>                   MIDI note off
  midi <hex bytes>             raw MIDI message, e.g. `midi 90 3c 64`
  channel all|<1-16>           MIDI channel filter
  panic | hide                 all notes off | keyboard hidden
  resize <width>               viewport width in pixels
  test                         play the test sequence
  range c4c6|c3c5|next         desktop range
  octave <-1|0|1>              desktop octave shift
  tone <name>|next             instrument type
  volume <0-1> | mute          master volume
  height <px>                  key height
  show | held | help | quit";

const DEFAULT_VELOCITY: u8 = 108;

/// A console request.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Unlock,
    PointerDown {
        pointer: PointerId,
        slot: usize,
        note: Note,
    },
    PointerMove {
        pointer: PointerId,
        target: Option<(usize, Note)>,
    },
    PointerUp(PointerId),
    PointerCancel(PointerId),
    NoteOn {
        note: Note,
        velocity: u8,
    },
    NoteOff(Note),
    Midi(Vec<u8>),
    Channel(ChannelFilter),
    Panic,
    Hide,
    Resize(u32),
    Test,
    Range(Option<DesktopRange>),
    Octave(i32),
    Tone(Option<InstrumentType>),
    Volume(f32),
    Mute,
    Height(f32),
    Show,
    Held,
    Help,
    Quit,
}

/// Why a line couldn't be parsed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

/// Parses one line. Blank lines yield `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match (word, args.as_slice()) {
        ("unlock", []) => Command::Unlock,
        ("down", [pointer, slot, note]) => Command::PointerDown {
            pointer: pointer_id(pointer).ok_or(ParseError::Usage("down <ptr> <slot> <note>"))?,
            slot: slot.parse().map_err(|_| ParseError::Usage("down <ptr> <slot> <note>"))?,
            note: parse_note(note).ok_or(ParseError::Usage("down <ptr> <slot> <note>"))?,
        },
        ("move", [pointer, "off"]) => Command::PointerMove {
            pointer: pointer_id(pointer).ok_or(ParseError::Usage("move <ptr> off"))?,
            target: None,
        },
        ("move", [pointer, slot, note]) => {
            let usage = ParseError::Usage("move <ptr> <slot> <note>");
            Command::PointerMove {
                pointer: pointer_id(pointer).ok_or(usage.clone())?,
                target: Some((
                    slot.parse().map_err(|_| usage.clone())?,
                    parse_note(note).ok_or(usage)?,
                )),
            }
        }
        ("up", [pointer]) => Command::PointerUp(pointer_id(pointer).ok_or(ParseError::Usage("up <ptr>"))?),
        ("cancel", [pointer]) => {
            Command::PointerCancel(pointer_id(pointer).ok_or(ParseError::Usage("cancel <ptr>"))?)
        }
        ("on", [note]) => Command::NoteOn {
            note: parse_note(note).ok_or(ParseError::Usage("on <note> [velocity]"))?,
            velocity: DEFAULT_VELOCITY,
        },
        ("on", [note, velocity]) => Command::NoteOn {
            note: parse_note(note).ok_or(ParseError::Usage("on <note> [velocity]"))?,
            velocity: velocity
                .parse()
                .ok()
                .filter(|v| *v <= 127)
                .ok_or(ParseError::Usage("on <note> [velocity]"))?,
        },
        ("off", [note]) => Command::NoteOff(parse_note(note).ok_or(ParseError::Usage("off <note>"))?),
        ("midi", bytes) if !bytes.is_empty() => Command::Midi(
            bytes
                .iter()
                .map(|b| u8::from_str_radix(b, 16))
                .collect::<Result<_, _>>()
                .map_err(|_| ParseError::Usage("midi <hex bytes>"))?,
        ),
        ("channel", [filter]) => {
            Command::Channel(ChannelFilter::parse(filter).ok_or(ParseError::Usage("channel all|<1-16>"))?)
        }
        ("panic", []) => Command::Panic,
        ("hide", []) => Command::Hide,
        ("resize", [width]) => Command::Resize(width.parse().map_err(|_| ParseError::Usage("resize <width>"))?),
        ("test", []) => Command::Test,
        ("range", ["next"]) => Command::Range(None),
        ("range", [range]) => Command::Range(Some(
            DesktopRange::parse(range).ok_or(ParseError::Usage("range c4c6|c3c5|next"))?,
        )),
        ("octave", [shift]) => Command::Octave(shift.parse().map_err(|_| ParseError::Usage("octave <-1|0|1>"))?),
        ("tone", ["next"]) => Command::Tone(None),
        ("tone", [name]) => Command::Tone(Some(
            InstrumentType::parse(name).ok_or(ParseError::Usage("tone sine|square|sawtooth|triangle|next"))?,
        )),
        ("volume", [level]) => Command::Volume(level.parse().map_err(|_| ParseError::Usage("volume <0-1>"))?),
        ("mute", []) => Command::Mute,
        ("height", [px]) => Command::Height(px.parse().map_err(|_| ParseError::Usage("height <px>"))?),
        ("show", []) => Command::Show,
        ("held", []) => Command::Held,
        ("help", []) => Command::Help,
        ("quit" | "exit", []) => Command::Quit,
        (word, _) => return Err(ParseError::Unknown(word.to_owned())),
    };
    Ok(Some(command))
}

fn pointer_id(raw: &str) -> Option<PointerId> {
    raw.parse().ok().map(PointerId)
}

/// Parses a MIDI note number (`60`) or a note name (`C4`, `F#3`, `C-1`).
pub fn parse_note(raw: &str) -> Option<Note> {
    if let Ok(number) = raw.parse::<u8>() {
        return (number <= 127).then(|| Note::from_u8_lossy(number));
    }

    let mut chars = raw.chars();
    let pitch_class: i32 = match chars.next()?.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };
    let rest = chars.as_str();
    let (accidental, octave) = match rest.strip_prefix('#') {
        Some(octave) => (1, octave),
        None => (0, rest),
    };
    let octave: i32 = octave.parse().ok()?;
    let number = (octave + 1) * 12 + pitch_class + accidental;
    u8::try_from(number)
        .ok()
        .filter(|n| *n <= 127)
        .map(Note::from_u8_lossy)
}

#[cfg(test)]
mod tests {
    use super::*;

    mod notes {
        use super::*;

        #[test]
        fn numbers_and_names() {
            assert_eq!(Some(Note::C4), parse_note("60"));
            assert_eq!(Some(Note::C4), parse_note("C4"));
            assert_eq!(Some(Note::C4), parse_note("c4"));
            assert_eq!(Some(Note::Gb3), parse_note("F#3"));
            assert_eq!(Some(Note::CMinus1), parse_note("C-1"));
            assert_eq!(Some(Note::G9), parse_note("G9"));
        }

        #[test]
        fn out_of_domain() {
            assert_eq!(None, parse_note("128"));
            assert_eq!(None, parse_note("G#9"));
            assert_eq!(None, parse_note("H2"));
            assert_eq!(None, parse_note(""));
        }
    }

    mod lines {
        use super::*;

        #[test]
        fn blank() {
            assert_eq!(Ok(None), parse("   "));
        }

        #[test]
        fn pointer_gestures() {
            assert_eq!(
                Ok(Some(Command::PointerDown {
                    pointer: PointerId(1),
                    slot: 1,
                    note: Note::C4
                })),
                parse("down 1 1 C4"),
                "Expected left but got right"
            );
            assert_eq!(
                Ok(Some(Command::PointerMove {
                    pointer: PointerId(1),
                    target: Some((1, Note::D4))
                })),
                parse("move 1 1 62")
            );
            assert_eq!(
                Ok(Some(Command::PointerMove {
                    pointer: PointerId(1),
                    target: None
                })),
                parse("move 1 off")
            );
            assert_eq!(Ok(Some(Command::PointerCancel(PointerId(4)))), parse("cancel 4"));
        }

        #[test]
        fn midi() {
            assert_eq!(
                Ok(Some(Command::NoteOn {
                    note: Note::E4,
                    velocity: DEFAULT_VELOCITY
                })),
                parse("on E4")
            );
            assert_eq!(
                Ok(Some(Command::NoteOn {
                    note: Note::E4,
                    velocity: 20
                })),
                parse("on 64 20")
            );
            assert!(parse("on 64 200").is_err());
            assert_eq!(Ok(Some(Command::Midi(vec![0x90, 0x3c, 0x64]))), parse("midi 90 3c 64"));
            assert!(parse("midi zz").is_err());
        }

        #[test]
        fn settings() {
            assert_eq!(Ok(Some(Command::Range(Some(DesktopRange::C3C5)))), parse("range c3c5"));
            assert_eq!(Ok(Some(Command::Range(None))), parse("range next"));
            assert_eq!(Ok(Some(Command::Octave(-1))), parse("octave -1"));
            assert_eq!(Ok(Some(Command::Tone(Some(InstrumentType::Sine)))), parse("tone sine"));
            assert_eq!(Ok(Some(Command::Volume(0.5))), parse("volume 0.5"));
        }

        #[test]
        fn errors() {
            assert_eq!(Err(ParseError::Unknown("jump".into())), parse("jump"));
            assert_eq!(Err(ParseError::Usage("resize <width>")), parse("resize wide"));
            assert!(matches!(parse("down 1"), Err(ParseError::Unknown(_))));
        }

        #[test]
        fn error_messages() {
            assert_eq!(
                "unknown command `jump` (try `help`)",
                ParseError::Unknown("jump".into()).to_string(),
                "Expected left but got right"
            );
            assert_eq!("usage: up <ptr>", ParseError::Usage("up <ptr>").to_string());
        }
    }
}
