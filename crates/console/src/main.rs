//! A headless host for the virtual piano keyboard.
//!
//! Lines typed on standard input stand in for the view layer and the MIDI service: they become pointer gestures, MIDI
//! messages and settings changes, which are queued for a single task owning the [`Engine`]. Layout refreshes and the test
//! sequence run in tasks of their own and queue their events the same way, so the engine only ever has one writer.
//!
//! Set `RUST_LOG=debug` to see ignored input, or `RUST_LOG=trace` to see every request reaching the audio engine.

mod audio;
mod command;
mod view;

use crate::{
    audio::LoggingAudio,
    command::{Command, HELP},
};
use embassy_executor::Spawner;
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel::Channel, signal::Signal};
use embassy_time::{Duration, Instant, Timer};
use log::{error, info, warn};
use pianokeys_lib::{
    configuration::{CycleConfig, KeyboardConfig},
    engine::Engine,
    event::InputEvent,
    key_height::ViewportMetrics,
    midi::MidiInput,
    note::NoteLabel,
    sequence::TestSequence,
    settings::MemoryStore,
};
use static_cell::StaticCell;
use wmidi::{Channel as MidiChannel, MidiMessage, U7};

type ConsoleEngine = Engine<LoggingAudio, MemoryStore>;

/// Display slots bound by the console view; enough for the compact layout.
const SLOTS: usize = 5;
const INITIAL_WIDTH: u32 = 1024;
/// Delay standing in for one rendered frame between layout passes.
const FRAME: Duration = Duration::from_millis(16);
const REQUEST_QUEUE_DEPTH: usize = 32;

/// Work for the task owning the engine.
#[derive(Debug)]
enum Request {
    Command(Command),
    Input(InputEvent),
    Layout(u32),
}

/// The single queue into the engine.
static REQUESTS: Channel<CriticalSectionRawMutex, Request, REQUEST_QUEUE_DEPTH> = Channel::new();

/// Notifies the viewport width whose layout should be refreshed.
static LAYOUT_REQUEST: Signal<CriticalSectionRawMutex, u32> = Signal::new();

/// Starts the test sequence.
static TEST_TRIGGER: Signal<CriticalSectionRawMutex, ()> = Signal::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("Initializing virtual piano keyboard");

    let metrics = ViewportMetrics {
        height: 800.0,
        space_y: 16.0,
        floating_btn_top: 12.0,
        floating_btn_size: 44.0,
        key_gap: 4.0,
    };
    let engine = match Engine::new(
        LoggingAudio::default(),
        MemoryStore::new(),
        KeyboardConfig::default(),
        SLOTS,
        INITIAL_WIDTH,
        metrics,
    ) {
        Ok(engine) => engine,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    static ENGINE: StaticCell<ConsoleEngine> = StaticCell::new();
    let engine = ENGINE.init(engine);

    spawner
        .spawn(dispatcher(engine))
        .expect("dispatcher task should spawn");
    spawner
        .spawn(layout_refresh())
        .expect("layout task should spawn");
    spawner
        .spawn(test_sequence())
        .expect("test sequence task should spawn");

    std::thread::spawn(read_stdin);
    println!("{HELP}");
}

/// Task owning the engine. Applies queued requests one at a time.
#[embassy_executor::task]
async fn dispatcher(engine: &'static mut ConsoleEngine) {
    let mut midi = MidiInput::default();
    loop {
        match REQUESTS.receive().await {
            Request::Input(event) => engine.dispatch(event),
            Request::Layout(width) => engine.dispatch(InputEvent::ViewportChanged { width }),
            Request::Command(command) => execute(engine, &mut midi, command),
        }
    }
}

/// Task running the two layout passes requested by a resize, one frame apart, so the second sees the viewport after
/// the first has settled.
#[embassy_executor::task]
async fn layout_refresh() -> ! {
    loop {
        let width = LAYOUT_REQUEST.wait().await;
        for _ in 0..2 {
            Timer::after(FRAME).await;
            REQUESTS.send(Request::Layout(width)).await;
        }
    }
}

/// Task playing the test sequence each time it is triggered.
#[embassy_executor::task]
async fn test_sequence() -> ! {
    let sequence = TestSequence::default();
    loop {
        TEST_TRIGGER.wait().await;
        let mut playback = sequence.start(Instant::now());
        while let Some(deadline) = playback.next_deadline() {
            Timer::at(deadline).await;
            for event in playback.due(Instant::now()) {
                REQUESTS.send(Request::Input(event)).await;
            }
        }
    }
}

/// Reads commands from standard input on a thread of its own, since reading blocks.
fn read_stdin() {
    for line in std::io::stdin().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("Could not read standard input: {e}");
                break;
            }
        };
        match command::parse(&line) {
            Ok(Some(command)) => embassy_futures::block_on(REQUESTS.send(Request::Command(command))),
            Ok(None) => {}
            Err(e) => println!("{e}"),
        }
    }
    embassy_futures::block_on(REQUESTS.send(Request::Command(Command::Quit)));
}

/// The console's answer to an `unlock` command.
fn unlock_report(result: pianokeys_lib::error::Result<()>) -> String {
    match result {
        Ok(()) => "unlocked".to_owned(),
        Err(e) => format!("could not unlock: {e}"),
    }
}

fn execute(engine: &mut ConsoleEngine, midi: &mut MidiInput, command: Command) {
    match command {
        Command::Unlock => println!("{}", unlock_report(engine.unlock())),
        Command::PointerDown {
            pointer,
            slot,
            note,
        } => match engine.keyboard().find(slot, note) {
            Some(key) => engine.dispatch(InputEvent::PointerDown { pointer, key }),
            None => warn!("Slot {slot} shows no {}", NoteLabel::new(note)),
        },
        Command::PointerMove { pointer, target } => {
            let key = target.and_then(|(slot, note)| engine.keyboard().find(slot, note));
            engine.dispatch(InputEvent::PointerMove { pointer, key });
        }
        Command::PointerUp(pointer) => engine.dispatch(InputEvent::PointerUp { pointer }),
        Command::PointerCancel(pointer) => engine.dispatch(InputEvent::PointerCancel { pointer }),
        Command::NoteOn { note, velocity } => {
            let message = MidiMessage::NoteOn(MidiChannel::Ch1, note, U7::from_u8_lossy(velocity));
            if let Some(event) = midi.interpret(&message) {
                engine.dispatch(event);
            }
        }
        Command::NoteOff(note) => {
            let message = MidiMessage::NoteOff(MidiChannel::Ch1, note, U7::from_u8_lossy(0));
            if let Some(event) = midi.interpret(&message) {
                engine.dispatch(event);
            }
        }
        Command::Midi(bytes) => {
            if let Some(event) = midi.interpret_bytes(&bytes) {
                engine.dispatch(event);
            }
        }
        Command::Channel(filter) => {
            midi.set_filter(filter);
            info!("MIDI channel filter {filter:?}");
        }
        Command::Panic => engine.dispatch(InputEvent::Panic),
        Command::Hide => engine.dispatch(InputEvent::VisibilityLost),
        Command::Resize(width) => LAYOUT_REQUEST.signal(width),
        Command::Test => {
            if engine.prepare_audio().is_ok() {
                TEST_TRIGGER.signal(());
            }
        }
        Command::Range(range) => {
            let range = range.unwrap_or_else(|| engine.settings().desktop_range.cycle());
            engine.set_desktop_range(range);
        }
        Command::Octave(octaves) => engine.set_octave_shift(octaves),
        Command::Tone(instrument) => {
            let instrument = instrument.unwrap_or_else(|| engine.settings().instrument.cycle());
            engine.set_instrument(instrument);
        }
        Command::Volume(level) => engine.set_volume(level),
        Command::Mute => engine.toggle_mute(),
        Command::Height(px) => {
            let applied = engine.set_key_height(px);
            println!("key height {applied} px (scale {:.2})", engine.key_height_scale());
        }
        Command::Show => print!("{}", view::render(engine.keyboard())),
        Command::Held => {
            let held = engine.held_notes();
            if held.is_empty() {
                println!("-");
            } else {
                let labels: Vec<String> = held.iter().map(ToString::to_string).collect();
                println!("{}", labels.join(" "));
            }
        }
        Command::Help => println!("{HELP}"),
        Command::Quit => {
            engine.dispatch(InputEvent::Panic);
            info!("Bye");
            std::process::exit(0);
        }
    }
}
