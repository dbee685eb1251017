//! This crate contains the platform-agnostic core of a virtual piano keyboard: a grid of keys spanning a configurable
//! range of [MIDI](https://midi.org/midi-1-0) notes, playable with pointer gestures or an external MIDI controller.
//!
//! Two concerns make up most of it. The first is note arbitration: several independent sources may hold the same note at
//! once, and the [`NoteArbitrator`](arbitration::NoteArbitrator) makes sure the audio backend hears exactly one start and
//! one stop per note regardless of how their presses and releases interleave. The second is layout: turning a note range
//! into correctly placed white and black keys, and keeping the keys on screen consistent as the viewport changes between
//! compact and desktop layouts.
//!
//! The [`Engine`](engine::Engine) owns all of it and is driven by typed [`InputEvent`](event::InputEvent)s.

#![deny(missing_docs)]

// must come first so the logging macros are visible to every other module
mod fmt;

pub mod arbitration;
pub mod audio;
pub mod configuration;
pub mod engine;
pub mod error;
pub mod event;
pub mod key_height;
pub mod keyboard;
pub mod layout;
pub mod midi;
pub mod note;
pub mod pointer;
pub mod range;
pub mod sequence;
pub mod settings;
pub mod tiers;
pub mod viewport;
