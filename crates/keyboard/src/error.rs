//! Error types for the keyboard engine.
//!
//! Very little in the engine can fail: unmatched releases and input received before the keyboard is unlocked are
//! ignored rather than reported. What remains are collaborator failures and bindings missing at construction time.

use thiserror::Error;

/// Errors surfaced by the [`Engine`](crate::engine::Engine).
#[derive(Error, Debug)]
pub enum Error {
    /// The audio engine could not be brought to a state in which it produces sound.
    #[error(transparent)]
    Audio(#[from] AudioError),

    /// The view bound fewer display slots than the configuration needs.
    #[error("keyboard needs {required} display slots but only {available} are bound")]
    MissingSlots {
        /// Slots needed to show every tier of either device class.
        required: usize,
        /// Slots actually bound by the view.
        available: usize,
    },

    /// Reading from or writing to the settings store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Raised by an [`AudioEngine`](crate::audio::AudioEngine) which cannot produce sound (e.g., because the platform
/// refuses to start audio output before a user gesture).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("audio output unavailable: {0}")]
pub struct AudioError(pub String);

/// Raised by a [`SettingsStore`](crate::settings::SettingsStore) which cannot be read or written.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("settings store unavailable: {0}")]
pub struct StoreError(pub String);

/// Shorthand for results carrying the engine's [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
