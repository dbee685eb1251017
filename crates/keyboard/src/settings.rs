//! User settings which survive restarts, and the key-value store they live in.
//!
//! Persistence is best-effort throughout. A store which can't be read leaves the defaults in place, a store which can't
//! be written is logged and otherwise ignored, and values which don't parse are dropped.

use crate::{
    configuration::{DesktopRange, InstrumentType},
    error::StoreError,
    key_height::ViewportMetrics,
};
use std::collections::HashMap;

/// Store key of the instrument type.
pub const TONE_KEY: &str = "piano:tone";
/// Store key of the master volume.
pub const VOLUME_KEY: &str = "piano:volume";
/// Store key of the key height. Historically a scale factor, now pixels.
pub const KEY_HEIGHT_KEY: &str = "piano:key-height-scale";
/// Store key of the desktop range selection.
pub const DESKTOP_RANGE_KEY: &str = "piano:desktop-range";

/// Master volume used when none has been stored.
pub const DEFAULT_VOLUME: f32 = 0.8;

/// A string key-value store.
pub trait SettingsStore {
    /// Reads the value stored under `key`, if any.
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes `value` under `key`, replacing what was there.
    fn store(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<T: SettingsStore + ?Sized> SettingsStore for &mut T {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).load(key)
    }

    fn store(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).store(key, value)
    }
}

/// A [`SettingsStore`] which lives only as long as the process.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    /// Constructs an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a store pre-filled with `values`.
    pub fn with_values<'a>(values: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect(),
        }
    }

    /// Reads a value without going through the fallible [`SettingsStore`] interface.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn store(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// The persisted user settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Settings {
    /// The voice played by the audio engine.
    pub instrument: InstrumentType,
    /// Master volume, `0.0..=1.0`.
    pub volume: f32,
    /// Key row height in whole pixels.
    pub key_height: f32,
    /// Which pair of ranges the desktop tiers show.
    pub desktop_range: DesktopRange,
}

impl Settings {
    /// The settings used when nothing has been stored: a key height of one base height, within the viewport's bounds.
    pub fn defaults(metrics: &ViewportMetrics) -> Self {
        Self {
            instrument: InstrumentType::default(),
            volume: DEFAULT_VOLUME,
            key_height: metrics.clamp_key_height(metrics.base_key_height()),
            desktop_range: DesktopRange::default(),
        }
    }

    /// Reads every setting from `store`, keeping the default for each one which is missing, malformed or unreadable.
    pub fn restore<S: SettingsStore + ?Sized>(store: &S, metrics: &ViewportMetrics) -> Self {
        let mut settings = Self::defaults(metrics);

        if let Some(instrument) = load(store, TONE_KEY).and_then(|raw| InstrumentType::parse(&raw)) {
            settings.instrument = instrument;
        }
        if let Some(volume) = load(store, VOLUME_KEY).and_then(|raw| parse_number(&raw)) {
            settings.volume = volume.clamp(0.0, 1.0);
        }
        if let Some(px) = load(store, KEY_HEIGHT_KEY)
            .and_then(|raw| parse_number(&raw))
            .and_then(|stored| metrics.from_stored(stored))
        {
            settings.key_height = px;
        }
        if let Some(range) = load(store, DESKTOP_RANGE_KEY).and_then(|raw| DesktopRange::parse(&raw)) {
            settings.desktop_range = range;
        }

        debug!(
            "Restored settings: tone={} volume={} key_height={} range={}",
            settings.instrument.as_str(),
            settings.volume,
            settings.key_height,
            settings.desktop_range.as_str()
        );
        settings
    }

    /// Writes every setting to `store`.
    pub fn persist<S: SettingsStore + ?Sized>(&self, store: &mut S) {
        self.persist_instrument(store);
        self.persist_volume(store);
        self.persist_key_height(store);
        self.persist_desktop_range(store);
    }

    /// Writes the instrument type to `store`.
    pub fn persist_instrument<S: SettingsStore + ?Sized>(&self, store: &mut S) {
        save(store, TONE_KEY, self.instrument.as_str());
    }

    /// Writes the master volume to `store`.
    pub fn persist_volume<S: SettingsStore + ?Sized>(&self, store: &mut S) {
        save(store, VOLUME_KEY, &self.volume.to_string());
    }

    /// Writes the key height to `store`, rounded to whole pixels.
    pub fn persist_key_height<S: SettingsStore + ?Sized>(&self, store: &mut S) {
        save(store, KEY_HEIGHT_KEY, &format!("{:.0}", self.key_height));
    }

    /// Writes the desktop range selection to `store`.
    pub fn persist_desktop_range<S: SettingsStore + ?Sized>(&self, store: &mut S) {
        save(store, DESKTOP_RANGE_KEY, self.desktop_range.as_str());
    }
}

fn load<S: SettingsStore + ?Sized>(store: &S, key: &str) -> Option<String> {
    match store.load(key) {
        Ok(value) => value,
        Err(e) => {
            warn!("Could not read {}: {}", key, e);
            None
        }
    }
}

fn save<S: SettingsStore + ?Sized>(store: &mut S, key: &str, value: &str) {
    if let Err(e) = store.store(key, value) {
        warn!("Could not write {}: {}", key, e);
    }
}

fn parse_number(raw: &str) -> Option<f32> {
    raw.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}

/// A [`SettingsStore`] which refuses every request, for tests.
#[cfg(test)]
pub(crate) mod failing {
    use super::*;

    #[derive(Default)]
    pub struct FailingStore;

    impl SettingsStore for FailingStore {
        fn load(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError("storage disabled".into()))
        }

        fn store(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError("storage disabled".into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{failing::FailingStore, *};

    fn metrics() -> ViewportMetrics {
        ViewportMetrics {
            height: 800.0,
            space_y: 20.0,
            floating_btn_top: 16.0,
            floating_btn_size: 44.0,
            key_gap: 4.0,
        }
    }

    mod restore {
        use super::*;

        #[test]
        fn empty_store_gives_defaults() {
            let settings = Settings::restore(&MemoryStore::new(), &metrics());
            assert_eq!(Settings::defaults(&metrics()), settings, "Expected left but got right");
            assert_eq!(InstrumentType::Triangle, settings.instrument);
            // base height 76 clamped to the 66 px maximum
            assert_eq!(66.0, settings.key_height);
        }

        #[test]
        fn valid_values() {
            let store = MemoryStore::with_values([
                (TONE_KEY, "square"),
                (VOLUME_KEY, "0.25"),
                (KEY_HEIGHT_KEY, "44"),
                (DESKTOP_RANGE_KEY, "c3c5"),
            ]);
            assert_eq!(
                Settings {
                    instrument: InstrumentType::Square,
                    volume: 0.25,
                    key_height: 44.0,
                    desktop_range: DesktopRange::C3C5,
                },
                Settings::restore(&store, &metrics())
            );
        }

        #[test]
        fn invalid_values_fall_back() {
            let store = MemoryStore::with_values([
                (TONE_KEY, "organ"),
                (VOLUME_KEY, "loud"),
                (KEY_HEIGHT_KEY, "-2"),
                (DESKTOP_RANGE_KEY, "c2c4"),
            ]);
            assert_eq!(Settings::defaults(&metrics()), Settings::restore(&store, &metrics()));
        }

        #[test]
        fn volume_is_clamped() {
            let store = MemoryStore::with_values([(VOLUME_KEY, "3")]);
            assert_eq!(1.0, Settings::restore(&store, &metrics()).volume);
            let store = MemoryStore::with_values([(VOLUME_KEY, "-1")]);
            assert_eq!(0.0, Settings::restore(&store, &metrics()).volume);
        }

        #[test]
        fn legacy_key_height_scale() {
            let store = MemoryStore::with_values([(KEY_HEIGHT_KEY, "0.5")]);
            assert_eq!(38.0, Settings::restore(&store, &metrics()).key_height);
        }

        #[test]
        fn unreadable_store_gives_defaults() {
            assert_eq!(
                Settings::defaults(&metrics()),
                Settings::restore(&FailingStore, &metrics())
            );
        }
    }

    mod persist {
        use super::*;

        #[test]
        fn writes_every_key() {
            let mut store = MemoryStore::new();
            let settings = Settings {
                instrument: InstrumentType::Sine,
                volume: 0.5,
                key_height: 41.6,
                desktop_range: DesktopRange::C3C5,
            };
            settings.persist(&mut store);

            assert_eq!(Some("sine"), store.get(TONE_KEY));
            assert_eq!(Some("0.5"), store.get(VOLUME_KEY));
            assert_eq!(Some("42"), store.get(KEY_HEIGHT_KEY));
            assert_eq!(Some("c3c5"), store.get(DESKTOP_RANGE_KEY));
            assert_eq!(settings.instrument, Settings::restore(&store, &metrics()).instrument);
        }

        #[test]
        fn unwritable_store_is_ignored() {
            Settings::defaults(&metrics()).persist(&mut FailingStore);
        }
    }
}
