use num_derive::{FromPrimitive, ToPrimitive};

/// The voice requested from the audio engine.
#[derive(Debug, Default, Clone, Copy, ToPrimitive, FromPrimitive, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InstrumentType {
    /// Pure sine oscillator.
    Sine,
    /// Square oscillator.
    Square,
    /// Sawtooth oscillator.
    Sawtooth,
    /// Triangle oscillator.
    #[default]
    Triangle,
}

impl InstrumentType {
    /// The name handed to the audio engine and written to the settings store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sine => "sine",
            Self::Square => "square",
            Self::Sawtooth => "sawtooth",
            Self::Triangle => "triangle",
        }
    }

    /// Parses an instrument name; names the audio engine doesn't offer are rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "sine" => Some(Self::Sine),
            "square" => Some(Self::Square),
            "sawtooth" => Some(Self::Sawtooth),
            "triangle" => Some(Self::Triangle),
            _ => None,
        }
    }
}

impl super::CycleConfig for InstrumentType {}
