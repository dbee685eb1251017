//! Identifiers for the independent origins of note requests.

use core::fmt;

/// Identifies one pointer gesture (a finger, pen or mouse button) for as long as it stays down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PointerId(pub u32);

/// An origin of note requests.
///
/// Two requests with the same `SourceId` come from the same source: a source holding a note can't hold it twice, and only
/// that source's release counts against its hold.
///
/// The [`Default`] implementation exists because [`tinyvec`] requires it of stored items; it carries no meaning.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SourceId {
    /// An external MIDI controller. All MIDI input shares this one source.
    #[default]
    Midi,
    /// A pointer gesture on the on-screen keys.
    Pointer(PointerId),
    /// The built-in test sequence.
    Test,
}

impl SourceId {
    /// Short tag used when logging, which doesn't distinguish between pointers.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Midi => "midi",
            Self::Pointer(_) => "ptr",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pointer(PointerId(id)) => write!(f, "ptr:{id}"),
            _ => f.write_str(self.tag()),
        }
    }
}
