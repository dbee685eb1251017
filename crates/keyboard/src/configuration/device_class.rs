use num_derive::{FromPrimitive, ToPrimitive};

/// The layout family chosen from the width of the viewport.
#[derive(Debug, Clone, Copy, ToPrimitive, FromPrimitive, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceClass {
    /// Narrow screens (phones): five stacked single-octave tiers.
    Compact,
    /// Everything else: two wide tiers.
    Desktop,
}

impl DeviceClass {
    /// Classifies a viewport; widths up to and including `compact_max_width` are compact.
    pub fn for_width(width: u32, compact_max_width: u32) -> Self {
        if width <= compact_max_width {
            Self::Compact
        } else {
            Self::Desktop
        }
    }
}
