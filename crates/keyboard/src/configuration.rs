//! User-selectable keyboard settings (implemented as enums), the static [`KeyboardConfig`], and a trait to make the enums
//! easier to step through from a single control.

mod desktop_range;
pub use desktop_range::*;

mod device_class;
pub use device_class::*;

mod instrument_type;
pub use instrument_type::*;

mod keyboard;
pub use keyboard::*;

mod octave_shift;
pub use octave_shift::*;

use num_traits::{FromPrimitive, ToPrimitive};

/// Steps an enum through its variants in declaration order, so one control can reach every setting.
pub trait CycleConfig: Copy + FromPrimitive + ToPrimitive {
    /// Returns the next variant, wrapping around after the last one.
    fn cycle(self) -> Self {
        self.to_u8()
            .and_then(|index| Self::from_u8(index.wrapping_add(1)))
            .or_else(|| Self::from_u8(0))
            .unwrap_or(self)
    }
}
