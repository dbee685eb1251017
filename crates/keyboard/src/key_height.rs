//! Sizing of the key rows.
//!
//! The key height is user-adjustable within bounds derived from the viewport, so that five tiers always fit between the
//! top spacing and the floating controls. Older settings stored the height as a scale factor of a computed base height
//! instead of in pixels; both forms are accepted when restoring.

/// Smallest height a key row may be given, in pixels.
pub const MIN_KEY_HEIGHT: f32 = 30.0;

/// Stored values up to this are legacy scale factors rather than pixels.
pub const LEGACY_SCALE_LIMIT: f32 = 10.0;

const TIERS: f32 = 5.0;
const ROWS_PER_TIER: f32 = 2.0;

/// The viewport measurements key sizing depends on, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportMetrics {
    /// Height of the viewport.
    pub height: f32,
    /// Vertical spacing above and below the keyboard.
    pub space_y: f32,
    /// Distance from the top of the viewport to the floating controls.
    pub floating_btn_top: f32,
    /// Height of the floating controls.
    pub floating_btn_size: f32,
    /// Gap between neighbouring key rows.
    pub key_gap: f32,
}

impl ViewportMetrics {
    /// The height a key row takes at a scale factor of 1.
    pub fn base_key_height(&self) -> f32 {
        ((self.height / 2.0 - self.space_y) / TIERS).max(1.0)
    }

    /// Inclusive bounds on the key height. The upper bound never drops below the lower one.
    pub fn key_height_bounds(&self) -> (f32, f32) {
        let area = (self.height
            - 2.0 * self.space_y
            - self.floating_btn_top
            - self.floating_btn_size)
            .max(0.0);
        let fit = ((area - TIERS * ROWS_PER_TIER * self.key_gap) / (TIERS * ROWS_PER_TIER)).floor();
        (MIN_KEY_HEIGHT, fit.max(MIN_KEY_HEIGHT))
    }

    /// Clamps a requested height to the bounds and snaps it to whole pixels.
    pub fn clamp_key_height(&self, px: f32) -> f32 {
        let (min, max) = self.key_height_bounds();
        px.clamp(min, max).round()
    }

    /// Interprets a stored key height: values up to [`LEGACY_SCALE_LIMIT`] are scale factors of the base height, larger
    /// ones pixels. Zero, negative and non-finite values are rejected.
    pub fn from_stored(&self, stored: f32) -> Option<f32> {
        if !stored.is_finite() || stored <= 0.0 {
            return None;
        }
        let px = if stored <= LEGACY_SCALE_LIMIT {
            stored * self.base_key_height()
        } else {
            stored
        };
        Some(self.clamp_key_height(px))
    }

    /// The scale factor the view applies for a height of `px`.
    pub fn scale_for(&self, px: f32) -> f32 {
        px / self.base_key_height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phone() -> ViewportMetrics {
        ViewportMetrics {
            height: 800.0,
            space_y: 20.0,
            floating_btn_top: 16.0,
            floating_btn_size: 44.0,
            key_gap: 4.0,
        }
    }

    mod bounds {
        use super::*;

        #[test]
        fn base_height() {
            // (400 - 20) / 5
            assert_eq!(76.0, phone().base_key_height(), "Expected left but got right");
        }

        #[test]
        fn base_height_never_below_one() {
            let tiny = ViewportMetrics {
                height: 10.0,
                space_y: 20.0,
                ..ViewportMetrics::default()
            };
            assert_eq!(1.0, tiny.base_key_height());
        }

        #[test]
        fn upper_bound_fits_five_tiers() {
            // area = 800 - 40 - 16 - 44 = 700; (700 - 40) / 10 = 66
            assert_eq!((30.0, 66.0), phone().key_height_bounds());
        }

        #[test]
        fn upper_bound_never_below_lower() {
            let short = ViewportMetrics {
                height: 100.0,
                ..phone()
            };
            assert_eq!((30.0, 30.0), short.key_height_bounds());
        }
    }

    mod conversion {
        use super::*;

        #[test]
        fn clamps_and_snaps() {
            let metrics = phone();
            assert_eq!(30.0, metrics.clamp_key_height(5.0));
            assert_eq!(66.0, metrics.clamp_key_height(500.0));
            assert_eq!(48.0, metrics.clamp_key_height(47.6));
        }

        #[test]
        fn legacy_scale_factor() {
            // 0.5 * 76 = 38
            assert_eq!(Some(38.0), phone().from_stored(0.5));
            // 10 is still a scale factor: 760 px, clamped
            assert_eq!(Some(66.0), phone().from_stored(10.0));
        }

        #[test]
        fn pixels() {
            assert_eq!(Some(42.0), phone().from_stored(42.0));
            assert_eq!(Some(66.0), phone().from_stored(120.0));
        }

        #[test]
        fn rejects_nonsense() {
            assert_eq!(None, phone().from_stored(0.0));
            assert_eq!(None, phone().from_stored(-3.0));
            assert_eq!(None, phone().from_stored(f32::NAN));
            assert_eq!(None, phone().from_stored(f32::INFINITY));
        }

        #[test]
        fn scale() {
            assert_eq!(0.5, phone().scale_for(38.0));
        }
    }
}
