//! Text rendering of the keys on screen.

use core::fmt::Write as _;
use pianokeys_lib::{
    keyboard::{Keyboard, Slot},
    layout::KeyDescriptor,
};

/// Renders every display slot, one block per slot. Sounding keys are wrapped in `[]`, and edge Cs marked with `|`.
pub fn render(keys: &Keyboard) -> String {
    let mut out = String::new();
    for (index, slot) in keys.slots().iter().enumerate() {
        match slot {
            Slot::Hidden => {
                let _ = writeln!(out, "slot {index}: hidden");
            }
            Slot::Tier(tier) => {
                let _ = writeln!(out, "slot {index}: {}", tier.range());
                let row = |descriptors: &[KeyDescriptor]| -> String {
                    descriptors
                        .iter()
                        .map(|d| {
                            let sounding = keys
                                .find(index, d.note())
                                .and_then(|handle| keys.key(handle))
                                .is_some_and(|key| key.is_sounding());
                            let label = if d.is_edge_c() {
                                format!("{}|", d.label())
                            } else {
                                d.label().to_string()
                            };
                            if sounding { format!("[{label}]") } else { label }
                        })
                        .collect::<Vec<_>>()
                        .join(" ")
                };
                let _ = writeln!(out, "  black: {}", row(tier.black_keys()));
                let _ = writeln!(out, "  white: {}", row(tier.white_keys()));
            }
        }
    }
    out
}
