//! An arena of the key visuals currently on screen, addressed by [`KeyHandle`]s.
//!
//! The view never hands the engine its own widgets. Instead, every key built by the layout gets a record in the arena,
//! and the view refers to keys through opaque handles. A rebuild replaces the whole arena and bumps its generation, so
//! a handle kept from before the rebuild (say, by a pointer still hovering over a key that no longer exists) simply
//! fails to resolve instead of dangling.

use crate::layout::{KeyDescriptor, TierLayout};
use wmidi::Note;

/// Opaque reference from the view to one key visual.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyHandle {
    generation: u32,
    index: u32,
}

/// A key on screen: its layout, the display slot it sits in, and whether it is sounding.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyVisual {
    descriptor: KeyDescriptor,
    slot: usize,
    sounding: bool,
}

impl KeyVisual {
    /// How the key is drawn.
    pub fn descriptor(&self) -> &KeyDescriptor {
        &self.descriptor
    }

    /// The note the key is bound to.
    pub fn note(&self) -> Note {
        self.descriptor.note()
    }

    /// The display slot holding the key.
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Returns `true` while the key's note is sounding.
    pub fn is_sounding(&self) -> bool {
        self.sounding
    }
}

/// The contents of one display slot.
#[derive(Clone, Debug, PartialEq)]
pub enum Slot {
    /// The current layout has no tier for this slot.
    Hidden,
    /// The slot shows a tier.
    Tier(TierLayout),
}

/// Every key visual on screen, grouped into display slots.
#[derive(Clone, Debug)]
pub struct Keyboard {
    generation: u32,
    slots: Vec<Slot>,
    keys: Vec<KeyVisual>,
}

impl Keyboard {
    /// Constructs an empty `Keyboard` with `slot_count` hidden display slots.
    pub fn new(slot_count: usize) -> Self {
        Self {
            generation: 0,
            slots: vec![Slot::Hidden; slot_count],
            keys: Vec::new(),
        }
    }

    /// Forgets every key visual and hides every slot. Handles issued before this call stop resolving.
    pub fn clear(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.keys.clear();
        self.slots.fill(Slot::Hidden);
    }

    /// Clears the keyboard, then places `tiers[i]` into slot `i`. Slots without a tier, and tiers whose layout is empty,
    /// stay hidden; tiers beyond the last slot are dropped.
    pub fn install(&mut self, tiers: &[TierLayout]) {
        self.clear();
        for (slot, tier) in tiers.iter().enumerate().take(self.slots.len()) {
            if tier.is_empty() {
                continue;
            }
            self.keys.extend(tier.keys().map(|&descriptor| KeyVisual {
                descriptor,
                slot,
                sounding: false,
            }));
            self.slots[slot] = Slot::Tier(tier.clone());
        }
        debug!(
            "Installed {} key visuals into {} slots (generation {})",
            self.keys.len(),
            self.slots.len(),
            self.generation
        );
    }

    /// The display slots, in order.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Every key visual with its handle.
    pub fn keys(&self) -> impl Iterator<Item = (KeyHandle, &KeyVisual)> {
        self.keys
            .iter()
            .enumerate()
            .map(move |(index, key)| (self.handle(index), key))
    }

    /// Looks up a key visual; stale handles resolve to `None`.
    pub fn key(&self, handle: KeyHandle) -> Option<&KeyVisual> {
        if handle.generation != self.generation {
            return None;
        }
        self.keys.get(handle.index as usize)
    }

    /// Resolves a handle to the note its key plays; stale handles resolve to `None`.
    pub fn resolve(&self, handle: KeyHandle) -> Option<Note> {
        self.key(handle).map(KeyVisual::note)
    }

    /// Handles of every visual bound to `note`; more than one when tiers overlap.
    pub fn handles_for(&self, note: Note) -> impl Iterator<Item = KeyHandle> + '_ {
        self.keys
            .iter()
            .enumerate()
            .filter(move |(_, key)| key.note() == note)
            .map(move |(index, _)| self.handle(index))
    }

    /// Hit-testing helper: the handle of the key for `note` in display slot `slot`, if that slot shows it.
    pub fn find(&self, slot: usize, note: Note) -> Option<KeyHandle> {
        self.keys
            .iter()
            .position(|key| key.slot == slot && key.note() == note)
            .map(|index| self.handle(index))
    }

    /// Sets the sounding flag of every visual bound to `note`.
    pub fn set_sounding(&mut self, note: Note, sounding: bool) {
        for key in self.keys.iter_mut().filter(|key| key.note() == note) {
            key.sounding = sounding;
        }
    }

    /// Clears the sounding flag of every visual.
    pub fn clear_sounding(&mut self) {
        for key in &mut self.keys {
            key.sounding = false;
        }
    }

    /// Returns `true` if any visual bound to `note` is sounding.
    pub fn is_sounding(&self, note: Note) -> bool {
        self.keys.iter().any(|key| key.note() == note && key.sounding)
    }

    fn handle(&self, index: usize) -> KeyHandle {
        KeyHandle {
            generation: self.generation,
            index: index as u32,
        }
    }
}
