//! Provides [`HeldNotes`], the registry of which sources currently hold which notes.

use super::SourceId;
use std::collections::BTreeMap;
use tinyvec::TinyVec;
use wmidi::Note;

/// Most notes are held by a single source, occasionally two (e.g., a pointer doubling a MIDI key); four fit inline.
type Sources = TinyVec<[SourceId; 4]>;

/// A registry mapping each held [`Note`] to the set of [`SourceId`]s holding it.
///
/// A note is held if and only if it has an entry, and entries are never left empty: the entry is removed together with the
/// last source holding it. Adding and removing are idempotent set operations, so the held state of a note depends only
/// on which sources currently hold it, never on the order in which they arrived.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeldNotes {
    data: BTreeMap<Note, Sources>,
}

impl HeldNotes {
    /// Construct an empty `HeldNotes`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `source` holds `note`. Returns `true` if the note was not held by any source beforehand.
    pub fn add(&mut self, note: Note, source: SourceId) -> bool {
        let sources = self.data.entry(note).or_default();
        let was_idle = sources.is_empty();
        if !sources.contains(&source) {
            sources.push(source);
        }
        was_idle
    }

    /// Records that `source` released `note`. Returns `true` if that leaves the note held by no source at all.
    ///
    /// Releasing a note the source doesn't hold changes nothing and returns `false`.
    pub fn remove(&mut self, note: Note, source: SourceId) -> bool {
        let Some(sources) = self.data.get_mut(&note) else {
            return false;
        };
        let Some(position) = sources.iter().position(|&s| s == source) else {
            return false;
        };
        sources.remove(position);
        if sources.is_empty() {
            self.data.remove(&note);
            true
        } else {
            false
        }
    }

    /// Forgets every hold, returning the notes which were held, ascending.
    pub fn clear(&mut self) -> Vec<Note> {
        core::mem::take(&mut self.data).into_keys().collect()
    }

    /// Determine whether any source holds `note`.
    pub fn is_held(&self, note: Note) -> bool {
        self.data.contains_key(&note)
    }

    /// The sources holding `note`, in the order they arrived.
    pub fn sources(&self, note: Note) -> &[SourceId] {
        self.data.get(&note).map(|s| s.as_slice()).unwrap_or(&[])
    }

    /// Determine if any notes are held.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The number of distinct notes held.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns an [`Iterator`] over the held [`Note`]s, lowest first.
    pub fn iter(&self) -> impl Iterator<Item = Note> + '_ {
        self.data.keys().copied()
    }
}
