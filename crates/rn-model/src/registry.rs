//! The `Registry` — ordered storage of registered objects and their positions.

use rustc_hash::FxHashMap;

use rn_core::ObjectId;

use crate::{Position, RoadUser};

/// One registered object.
pub(crate) struct Entry {
    pub object: Box<dyn RoadUser>,
    pub position: Position,
}

impl Entry {
    /// The object as a trait object.  Always go through here rather than
    /// calling trait methods on the `Box`, which would resolve `AsAny` for the
    /// box itself.
    #[inline]
    pub fn object(&self) -> &dyn RoadUser {
        &*self.object
    }
}

/// Objects in registration order plus an id → slot index.
///
/// The `entries` vector is the source of truth for ordering: the slot of an
/// object is its registration rank, and queries use it as their tie-break
/// key.  Removal shifts later entries down and reindexes them, so ranks stay
/// dense and relative order is preserved.
#[derive(Default)]
pub(crate) struct Registry {
    entries: Vec<Entry>,
    slots: FxHashMap<ObjectId, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: ObjectId) -> bool {
        self.slots.contains_key(&id)
    }

    /// Registration rank of `id`.
    #[inline]
    pub fn slot(&self, id: ObjectId) -> Option<usize> {
        self.slots.get(&id).copied()
    }

    /// Append a new entry.  The caller has already checked `id` is free.
    pub(crate) fn push(&mut self, object: Box<dyn RoadUser>, position: Position) {
        let id = object.id();
        debug_assert!(!self.slots.contains_key(&id));
        self.slots.insert(id, self.entries.len());
        self.entries.push(Entry { object, position });
    }

    pub(crate) fn remove(&mut self, id: ObjectId) -> Option<Entry> {
        let slot = self.slots.remove(&id)?;
        let entry = self.entries.remove(slot);
        for (i, e) in self.entries.iter().enumerate().skip(slot) {
            self.slots.insert(e.object().id(), i);
        }
        Some(entry)
    }

    #[inline]
    pub(crate) fn entry(&self, slot: usize) -> &Entry {
        &self.entries[slot]
    }

    #[inline]
    pub(crate) fn entry_mut(&mut self, slot: usize) -> &mut Entry {
        &mut self.entries[slot]
    }

    pub(crate) fn get(&self, id: ObjectId) -> Option<&Entry> {
        self.slot(id).map(|s| &self.entries[s])
    }

    /// Entries in registration order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.entries.iter()
    }
}
