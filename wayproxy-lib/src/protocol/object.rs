//! The protocol object table: a sorted mapping from object id to the
//! interface descriptor that id was created with. Direct translation of
//! `listset_insert`/`listset_remove`/`listset_get` in the reference
//! implementation's `parsing.c`.

use super::interface::InterfaceDescriptor;

/// One live protocol object: its id and the interface vtable it was bound
/// to when created.
#[derive(Debug, Clone, Copy)]
pub struct ObjectEntry {
    pub id: u32,
    pub interface: &'static InterfaceDescriptor,
}

impl PartialEq for ObjectEntry {
    /// Entries compare equal by id and interface identity (pointer equality
    /// of the static vtable), not by the vtable's contents.
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && std::ptr::eq(self.interface, other.interface)
    }
}

impl Eq for ObjectEntry {}

/// Error returned by [`ObjectTable::insert`] when the id is already taken.
#[derive(Debug, thiserror::Error)]
#[error("object id {0} already exists in the table")]
pub struct DuplicateIdError(pub u32);

/// A dense, id-ordered container of [`ObjectEntry`] values.
///
/// Kept ordered by `object_id` (ids are assigned monotonically by the
/// server but may be recycled after destruction) so that lookups and
/// insertions stay cache-friendly at the scale of a few hundred live
/// objects typical of a compositor session.
#[derive(Debug, Default)]
pub struct ObjectTable {
    entries: Vec<ObjectEntry>,
}

impl ObjectTable {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Insert a new entry, keeping the table sorted by id.
    ///
    /// Returns [`DuplicateIdError`] if the id is already present, matching
    /// property 8: duplicate ids are rejected at insert.
    pub fn insert(&mut self, entry: ObjectEntry) -> Result<(), DuplicateIdError> {
        match self.entries.binary_search_by_key(&entry.id, |e| e.id) {
            Ok(_) => Err(DuplicateIdError(entry.id)),
            Err(pos) => {
                self.entries.insert(pos, entry);
                Ok(())
            }
        }
    }

    /// Remove the entry with the given id, if present.
    pub fn remove(&mut self, id: u32) -> Option<ObjectEntry> {
        match self.entries.binary_search_by_key(&id, |e| e.id) {
            Ok(pos) => Some(self.entries.remove(pos)),
            Err(_) => None,
        }
    }

    /// Look up the entry with the given id.
    pub fn get(&self, id: u32) -> Option<&ObjectEntry> {
        self.entries.binary_search_by_key(&id, |e| e.id).ok().map(|pos| &self.entries[pos])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Destroy all remaining entries, as done at connection shutdown.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::registry::WL_DISPLAY;

    fn entry(id: u32) -> ObjectEntry {
        ObjectEntry { id, interface: &WL_DISPLAY }
    }

    #[test]
    fn insert_keeps_order() {
        let mut t = ObjectTable::new();
        t.insert(entry(5)).unwrap();
        t.insert(entry(1)).unwrap();
        t.insert(entry(3)).unwrap();
        assert_eq!(t.get(1).unwrap().id, 1);
        assert_eq!(t.get(3).unwrap().id, 3);
        assert_eq!(t.get(5).unwrap().id, 5);
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn duplicate_insert_rejected() {
        let mut t = ObjectTable::new();
        t.insert(entry(1)).unwrap();
        assert!(t.insert(entry(1)).is_err());
    }

    #[test]
    fn remove_then_get_returns_none() {
        let mut t = ObjectTable::new();
        t.insert(entry(1)).unwrap();
        assert!(t.remove(1).is_some());
        assert!(t.get(1).is_none());
        assert!(t.remove(1).is_none());
    }

    #[test]
    fn get_missing_returns_none() {
        let t = ObjectTable::new();
        assert!(t.get(42).is_none());
    }
}
