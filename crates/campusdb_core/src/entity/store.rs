//! Generic keyed entity store with logical deletion.

use crate::entity::records::Record;
use crate::error::{RegistryError, RegistryResult};
use crate::index::DenseIndex;
use std::collections::HashMap;

/// Allocates sequential entity IDs.
///
/// IDs start at 1; 0 is the reserved "no entity" sentinel. Allocated
/// IDs are never handed out again, even after the entity they named is
/// logically deleted.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    /// Creates an allocator whose first ID is 1.
    #[must_use]
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Hands out the next ID.
    pub fn allocate(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Returns the next ID without allocating it.
    #[must_use]
    pub fn peek(&self) -> u64 {
        self.next
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// A keyed store of entity records plus a dense index of live keys.
///
/// The store owns the records; only copies cross its boundary. Records
/// are never physically removed — deletion flips the active flag and
/// drops the key from the live index, and the key stays occupied
/// forever so it can never be reused.
#[derive(Debug, Clone)]
pub struct EntityStore<R: Record> {
    /// Key to record mapping. Holds live and logically deleted records.
    records: HashMap<R::Key, R>,
    /// Dense index of live keys.
    live: DenseIndex<R::Key>,
}

impl<R: Record> EntityStore<R> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            live: DenseIndex::new(R::kind()),
        }
    }

    /// Inserts a new record under its key.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if the key is occupied, including by a
    /// logically deleted record.
    pub fn insert(&mut self, record: R) -> RegistryResult<()> {
        let key = record.key();
        if self.records.contains_key(&key) {
            return Err(RegistryError::already_exists(R::kind(), &key));
        }
        self.live.add(key.clone())?;
        self.records.insert(key, record);
        Ok(())
    }

    /// Returns a copy of a live record.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the key is absent or the record is
    /// logically deleted.
    pub fn get(&self, key: &R::Key) -> RegistryResult<R> {
        self.records
            .get(key)
            .filter(|r| r.is_active())
            .cloned()
            .ok_or_else(|| RegistryError::not_found(R::kind(), key))
    }

    /// Mutates a live record in place.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the key is absent or the record is
    /// logically deleted.
    pub fn update_with(
        &mut self,
        key: &R::Key,
        f: impl FnOnce(&mut R),
    ) -> RegistryResult<()> {
        let record = self
            .records
            .get_mut(key)
            .filter(|r| r.is_active())
            .ok_or_else(|| RegistryError::not_found(R::kind(), key))?;
        f(record);
        Ok(())
    }

    /// Logically deletes a record: flips the active flag and removes
    /// the key from the live index. The slot is retained.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the key is absent or already deleted.
    pub fn deactivate(&mut self, key: &R::Key) -> RegistryResult<()> {
        let record = self
            .records
            .get_mut(key)
            .filter(|r| r.is_active())
            .ok_or_else(|| RegistryError::not_found(R::kind(), key))?;
        record.deactivate();
        self.live.remove(key)
    }

    /// Returns `true` if the key names a live record.
    #[must_use]
    pub fn contains_active(&self, key: &R::Key) -> bool {
        self.live.contains(key)
    }

    /// Returns `true` if the key is occupied, live or not.
    #[must_use]
    pub fn is_occupied(&self, key: &R::Key) -> bool {
        self.records.contains_key(key)
    }

    /// Returns a snapshot of the live keys.
    #[must_use]
    pub fn live_keys(&self) -> Vec<R::Key> {
        self.live.all()
    }

    /// Returns the number of live records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Returns `true` if no records are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

impl<R: Record> Default for EntityStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::records::Professor;
    use crate::types::ProfessorId;

    fn professor(id: u64, name: &str) -> Professor {
        Professor {
            id: ProfessorId::new(id),
            name: name.to_string(),
            department: "CS".to_string(),
            active: true,
        }
    }

    #[test]
    fn allocator_starts_at_one() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.allocate(), 1);
        assert_eq!(ids.allocate(), 2);
        assert_eq!(ids.peek(), 3);
    }

    #[test]
    fn insert_and_get() {
        let mut store = EntityStore::new();
        store.insert(professor(1, "Alice")).unwrap();

        let found = store.get(&ProfessorId::new(1)).unwrap();
        assert_eq!(found.name, "Alice");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn insert_duplicate_rejected() {
        let mut store = EntityStore::new();
        store.insert(professor(1, "Alice")).unwrap();

        let err = store.insert(professor(1, "Impostor")).unwrap_err();
        assert!(matches!(err, RegistryError::AlreadyExists { .. }));
    }

    #[test]
    fn deactivate_hides_record() {
        let mut store = EntityStore::new();
        let key = ProfessorId::new(1);
        store.insert(professor(1, "Alice")).unwrap();

        store.deactivate(&key).unwrap();

        assert!(store.get(&key).is_err());
        assert!(!store.contains_active(&key));
        assert!(store.is_empty());
    }

    #[test]
    fn deleted_key_stays_occupied() {
        let mut store = EntityStore::new();
        let key = ProfessorId::new(1);
        store.insert(professor(1, "Alice")).unwrap();
        store.deactivate(&key).unwrap();

        // The slot is retained, so the key can never be reused.
        assert!(store.is_occupied(&key));
        let err = store.insert(professor(1, "Alice II")).unwrap_err();
        assert!(matches!(err, RegistryError::AlreadyExists { .. }));
    }

    #[test]
    fn double_deactivate_rejected() {
        let mut store = EntityStore::new();
        let key = ProfessorId::new(1);
        store.insert(professor(1, "Alice")).unwrap();
        store.deactivate(&key).unwrap();

        let err = store.deactivate(&key).unwrap_err();
        assert!(matches!(err, RegistryError::NotFound { .. }));
    }

    #[test]
    fn update_with_mutates_live_record() {
        let mut store = EntityStore::new();
        let key = ProfessorId::new(1);
        store.insert(professor(1, "Alice")).unwrap();

        store
            .update_with(&key, |p| p.department = "Math".to_string())
            .unwrap();

        assert_eq!(store.get(&key).unwrap().department, "Math");
    }

    #[test]
    fn update_deleted_record_rejected() {
        let mut store = EntityStore::new();
        let key = ProfessorId::new(1);
        store.insert(professor(1, "Alice")).unwrap();
        store.deactivate(&key).unwrap();

        let err = store.update_with(&key, |_| {}).unwrap_err();
        assert!(matches!(err, RegistryError::NotFound { .. }));
    }

    #[test]
    fn live_keys_snapshot() {
        let mut store = EntityStore::new();
        for id in 1..=3 {
            store.insert(professor(id, "P")).unwrap();
        }
        store.deactivate(&ProfessorId::new(2)).unwrap();

        let mut keys = store.live_keys();
        keys.sort();
        assert_eq!(keys, vec![ProfessorId::new(1), ProfessorId::new(3)]);
    }

    #[test]
    fn returned_record_is_a_copy() {
        let mut store = EntityStore::new();
        let key = ProfessorId::new(1);
        store.insert(professor(1, "Alice")).unwrap();

        let mut copy = store.get(&key).unwrap();
        copy.name = "Mallory".to_string();

        assert_eq!(store.get(&key).unwrap().name, "Alice");
    }
}
