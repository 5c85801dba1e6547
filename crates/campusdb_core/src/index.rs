//! Dense ID index with O(1) swap-based removal.

use crate::error::{RegistryError, RegistryResult};
use crate::types::EntityKind;
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::hash::Hash;

/// Marker trait for key types usable in a [`DenseIndex`].
///
/// Blanket-implemented; a key only needs to be cloneable, hashable and
/// displayable (for error context).
pub trait IndexKey: Clone + Eq + Hash + Display {}

impl<T: Clone + Eq + Hash + Display> IndexKey for T {}

/// A dense, enumerable set of live keys with a reverse position map.
///
/// `DenseIndex` keeps every live key in a gap-free `order` vector and a
/// `position` map from key back to its slot in `order`. Appends and
/// removals are both O(1): removal overwrites the vacated slot with the
/// last key and shrinks the vector, then re-homes the moved key's
/// position entry.
///
/// Enumeration order is not insertion order and no caller may depend on
/// it. Cascading callers must snapshot [`DenseIndex::all`] before
/// removing entries, since removal reorders the very list being
/// iterated.
///
/// # Invariant
///
/// For every key `k` in `order`, `position[k]` is the slot of `k` in
/// `order`, and `order.len() == position.len()`.
#[derive(Debug, Clone)]
pub struct DenseIndex<K: IndexKey> {
    /// Kind label used in error context.
    kind: EntityKind,
    /// Dense list of live keys.
    order: Vec<K>,
    /// Key to slot mapping.
    position: HashMap<K, usize>,
}

impl<K: IndexKey> DenseIndex<K> {
    /// Creates an empty index for the given entity kind.
    #[must_use]
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            order: Vec::new(),
            position: HashMap::new(),
        }
    }

    /// Appends a key to the index.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if the key is already present.
    pub fn add(&mut self, key: K) -> RegistryResult<()> {
        if self.position.contains_key(&key) {
            return Err(RegistryError::already_exists(self.kind, &key));
        }
        self.position.insert(key.clone(), self.order.len());
        self.order.push(key);
        Ok(())
    }

    /// Removes a key from the index in O(1).
    ///
    /// The last key is swapped into the vacated slot and its position
    /// entry is updated to point there.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the key is absent.
    pub fn remove(&mut self, key: &K) -> RegistryResult<()> {
        let slot = self
            .position
            .remove(key)
            .ok_or_else(|| RegistryError::not_found(self.kind, key))?;
        self.order.swap_remove(slot);
        // The key that moved into `slot` (if any) needs its reverse
        // entry fixed, otherwise the next removal scribbles over the
        // wrong slot.
        if let Some(moved) = self.order.get(slot) {
            self.position.insert(moved.clone(), slot);
        }
        Ok(())
    }

    /// Returns `true` if the key is present.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.position.contains_key(key)
    }

    /// Returns the slot of a key, if present.
    #[must_use]
    pub fn position(&self, key: &K) -> Option<usize> {
        self.position.get(key).copied()
    }

    /// Returns the number of live keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the index holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns a snapshot of the live keys.
    ///
    /// Cascades iterate this snapshot rather than the live index.
    #[must_use]
    pub fn all(&self) -> Vec<K> {
        self.order.clone()
    }

    /// Returns an iterator over the live keys.
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.order.iter()
    }
}

impl<K: IndexKey> fmt::Display for DenseIndex<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} index ({} keys)", self.kind, self.order.len())
    }
}
