//! Key index: hashes keys to recency list slots

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use ahash::RandomState;

use crate::list::Slot;

/// Non-owning map from key to the slot holding its entry
pub(crate) struct KeyIndex<K> {
    map: HashMap<K, Slot, RandomState>,
}

impl<K: Hash + Eq> KeyIndex<K> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
        }
    }

    pub(crate) fn lookup<Q>(&self, key: &Q) -> Option<Slot>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.get(key).copied()
    }

    /// Add or overwrite a mapping
    pub(crate) fn insert(&mut self, key: K, slot: Slot) -> Option<Slot> {
        self.map.insert(key, slot)
    }

    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<Slot>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.remove(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    #[cfg(any(test, debug_assertions))]
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&K, Slot)> + '_ {
        self.map.iter().map(|(k, slot)| (k, *slot))
    }
}
