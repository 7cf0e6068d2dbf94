//! LRU cache: key index + recency list kept in lockstep

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;

use tracing::{debug, trace};

use crate::config::CacheConfig;
use crate::error::{Error, Result};
use crate::index::KeyIndex;
use crate::list::RecencyList;

/// What a write did to the cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PutOutcome<K, V> {
    /// New key admitted without eviction
    Inserted,

    /// Existing key; holds the value it replaced
    Replaced(V),

    /// New key admitted after evicting the least recently used entry
    Evicted {
        /// Key of the evicted entry
        key: K,
        /// Value of the evicted entry
        value: V,
    },
}

/// Fixed-capacity cache evicting the least recently used entry
///
/// `get` and `put` are O(1): the index finds an entry's slot and the list
/// relinks it without scanning.
pub struct LruCache<K, V> {
    index: KeyIndex<K>,
    list: RecencyList<K, V>,
    capacity: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a cache bounded by [`CacheConfig::default`]
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries, at least 1
    ///
    /// # Returns
    /// * `Err(Error::InvalidArgument)` if `capacity` is 0 or above the default ceiling
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_config(capacity, &CacheConfig::default())
    }

    /// Create a cache whose capacity is checked against `config`
    pub fn with_config(capacity: usize, config: &CacheConfig) -> Result<Self> {
        config.validate_capacity(capacity)?;
        debug!(capacity, max = config.max_capacity(), "created LRU cache");

        Ok(Self {
            index: KeyIndex::with_capacity(capacity),
            list: RecencyList::with_capacity(capacity),
            capacity,
        })
    }

    /// Get a value and mark it most recently used
    ///
    /// `None` is the miss outcome and leaves the cache untouched.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(slot) = self.index.lookup(key) else {
            trace!(len = self.len(), "cache miss");
            return None;
        };

        self.list.promote(slot);
        trace!(len = self.len(), "cache hit");
        self.list.get(slot)
    }

    /// Get a value without changing its recency
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.lookup(key).and_then(|slot| self.list.get(slot))
    }

    /// Check for a key without changing its recency
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.lookup(key).is_some()
    }

    /// Write a key/value pair supplied by a host that may omit either
    ///
    /// # Returns
    /// * `Err(Error::InvalidArgument)` if `key` or `value` is `None`; nothing changes
    /// * `Ok(PutOutcome)` otherwise, as for [`LruCache::put`]
    pub fn set(&mut self, key: Option<K>, value: Option<V>) -> Result<PutOutcome<K, V>> {
        let key = key.ok_or_else(Error::missing_key)?;
        let value = value.ok_or_else(Error::missing_value)?;
        Ok(self.put(key, value))
    }

    /// Insert or overwrite a key and mark it most recently used
    ///
    /// A new key on a full cache first evicts the back of the recency list.
    pub fn put(&mut self, key: K, value: V) -> PutOutcome<K, V> {
        if let Some(slot) = self.index.lookup(&key) {
            if let Some(current) = self.list.get_mut(slot) {
                let old = std::mem::replace(current, value);
                self.list.promote(slot);
                trace!(len = self.len(), "updated entry in place");
                return PutOutcome::Replaced(old);
            }
        }

        let evicted = if self.len() >= self.capacity {
            self.evict()
        } else {
            None
        };

        let slot = self.list.push_front(key.clone(), value);
        self.index.insert(key, slot);

        match evicted {
            Some((key, value)) => PutOutcome::Evicted { key, value },
            None => PutOutcome::Inserted,
        }
    }

    fn evict(&mut self) -> Option<(K, V)> {
        let (key, value) = self.list.evict_back()?;
        self.index.remove(&key);
        debug!(capacity = self.capacity, "evicted least recently used entry");
        Some((key, value))
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Alias for [`LruCache::len`]
    pub fn size(&self) -> usize {
        self.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries from most to least recently used
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&K, &V)> + '_ {
        self.list.iter()
    }

    /// Keys from most to least recently used
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &K> + '_ {
        self.list.iter().map(|(key, _)| key)
    }

    /// Panic if the index and the recency list have drifted apart
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.list.debug_validate();

        assert_eq!(self.index.len(), self.list.len(), "index/list size mismatch");
        assert!(self.len() <= self.capacity, "size exceeds capacity");
        assert_eq!(self.list.front().is_none(), self.is_empty());
        assert_eq!(self.list.back().is_none(), self.is_empty());

        for (key, slot) in self.index.iter() {
            assert!(
                self.list.key(slot) == Some(key),
                "index points at a slot holding another key"
            );
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.list.iter()).finish()
    }
}
