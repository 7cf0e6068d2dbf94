//! SharedCache: an LruCache behind one lock, with statistics

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::cache::{LruCache, PutOutcome};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::stats::CacheStats;

/// Cloneable handle to a cache shared between threads
///
/// Index and recency list sit behind a single mutex. `get` takes it
/// exclusively too, since a hit relinks the list.
pub struct SharedCache<K, V> {
    /// LRU cache guarded as one unit
    cache: Arc<Mutex<LruCache<K, V>>>,

    /// Cache statistics
    stats: Arc<CacheStats>,

    /// Cache capacity
    capacity: usize,
}

impl<K, V> Clone for SharedCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            stats: Arc::clone(&self.stats),
            capacity: self.capacity,
        }
    }
}

impl<K, V> SharedCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Create a shared cache with the given capacity
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries
    ///
    /// # Returns
    /// * `Result<SharedCache>` - Fails as [`LruCache::new`] does
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_config(capacity, &CacheConfig::default())
    }

    /// Create a shared cache whose capacity is checked against `config`
    pub fn with_config(capacity: usize, config: &CacheConfig) -> Result<Self> {
        let cache = LruCache::with_config(capacity, config)?;

        Ok(Self {
            cache: Arc::new(Mutex::new(cache)),
            stats: Arc::new(CacheStats::new()),
            capacity,
        })
    }

    /// Get a copy of a value, marking it most recently used
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut cache = self.cache.lock();
        match cache.get(key) {
            Some(value) => {
                self.stats.record_hit();
                Some(value.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Write a possibly-absent key/value pair
    ///
    /// # Returns
    /// * `Result<PutOutcome>` - `Err(Error::InvalidArgument)` leaves the cache untouched
    pub fn set(&self, key: Option<K>, value: Option<V>) -> Result<PutOutcome<K, V>> {
        let outcome = self.cache.lock().set(key, value)?;
        self.stats.record_put(&outcome);
        Ok(outcome)
    }

    /// Insert or overwrite a key
    pub fn put(&self, key: K, value: V) -> PutOutcome<K, V> {
        let outcome = self.cache.lock().put(key, value);
        self.stats.record_put(&outcome);
        outcome
    }

    /// Check for a key without changing its recency
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.cache.lock().contains(key)
    }

    /// Keys from most to least recently used
    pub fn keys(&self) -> Vec<K> {
        self.cache.lock().keys().cloned().collect()
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Get current number of entries
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    /// Get cache capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Run the invariant checks of the inner cache under the lock
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.cache.lock().debug_validate_invariants();
    }
}
