//! # recency
//!
//! Fixed-capacity in-memory cache that evicts the least recently used entry.
//!
//! ## Architecture
//! - **Recency list**: doubly-linked list in a slot arena, front = most recently used
//! - **Key index**: AHash map from key to slot (O(1) lookup)
//! - **LruCache**: keeps both in lockstep; `get` and `set` are O(1)
//! - **SharedCache**: one `parking_lot` mutex around the whole cache, plus hit/miss statistics
//!
//! A miss is `None`, never a sentinel value. Capacity is bounded by
//! [`CacheConfig`], which defaults to [`DEFAULT_MAX_CAPACITY`] and can be
//! overridden through `RECENCY_MAX_CAPACITY`.
//!
//! ```
//! use recency::LruCache;
//!
//! let mut cache = LruCache::new(2)?;
//! cache.put("a", 1);
//! cache.put("b", 2);
//! cache.get(&"a");
//! cache.put("c", 3); // evicts "b"
//!
//! assert_eq!(cache.get(&"b"), None);
//! assert_eq!(cache.keys().copied().collect::<Vec<_>>(), vec!["c", "a"]);
//! # Ok::<(), recency::Error>(())
//! ```

#![warn(missing_docs)]

mod cache;
mod config;
mod error;
mod index;
mod list;
mod shared;
mod stats;

pub use cache::{LruCache, PutOutcome};
pub use config::{CacheConfig, DEFAULT_MAX_CAPACITY, MAX_CAPACITY_ENV};
pub use error::{Error, Result};
pub use shared::SharedCache;
pub use stats::{CacheStats, StatsSnapshot};
