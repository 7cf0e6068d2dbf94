//! Deployment configuration for cache construction
//!
//! The capacity ceiling guards against unbounded allocation. It is a
//! deployment value, read from `RECENCY_MAX_CAPACITY` or set explicitly.

use tracing::warn;

use crate::error::{Error, Result};

/// Default upper bound on cache capacity (inclusive)
pub const DEFAULT_MAX_CAPACITY: usize = 65_535;

/// Environment variable overriding [`DEFAULT_MAX_CAPACITY`]
pub const MAX_CAPACITY_ENV: &str = "RECENCY_MAX_CAPACITY";

/// Bounds applied when creating a cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    max_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: DEFAULT_MAX_CAPACITY,
        }
    }
}

impl CacheConfig {
    /// Create a config with an explicit capacity ceiling
    ///
    /// # Returns
    /// * `Err(Error::Config)` if `max_capacity` is zero
    pub fn with_max_capacity(max_capacity: usize) -> Result<Self> {
        if max_capacity == 0 {
            return Err(Error::Config("max capacity must be positive".to_string()));
        }
        Ok(Self { max_capacity })
    }

    /// Load the config from the process environment
    ///
    /// Falls back to the defaults when `RECENCY_MAX_CAPACITY` is unset.
    pub fn from_env() -> Result<Self> {
        Self::from_override(std::env::var(MAX_CAPACITY_ENV).ok().as_deref())
    }

    fn from_override(raw: Option<&str>) -> Result<Self> {
        let Some(raw) = raw else {
            return Ok(Self::default());
        };

        match raw.trim().parse::<usize>() {
            Ok(max) => Self::with_max_capacity(max),
            Err(e) => {
                warn!("Rejected {}={:?}: {}", MAX_CAPACITY_ENV, raw, e);
                Err(Error::Config(format!(
                    "{} must be a positive integer, got {:?}",
                    MAX_CAPACITY_ENV, raw
                )))
            }
        }
    }

    /// Largest capacity a cache may be created with
    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    /// Check a requested capacity against this config
    pub fn validate_capacity(&self, capacity: usize) -> Result<()> {
        if capacity == 0 {
            return Err(Error::InvalidArgument(
                "capacity must be greater than 0".to_string(),
            ));
        }
        if capacity > self.max_capacity {
            return Err(Error::InvalidArgument(format!(
                "capacity {} exceeds maximum {}",
                capacity, self.max_capacity
            )));
        }
        Ok(())
    }
}
