//! Error types for recency

use std::fmt;

/// Result type alias for cache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cache operations
///
/// A miss on `get` is not an error and never shows up here; lookups return
/// `Option` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Rejected input: bad capacity, absent key or absent value
    InvalidArgument(String),

    /// Deployment configuration could not be read
    Config(String),
}

impl Error {
    /// Shorthand for an absent key passed to `set`
    pub(crate) fn missing_key() -> Self {
        Error::InvalidArgument("key cannot be absent".to_string())
    }

    /// Shorthand for an absent value passed to `set`
    pub(crate) fn missing_value() -> Self {
        Error::InvalidArgument("value cannot be absent".to_string())
    }

    /// Returns true for [`Error::InvalidArgument`]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            Error::Config(msg) => write!(f, "configuration error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
