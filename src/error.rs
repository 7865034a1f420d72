//! Error types for the employer search pipeline.

use std::fmt;

/// Result type for search and cache operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the employer search pipeline.
///
/// Only [`Error::SourceError`] and [`Error::ValidationError`] raised while
/// decoding a source payload ever reach callers of
/// [`EmployerRepository::search`](crate::repository::EmployerRepository::search).
/// Every other variant is produced by the storage layer and absorbed by the
/// [`CacheManager`](crate::manager::CacheManager), which degrades to a miss.
#[derive(Debug, Clone)]
pub enum Error {
    /// Serialization failed when converting a value to cache bytes.
    SerializationError(String),

    /// Deserialization failed when converting cache bytes back to a value.
    ///
    /// Common causes:
    /// - Truncated blob
    /// - Invalid Postcard encoding
    DeserializationError(String),

    /// Invalid cache entry: corrupted envelope or bad magic.
    InvalidCacheEntry(String),

    /// Schema version mismatch between code and cached data.
    ///
    /// Old entries are dropped and refetched; entries self-expire within
    /// the TTL anyway.
    VersionMismatch {
        /// Expected schema version (from compiled code)
        expected: u32,
        /// Found schema version (from cached entry)
        found: u32,
    },

    /// Sealing or opening an encrypted value failed.
    ///
    /// On read this usually means the value was written with another key
    /// or was tampered with.
    EncryptionError(String),

    /// Storage backend error (file I/O, etc).
    BackendError(String),

    /// An employer record violated a data model invariant.
    ValidationError(String),

    /// The employer source failed to deliver the dataset.
    ///
    /// **Recovery:** none inside the crate; the caller decides whether to
    /// offer a retry.
    SourceError(String),

    /// Invalid configuration or parameter (bad storage key, unknown sort label).
    ConfigError(String),

    /// Generic error with custom message.
    Other(String),
}

impl Error {
    /// Whether the failure came from the employer source (transport layer).
    pub fn is_source_error(&self) -> bool {
        matches!(self, Error::SourceError(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            Error::DeserializationError(msg) => write!(f, "Deserialization error: {}", msg),
            Error::InvalidCacheEntry(msg) => write!(f, "Invalid cache entry: {}", msg),
            Error::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Cache version mismatch: expected {}, found {}",
                    expected, found
                )
            }
            Error::EncryptionError(msg) => write!(f, "Encryption error: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Error::SourceError(msg) => write!(f, "Source error: {}", msg),
            Error::ConfigError(msg) => write!(f, "Config error: {}", msg),
            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// Conversions from other error types
// ============================================================================

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            Error::BackendError(e.to_string())
        } else if e.is_syntax() || e.is_eof() || e.is_data() {
            Error::DeserializationError(e.to_string())
        } else {
            Error::SerializationError(e.to_string())
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::BackendError(e.to_string())
    }
}

impl From<String> for Error {
    fn from(e: String) -> Self {
        Error::Other(e)
    }
}

impl From<&str> for Error {
    fn from(e: &str) -> Self {
        Error::Other(e.to_string())
    }
}
