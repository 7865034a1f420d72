//! Postcard-based blob format for cached values.
//!
//! Every blob the [`CacheManager`](crate::manager::CacheManager) writes (the
//! employer list and its timestamp) is wrapped in a versioned envelope:
//!
//! ```text
//! ┌─────────────────┬─────────────────┬──────────────────────────┐
//! │  MAGIC (4 bytes)│ VERSION (u32)   │POSTCARD PAYLOAD (N bytes)│
//! └─────────────────┴─────────────────┴──────────────────────────┘
//!   "EMPL"              varint             postcard::to_allocvec(T)
//! ```
//!
//! A blob with the wrong magic or version is rejected rather than migrated.
//! Cached data self-expires within a week, so a format bump simply causes
//! one refetch.
//!
//! ```rust
//! use employer_search::serialization::{deserialize_from_cache, serialize_for_cache};
//! use employer_search::Employer;
//!
//! # fn main() -> employer_search::Result<()> {
//! let employers = vec![Employer::new(32456, "TU Delft", "DELFT", 12)];
//! let bytes = serialize_for_cache(&employers)?;
//! let restored: Vec<Employer> = deserialize_from_cache(&bytes)?;
//! assert_eq!(employers, restored);
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Magic header for employer-search blobs: b"EMPL"
pub const CACHE_MAGIC: [u8; 4] = *b"EMPL";

/// Current schema version.
///
/// Bump when the shape of [`Employer`](crate::Employer) changes.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Versioned envelope for cached blobs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CacheEnvelope<T> {
    /// Magic header: must be b"EMPL"
    pub magic: [u8; 4],
    /// Schema version: must match CURRENT_SCHEMA_VERSION
    pub version: u32,
    pub payload: T,
}

impl<T> CacheEnvelope<T> {
    /// Create a new envelope with current magic and version.
    pub fn new(payload: T) -> Self {
        Self {
            magic: CACHE_MAGIC,
            version: CURRENT_SCHEMA_VERSION,
            payload,
        }
    }
}

/// Wrap `value` in the envelope and encode it.
///
/// # Errors
///
/// Returns `Error::SerializationError` if postcard cannot encode the value.
pub fn serialize_for_cache<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    postcard::to_allocvec(&CacheEnvelope::new(value)).map_err(|e| {
        error!("Could not encode cache blob: {}", e);
        Error::SerializationError(format!("postcard encode: {}", e))
    })
}

/// Decode a blob written by [`serialize_for_cache`].
///
/// The header is checked before the payload is handed back. Failures are
/// returned, not logged; the caller decides whether they matter.
///
/// # Errors
///
/// - `Error::DeserializationError`: bytes are not a postcard envelope (corrupt or truncated)
/// - `Error::InvalidCacheEntry`: envelope from another format
/// - `Error::VersionMismatch`: envelope from an older or newer schema
pub fn deserialize_from_cache<'de, T: Deserialize<'de>>(bytes: &'de [u8]) -> Result<T> {
    let envelope: CacheEnvelope<T> = postcard::from_bytes(bytes).map_err(|e| {
        Error::DeserializationError(format!("postcard decode of {} bytes: {}", bytes.len(), e))
    })?;

    check_header(envelope.magic, envelope.version)?;
    Ok(envelope.payload)
}

fn check_header(magic: [u8; 4], version: u32) -> Result<()> {
    if magic != CACHE_MAGIC {
        return Err(Error::InvalidCacheEntry(format!(
            "not an employer cache blob (header {:?})",
            String::from_utf8_lossy(&magic)
        )));
    }
    if version != CURRENT_SCHEMA_VERSION {
        return Err(Error::VersionMismatch {
            expected: CURRENT_SCHEMA_VERSION,
            found: version,
        });
    }
    Ok(())
}
