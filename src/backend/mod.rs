//! Key-value storage behind the cache.
//!
//! The [`CacheManager`](crate::manager::CacheManager) only needs a handful of
//! byte-level operations, so any at-rest store can sit behind it:
//!
//! - [`InMemoryBackend`]: process-wide map, the default for tests
//! - [`FileBackend`]: one file per key, survives restarts
//! - [`EncryptedBackend`]: seals values of any inner backend with ChaCha20-Poly1305

use crate::error::Result;

pub mod encrypted;
pub mod file;
pub mod inmemory;

pub use encrypted::{EncryptedBackend, EncryptionKey};
pub use file::FileBackend;
pub use inmemory::InMemoryBackend;

/// Trait for storage backend implementations.
///
/// **IMPORTANT:** All methods use `&self` instead of `&mut self` to allow concurrent access.
/// Implementations use interior mutability or external storage.
///
/// Each `set` must replace the value atomically: a concurrent `get` observes
/// either the old value or the new one, never a partial write.
#[allow(async_fn_in_trait)]
pub trait CacheBackend: Send + Sync + Clone {
    /// Retrieve value by key.
    ///
    /// # Returns
    /// - `Ok(Some(bytes))` - Value found
    /// - `Ok(None)` - Key not present
    ///
    /// # Errors
    /// Returns `Err` if the backend fails (I/O error, decryption failure, ...)
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store value, overwriting any prior value under `key`.
    ///
    /// # Errors
    /// Returns `Err` if the backend fails
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Remove value. Removing an absent key is not an error.
    ///
    /// # Errors
    /// Returns `Err` if the backend fails
    async fn delete(&self, key: &str) -> Result<()>;

    /// Check if key exists.
    ///
    /// # Errors
    /// Returns `Err` if the backend fails
    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// Bulk delete operation.
    ///
    /// Default implementation calls `delete()` for each key and stops at the
    /// first failure.
    ///
    /// # Errors
    /// Returns `Err` if the backend fails
    async fn mdelete(&self, keys: &[&str]) -> Result<()> {
        for key in keys {
            self.delete(key).await?;
        }
        Ok(())
    }
}
