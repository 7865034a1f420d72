//! Encryption-at-rest wrapper for any storage backend.
//!
//! Values are sealed with ChaCha20-Poly1305 before they reach the inner
//! backend. Stored layout:
//!
//! ```text
//! ┌──────────────────┬──────────────────────────────┐
//! │ NONCE (12 bytes) │ CIPHERTEXT + TAG (N+16 bytes)│
//! └──────────────────┴──────────────────────────────┘
//! ```
//!
//! The storage key is bound as associated data, so a blob copied under a
//! different key fails to open.

use super::CacheBackend;
use crate::error::{Error, Result};
use chacha20poly1305::aead::{Aead, AeadCore, KeyInit, OsRng, Payload};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use std::fmt;

const NONCE_LEN: usize = 12;

/// 256-bit key for [`EncryptedBackend`].
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptionKey([u8; 32]);

impl EncryptionKey {
    /// Draw a fresh key from the OS random number generator.
    pub fn generate() -> Self {
        let key = ChaCha20Poly1305::generate_key(&mut OsRng);
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(key.as_slice());
        EncryptionKey(bytes)
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        EncryptionKey(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncryptionKey(<redacted>)")
    }
}

/// Backend wrapper that encrypts every value written to `inner`.
///
/// # Example
///
/// ```no_run
/// use employer_search::backend::{CacheBackend, EncryptedBackend, InMemoryBackend};
///
/// #[tokio::main]
/// async fn main() -> employer_search::Result<()> {
///     let backend = EncryptedBackend::with_generated_key(InMemoryBackend::new());
///     backend.set("secret", b"plaintext".to_vec()).await?;
///     assert_eq!(backend.get("secret").await?, Some(b"plaintext".to_vec()));
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct EncryptedBackend<B: CacheBackend> {
    inner: B,
    cipher: ChaCha20Poly1305,
}

impl<B: CacheBackend> EncryptedBackend<B> {
    pub fn new(inner: B, key: &EncryptionKey) -> Self {
        EncryptedBackend {
            inner,
            cipher: ChaCha20Poly1305::new(Key::from_slice(key.as_bytes())),
        }
    }

    /// Wrap `inner` with a random key.
    ///
    /// The key lives only in this process, so anything written is unreadable
    /// after a restart and is treated as a cache miss.
    pub fn with_generated_key(inner: B) -> Self {
        Self::new(inner, &EncryptionKey::generate())
    }

    /// Get the wrapped backend (values there are ciphertext).
    pub fn inner(&self) -> &B {
        &self.inner
    }

    fn seal(&self, key: &str, plaintext: &[u8]) -> Result<Vec<u8>> {
        let nonce = ChaCha20Poly1305::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(
                &nonce,
                Payload {
                    msg: plaintext,
                    aad: key.as_bytes(),
                },
            )
            .map_err(|e| Error::EncryptionError(format!("seal {}: {}", key, e)))?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(nonce.as_slice());
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }

    fn open(&self, key: &str, sealed: &[u8]) -> Result<Vec<u8>> {
        if sealed.len() < NONCE_LEN {
            return Err(Error::EncryptionError(format!(
                "open {}: sealed value too short ({} bytes)",
                key,
                sealed.len()
            )));
        }

        let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);
        self.cipher
            .decrypt(
                Nonce::from_slice(nonce),
                Payload {
                    msg: ciphertext,
                    aad: key.as_bytes(),
                },
            )
            .map_err(|e| Error::EncryptionError(format!("open {}: {}", key, e)))
    }
}

impl<B: CacheBackend> CacheBackend for EncryptedBackend<B> {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match self.inner.get(key).await? {
            Some(sealed) => self.open(key, &sealed).map(Some),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let sealed = self.seal(key, &value)?;
        self.inner.set(key, sealed).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.inner.delete(key).await
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        self.inner.exists(key).await
    }

    async fn mdelete(&self, keys: &[&str]) -> Result<()> {
        self.inner.mdelete(keys).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryBackend;

    #[tokio::test]
    async fn test_encrypted_roundtrip() {
        let backend = EncryptedBackend::with_generated_key(InMemoryBackend::new());

        backend
            .set("key", b"discount data".to_vec())
            .await
            .expect("Failed to set");

        assert_eq!(
            backend.get("key").await.expect("Failed to get"),
            Some(b"discount data".to_vec())
        );
    }

    #[tokio::test]
    async fn test_inner_holds_ciphertext() {
        let inner = InMemoryBackend::new();
        let backend = EncryptedBackend::with_generated_key(inner.clone());

        backend
            .set("key", b"discount data".to_vec())
            .await
            .expect("Failed to set");

        let raw = inner
            .get("key")
            .await
            .expect("Failed to get")
            .expect("Value missing");
        assert_eq!(raw.len(), NONCE_LEN + b"discount data".len() + 16);
        assert!(!raw.windows(8).any(|w| w == b"discount"));
    }

    #[tokio::test]
    async fn test_nonce_differs_per_write() {
        let inner = InMemoryBackend::new();
        let backend = EncryptedBackend::with_generated_key(inner.clone());

        backend.set("a", b"same".to_vec()).await.expect("Failed to set");
        backend.set("b", b"same".to_vec()).await.expect("Failed to set");

        let a = inner.get("a").await.expect("Failed to get");
        let b = inner.get("b").await.expect("Failed to get");
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_wrong_key_fails_to_open() {
        let inner = InMemoryBackend::new();
        let writer = EncryptedBackend::with_generated_key(inner.clone());
        let reader = EncryptedBackend::with_generated_key(inner);

        writer.set("key", b"data".to_vec()).await.expect("Failed to set");

        let err = reader.get("key").await.unwrap_err();
        assert!(matches!(err, Error::EncryptionError(_)));
    }

    #[tokio::test]
    async fn test_value_moved_between_keys_fails_to_open() {
        let inner = InMemoryBackend::new();
        let backend = EncryptedBackend::new(inner.clone(), &EncryptionKey::from_bytes([7u8; 32]));

        backend.set("a", b"data".to_vec()).await.expect("Failed to set");
        let sealed = inner
            .get("a")
            .await
            .expect("Failed to get")
            .expect("Value missing");
        inner.set("b", sealed).await.expect("Failed to set");

        assert!(matches!(
            backend.get("b").await.unwrap_err(),
            Error::EncryptionError(_)
        ));
    }

    #[tokio::test]
    async fn test_truncated_value_rejected() {
        let inner = InMemoryBackend::new();
        let backend = EncryptedBackend::with_generated_key(inner.clone());

        inner.set("key", vec![1, 2, 3]).await.expect("Failed to set");

        assert!(matches!(
            backend.get("key").await.unwrap_err(),
            Error::EncryptionError(_)
        ));
    }

    #[test]
    fn test_key_debug_is_redacted() {
        let key = EncryptionKey::from_bytes([1u8; 32]);
        assert_eq!(format!("{:?}", key), "EncryptionKey(<redacted>)");
    }
}
