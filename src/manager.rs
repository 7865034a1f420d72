//! Expiring cache for the full employer dataset.
//!
//! The manager keeps two entries in its backend: the serialized employer
//! list and the time it was written. An entry is served while
//! `now - timestamp <= ttl` and removed the first time it is found expired.
//!
//! Caching is best-effort. Every storage or serialization fault is logged,
//! reported to [`CacheMetrics`], and turned into "nothing cached"; no method
//! here returns an error.

use crate::backend::CacheBackend;
use crate::clock::{Clock, SystemClock};
use crate::config::CacheConfig;
use crate::employer::Employer;
use crate::error::Result;
use crate::observability::{CacheMetrics, NoOpMetrics};
use crate::serialization::{deserialize_from_cache, serialize_for_cache};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Expiring, best-effort cache of the employer dataset.
///
/// Construct one per process and share it (behind an `Arc`, or by cloning
/// the backend into a second manager with the same keys).
///
/// # Example
///
/// ```no_run
/// use employer_search::backend::{EncryptedBackend, InMemoryBackend};
/// use employer_search::config::CacheConfig;
/// use employer_search::{CacheManager, Employer};
///
/// #[tokio::main]
/// async fn main() {
///     let backend = EncryptedBackend::with_generated_key(InMemoryBackend::new());
///     let cache = CacheManager::new(backend, CacheConfig::default());
///
///     cache.save(&[Employer::new(32456, "TU Delft", "DELFT", 12)]).await;
///     assert_eq!(cache.load().await.map(|e| e.len()), Some(1));
/// }
/// ```
pub struct CacheManager<B: CacheBackend> {
    backend: B,
    config: CacheConfig,
    clock: Arc<dyn Clock>,
    metrics: Box<dyn CacheMetrics>,
}

impl<B: CacheBackend> CacheManager<B> {
    /// Create a manager reading the system clock.
    pub fn new(backend: B, config: CacheConfig) -> Self {
        CacheManager {
            backend,
            config,
            clock: Arc::new(SystemClock),
            metrics: Box::new(NoOpMetrics),
        }
    }

    /// Set the time source used for timestamps and expiry checks.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Set custom metrics handler.
    pub fn with_metrics(mut self, metrics: Box<dyn CacheMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Get backend reference (for advanced use).
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Store the full collection and stamp it with the current time.
    ///
    /// Overwrites whatever was cached before. Failures are logged and
    /// swallowed.
    pub async fn save(&self, employers: &[Employer]) {
        let timer = Instant::now();
        let key = self.config.data_key.as_str();

        if let Err(e) = self.write_entry(employers).await {
            warn!("Failed to cache {} employers: {}", employers.len(), e);
            self.metrics.record_error(key, &e.to_string());
            return;
        }

        debug!("✓ Cached {} employers under {}", employers.len(), key);
        self.metrics.record_save(key, timer.elapsed());
    }

    async fn write_entry(&self, employers: &[Employer]) -> Result<()> {
        let data = serialize_for_cache(&employers)?;
        let timestamp = serialize_for_cache(&self.clock.now_secs())?;

        // unstamp first: data left behind by a failed save reads as a miss
        self.backend.delete(&self.config.timestamp_key).await?;
        self.backend.set(&self.config.data_key, data).await?;
        self.backend.set(&self.config.timestamp_key, timestamp).await?;
        Ok(())
    }

    /// Return the cached collection if present and fresh.
    ///
    /// An expired (or unstamped) entry is cleared before returning `None`.
    /// Unreadable or invalid data also yields `None`.
    pub async fn load(&self) -> Option<Vec<Employer>> {
        let timer = Instant::now();
        let key = self.config.data_key.as_str();

        if self.is_expired().await {
            self.clear().await;
            self.metrics.record_miss(key, timer.elapsed());
            return None;
        }

        match self.read_entry().await {
            Ok(Some(employers)) => {
                debug!("✓ Cache hit: {} employers", employers.len());
                self.metrics.record_hit(key, timer.elapsed());
                Some(employers)
            }
            Ok(None) => {
                debug!("✗ Cache miss: timestamp present but no data under {}", key);
                self.metrics.record_miss(key, timer.elapsed());
                None
            }
            Err(e) => {
                warn!("Failed to load cached employers: {}", e);
                self.metrics.record_error(key, &e.to_string());
                self.metrics.record_miss(key, timer.elapsed());
                None
            }
        }
    }

    async fn read_entry(&self) -> Result<Option<Vec<Employer>>> {
        let Some(bytes) = self.backend.get(&self.config.data_key).await? else {
            return Ok(None);
        };

        let employers: Vec<Employer> = deserialize_from_cache(&bytes)?;
        for employer in &employers {
            employer.validate()?;
        }
        Ok(Some(employers))
    }

    /// When the current entry was written, in seconds since the UNIX epoch.
    ///
    /// `None` if nothing is stamped or the stamp cannot be read.
    pub async fn cached_at(&self) -> Option<u64> {
        let key = self.config.timestamp_key.as_str();
        let bytes = match self.backend.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                self.metrics.record_error(key, &e.to_string());
                return None;
            }
        };

        match deserialize_from_cache::<u64>(&bytes) {
            Ok(secs) => Some(secs),
            Err(e) => {
                self.metrics.record_error(key, &e.to_string());
                None
            }
        }
    }

    /// Time elapsed since the entry was written.
    ///
    /// A stamp in the future (clock moved backwards) reads as zero.
    pub async fn age(&self) -> Option<Duration> {
        let cached_at = self.cached_at().await?;
        let elapsed = self.clock.now_secs().saturating_sub(cached_at);
        Some(Duration::from_secs(elapsed))
    }

    /// `true` if nothing is stamped or the entry is older than the TTL.
    pub async fn is_expired(&self) -> bool {
        match self.age().await {
            Some(age) => age > self.config.ttl,
            None => true,
        }
    }

    /// Remove both the data and the timestamp. Safe to call repeatedly.
    pub async fn clear(&self) {
        let keys = [
            self.config.data_key.as_str(),
            self.config.timestamp_key.as_str(),
        ];

        match self.backend.mdelete(&keys).await {
            Ok(()) => {
                debug!("✓ Cache cleared");
                self.metrics.record_clear(&self.config.data_key);
            }
            Err(e) => {
                warn!("Failed to clear cache: {}", e);
                self.metrics.record_error(&self.config.data_key, &e.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{EncryptedBackend, FileBackend, InMemoryBackend};
    use crate::clock::ManualClock;
    use crate::error::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const WEEK: Duration = Duration::from_secs(7 * 24 * 60 * 60);
    const START: u64 = 1_700_000_000;

    fn dataset() -> Vec<Employer> {
        vec![
            Employer::new(14116, "Achmea Zeist", "ZEIST", 17),
            Employer::new(10234, "Rabobank Nederland", "UTRECHT", 12),
            Employer::new(20456, "ABN AMRO Bank N.V.", "AMSTERDAM", 15),
        ]
    }

    fn manager_with_clock(
        backend: InMemoryBackend,
    ) -> (CacheManager<InMemoryBackend>, ManualClock) {
        let clock = ManualClock::new(START);
        let manager =
            CacheManager::new(backend, CacheConfig::default()).with_clock(Arc::new(clock.clone()));
        (manager, clock)
    }

    /// Backend whose writes always fail.
    #[derive(Clone, Default)]
    struct ReadOnlyBackend;

    impl CacheBackend for ReadOnlyBackend {
        async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
            Ok(None)
        }

        async fn set(&self, key: &str, _value: Vec<u8>) -> Result<()> {
            Err(Error::BackendError(format!("read-only: {}", key)))
        }

        async fn delete(&self, _key: &str) -> Result<()> {
            Err(Error::BackendError("read-only".to_string()))
        }
    }

    /// In-memory backend that refuses to write the timestamp key.
    #[derive(Clone, Default)]
    struct UnstampableBackend {
        inner: InMemoryBackend,
    }

    impl CacheBackend for UnstampableBackend {
        async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
            if key == CacheConfig::default().timestamp_key {
                return Err(Error::BackendError(format!("disk full: {}", key)));
            }
            self.inner.set(key, value).await
        }

        async fn delete(&self, key: &str) -> Result<()> {
            self.inner.delete(key).await
        }
    }

    #[tokio::test]
    async fn test_half_finished_save_reads_as_miss() {
        let backend = InMemoryBackend::new();
        let (manager, _clock) = manager_with_clock(backend.clone());
        manager.save(&dataset()).await;
        assert!(manager.load().await.is_some());

        let unstampable = UnstampableBackend { inner: backend };
        let failing = CacheManager::new(unstampable, CacheConfig::default())
            .with_clock(Arc::new(ManualClock::new(START)));
        failing.save(&[Employer::new(1, "Half Written", "DELFT", 3)]).await;

        assert!(manager.cached_at().await.is_none());
        assert_eq!(manager.load().await, None);
    }

    #[tokio::test]
    async fn test_save_then_load_roundtrip() {
        let (manager, _clock) = manager_with_clock(InMemoryBackend::new());

        manager.save(&dataset()).await;

        assert_eq!(manager.load().await, Some(dataset()));
        assert!(!manager.is_expired().await);
    }

    #[tokio::test]
    async fn test_load_without_anything_cached() {
        let (manager, _clock) = manager_with_clock(InMemoryBackend::new());

        assert!(manager.is_expired().await);
        assert_eq!(manager.load().await, None);
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_entry() {
        let (manager, _clock) = manager_with_clock(InMemoryBackend::new());

        manager.save(&dataset()).await;
        let replacement = vec![Employer::new(1, "Only One", "DELFT", 3)];
        manager.save(&replacement).await;

        assert_eq!(manager.load().await, Some(replacement));
    }

    #[tokio::test]
    async fn test_entry_valid_at_exactly_ttl() {
        let (manager, clock) = manager_with_clock(InMemoryBackend::new());

        manager.save(&dataset()).await;
        clock.advance(WEEK);

        assert!(!manager.is_expired().await);
        assert!(manager.load().await.is_some());
    }

    #[tokio::test]
    async fn test_expired_entry_is_cleared_on_load() {
        let backend = InMemoryBackend::new();
        let (manager, clock) = manager_with_clock(backend.clone());

        manager.save(&dataset()).await;
        clock.advance(WEEK + Duration::from_secs(1));

        assert!(manager.is_expired().await);
        assert_eq!(manager.load().await, None);
        assert!(backend.is_empty(), "expired load should clear storage");
    }

    #[tokio::test]
    async fn test_timestamp_in_future_counts_as_fresh() {
        let (manager, clock) = manager_with_clock(InMemoryBackend::new());

        manager.save(&dataset()).await;
        clock.set(START - 3600);

        assert_eq!(manager.age().await, Some(Duration::ZERO));
        assert!(manager.load().await.is_some());
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let backend = InMemoryBackend::new();
        let (manager, _clock) = manager_with_clock(backend.clone());

        manager.save(&dataset()).await;
        manager.clear().await;
        manager.clear().await;

        assert!(backend.is_empty());
        assert_eq!(manager.load().await, None);
    }

    #[tokio::test]
    async fn test_data_without_timestamp_is_a_miss() {
        let backend = InMemoryBackend::new();
        let (manager, _clock) = manager_with_clock(backend.clone());

        manager.save(&dataset()).await;
        backend
            .delete(&manager.config().timestamp_key)
            .await
            .expect("Failed to delete");

        assert_eq!(manager.load().await, None);
        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn test_corrupted_data_is_a_miss() {
        let backend = InMemoryBackend::new();
        let (manager, _clock) = manager_with_clock(backend.clone());

        manager.save(&dataset()).await;
        backend
            .set(&manager.config().data_key, vec![0xde, 0xad, 0xbe, 0xef])
            .await
            .expect("Failed to set");

        assert_eq!(manager.load().await, None);
    }

    #[tokio::test]
    async fn test_invalid_employer_in_cache_is_a_miss() {
        let backend = InMemoryBackend::new();
        let (manager, _clock) = manager_with_clock(backend.clone());

        manager
            .save(&[Employer::new(9, "Impossible", "NOWHERE", 150)])
            .await;

        assert_eq!(manager.load().await, None);
    }

    #[tokio::test]
    async fn test_unreadable_timestamp_counts_as_expired() {
        let backend = InMemoryBackend::new();
        let (manager, _clock) = manager_with_clock(backend.clone());

        manager.save(&dataset()).await;
        backend
            .set(&manager.config().timestamp_key, b"garbage".to_vec())
            .await
            .expect("Failed to set");

        assert!(manager.is_expired().await);
        assert_eq!(manager.load().await, None);
    }

    #[tokio::test]
    async fn test_save_failure_is_swallowed() {
        let manager = CacheManager::new(ReadOnlyBackend, CacheConfig::default());

        manager.save(&dataset()).await;
        manager.clear().await;

        assert_eq!(manager.load().await, None);
    }

    #[tokio::test]
    async fn test_encrypted_backend_roundtrip() {
        let inner = InMemoryBackend::new();
        let manager = CacheManager::new(
            EncryptedBackend::with_generated_key(inner.clone()),
            CacheConfig::default(),
        );

        manager.save(&dataset()).await;

        assert_eq!(manager.load().await, Some(dataset()));
        assert_eq!(inner.len(), 2);
    }

    #[tokio::test]
    async fn test_encrypted_data_unreadable_with_other_key_is_a_miss() {
        let inner = InMemoryBackend::new();
        let writer = CacheManager::new(
            EncryptedBackend::with_generated_key(inner.clone()),
            CacheConfig::default(),
        );
        let reader = CacheManager::new(
            EncryptedBackend::with_generated_key(inner),
            CacheConfig::default(),
        );

        writer.save(&dataset()).await;

        assert!(reader.is_expired().await);
        assert_eq!(reader.load().await, None);
    }

    #[tokio::test]
    async fn test_file_backend_survives_new_manager() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        CacheManager::new(FileBackend::new(dir.path()), CacheConfig::default())
            .save(&dataset())
            .await;

        let reopened = CacheManager::new(FileBackend::new(dir.path()), CacheConfig::default());
        assert_eq!(reopened.load().await, Some(dataset()));
    }

    #[tokio::test]
    async fn test_custom_keys_isolate_caches() {
        let backend = InMemoryBackend::new();
        let a = CacheManager::new(backend.clone(), CacheConfig::default().with_keys("a", "a.ts"));
        let b = CacheManager::new(backend.clone(), CacheConfig::default().with_keys("b", "b.ts"));

        a.save(&dataset()).await;

        assert!(a.load().await.is_some());
        assert!(b.load().await.is_none());
        assert_eq!(backend.len(), 2);
    }

    #[tokio::test]
    async fn test_metrics_hooks() {
        #[derive(Clone, Default)]
        struct TestMetrics {
            hits: Arc<AtomicUsize>,
            misses: Arc<AtomicUsize>,
            saves: Arc<AtomicUsize>,
            errors: Arc<Mutex<Vec<String>>>,
        }

        impl CacheMetrics for TestMetrics {
            fn record_hit(&self, _key: &str, _duration: Duration) {
                self.hits.fetch_add(1, Ordering::SeqCst);
            }

            fn record_miss(&self, _key: &str, _duration: Duration) {
                self.misses.fetch_add(1, Ordering::SeqCst);
            }

            fn record_save(&self, _key: &str, _duration: Duration) {
                self.saves.fetch_add(1, Ordering::SeqCst);
            }

            fn record_error(&self, key: &str, _error: &str) {
                self.errors.lock().expect("Failed to lock errors").push(key.to_string());
            }
        }

        let metrics = TestMetrics::default();
        let manager = CacheManager::new(InMemoryBackend::new(), CacheConfig::default())
            .with_metrics(Box::new(metrics.clone()));

        assert!(manager.load().await.is_none());
        manager.save(&dataset()).await;
        assert!(manager.load().await.is_some());

        assert_eq!(metrics.hits.load(Ordering::SeqCst), 1);
        assert_eq!(metrics.misses.load(Ordering::SeqCst), 1);
        assert_eq!(metrics.saves.load(Ordering::SeqCst), 1);
        assert!(metrics.errors.lock().expect("Failed to lock errors").is_empty());

        let failing = CacheManager::new(ReadOnlyBackend, CacheConfig::default())
            .with_metrics(Box::new(metrics.clone()));
        failing.save(&dataset()).await;
        assert_eq!(metrics.errors.lock().expect("Failed to lock errors").len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_saves_never_interleave() {
        let backend = InMemoryBackend::new();
        let manager = Arc::new(CacheManager::new(backend, CacheConfig::default()));
        let mut handles = vec![];

        for i in 0..8u8 {
            let manager = Arc::clone(&manager);
            handles.push(tokio::spawn(async move {
                let employers: Vec<Employer> = (0..=i)
                    .map(|n| Employer::new(i64::from(n), format!("Employer {}", n), "UTRECHT", n))
                    .collect();
                manager.save(&employers).await;
            }));
        }

        for handle in handles {
            handle.await.expect("Task failed");
        }

        let loaded = manager.load().await.expect("Cache should be warm");
        let expected: Vec<i64> = (0..loaded.len() as i64).collect();
        assert_eq!(loaded.iter().map(|e| e.id).collect::<Vec<_>>(), expected);
    }
}
