//! Hooks for observing cache behaviour.
//!
//! Implement [`CacheMetrics`] to feed cache events into a monitoring system:
//!
//! ```ignore
//! use employer_search::observability::CacheMetrics;
//! use std::time::Duration;
//!
//! struct PrometheusMetrics;
//!
//! impl CacheMetrics for PrometheusMetrics {
//!     fn record_hit(&self, _key: &str, _duration: Duration) {
//!         // counter!("employer_cache_hits").inc();
//!     }
//! }
//!
//! // let manager = CacheManager::new(backend, CacheConfig::default())
//! //     .with_metrics(Box::new(PrometheusMetrics));
//! ```
//!
//! The trait's default bodies log through the `log` crate, so an
//! implementation only overrides the events it cares about. The manager
//! starts out with [`NoOpMetrics`].

use std::time::Duration;

/// Trait for cache metrics collection.
pub trait CacheMetrics: Send + Sync {
    /// A fresh entry was served.
    fn record_hit(&self, key: &str, duration: Duration) {
        debug!("Cache HIT: {} took {:?}", key, duration);
    }

    /// Nothing usable was stored (absent, expired or unreadable).
    fn record_miss(&self, key: &str, duration: Duration) {
        debug!("Cache MISS: {} took {:?}", key, duration);
    }

    /// The employer list was written.
    fn record_save(&self, key: &str, duration: Duration) {
        debug!("Cache SAVE: {} took {:?}", key, duration);
    }

    /// The entry was removed, either explicitly or on expiry.
    fn record_clear(&self, key: &str) {
        debug!("Cache CLEAR: {}", key);
    }

    /// A storage fault was absorbed.
    fn record_error(&self, key: &str, error: &str) {
        warn!("Cache ERROR for {}: {}", key, error);
    }
}

/// Default metrics implementation (no-op).
#[derive(Clone, Default)]
pub struct NoOpMetrics;

impl CacheMetrics for NoOpMetrics {
    fn record_hit(&self, _key: &str, _duration: Duration) {}
    fn record_miss(&self, _key: &str, _duration: Duration) {}
    fn record_save(&self, _key: &str, _duration: Duration) {}
    fn record_clear(&self, _key: &str) {}
    fn record_error(&self, _key: &str, _error: &str) {}
}
