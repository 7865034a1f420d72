//! Configuration for the cache and the search session.
//!
//! Both structs follow the same builder pattern: start from `default()` and
//! override what differs.
//!
//! ```
//! use employer_search::config::{CacheConfig, SearchConfig};
//! use std::time::Duration;
//!
//! let cache = CacheConfig::default().with_ttl(Duration::from_secs(3600));
//! let search = SearchConfig::default().with_debounce(Duration::from_millis(150));
//! assert_eq!(cache.ttl, Duration::from_secs(3600));
//! assert!(search.dedupe_queries);
//! ```

use std::time::Duration;

/// Default cache lifetime: 7 days.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Default settling interval for keystroke-driven searches.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

pub const DEFAULT_DATA_KEY: &str = "com.employersearch.cache.employers";
pub const DEFAULT_TIMESTAMP_KEY: &str = "com.employersearch.cache.timestamp";

/// Settings for [`CacheManager`](crate::manager::CacheManager).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    /// An entry is valid while `now - timestamp <= ttl`.
    pub ttl: Duration,
    /// Storage key for the serialized employer list.
    pub data_key: String,
    /// Storage key for the write timestamp.
    pub timestamp_key: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            ttl: DEFAULT_CACHE_TTL,
            data_key: DEFAULT_DATA_KEY.to_string(),
            timestamp_key: DEFAULT_TIMESTAMP_KEY.to_string(),
        }
    }
}

impl CacheConfig {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Use different storage keys, e.g. to keep two caches in one backend.
    pub fn with_keys(
        mut self,
        data_key: impl Into<String>,
        timestamp_key: impl Into<String>,
    ) -> Self {
        self.data_key = data_key.into();
        self.timestamp_key = timestamp_key.into();
        self
    }
}

/// Settings for [`SearchController`](crate::controller::SearchController).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    /// How long a submitted query must stay current before it is executed.
    pub debounce: Duration,
    /// Skip a submitted query identical (after trimming) to the last executed one.
    pub dedupe_queries: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            debounce: DEFAULT_DEBOUNCE,
            dedupe_queries: true,
        }
    }
}

impl SearchConfig {
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_dedupe(mut self, dedupe: bool) -> Self {
        self.dedupe_queries = dedupe;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_config_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl.as_secs(), 604_800);
        assert_eq!(config.data_key, "com.employersearch.cache.employers");
        assert_eq!(config.timestamp_key, "com.employersearch.cache.timestamp");
    }

    #[test]
    fn test_cache_config_builder() {
        let config = CacheConfig::default()
            .with_ttl(Duration::from_secs(60))
            .with_keys("data", "ts");

        assert_eq!(config.ttl, Duration::from_secs(60));
        assert_eq!(config.data_key, "data");
        assert_eq!(config.timestamp_key, "ts");
    }

    #[test]
    fn test_search_config_builder() {
        let config = SearchConfig::default()
            .with_debounce(Duration::from_millis(10))
            .with_dedupe(false);

        assert_eq!(config.debounce, Duration::from_millis(10));
        assert!(!config.dedupe_queries);
        assert_eq!(SearchConfig::default().debounce, Duration::from_millis(300));
    }
}
