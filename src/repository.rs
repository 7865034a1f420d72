//! Employer repository: cache-first access to the employer dataset.
//!
//! [`CachedEmployerRepository`] answers every search from the cached,
//! unfiltered dataset while it is fresh and only calls the source on a miss:
//!
//! ```text
//! search(query)
//!     ├─ cache fresh?  ── yes ──> filter cached set by query
//!     └─ no ──> source.fetch_all()
//!                 ├─ Ok(all)  ──> cache.save(all), filter by query
//!                 └─ Err(e)   ──> return Err(e), cache untouched
//! ```
//!
//! A warm cache is never bypassed, even if the query changed: the cache holds
//! the full set, so any query is an in-memory scan.
//!
//! # Mocking for Tests
//!
//! [`InMemoryEmployerRepository`] serves a fixed list (or a fixed failure)
//! without a cache or source, for testing code built on top of the trait.

use crate::backend::CacheBackend;
use crate::employer::{filter_matching, Employer};
use crate::error::{Error, Result};
use crate::manager::CacheManager;
use crate::source::EmployerSource;
use std::sync::Arc;
use std::time::Instant;

/// Text search over the employer dataset.
#[allow(async_fn_in_trait)]
pub trait EmployerRepository: Send + Sync {
    /// Employers whose name or place contains `query` (case-insensitive).
    ///
    /// An empty query returns the whole dataset.
    ///
    /// # Errors
    /// Returns `Err` only when the dataset had to be fetched and the source failed.
    async fn search(&self, query: &str) -> Result<Vec<Employer>>;

    /// Drop the cached dataset if it has expired.
    ///
    /// Never runs automatically; a scheduler or app lifecycle hook calls it.
    async fn clear_expired_cache(&self);
}

/// Repository backed by a [`CacheManager`] and an [`EmployerSource`].
///
/// # Example
///
/// ```no_run
/// use employer_search::backend::InMemoryBackend;
/// use employer_search::config::CacheConfig;
/// use employer_search::repository::{CachedEmployerRepository, EmployerRepository};
/// use employer_search::source::StaticEmployerSource;
/// use employer_search::CacheManager;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> employer_search::Result<()> {
///     let cache = Arc::new(CacheManager::new(InMemoryBackend::new(), CacheConfig::default()));
///     let repo = CachedEmployerRepository::new(cache, StaticEmployerSource::new());
///
///     let in_utrecht = repo.search("utrecht").await?;  // fetches and caches
///     let banks = repo.search("bank").await?;          // served from cache
///     # let _ = (in_utrecht, banks);
///     Ok(())
/// }
/// ```
pub struct CachedEmployerRepository<B: CacheBackend, S: EmployerSource> {
    cache: Arc<CacheManager<B>>,
    source: S,
}

impl<B: CacheBackend, S: EmployerSource> CachedEmployerRepository<B, S> {
    pub fn new(cache: Arc<CacheManager<B>>, source: S) -> Self {
        CachedEmployerRepository { cache, source }
    }

    /// Get the shared cache manager.
    pub fn cache(&self) -> &Arc<CacheManager<B>> {
        &self.cache
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<B: CacheBackend, S: EmployerSource> EmployerRepository for CachedEmployerRepository<B, S> {
    async fn search(&self, query: &str) -> Result<Vec<Employer>> {
        if let Some(cached) = self.cache.load().await {
            let matched = filter_matching(cached, query);
            debug!(
                "✓ Search {:?} served from cache: {} matches",
                query,
                matched.len()
            );
            return Ok(matched);
        }

        debug!("Cache miss, fetching employers from source");
        let timer = Instant::now();

        let employers = self.source.fetch_all().await.map_err(|e| {
            warn!("Employer fetch failed: {}", e);
            e
        })?;
        info!(
            "✓ Fetched {} employers in {:?}",
            employers.len(),
            timer.elapsed()
        );

        self.cache.save(&employers).await;

        Ok(filter_matching(employers, query))
    }

    async fn clear_expired_cache(&self) {
        if self.cache.is_expired().await {
            debug!("Clearing expired employer cache");
            self.cache.clear().await;
        }
    }
}

/// Simple in-memory repository for testing code built on [`EmployerRepository`].
///
/// Applies the same text match as the real repository, with no cache and no
/// latency. Use [`InMemoryEmployerRepository::failing`] to simulate a source
/// outage.
#[derive(Clone, Debug, Default)]
pub struct InMemoryEmployerRepository {
    employers: Vec<Employer>,
    failure: Option<String>,
}

impl InMemoryEmployerRepository {
    pub fn new(employers: Vec<Employer>) -> Self {
        InMemoryEmployerRepository {
            employers,
            failure: None,
        }
    }

    /// Repository whose every search fails with `Error::SourceError(message)`.
    pub fn failing(message: impl Into<String>) -> Self {
        InMemoryEmployerRepository {
            employers: Vec::new(),
            failure: Some(message.into()),
        }
    }

    pub fn len(&self) -> usize {
        self.employers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employers.is_empty()
    }
}

impl EmployerRepository for InMemoryEmployerRepository {
    async fn search(&self, query: &str) -> Result<Vec<Employer>> {
        if let Some(message) = &self.failure {
            return Err(Error::SourceError(message.clone()));
        }
        Ok(filter_matching(self.employers.clone(), query))
    }

    async fn clear_expired_cache(&self) {}
}
