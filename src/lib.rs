//! # employer-search
//!
//! Searchable, filterable directory of employers offering a public-transport
//! discount, backed by an expiring cache.
//!
//! ## Features
//!
//! - **Cache-first:** The full dataset is fetched once and cached for 7 days; every search after that is an in-memory scan
//! - **Backend Agnostic:** In-memory, file-per-key and encrypted backends behind one trait
//! - **Encrypted at Rest:** [`EncryptedBackend`] seals cached bytes with ChaCha20-Poly1305
//! - **Filter & Sort:** Minimum discount threshold and five stable orderings
//! - **Favorites:** Locally persisted set of favorited employers
//! - **Debounced Sessions:** [`SearchController`] settles keystrokes and drops stale results
//!
//! ## Quick Start
//!
//! ```no_run
//! use employer_search::{
//!     backend::InMemoryBackend,
//!     config::CacheConfig,
//!     repository::CachedEmployerRepository,
//!     source::StaticEmployerSource,
//!     CacheManager, SearchEmployersUseCase, SortOption,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> employer_search::Result<()> {
//!     // 1. Cache over a storage backend
//!     let cache = Arc::new(CacheManager::new(InMemoryBackend::new(), CacheConfig::default()));
//!
//!     // 2. Repository: cache first, source on miss
//!     let repository = CachedEmployerRepository::new(cache, StaticEmployerSource::new());
//!
//!     // 3. Search, filter, sort
//!     let use_case = SearchEmployersUseCase::new(repository);
//!     let deals = use_case
//!         .execute("amsterdam", Some(10), SortOption::DiscountDesc)
//!         .await?;
//!
//!     for employer in &deals {
//!         println!("{} ({}%)", employer.display_name(), employer.discount_percentage);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Layers
//!
//! ```text
//! SearchController      debounce, last-request-wins, favorites-only view
//!   └─ SearchEmployersUseCase   trim, discount filter, sort
//!        └─ EmployerRepository  text match, cache-first
//!             ├─ CacheManager   TTL, envelope, validation
//!             │    └─ CacheBackend (InMemory / File / Encrypted)
//!             └─ EmployerSource (Static / Json)
//! ```

#[macro_use]
extern crate log;

pub mod backend;
pub mod clock;
pub mod config;
pub mod controller;
pub mod employer;
pub mod error;
pub mod favorites;
pub mod manager;
pub mod observability;
pub mod repository;
pub mod serialization;
pub mod sort;
pub mod source;
pub mod usecase;

// Re-exports for convenience
pub use backend::{CacheBackend, EncryptedBackend, FileBackend, InMemoryBackend};
pub use config::{CacheConfig, SearchConfig};
pub use controller::{SearchController, SearchOutcome, SearchState};
pub use employer::{Employer, EmployerId};
pub use error::{Error, Result};
pub use favorites::FavoritesStore;
pub use manager::CacheManager;
pub use repository::{CachedEmployerRepository, EmployerRepository};
pub use sort::{SortOption, DISCOUNT_PRESETS};
pub use usecase::{SearchEmployersUseCase, SearchRequest};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
