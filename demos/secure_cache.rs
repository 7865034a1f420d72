//! Example: encrypted on-disk cache, favorites and a debounced search session.

use employer_search::{
    backend::{EncryptedBackend, EncryptionKey, FileBackend},
    config::{CacheConfig, SearchConfig},
    error::Result,
    repository::CachedEmployerRepository,
    source::StaticEmployerSource,
    CacheManager, FavoritesStore, SearchController, SearchEmployersUseCase, SearchOutcome,
    SortOption,
};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .try_init()
        .ok();

    println!("\n=== Employer Search - Secure Cache Example ===\n");

    let dir = std::env::temp_dir().join("employer-search-demo");

    // 1. Encrypted file-backed cache
    println!("1. Opening encrypted cache in {}", dir.display());
    let key = EncryptionKey::generate();
    let backend = EncryptedBackend::new(FileBackend::new(dir.join("cache")), &key);
    let cache = Arc::new(CacheManager::new(backend, CacheConfig::default()));
    println!("   ✓ Key generated, values sealed with ChaCha20-Poly1305\n");

    // 2. Favorites persisted next to it
    println!("2. Loading favorites:");
    let favorites = Arc::new(FavoritesStore::open(dir.join("favorites.json")));
    if favorites.is_empty() {
        favorites.toggle(45456); // Adyen
        favorites.toggle(32456); // TU Delft
    }
    println!("   ✓ {} favorites\n", favorites.len());

    // 3. Search session
    let repository = CachedEmployerRepository::new(cache.clone(), StaticEmployerSource::new());
    let controller = SearchController::new(
        SearchEmployersUseCase::new(repository),
        favorites.clone(),
        SearchConfig::default(),
    );

    println!("3. Typing \"d\", \"de\", \"delft\" in quick succession:");
    let (d, de, delft) = tokio::join!(
        controller.submit_query("d"),
        async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            controller.submit_query("de").await
        },
        async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            controller.submit_query("delft").await
        },
    );
    for (query, outcome) in [("d", d), ("de", de), ("delft", delft)] {
        match outcome {
            SearchOutcome::Completed(results) => {
                println!("   {:<6} -> {} results", query, results.len());
                for employer in &results {
                    println!("            {}", employer.display_name());
                }
            }
            other => println!("   {:<6} -> {:?}", query, other),
        }
    }
    println!();

    // 4. Favorites only, best deals first
    println!("4. Favorites only, sorted by discount:");
    controller.submit_query("").await;
    controller.set_sort(SortOption::DiscountDesc).await;
    if let SearchOutcome::Completed(results) = controller.set_favorites_only(true).await {
        for employer in &results {
            println!(
                "   ★ {:>3}%  {}",
                employer.discount_percentage,
                employer.display_name()
            );
        }
    }
    println!();

    // 5. Maintenance
    println!("5. Maintenance:");
    controller.clear_expired_cache().await;
    match cache.cached_at().await {
        Some(at) => println!("   ✓ Cache still fresh (stamped at {})", at),
        None => println!("   ✓ Cache empty"),
    }

    cache.clear().await;
    println!("   ✓ Cache cleared");

    println!("\n=== Example Complete ===\n");
    Ok(())
}
