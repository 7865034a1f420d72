//! Basic example: searching, filtering and sorting the built-in dataset.

use employer_search::{
    backend::InMemoryBackend,
    config::CacheConfig,
    error::Result,
    repository::CachedEmployerRepository,
    source::StaticEmployerSource,
    CacheManager, Employer, SearchEmployersUseCase, SortOption, DISCOUNT_PRESETS,
};
use std::sync::Arc;
use std::time::Instant;

fn print_results(employers: &[Employer]) {
    for employer in employers.iter().take(5) {
        println!(
            "   {:>3}%  {}",
            employer.discount_percentage,
            employer.display_name()
        );
    }
    if employers.len() > 5 {
        println!("   ... and {} more", employers.len() - 5);
    }
    println!();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .try_init()
        .ok();

    println!("\n=== Employer Search - Basic Example ===\n");

    // 1. Wire cache, source, repository and use case
    println!("1. Initializing in-memory cache and built-in source...");
    let cache = Arc::new(CacheManager::new(InMemoryBackend::new(), CacheConfig::default()));
    let repository = CachedEmployerRepository::new(cache.clone(), StaticEmployerSource::new());
    let use_case = SearchEmployersUseCase::new(repository);
    println!("   ✓ Ready\n");

    // 2. First search - cache miss, fetch from source
    println!("2. First search (\"\"), sorted by name:");
    let timer = Instant::now();
    let all = use_case.execute("", None, SortOption::NameAsc).await?;
    println!("   ✓ {} employers in {:?}", all.len(), timer.elapsed());
    print_results(&all);

    // 3. Second search - served from cache
    println!("3. Search \"amsterdam\", sorted by discount:");
    let timer = Instant::now();
    let amsterdam = use_case
        .execute("amsterdam", None, SortOption::DiscountDesc)
        .await?;
    println!("   ✓ {} matches in {:?} (cached)", amsterdam.len(), timer.elapsed());
    print_results(&amsterdam);

    // 4. Every discount preset
    println!("4. Discount presets:");
    for preset in DISCOUNT_PRESETS {
        let count = use_case.execute("", preset, SortOption::NameAsc).await?.len();
        match preset {
            Some(min) => println!("   {:>3}%+  {} employers", min, count),
            None => println!("   all    {} employers", count),
        }
    }
    println!();

    // 5. Every sort option
    println!("5. Sort options for \"bank\":");
    for option in SortOption::ALL {
        let banks = use_case.execute("bank", None, option).await?;
        let first = banks.first().map(|e| e.name.as_str()).unwrap_or("-");
        println!("   {:<24} first: {}", option.label(), first);
    }
    println!();

    // 6. Cache age
    if let Some(age) = cache.age().await {
        println!("6. Cache age: {:?} (expires after {:?})", age, cache.config().ttl);
    }

    println!("\n=== Example Complete ===\n");
    Ok(())
}
