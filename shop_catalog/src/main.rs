//! Shop Catalog - loads the storefront home data set
//!
//! Fetches the category list (or the categories given on the command line),
//! aggregates their products concurrently and prints the category index and
//! home-screen sections.

use clap::Parser;
use serde::Serialize;
use shop_catalog::{
    CatalogAggregator, CatalogConfig, CatalogRepository, CatalogSnapshot, CategoryRecord,
    DummyJsonClient, HomeSections, ProductCache, ProductRecord, SampleSizes,
};
use std::sync::Arc;
use std::time::Duration;

/// Storefront catalog loader - cache-first product fetching across categories
#[derive(Parser, Debug)]
#[command(name = "shop_catalog")]
#[command(version, about, long_about = None)]
struct Args {
    /// Base URL of the catalog API
    #[arg(long, default_value = shop_catalog::api::DEFAULT_BASE_URL)]
    base_url: String,

    /// Timeout in seconds for each remote request
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// Category slug to load (repeatable; default: every remote category)
    #[arg(short, long = "category")]
    categories: Vec<String>,

    /// Download thumbnails for the sampled products
    #[arg(long, default_value_t = false)]
    thumbnails: bool,

    /// Size of the random products section
    #[arg(long, default_value_t = 10)]
    random: usize,

    /// Size of the exclusive offers section
    #[arg(long, default_value_t = 5)]
    exclusive: usize,

    /// Size of the popular picks section
    #[arg(long, default_value_t = 5)]
    popular: usize,

    /// Print the snapshot and sections as JSON instead of a listing
    #[arg(long, default_value_t = false)]
    json: bool,
}

/// JSON output of a run
#[derive(Serialize)]
struct HomeOutput<'a> {
    snapshot: &'a CatalogSnapshot,
    sections: &'a HomeSections,
}

impl Args {
    fn config(&self) -> CatalogConfig {
        CatalogConfig::new()
            .with_base_url(self.base_url.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_sample_sizes(SampleSizes {
                random: self.random,
                exclusive_offers: self.exclusive,
                popular_picks: self.popular,
            })
    }
}

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.config();

    log::info!("Starting shop_catalog...");
    log::info!("Catalog API: {}", config.base_url);

    let source = Arc::new(DummyJsonClient::new(config.base_url.clone()));
    let cache = Arc::new(ProductCache::new());
    let repository = Arc::new(CatalogRepository::from_config(source, cache, &config));
    let aggregator = CatalogAggregator::new(Arc::clone(&repository));

    let snapshot = if args.categories.is_empty() {
        match aggregator.load_home().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::error!("Failed to load categories: {}", e);
                eprintln!("{}", e.user_message());
                std::process::exit(1);
            }
        }
    } else {
        let categories = args
            .categories
            .iter()
            .map(|slug| CategoryRecord::new(slug.as_str(), slug.as_str()))
            .collect();
        aggregator.run_aggregation(categories).await
    };

    let sections = snapshot.sections(&config.sample_sizes);

    if args.thumbnails {
        download_thumbnails(&repository, &sections).await;
    }

    if args.json {
        let output = HomeOutput {
            snapshot: snapshot.as_ref(),
            sections: &sections,
        };
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                log::error!("Failed to serialize output: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    println!("Categories ({}):", snapshot.categories.len());
    for category in &snapshot.categories {
        let image = if category.has_image() {
            category.representative_image_ref.as_str()
        } else {
            "-"
        };
        println!("  {:<24} {}", category.id, image);
    }
    let cache = repository.cache();
    print_section("Random", &sections.random, cache);
    print_section("Exclusive Offers", &sections.exclusive_offers, cache);
    print_section("Popular Picks", &sections.popular_picks, cache);

    log::info!(
        "Loaded {} products across {} categories",
        snapshot.products.len(),
        snapshot.categories.len()
    );
}

/// Fetch thumbnails for every sampled product concurrently
async fn download_thumbnails(repository: &Arc<CatalogRepository>, sections: &HomeSections) {
    let mut tasks = tokio::task::JoinSet::new();
    let ids = sections
        .random
        .iter()
        .chain(&sections.exclusive_offers)
        .chain(&sections.popular_picks)
        .map(|product| product.id);

    for id in ids {
        let repository = Arc::clone(repository);
        tasks.spawn(async move { (id, repository.fetch_thumbnail(id).await) });
    }

    let mut downloaded = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, Ok(()))) => downloaded += 1,
            Ok((id, Err(e))) => log::warn!("Failed to fetch thumbnail for product {}: {}", id, e),
            Err(e) => log::warn!("Thumbnail task did not complete: {}", e),
        }
    }
    log::info!("Thumbnails ready: {}", downloaded);
}

fn print_section(title: &str, products: &[ProductRecord], cache: &ProductCache) {
    println!("{} ({}):", title, products.len());
    for product in products {
        println!(
            "  #{:<5} {:<40} ${:>8.2} ({:.1}% off) {}",
            product.id,
            product.title,
            product.discounted_price(),
            product.discount_percentage,
            if cache.has_thumbnail(product.id) {
                "[img]"
            } else {
                ""
            }
        );
    }
}
