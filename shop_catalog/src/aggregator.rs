//! Fan-out/join aggregation of products across categories
//!
//! Every category is fetched as its own task. Nothing is published until all
//! tasks have reported back; the finished snapshot then replaces the previous
//! one in a single step, so observers never see a half-finished run.

use crate::repository::CatalogRepository;
use crate::sampling::{HomeSections, SampleSizes};
use chrono::{DateTime, Utc};
use serde::Serialize;
use shop_common::{CatalogResult, CategoryRecord, ProductRecord};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinSet;

/// Result of one completed aggregation run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogSnapshot {
    /// Run number; 0 is the empty state before any run
    pub run: u64,
    /// Categories with representative images applied
    pub categories: Vec<CategoryRecord>,
    /// All fetched products, by category input order then fetch order
    pub products: Vec<ProductRecord>,
    pub published_at: Option<DateTime<Utc>>,
}

impl CatalogSnapshot {
    /// Draw the home-screen sections from this snapshot's product pool
    pub fn sections(&self, sizes: &SampleSizes) -> HomeSections {
        HomeSections::sample(&self.products, sizes)
    }
}

/// Runs aggregations and publishes their snapshots
pub struct CatalogAggregator {
    repository: Arc<CatalogRepository>,
    published: watch::Sender<Arc<CatalogSnapshot>>,
    runs: AtomicU64,
}

impl CatalogAggregator {
    pub fn new(repository: Arc<CatalogRepository>) -> Self {
        let (published, _) = watch::channel(Arc::new(CatalogSnapshot::default()));
        Self {
            repository,
            published,
            runs: AtomicU64::new(0),
        }
    }

    pub fn repository(&self) -> &Arc<CatalogRepository> {
        &self.repository
    }

    /// The most recently published snapshot
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.published.borrow().clone()
    }

    /// Observe published snapshots as they are swapped in
    pub fn subscribe(&self) -> watch::Receiver<Arc<CatalogSnapshot>> {
        self.published.subscribe()
    }

    /// Fetch the category list, then aggregate products for all of it.
    ///
    /// Only a failure to list categories is returned; per-category failures
    /// are absorbed by the aggregation.
    pub async fn load_home(&self) -> CatalogResult<Arc<CatalogSnapshot>> {
        let categories = self.repository.fetch_categories().await?;
        Ok(self.run_aggregation(categories).await)
    }

    /// Fetch products for every category concurrently and publish the result.
    ///
    /// A category whose fetch fails contributes no products and keeps its
    /// previous image. Returns the snapshot built by this run.
    pub async fn run_aggregation(&self, categories: Vec<CategoryRecord>) -> Arc<CatalogSnapshot> {
        let run = self.runs.fetch_add(1, Ordering::SeqCst) + 1;
        log::info!(
            "Aggregation run {}: fetching products for {} categories",
            run,
            categories.len()
        );

        let mut tasks = JoinSet::new();
        for (index, category) in categories.iter().enumerate() {
            let repository = Arc::clone(&self.repository);
            let category_id = category.id.clone();
            tasks.spawn(async move { (index, repository.fetch_products(&category_id).await) });
        }

        let mut outcomes: Vec<Vec<ProductRecord>> = vec![Vec::new(); categories.len()];
        let mut failed = 0;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Ok(products))) => outcomes[index] = products,
                Ok((index, Err(e))) => {
                    failed += 1;
                    log::warn!(
                        "Failed to fetch products for category {}: {}",
                        categories[index].id,
                        e
                    );
                }
                Err(e) => {
                    failed += 1;
                    log::warn!("Category fetch task did not complete: {}", e);
                }
            }
        }

        let snapshot = Arc::new(assemble(run, categories, outcomes));
        self.publish(&snapshot);

        log::info!(
            "Aggregation run {} complete: {} categories, {} products, {} failed",
            run,
            snapshot.categories.len(),
            snapshot.products.len(),
            failed
        );
        snapshot
    }

    /// Swap in a snapshot unless a later run has already been published
    fn publish(&self, snapshot: &Arc<CatalogSnapshot>) {
        let replaced = self.published.send_if_modified(|current| {
            if current.run < snapshot.run {
                *current = Arc::clone(snapshot);
                true
            } else {
                false
            }
        });
        if !replaced {
            log::debug!(
                "Run {} finished after a newer run was published, not publishing",
                snapshot.run
            );
        }
    }
}

/// Apply representative images and flatten per-category results
fn assemble(
    run: u64,
    mut categories: Vec<CategoryRecord>,
    outcomes: Vec<Vec<ProductRecord>>,
) -> CatalogSnapshot {
    for (category, products) in categories.iter_mut().zip(&outcomes) {
        if let Some(first) = products.first() {
            category.representative_image_ref = first.thumbnail_ref.clone();
        }
    }

    CatalogSnapshot {
        run,
        categories,
        products: outcomes.into_iter().flatten().collect(),
        published_at: Some(Utc::now()),
    }
}

#[cfg(test)]
#[path = "aggregator_tests.rs"]
mod tests;
