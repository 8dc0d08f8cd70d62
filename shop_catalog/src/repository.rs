//! Cache-first catalog repository
//!
//! Products for a category come from the [`ProductCache`] whenever the cache
//! knows the category. Otherwise a single remote load is started (or joined),
//! its result written back into the cache and returned. Failures are never
//! cached, so the next call tries the remote again.

use crate::api::RemoteCatalogSource;
use crate::cache::{InFlight, ProductCache};
use crate::config::{CatalogConfig, DEFAULT_REQUEST_TIMEOUT};
use shop_common::{CatalogError, CatalogResult, CategoryRecord, ProductRecord};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Repository over a remote catalog source and a shared product cache
pub struct CatalogRepository {
    source: Arc<dyn RemoteCatalogSource>,
    cache: Arc<ProductCache>,
    request_timeout: Duration,
    category_loads: InFlight<String, CatalogResult<Vec<ProductRecord>>>,
    thumbnail_loads: InFlight<u64, CatalogResult<()>>,
}

impl CatalogRepository {
    /// Create a repository with the default request timeout
    pub fn new(source: Arc<dyn RemoteCatalogSource>, cache: Arc<ProductCache>) -> Self {
        Self {
            source,
            cache,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            category_loads: InFlight::new(),
            thumbnail_loads: InFlight::new(),
        }
    }

    /// Create a repository using the timeout from `config`
    pub fn from_config(
        source: Arc<dyn RemoteCatalogSource>,
        cache: Arc<ProductCache>,
        config: &CatalogConfig,
    ) -> Self {
        Self::new(source, cache).with_timeout(config.request_timeout)
    }

    /// Set the timeout applied to each remote call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// The cache this repository reads from and writes to
    pub fn cache(&self) -> &Arc<ProductCache> {
        &self.cache
    }

    /// Fetch the products of a category, checking the cache first.
    ///
    /// Once a category has been loaded it is served from the cache for the
    /// lifetime of the cache; only [`ProductCache::clear`] forces a refetch.
    pub async fn fetch_products(&self, category_id: &str) -> CatalogResult<Vec<ProductRecord>> {
        if let Some(cached) = self.cache.lookup_category(category_id) {
            log::debug!(
                "Cache hit for category {} ({} products)",
                category_id,
                cached.len()
            );
            return Ok(cached);
        }

        let source = Arc::clone(&self.source);
        let cache = Arc::clone(&self.cache);
        let timeout = self.request_timeout;
        let key = category_id.to_string();
        self.category_loads
            .run(key.clone(), move || load_category(source, cache, key, timeout))
            .await
    }

    /// Download and cache the thumbnail of a cached product.
    ///
    /// Succeeds without any remote call if the thumbnail is already cached.
    pub async fn fetch_thumbnail(&self, product_id: u64) -> CatalogResult<()> {
        if self.cache.has_thumbnail(product_id) {
            log::debug!("Thumbnail already cached for product ID: {}", product_id);
            return Ok(());
        }

        let product = self.cache.get(product_id).ok_or_else(|| {
            CatalogError::InvalidReference(format!("product:{} is not cached", product_id))
        })?;
        let reference = validate_reference(product_id, &product.thumbnail_ref)?;

        let source = Arc::clone(&self.source);
        let cache = Arc::clone(&self.cache);
        let timeout = self.request_timeout;
        self.thumbnail_loads
            .run(product_id, move || {
                load_thumbnail(source, cache, product_id, reference, timeout)
            })
            .await
    }

    /// Fetch the category list from the remote. Categories are not cached.
    pub async fn fetch_categories(&self) -> CatalogResult<Vec<CategoryRecord>> {
        let raw = with_timeout(
            self.request_timeout,
            "category list",
            self.source.list_categories(),
        )
        .await?;
        log::info!("Fetched {} categories", raw.len());
        Ok(raw.into_iter().map(CategoryRecord::from).collect())
    }
}

/// Remote load for one category; runs at most once at a time per category
async fn load_category(
    source: Arc<dyn RemoteCatalogSource>,
    cache: Arc<ProductCache>,
    category_id: String,
    timeout: Duration,
) -> CatalogResult<Vec<ProductRecord>> {
    // A load that finished just before this one was started already filled the cache
    if let Some(cached) = cache.lookup_category(&category_id) {
        return Ok(cached);
    }

    log::info!(
        "Cache miss for category {}, fetching from remote",
        category_id
    );
    let raw = with_timeout(
        timeout,
        &format!("products for {}", category_id),
        source.list_products(&category_id),
    )
    .await?;

    // Stored under the slug they were listed for, whatever label the remote gives them
    let products: Vec<ProductRecord> = raw
        .into_iter()
        .map(|raw| ProductRecord {
            category: category_id.clone(),
            ..ProductRecord::from(raw)
        })
        .collect();
    cache.put_category(&category_id, products.clone());
    log::info!(
        "Fetched {} products for category {}",
        products.len(),
        category_id
    );
    Ok(products)
}

/// Remote load for one thumbnail; runs at most once at a time per product
async fn load_thumbnail(
    source: Arc<dyn RemoteCatalogSource>,
    cache: Arc<ProductCache>,
    product_id: u64,
    reference: String,
    timeout: Duration,
) -> CatalogResult<()> {
    if cache.has_thumbnail(product_id) {
        return Ok(());
    }

    log::info!(
        "Thumbnail cache miss for product {}, fetching {}",
        product_id,
        reference
    );
    let bytes = with_timeout(
        timeout,
        &format!("thumbnail for product {}", product_id),
        source.fetch_image_bytes(&reference),
    )
    .await?;

    if !cache.set_thumbnail(product_id, bytes) {
        log::debug!(
            "Product {} left the cache before its thumbnail arrived",
            product_id
        );
    }
    Ok(())
}

/// Check that a thumbnail reference is an absolute http(s) URL
fn validate_reference(product_id: u64, reference: &str) -> CatalogResult<String> {
    if reference.trim().is_empty() {
        return Err(CatalogError::InvalidReference(format!(
            "product:{} has no thumbnail reference",
            product_id
        )));
    }

    let url = reqwest::Url::parse(reference).map_err(|e| {
        CatalogError::InvalidReference(format!("product:{} {:?}: {}", product_id, reference, e))
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url.into()),
        scheme => Err(CatalogError::InvalidReference(format!(
            "product:{} unsupported scheme {:?}",
            product_id, scheme
        ))),
    }
}

/// Bound a remote call; an expired timer counts as a failed request
async fn with_timeout<T>(
    limit: Duration,
    what: &str,
    call: impl Future<Output = CatalogResult<T>>,
) -> CatalogResult<T> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(CatalogError::RemoteRequestFailed(format!(
            "{} timed out after {:?}",
            what, limit
        ))),
    }
}

#[cfg(test)]
#[path = "repository_tests.rs"]
mod tests;
