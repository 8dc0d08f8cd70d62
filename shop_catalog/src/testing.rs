//! Test doubles for the remote catalog source

use crate::api::RemoteCatalogSource;
use async_trait::async_trait;
use shop_common::{CatalogError, CatalogResult, ProductRecord, RawCategory, RawProduct};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

/// Create a test product record with default values
pub fn make_product(id: u64, category: &str, thumbnail_ref: &str) -> ProductRecord {
    raw_product(id, category, thumbnail_ref).into()
}

/// Create a raw remote product with default values
pub fn raw_product(id: u64, category: &str, thumbnail: &str) -> RawProduct {
    RawProduct {
        id,
        title: format!("Product {}", id),
        price: 10.0,
        thumbnail: thumbnail.to_string(),
        description: "Test product".to_string(),
        rating: 4.5,
        discount_percentage: 10.0,
        category: category.to_string(),
    }
}

/// Scripted remote source that counts every call it receives.
///
/// Categories without a scripted response fail with `RemoteRequestFailed`.
#[derive(Default)]
pub struct StubSource {
    products: Mutex<HashMap<String, CatalogResult<Vec<RawProduct>>>>,
    categories: Mutex<Option<CatalogResult<Vec<RawCategory>>>>,
    images: Mutex<HashMap<String, Vec<u8>>>,
    delays: Mutex<HashMap<String, Duration>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    product_calls: Mutex<HashMap<String, usize>>,
    category_calls: AtomicUsize,
    image_calls: AtomicUsize,
}

impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(self, category_id: &str, products: Vec<RawProduct>) -> Self {
        self.set_products(category_id, Ok(products));
        self
    }

    pub fn with_failure(self, category_id: &str, error: CatalogError) -> Self {
        self.set_products(category_id, Err(error));
        self
    }

    pub fn with_delay(self, category_id: &str, delay: Duration) -> Self {
        self.delays
            .lock()
            .unwrap()
            .insert(category_id.to_string(), delay);
        self
    }

    pub fn with_categories(self, categories: CatalogResult<Vec<RawCategory>>) -> Self {
        *self.categories.lock().unwrap() = Some(categories);
        self
    }

    pub fn with_image(self, reference: &str, bytes: Vec<u8>) -> Self {
        self.images
            .lock()
            .unwrap()
            .insert(reference.to_string(), bytes);
        self
    }

    /// Hold `list_products` for a category until the returned handle is notified
    pub fn gate(&self, category_id: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(category_id.to_string(), Arc::clone(&gate));
        gate
    }

    /// Replace the scripted response for a category
    pub fn set_products(&self, category_id: &str, response: CatalogResult<Vec<RawProduct>>) {
        self.products
            .lock()
            .unwrap()
            .insert(category_id.to_string(), response);
    }

    pub fn product_calls(&self, category_id: &str) -> usize {
        self.product_calls
            .lock()
            .unwrap()
            .get(category_id)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_product_calls(&self) -> usize {
        self.product_calls.lock().unwrap().values().sum()
    }

    pub fn category_calls(&self) -> usize {
        self.category_calls.load(Ordering::SeqCst)
    }

    pub fn image_calls(&self) -> usize {
        self.image_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteCatalogSource for StubSource {
    async fn list_categories(&self) -> CatalogResult<Vec<RawCategory>> {
        self.category_calls.fetch_add(1, Ordering::SeqCst);
        self.categories
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn list_products(&self, category_id: &str) -> CatalogResult<Vec<RawProduct>> {
        *self
            .product_calls
            .lock()
            .unwrap()
            .entry(category_id.to_string())
            .or_insert(0) += 1;

        let delay = self.delays.lock().unwrap().get(category_id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let gate = self.gates.lock().unwrap().get(category_id).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.products
            .lock()
            .unwrap()
            .get(category_id)
            .cloned()
            .unwrap_or_else(|| {
                Err(CatalogError::RemoteRequestFailed(format!(
                    "no stubbed response for {}",
                    category_id
                )))
            })
    }

    async fn fetch_image_bytes(&self, reference: &str) -> CatalogResult<Vec<u8>> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(10)).await;
        self.images
            .lock()
            .unwrap()
            .get(reference)
            .cloned()
            .ok_or_else(|| CatalogError::RemoteRequestFailed(format!("404 for {}", reference)))
    }
}
