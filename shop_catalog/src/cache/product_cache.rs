//! Product cache keyed by product ID
//!
//! Metadata and thumbnails live in separate maps so either can be updated
//! without touching the other. A single mutex guards all of it; nothing
//! suspends or does I/O while holding it.

use shop_common::ProductRecord;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct CacheState {
    records: HashMap<u64, ProductRecord>,
    thumbnails: HashMap<u64, Vec<u8>>,
    /// Product IDs in first-insertion order
    keys: Vec<u64>,
    /// Categories whose remote listing was stored and came back empty
    empty_categories: HashSet<String>,
}

impl CacheState {
    fn insert(&mut self, mut record: ProductRecord) {
        if let Some(bytes) = record.thumbnail_bytes.take() {
            self.thumbnails.insert(record.id, bytes);
        }
        let id = record.id;
        if self.records.insert(id, record).is_none() {
            self.keys.push(id);
        }
    }

    /// Copy of a stored record with its thumbnail attached
    fn snapshot(&self, id: u64) -> Option<ProductRecord> {
        let mut record = self.records.get(&id)?.clone();
        record.thumbnail_bytes = self.thumbnails.get(&id).cloned();
        Some(record)
    }

    fn by_category(&self, category_id: &str) -> Vec<ProductRecord> {
        self.keys
            .iter()
            .filter(|id| {
                self.records
                    .get(id)
                    .is_some_and(|record| record.category == category_id)
            })
            .filter_map(|id| self.snapshot(*id))
            .collect()
    }
}

/// Shared in-memory product cache
///
/// Callers always receive owned copies; mutating a returned record never
/// affects what is cached.
#[derive(Debug, Default)]
pub struct ProductCache {
    state: Mutex<CacheState>,
}

impl ProductCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get a product by ID
    pub fn get(&self, id: u64) -> Option<ProductRecord> {
        let record = self.lock().snapshot(id);
        if record.is_some() {
            log::debug!("Product cache hit for ID: {}", id);
        }
        record
    }

    /// Insert or overwrite a product's metadata.
    ///
    /// A thumbnail already cached for this ID survives the overwrite unless the
    /// incoming record brings its own bytes.
    pub fn put(&self, record: ProductRecord) {
        self.lock().insert(record);
    }

    /// Insert several products in order; later duplicates win
    pub fn put_many(&self, records: impl IntoIterator<Item = ProductRecord>) {
        let mut state = self.lock();
        for record in records {
            state.insert(record);
        }
    }

    /// Store a category's remote listing.
    ///
    /// An empty listing is remembered so [`lookup_category`](Self::lookup_category)
    /// reports it as known. A non-empty one is found through the records'
    /// `category` field like any other cached product.
    pub fn put_category(
        &self,
        category_id: &str,
        records: impl IntoIterator<Item = ProductRecord>,
    ) {
        let mut state = self.lock();
        let mut count = 0;
        for record in records {
            state.insert(record);
            count += 1;
        }
        if count == 0 {
            state.empty_categories.insert(category_id.to_string());
        } else {
            state.empty_categories.remove(category_id);
        }
        log::debug!("Cached {} products for category {}", count, category_id);
    }

    /// Attach thumbnail bytes to a cached product.
    ///
    /// Returns `false` and stores nothing if the product is not cached.
    pub fn set_thumbnail(&self, id: u64, bytes: Vec<u8>) -> bool {
        let mut state = self.lock();
        if !state.records.contains_key(&id) {
            log::debug!("Ignoring thumbnail for uncached product ID: {}", id);
            return false;
        }
        state.thumbnails.insert(id, bytes);
        true
    }

    /// Check if a thumbnail is cached for a product
    pub fn has_thumbnail(&self, id: u64) -> bool {
        self.lock().thumbnails.contains_key(&id)
    }

    /// All cached products of a category, in first-insertion order
    pub fn get_by_category(&self, category_id: &str) -> Vec<ProductRecord> {
        self.lock().by_category(category_id)
    }

    /// Cached products for a category, or `None` if nothing is known about it.
    ///
    /// A category whose listing was stored empty, and has gained no products
    /// since, yields `Some(vec![])`.
    pub fn lookup_category(&self, category_id: &str) -> Option<Vec<ProductRecord>> {
        let state = self.lock();
        let products = state.by_category(category_id);
        if products.is_empty() && !state.empty_categories.contains(category_id) {
            None
        } else {
            Some(products)
        }
    }

    /// Every cached product
    pub fn get_all(&self) -> Vec<ProductRecord> {
        let state = self.lock();
        state.keys.iter().filter_map(|id| state.snapshot(*id)).collect()
    }

    /// Drop every record, thumbnail and empty-category marker
    pub fn clear(&self) {
        let mut state = self.lock();
        let count = state.records.len();
        *state = CacheState::default();
        log::info!("Cleared product cache ({} products)", count);
    }

    /// Get product count
    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.lock().records.is_empty()
    }
}

#[cfg(test)]
#[path = "product_cache_tests.rs"]
mod tests;
