//! Canonical catalog records shared by the cache, repository and aggregator

use serde::{Deserialize, Serialize};

/// A product as held by the cache and handed to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: u64,
    pub title: String,
    pub price: f64,
    /// Locator of the product thumbnail (absolute URL for the HTTP source)
    pub thumbnail_ref: String,
    pub description: String,
    pub rating: f64,
    pub discount_percentage: f64,
    /// Slug of the category this product belongs to
    pub category: String,
    /// Downloaded thumbnail, attached independently of the metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_bytes: Option<Vec<u8>>,
}

impl ProductRecord {
    /// Price after applying the discount percentage, never below zero.
    pub fn discounted_price(&self) -> f64 {
        let factor = 1.0 - (self.discount_percentage / 100.0).min(1.0);
        (self.price * factor).max(0.0)
    }
}

/// A product category identified by its slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: String,
    pub name: String,
    /// Display image; empty until a product of this category has been fetched
    #[serde(default)]
    pub representative_image_ref: String,
}

impl CategoryRecord {
    /// Create a category with no representative image yet
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            representative_image_ref: String::new(),
        }
    }

    pub fn has_image(&self) -> bool {
        !self.representative_image_ref.is_empty()
    }
}
