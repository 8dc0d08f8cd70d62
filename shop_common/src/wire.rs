//! Remote wire shapes and their conversion into canonical records
//!
//! These are the only types that know the remote field names. Everything past
//! the remote source works with [`ProductRecord`] and [`CategoryRecord`].

use crate::models::{CategoryRecord, ProductRecord};
use serde::Deserialize;

/// Product as returned by the remote catalog
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProduct {
    pub id: u64,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub discount_percentage: f64,
    pub category: String,
}

/// Envelope of the per-category product listing
#[derive(Debug, Deserialize)]
pub struct ProductPage {
    pub products: Vec<RawProduct>,
}

/// Category as returned by the remote catalog
#[derive(Debug, Clone, Deserialize)]
pub struct RawCategory {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub url: String,
}

impl From<RawProduct> for ProductRecord {
    fn from(raw: RawProduct) -> Self {
        ProductRecord {
            id: raw.id,
            title: raw.title,
            price: raw.price.max(0.0),
            thumbnail_ref: raw.thumbnail,
            description: raw.description,
            rating: raw.rating.clamp(0.0, 5.0),
            discount_percentage: raw.discount_percentage.max(0.0),
            category: raw.category,
            thumbnail_bytes: None,
        }
    }
}

impl From<RawCategory> for CategoryRecord {
    fn from(raw: RawCategory) -> Self {
        // `url` is the category's listing endpoint, not an image
        CategoryRecord::new(raw.slug, raw.name)
    }
}
