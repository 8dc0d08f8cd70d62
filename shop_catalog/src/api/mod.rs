//! Remote catalog source: the trait the repository consumes and its HTTP client

pub mod dummyjson;

pub use dummyjson::{DummyJsonClient, DEFAULT_BASE_URL};

use async_trait::async_trait;
use shop_common::{CatalogResult, RawCategory, RawProduct};

/// Remote catalog API boundary.
///
/// Implementations return raw wire records; mapping to canonical records is
/// the repository's job. Retry policy, if any, belongs in the implementation.
#[async_trait]
pub trait RemoteCatalogSource: Send + Sync {
    /// List every category the remote knows about
    async fn list_categories(&self) -> CatalogResult<Vec<RawCategory>>;

    /// List the products of one category
    async fn list_products(&self, category_id: &str) -> CatalogResult<Vec<RawProduct>>;

    /// Download image bytes from a thumbnail reference
    async fn fetch_image_bytes(&self, reference: &str) -> CatalogResult<Vec<u8>>;
}
