//! HTTP client for a dummyjson-compatible product API
//!
//! Uses async reqwest for non-blocking HTTP requests.

use super::RemoteCatalogSource;
use async_trait::async_trait;
use shop_common::{CatalogError, CatalogResult, ProductPage, RawCategory, RawProduct};

/// Public dummyjson instance
pub const DEFAULT_BASE_URL: &str = "https://dummyjson.com";

const USER_AGENT: &str = "ShopCatalog/1.0";

/// Catalog client for `{base}/products/...` endpoints
#[derive(Debug, Clone)]
pub struct DummyJsonClient {
    client: reqwest::Client,
    base_url: String,
}

impl Default for DummyJsonClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl DummyJsonClient {
    /// Create a client against the given base URL (e.g. "https://dummyjson.com")
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn categories_url(&self) -> String {
        format!("{}/products/categories", self.base_url)
    }

    fn products_url(&self, category_id: &str) -> String {
        format!(
            "{}/products/category/{}",
            self.base_url,
            urlencoding::encode(category_id)
        )
    }

    /// GET a URL and return the body of a successful response
    async fn get_bytes(&self, url: &str) -> CatalogResult<Vec<u8>> {
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::RemoteRequestFailed(format!(
                "HTTP {} from {}",
                status, url
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl RemoteCatalogSource for DummyJsonClient {
    async fn list_categories(&self) -> CatalogResult<Vec<RawCategory>> {
        let body = self.get_bytes(&self.categories_url()).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn list_products(&self, category_id: &str) -> CatalogResult<Vec<RawProduct>> {
        let body = self.get_bytes(&self.products_url(category_id)).await?;
        let page: ProductPage = serde_json::from_slice(&body)?;
        log::debug!(
            "Received {} products for category {}",
            page.products.len(),
            category_id
        );
        Ok(page.products)
    }

    async fn fetch_image_bytes(&self, reference: &str) -> CatalogResult<Vec<u8>> {
        self.get_bytes(reference).await
    }
}

#[cfg(test)]
#[path = "dummyjson_tests.rs"]
mod tests;
