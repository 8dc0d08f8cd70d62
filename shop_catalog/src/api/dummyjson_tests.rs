//! Tests for the dummyjson HTTP client.

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::DummyJsonClient;
use crate::api::RemoteCatalogSource;
use shop_common::CatalogError;

/// Helper: creates a minimal product JSON value for mock responses.
fn product_json(id: u64, category: &str, thumbnail: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": format!("Product {}", id),
        "description": "Test product",
        "category": category,
        "price": 9.99,
        "discountPercentage": 10.5,
        "rating": 4.2,
        "stock": 12,
        "thumbnail": thumbnail
    })
}

// ── list_products ────────────────────────────────────────────────────

#[tokio::test]
async fn list_products_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/category/beauty"))
        .and(header("User-Agent", "ShopCatalog/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "products": [
                product_json(1, "beauty", "https://cdn.test/1.png"),
                product_json(2, "beauty", "https://cdn.test/2.png")
            ],
            "total": 2,
            "skip": 0,
            "limit": 30
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = DummyJsonClient::new(mock_server.uri());
    let products = client.list_products("beauty").await.unwrap();

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].id, 1);
    assert_eq!(products[0].thumbnail, "https://cdn.test/1.png");
    assert_eq!(products[1].discount_percentage, 10.5);
}

#[tokio::test]
async fn list_products_empty_category() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/category/fragrances"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "products": [] })),
        )
        .mount(&mock_server)
        .await;

    let client = DummyJsonClient::new(mock_server.uri());
    let products = client.list_products("fragrances").await.unwrap();
    assert!(products.is_empty());
}

#[tokio::test]
async fn list_products_encodes_slug() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/category/home%20decoration"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "products": [] })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = DummyJsonClient::new(mock_server.uri());
    assert!(client.list_products("home decoration").await.is_ok());
}

#[tokio::test]
async fn list_products_http_error_is_request_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/category/beauty"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = DummyJsonClient::new(mock_server.uri());
    match client.list_products("beauty").await {
        Err(CatalogError::RemoteRequestFailed(msg)) => assert!(msg.contains("500")),
        other => panic!("Expected RemoteRequestFailed, got: {other:?}"),
    }
}

#[tokio::test]
async fn list_products_bad_body_is_decode_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/category/beauty"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    let client = DummyJsonClient::new(mock_server.uri());
    let result = client.list_products("beauty").await;
    assert!(matches!(result, Err(CatalogError::DecodeFailed(_))));
}

#[tokio::test]
async fn unreachable_host_is_no_network() {
    // Nothing listens on port 1
    let client = DummyJsonClient::new("http://127.0.0.1:1");
    let result = client.list_products("beauty").await;

    match result {
        Err(err) => assert!(err.is_no_network(), "Expected NoNetwork, got: {err:?}"),
        Ok(_) => panic!("Expected connection failure"),
    }
}

// ── list_categories ──────────────────────────────────────────────────

#[tokio::test]
async fn list_categories_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "slug": "beauty", "name": "Beauty", "url": "https://dummyjson.com/products/category/beauty" },
            { "slug": "fragrances", "name": "Fragrances", "url": "https://dummyjson.com/products/category/fragrances" }
        ])))
        .mount(&mock_server)
        .await;

    let client = DummyJsonClient::new(mock_server.uri());
    let categories = client.list_categories().await.unwrap();

    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0].slug, "beauty");
    assert_eq!(categories[1].name, "Fragrances");
}

// ── fetch_image_bytes ────────────────────────────────────────────────

#[tokio::test]
async fn fetch_image_bytes_success() {
    let mock_server = MockServer::start().await;
    let png = vec![0x89, 0x50, 0x4E, 0x47];

    Mock::given(method("GET"))
        .and(path("/products/1/thumbnail.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png.clone()))
        .mount(&mock_server)
        .await;

    let client = DummyJsonClient::default();
    let url = format!("{}/products/1/thumbnail.png", mock_server.uri());
    let bytes = client.fetch_image_bytes(&url).await.unwrap();

    assert_eq!(bytes, png);
}

#[tokio::test]
async fn fetch_image_bytes_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = DummyJsonClient::default();
    let url = format!("{}/missing.png", mock_server.uri());
    let result = client.fetch_image_bytes(&url).await;

    assert!(matches!(result, Err(CatalogError::RemoteRequestFailed(_))));
}

// ── construction ─────────────────────────────────────────────────────

#[test]
fn base_url_trailing_slash_trimmed() {
    let client = DummyJsonClient::new("https://dummyjson.com/");
    assert_eq!(client.base_url(), "https://dummyjson.com");
    assert_eq!(
        client.products_url("beauty"),
        "https://dummyjson.com/products/category/beauty"
    );
    assert_eq!(
        client.categories_url(),
        "https://dummyjson.com/products/categories"
    );
}
