//! Shop Catalog - storefront product cache and fetch orchestration
//!
//! Products are served cache-first through [`CatalogRepository`], and
//! [`CatalogAggregator`] fetches many categories concurrently, publishing one
//! consistent snapshot once every fetch has finished.

pub mod aggregator;
pub mod api;
pub mod cache;
pub mod config;
pub mod repository;
pub mod sampling;

#[cfg(test)]
pub(crate) mod testing;

pub use aggregator::{CatalogAggregator, CatalogSnapshot};
pub use api::{DummyJsonClient, RemoteCatalogSource};
pub use cache::ProductCache;
pub use config::CatalogConfig;
pub use repository::CatalogRepository;
pub use sampling::{HomeSections, SampleSizes};
pub use shop_common::{CatalogError, CatalogResult, CategoryRecord, ProductRecord};
