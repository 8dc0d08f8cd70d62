//! Shop Common - shared storefront catalog types
//!
//! Canonical product and category records, the remote wire shapes they are
//! decoded from, and the error taxonomy used by every catalog operation.

pub mod error;
pub mod models;
pub mod wire;

pub use error::{CatalogError, CatalogResult};
pub use models::{CategoryRecord, ProductRecord};
pub use wire::{ProductPage, RawCategory, RawProduct};
