//! In-memory caching for catalog records and in-flight remote loads

pub mod in_flight;
pub mod product_cache;

pub use in_flight::InFlight;
pub use product_cache::ProductCache;
