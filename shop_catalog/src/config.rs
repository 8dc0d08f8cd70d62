//! Runtime configuration for the catalog layer

use crate::api::DEFAULT_BASE_URL;
use crate::sampling::SampleSizes;
use std::time::Duration;

/// Default upper bound on a single remote call
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration shared by the repository, aggregator and binary.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogConfig {
    /// Base URL of the remote catalog API
    pub base_url: String,
    /// Timeout applied to every remote call; expiry counts as a failed fetch
    pub request_timeout: Duration,
    /// Sizes of the derived home-screen sections
    pub sample_sizes: SampleSizes,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            sample_sizes: SampleSizes::default(),
        }
    }
}

impl CatalogConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the remote base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the home-screen section sizes.
    pub fn with_sample_sizes(mut self, sizes: SampleSizes) -> Self {
        self.sample_sizes = sizes;
        self
    }
}
