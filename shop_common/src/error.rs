//! Error types for catalog operations

use thiserror::Error;

/// Unified error type for catalog fetches.
///
/// Carries messages rather than source errors so one failed remote call can be
/// handed to every caller waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The remote host could not be reached at all
    #[error("No network: {0}")]
    NoNetwork(String),
    /// Transport failure, non-success status or timeout
    #[error("Remote request failed: {0}")]
    RemoteRequestFailed(String),
    /// Response body did not match the expected shape
    #[error("Decode failed: {0}")]
    DecodeFailed(String),
    /// Thumbnail reference missing, unparseable, or product unknown
    #[error("Invalid reference: {0}")]
    InvalidReference(String),
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl CatalogError {
    /// Message suitable for showing to a shopper.
    pub fn user_message(&self) -> &'static str {
        match self {
            CatalogError::NoNetwork(_) => {
                "No internet connection. Please check your connection and try again."
            }
            CatalogError::RemoteRequestFailed(_) => "The request failed. Please try again.",
            CatalogError::DecodeFailed(_) => {
                "Failed to decode the response. Please try again later."
            }
            CatalogError::InvalidReference(_) | CatalogError::Unknown(_) => {
                "An unknown error occurred. Please try again."
            }
        }
    }

    /// True when the failure came from missing connectivity rather than a bad response.
    pub fn is_no_network(&self) -> bool {
        matches!(self, CatalogError::NoNetwork(_))
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            CatalogError::NoNetwork(err.to_string())
        } else if err.is_decode() {
            CatalogError::DecodeFailed(err.to_string())
        } else {
            CatalogError::RemoteRequestFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::DecodeFailed(err.to_string())
    }
}

/// Result alias for catalog operations
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
