//! Error types for pin_gallery

use thiserror::Error;

/// Unified error type for pin_gallery operations
#[derive(Debug, Error)]
pub enum GalleryError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Failed to parse JSON response or stored data
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// HTTP error status code
    #[error("HTTP error: {0}")]
    HttpStatus(reqwest::StatusCode),
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GalleryError {
    /// Whether retrying the same request cannot succeed.
    ///
    /// Authorization and rate-limit responses are permanent for the
    /// lifetime of a retry loop; everything else is worth another attempt.
    pub fn is_permanent(&self) -> bool {
        match self {
            GalleryError::HttpStatus(status) => is_permanent_status(*status),
            GalleryError::Config(_) => true,
            _ => false,
        }
    }
}

/// Status classes that are never retried (401, 403, 429)
pub fn is_permanent_status(status: reqwest::StatusCode) -> bool {
    matches!(
        status,
        reqwest::StatusCode::UNAUTHORIZED
            | reqwest::StatusCode::FORBIDDEN
            | reqwest::StatusCode::TOO_MANY_REQUESTS
    )
}

/// Result alias for pin_gallery operations
pub type Result<T> = std::result::Result<T, GalleryError>;
