//! Error types for the storefront crate.
//!
//! This module defines the crate-level error type [`StorefrontError`] and a type
//! alias [`Result`] for failures that are not API failures: configuration
//! loading, URL handling, and HTTP client construction. API failures have their
//! own structured type, [`ApiError`](crate::domain::ApiError), which converts
//! into this one when it has to cross a crate boundary.

use crate::domain::api_error::ApiError;
use thiserror::Error;

/// The main error type for storefront operations outside the API layer.
///
/// # Examples
///
/// ```
/// use storefront::StorefrontError;
///
/// fn validate_config() -> Result<(), StorefrontError> {
///     Err(StorefrontError::Config("base_url must not be empty".to_string()))
/// }
///
/// assert!(validate_config().is_err());
/// ```
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// A catalog request failed after classification.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Filesystem or I/O operation failed.
    ///
    /// Automatically converts from `std::io::Error`.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A URL could not be parsed or extended with path segments.
    #[error("Invalid URL: {0}")]
    Url(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(String),

    /// The worker answered a request with a response of the wrong kind.
    #[error("Worker error: {0}")]
    Worker(String),
}

impl From<toml::de::Error> for StorefrontError {
    fn from(error: toml::de::Error) -> Self {
        Self::Config(format!("failed to parse TOML: {error}"))
    }
}

impl From<url::ParseError> for StorefrontError {
    fn from(error: url::ParseError) -> Self {
        Self::Url(error.to_string())
    }
}

/// A specialized `Result` type for storefront operations.
pub type Result<T> = std::result::Result<T, StorefrontError>;
