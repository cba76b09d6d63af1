//! Structured API failure value.
//!
//! Every failure path of the API layer ends in an [`ApiError`]: transport
//! failures after classification, non-2xx responses, undecodable bodies, and
//! local argument validation. The presentation layer renders
//! [`ApiError::message`] verbatim and may branch on the predicate helpers.

use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Transport-native code reported for a request that timed out.
pub const TIMEOUT_CODE: &str = "ECONNABORTED";

/// Fallback text used by [`format_error_message`] when no error is present.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

/// Shared handle to the failure an [`ApiError`] was classified from.
pub type ErrorSource = Arc<dyn std::error::Error + Send + Sync>;

/// Categorical code attached to every [`ApiError`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The request never produced a response.
    Network,
    /// Local validation or a non-transport failure.
    Unknown,
    /// Code reported by the transport for a failure that carried a response.
    Native(String),
}

impl ErrorCode {
    /// Returns the wire spelling of the code (`NETWORK_ERROR`, `UNKNOWN_ERROR`,
    /// or the native code itself).
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Network => "NETWORK_ERROR",
            Self::Unknown => "UNKNOWN_ERROR",
            Self::Native(code) => code,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A classified API failure.
///
/// Cheap to clone: the underlying failure is shared, not copied.
#[derive(Debug, Clone, Error, Serialize)]
#[error("{message}")]
pub struct ApiError {
    /// User-facing description.
    pub message: String,

    /// HTTP status, absent for network-level and local failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// Categorical code.
    pub code: ErrorCode,

    /// Underlying failure, kept for diagnostics only.
    #[serde(skip)]
    #[source]
    pub source: Option<ErrorSource>,
}

impl ApiError {
    /// Creates an error with the given message and code and no status.
    #[must_use]
    pub fn new(message: impl Into<String>, code: ErrorCode) -> Self {
        Self {
            message: message.into(),
            status: None,
            code,
            source: None,
        }
    }

    /// Creates an `UNKNOWN_ERROR` for an argument rejected before dispatch.
    ///
    /// ```
    /// use storefront::domain::{ApiError, ErrorCode};
    ///
    /// let error = ApiError::validation("Invalid product ID");
    /// assert_eq!(error.code, ErrorCode::Unknown);
    /// assert!(error.status.is_none());
    /// ```
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(message, ErrorCode::Unknown)
    }

    /// Sets the HTTP status.
    #[must_use]
    pub const fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Attaches the underlying failure.
    #[must_use]
    pub fn with_source(mut self, source: Option<ErrorSource>) -> Self {
        self.source = source;
        self
    }

    /// True when no response was received, or the request timed out.
    #[must_use]
    pub fn is_network_error(&self) -> bool {
        matches!(self.code, ErrorCode::Network) || self.code.as_str() == TIMEOUT_CODE
    }

    /// True for errors built with the [`TIMEOUT_CODE`] code or a timeout message.
    ///
    /// Transport timeouts are classified as plain network errors, so they do
    /// not match here.
    #[must_use]
    pub fn is_timeout_error(&self) -> bool {
        self.code.as_str() == TIMEOUT_CODE || self.message.contains("timeout")
    }

    /// True for HTTP 404.
    #[must_use]
    pub fn is_not_found_error(&self) -> bool {
        self.status == Some(404)
    }

    /// True for HTTP 401 and 403.
    #[must_use]
    pub fn is_auth_error(&self) -> bool {
        matches!(self.status, Some(401 | 403))
    }

    /// True for any 5xx status.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status.is_some_and(|status| (500..600).contains(&status))
    }
}

/// Returns the message to show for an optional error.
///
/// ```
/// use storefront::domain::{format_error_message, ApiError};
///
/// assert_eq!(format_error_message(None), "An unknown error occurred");
/// let error = ApiError::validation("Category is required");
/// assert_eq!(format_error_message(Some(&error)), "Category is required");
/// ```
#[must_use]
pub fn format_error_message(error: Option<&ApiError>) -> String {
    error.map_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string(), |e| e.message.clone())
}
