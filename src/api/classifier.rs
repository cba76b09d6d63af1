//! Classification of raw transport failures into [`ApiError`] values.
//!
//! The classifier is total: every [`TransportFailure`] maps to exactly one
//! [`ApiError`], and classification never fails or logs. Logging the result is
//! the caller's concern.

use crate::domain::{ApiError, ErrorCode, ErrorSource};

/// Message used for every failure that never reached a response.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your internet connection.";

/// Message used for unknown failures that carry no message of their own.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// A failure reported by the transport, before classification.
#[derive(Debug, Clone)]
pub enum TransportFailure {
    /// The connection never completed (DNS, refused, timeout, reset).
    NoResponse {
        /// Transport-native code, e.g. `ERR_NETWORK`. Not carried into the [`ApiError`].
        code: Option<String>,
        /// Underlying failure.
        source: Option<ErrorSource>,
    },

    /// A response arrived with a non-success status.
    Status {
        /// HTTP status code.
        status: u16,
        /// Transport-native code, if the transport assigns one.
        code: Option<String>,
        /// Underlying failure.
        source: Option<ErrorSource>,
    },

    /// Anything else: undecodable bodies, invalid arguments, programmer errors.
    Other {
        /// The failure's own message, if it has one.
        message: Option<String>,
        /// Underlying failure.
        source: Option<ErrorSource>,
    },
}

impl TransportFailure {
    /// Convenience constructor for a bare status failure.
    #[must_use]
    pub const fn status(status: u16) -> Self {
        Self::Status {
            status,
            code: None,
            source: None,
        }
    }

    /// Wraps an arbitrary error as an [`TransportFailure::Other`].
    pub fn other<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Other {
            message: Some(error.to_string()),
            source: Some(std::sync::Arc::new(error)),
        }
    }
}

/// Maps a raw failure to an [`ApiError`].
///
/// `context` names the operation and is only used for statuses without a
/// fixed message, e.g. `"Fetch products failed with status 418"`.
///
/// # Examples
///
/// ```
/// use storefront::api::{classify, TransportFailure};
/// use storefront::domain::ErrorCode;
///
/// let error = classify(TransportFailure::status(404), "Fetch product 3");
/// assert_eq!(error.status, Some(404));
/// assert_eq!(error.message, "The requested resource was not found.");
///
/// let error = classify(TransportFailure::status(418), "Fetch product 3");
/// assert_eq!(error.message, "Fetch product 3 failed with status 418");
/// assert_eq!(error.code, ErrorCode::Native("HTTP_418".to_string()));
/// ```
#[must_use]
pub fn classify(failure: TransportFailure, context: &str) -> ApiError {
    match failure {
        TransportFailure::NoResponse { code: _, source } => {
            ApiError::new(NETWORK_ERROR_MESSAGE, ErrorCode::Network).with_source(source)
        }
        TransportFailure::Status {
            status,
            code,
            source,
        } => {
            let message = status_message(status)
                .map_or_else(|| format!("{context} failed with status {status}"), str::to_string);
            let code = code.unwrap_or_else(|| format!("HTTP_{status}"));
            ApiError::new(message, ErrorCode::Native(code))
                .with_status(status)
                .with_source(source)
        }
        TransportFailure::Other { message, source } => {
            let message = message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| UNEXPECTED_ERROR_MESSAGE.to_string());
            ApiError::new(message, ErrorCode::Unknown).with_source(source)
        }
    }
}

/// Fixed user-facing text for well-known statuses.
const fn status_message(status: u16) -> Option<&'static str> {
    match status {
        400 => Some("Invalid request. Please check your input."),
        401 => Some("Unauthorized. Please log in again."),
        403 => Some("Access denied. You don't have permission to access this resource."),
        404 => Some("The requested resource was not found."),
        429 => Some("Too many requests. Please try again later."),
        500 => Some("Server error. Please try again later."),
        503 => Some("Service temporarily unavailable. Please try again later."),
        _ => None,
    }
}
