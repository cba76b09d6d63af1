//! HTTP transport for the catalog service.
//!
//! [`Transport`] is the seam between the catalog operations and the network.
//! Production code uses [`ReqwestTransport`]; tests substitute a scripted
//! implementation so no network is touched.

use super::classifier::TransportFailure;
use crate::domain::{Result, StorefrontError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Default base URL of the catalog service.
pub const DEFAULT_BASE_URL: &str = "https://fakestoreapi.com";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Code reported when the request could not be sent or the connection dropped.
pub const NETWORK_CODE: &str = "ERR_NETWORK";
/// Code reported for 4xx responses.
pub const BAD_REQUEST_CODE: &str = "ERR_BAD_REQUEST";
/// Code reported for 5xx responses.
pub const BAD_RESPONSE_CODE: &str = "ERR_BAD_RESPONSE";

/// Performs a single GET and returns the raw body of a 2xx response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> std::result::Result<Vec<u8>, TransportFailure>;
}

/// [`Transport`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Builds a client with the given request timeout and JSON headers.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Client`] if the TLS backend cannot be
    /// initialised.
    pub fn new(timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| StorefrontError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[tracing::instrument(level = "trace", name = "http_get", skip(self, url), fields(url = %url))]
    async fn get(&self, url: &Url) -> std::result::Result<Vec<u8>, TransportFailure> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let code = if status.is_server_error() {
                BAD_RESPONSE_CODE
            } else {
                BAD_REQUEST_CODE
            };
            return Err(TransportFailure::Status {
                status: status.as_u16(),
                code: Some(code.to_string()),
                source: None,
            });
        }

        let body = response.bytes().await.map_err(map_transport_error)?;
        tracing::trace!(status = status.as_u16(), bytes = body.len(), "response received");
        Ok(body.to_vec())
    }
}

/// Maps a `reqwest` failure that produced no usable response.
///
/// Timeouts get the same code as a dropped connection; callers cannot tell
/// them apart.
fn map_transport_error(error: reqwest::Error) -> TransportFailure {
    if error.is_timeout() || error.is_connect() || error.is_request() || error.is_body() {
        return TransportFailure::NoResponse {
            code: Some(NETWORK_CODE.to_string()),
            source: Some(Arc::new(error)),
        };
    }
    TransportFailure::other(error)
}

/// Appends path segments to `base`, percent-encoding each one.
///
/// ```
/// use storefront::api::endpoint_url;
/// use url::Url;
///
/// let base = Url::parse("https://fakestoreapi.com").unwrap();
/// let url = endpoint_url(&base, &["products", "category", "men's clothing"]).unwrap();
/// assert_eq!(url.as_str(), "https://fakestoreapi.com/products/category/men's%20clothing");
/// ```
///
/// # Errors
///
/// Returns [`StorefrontError::Url`] if `base` cannot carry a path.
pub fn endpoint_url(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| StorefrontError::Url(format!("{base} cannot be a base URL")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_handles_trailing_slash() {
        let base = Url::parse("http://localhost:8080/api/").unwrap();
        let url = endpoint_url(&base, &["products", "3"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/products/3");
    }

    #[test]
    fn endpoint_url_encodes_slashes_in_segments() {
        let base = Url::parse("https://fakestoreapi.com").unwrap();
        let url = endpoint_url(&base, &["products", "category", "a/b"]).unwrap();
        assert_eq!(url.path(), "/products/category/a%2Fb");
    }

    fn assert_send<T: Send>(_: &T) {}

    #[test]
    fn request_future_is_send() {
        let transport = ReqwestTransport::new(DEFAULT_TIMEOUT).unwrap();
        let url = Url::parse("http://localhost:9/products").unwrap();
        let future = transport.get(&url);
        assert_send(&future);
    }

    #[test]
    fn rejects_cannot_be_a_base_urls() {
        let base = Url::parse("mailto:shop@example.com").unwrap();
        assert!(matches!(endpoint_url(&base, &["products"]), Err(StorefrontError::Url(_))));
    }
}
