//! Resilient access to the remote catalog.
//!
//! The layer is a stack of independent pieces that callers compose:
//!
//! ```text
//!   ResponseCache::cached_call          (optional, outermost)
//!          │
//!   retry_with_backoff                  (optional)
//!          │
//!   CatalogService::fetch_*             validate ─▶ GET ─▶ decode
//!          │                                  │
//!   Transport::get                      classify(TransportFailure) ─▶ ApiError
//! ```
//!
//! [`ApiCall`] sits beside the stack and records the outcome of whatever
//! composition a screen chooses to run.
//!
//! # Organization
//!
//! - [`classifier`]: Maps raw transport failures to [`ApiError`](crate::domain::ApiError)
//! - [`transport`]: HTTP seam and its `reqwest` implementation
//! - [`cache`]: Time-to-live response cache
//! - [`retry`]: Exponential backoff for transient failures
//! - [`service`]: Catalog endpoints
//! - [`call`]: Fetch-state container

pub mod cache;
pub mod call;
pub mod classifier;
pub mod retry;
pub mod service;
pub mod transport;

pub use cache::{ResponseCache, DEFAULT_TTL};
pub use call::{ApiCall, CallOutcome, OnFailure};
pub use classifier::{classify, TransportFailure};
pub use retry::{backoff_delay, retry_with_backoff, RetryPolicy, Sleeper, TokioSleeper};
pub use service::{check_category, check_product_id, CatalogService};
pub use transport::{endpoint_url, ReqwestTransport, Transport, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
