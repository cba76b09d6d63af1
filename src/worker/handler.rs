//! Catalog worker: composes cache, retry and service per request.
//!
//! Every catalog fetch runs as
//!
//! ```text
//!   ResponseCache::cached_call(key, force_refresh)
//!       └── retry_with_backoff(policy, sleeper)
//!               └── CatalogService::fetch_*
//! ```
//!
//! so a cache hit costs no request, a miss costs up to `max_retries` requests,
//! and only successes are stored. Argument checks run before the cache, so a
//! bad id or blank category fails at once without a retry.

use crate::api::{
    check_category, check_product_id, retry_with_backoff, CatalogService, ResponseCache, RetryPolicy, Sleeper,
};
use crate::domain::{ApiError, Product};
use crate::worker::{TraceContext, WorkerMessage, WorkerResponse};
use mockable::Clock;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;

const PRODUCTS_KEY: &str = "products";
const CATEGORIES_KEY: &str = "categories";

fn product_key(id: i64) -> String {
    format!("product/{id}")
}

fn category_key(category: &str) -> String {
    format!("products/category/{category}")
}

/// Owns the catalog service and its response caches.
pub struct CatalogWorker {
    service: CatalogService,
    product_lists: ResponseCache<Vec<Product>>,
    products: ResponseCache<Product>,
    categories: ResponseCache<Vec<String>>,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl fmt::Debug for CatalogWorker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogWorker")
            .field("service", &self.service)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl CatalogWorker {
    #[must_use]
    pub fn new(
        service: CatalogService,
        cache_ttl: Duration,
        policy: RetryPolicy,
        sleeper: Arc<dyn Sleeper>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            service,
            product_lists: ResponseCache::new(cache_ttl, clock.clone()),
            products: ResponseCache::new(cache_ttl, clock.clone()),
            categories: ResponseCache::new(cache_ttl, clock),
            policy,
            sleeper,
        }
    }

    /// Processes one request and returns its response.
    ///
    /// The request's trace context, when present, becomes the remote parent of
    /// the handling span.
    pub async fn handle_message(&self, message: WorkerMessage) -> WorkerResponse {
        let span = tracing::debug_span!("worker_handle_message", message_type = message.kind());
        if let Some(context) = message.trace_context() {
            attach_parent_trace_context(&span, context);
        }

        let response = self.dispatch(message).instrument(span.clone()).await;
        if let WorkerResponse::Error(error) = &response {
            span.in_scope(|| tracing::debug!(code = %error.code, status = ?error.status, "request failed"));
        }
        response
    }

    async fn dispatch(&self, message: WorkerMessage) -> WorkerResponse {
        match message {
            WorkerMessage::LoadProducts { force_refresh, .. } => {
                respond(self.load_products(force_refresh).await, |products| {
                    tracing::debug!(product_count = products.len(), "products loaded");
                    WorkerResponse::ProductsLoaded { products }
                })
            }

            WorkerMessage::LoadProduct { id, .. } => respond(self.load_product(id).await, |product| {
                WorkerResponse::ProductLoaded { product }
            }),

            WorkerMessage::LoadCategories { force_refresh, .. } => {
                respond(self.load_categories(force_refresh).await, |categories| {
                    WorkerResponse::CategoriesLoaded { categories }
                })
            }

            WorkerMessage::LoadCategoryProducts {
                category,
                force_refresh,
                ..
            } => respond(
                self.load_category_products(&category, force_refresh).await,
                |products| WorkerResponse::CategoryProductsLoaded { category, products },
            ),

            WorkerMessage::ClearCache { .. } => {
                self.product_lists.clear();
                self.products.clear();
                self.categories.clear();
                tracing::debug!("response caches cleared");
                WorkerResponse::CacheCleared
            }
        }
    }

    async fn load_products(&self, force_refresh: bool) -> Result<Vec<Product>, ApiError> {
        self.product_lists
            .cached_call(
                PRODUCTS_KEY,
                || self.with_retry(|| self.service.fetch_products()),
                force_refresh,
            )
            .await
    }

    async fn load_product(&self, id: i64) -> Result<Product, ApiError> {
        check_product_id(id)?;
        self.products
            .cached_call(
                &product_key(id),
                || self.with_retry(|| self.service.fetch_product_by_id(id)),
                false,
            )
            .await
    }

    async fn load_categories(&self, force_refresh: bool) -> Result<Vec<String>, ApiError> {
        self.categories
            .cached_call(
                CATEGORIES_KEY,
                || self.with_retry(|| self.service.fetch_categories()),
                force_refresh,
            )
            .await
    }

    async fn load_category_products(&self, category: &str, force_refresh: bool) -> Result<Vec<Product>, ApiError> {
        check_category(category)?;
        self.product_lists
            .cached_call(
                &category_key(category),
                || self.with_retry(|| self.service.fetch_products_by_category(category)),
                force_refresh,
            )
            .await
    }

    async fn with_retry<T, F, Fut>(&self, fetch: F) -> Result<T, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, ApiError>>,
    {
        retry_with_backoff(fetch, &self.policy, self.sleeper.as_ref()).await
    }
}

fn respond<T>(result: Result<T, ApiError>, on_success: impl FnOnce(T) -> WorkerResponse) -> WorkerResponse {
    match result {
        Ok(value) => on_success(value),
        Err(error) => WorkerResponse::Error(error),
    }
}

/// Makes the sender's span the remote parent of `span`.
fn attach_parent_trace_context(span: &tracing::Span, context: &TraceContext) {
    use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};
    use tracing_opentelemetry::OpenTelemetrySpanExt;

    let (Ok(trace_id), Ok(span_id)) = (
        TraceId::from_hex(&context.trace_id),
        SpanId::from_hex(&context.parent_span_id),
    ) else {
        tracing::debug!(trace_id = %context.trace_id, "ignoring malformed trace context");
        return;
    };

    let span_context = SpanContext::new(trace_id, span_id, TraceFlags::SAMPLED, true, TraceState::default());
    span.set_parent(opentelemetry::Context::new().with_remote_span_context(span_context));
}
