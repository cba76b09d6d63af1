//! Worker request and response types.
//!
//! The application layer never calls the catalog directly; it posts a
//! [`WorkerMessage`] and later receives a [`WorkerResponse`]. Each request
//! carries the caller's trace context so the worker's spans join the caller's
//! trace.

use crate::domain::{ApiError, Product};
use serde::{Deserialize, Serialize};

/// Distributed tracing context for linking worker spans to their caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Span ID of the caller's active span.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the trace and span IDs of the current span.
    ///
    /// Returns `None` when no OpenTelemetry layer is installed or the current
    /// span context is invalid.
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            return None;
        }

        let context = Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        };
        tracing::trace!(
            trace_id = %context.trace_id,
            parent_span_id = %context.parent_span_id,
            "captured trace context"
        );
        Some(context)
    }
}

/// Generates constructors that attach the current trace context.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message with current trace context")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    load_products(LoadProducts { force_refresh: bool }),
    load_product(LoadProduct { id: i64 }),
    load_categories(LoadCategories { force_refresh: bool }),
    load_category_products(LoadCategoryProducts { category: String, force_refresh: bool }),
    clear_cache(ClearCache {}),
}

/// Requests handled by the catalog worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Fetch the full catalog.
    LoadProducts {
        /// Skip the cache read; the result still refreshes the cache.
        force_refresh: bool,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Fetch one product.
    LoadProduct {
        id: i64,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Fetch the category names known to the service.
    LoadCategories {
        force_refresh: bool,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Fetch the products of one category.
    LoadCategoryProducts {
        category: String,
        force_refresh: bool,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Drop every cached response.
    ClearCache {
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    /// Trace context attached by the sender, if any.
    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::LoadProducts { trace_context, .. }
            | Self::LoadProduct { trace_context, .. }
            | Self::LoadCategories { trace_context, .. }
            | Self::LoadCategoryProducts { trace_context, .. }
            | Self::ClearCache { trace_context } => trace_context.as_ref(),
        }
    }

    /// Short name used in span and log fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::LoadProducts { .. } => "load_products",
            Self::LoadProduct { .. } => "load_product",
            Self::LoadCategories { .. } => "load_categories",
            Self::LoadCategoryProducts { .. } => "load_category_products",
            Self::ClearCache { .. } => "clear_cache",
        }
    }
}

/// Results posted back by the catalog worker.
#[derive(Debug, Clone, Serialize)]
pub enum WorkerResponse {
    ProductsLoaded { products: Vec<Product> },

    ProductLoaded { product: Product },

    CategoriesLoaded { categories: Vec<String> },

    CategoryProductsLoaded { category: String, products: Vec<Product> },

    CacheCleared,

    /// The request failed after classification and any retries.
    Error(ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_leave_context_empty_without_otel_layer() {
        let message = WorkerMessage::load_products(true);
        assert!(message.trace_context().is_none());
        assert_eq!(message.kind(), "load_products");
    }

    #[test]
    fn messages_round_trip_through_json() {
        let message = WorkerMessage::LoadCategoryProducts {
            category: "jewelery".into(),
            force_refresh: false,
            trace_context: Some(TraceContext {
                trace_id: "0af7651916cd43dd8448eb211c80319c".into(),
                parent_span_id: "b7ad6b7169203331".into(),
            }),
        };
        let json = serde_json::to_string(&message).unwrap();
        let decoded: WorkerMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, message);
    }
}
