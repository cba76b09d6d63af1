//! Catalog operations over a [`Transport`].
//!
//! Each operation validates its arguments locally, issues one GET, decodes the
//! JSON body, and classifies any failure into an [`ApiError`]. Failures are
//! logged at `error` before they are returned.

use super::classifier::{classify, TransportFailure};
use super::transport::{endpoint_url, Transport};
use crate::domain::{ApiError, Product};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use url::Url;

/// Remote product catalog.
#[derive(Clone)]
pub struct CatalogService {
    transport: Arc<dyn Transport>,
    base_url: Url,
}

impl fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogService")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl CatalogService {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, base_url: Url) -> Self {
        Self {
            transport,
            base_url,
        }
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /products`
    ///
    /// # Errors
    ///
    /// Returns the classified transport or decode failure.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_products(&self) -> Result<Vec<Product>, ApiError> {
        self.get_json(&["products"], "Fetch products").await
    }

    /// `GET /products/{id}`
    ///
    /// # Errors
    ///
    /// Rejects `id <= 0` with "Invalid product ID" before any request, and
    /// otherwise returns the classified failure.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_product_by_id(&self, id: i64) -> Result<Product, ApiError> {
        check_product_id(id)?;
        let id_segment = id.to_string();
        self.get_json(&["products", &id_segment], &format!("Fetch product {id}"))
            .await
    }

    /// `GET /products/categories`
    ///
    /// # Errors
    ///
    /// Returns the classified transport or decode failure.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_categories(&self) -> Result<Vec<String>, ApiError> {
        self.get_json(&["products", "categories"], "Fetch categories")
            .await
    }

    /// `GET /products/category/{category}`, with the category percent-encoded.
    ///
    /// # Errors
    ///
    /// Rejects a blank category with "Category is required" before any
    /// request, and otherwise returns the classified failure.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_products_by_category(&self, category: &str) -> Result<Vec<Product>, ApiError> {
        check_category(category)?;
        self.get_json(
            &["products", "category", category],
            &format!("Fetch products in category {category}"),
        )
        .await
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str], context: &str) -> Result<T, ApiError> {
        let result = self.request(segments).await.and_then(|body| {
            serde_json::from_slice::<T>(&body).map_err(TransportFailure::other)
        });

        result.map_err(|failure| {
            let error = classify(failure, context);
            tracing::error!(
                context,
                status = ?error.status,
                code = %error.code,
                error = %error.message,
                "catalog request failed"
            );
            error
        })
    }

    async fn request(&self, segments: &[&str]) -> Result<Vec<u8>, TransportFailure> {
        let url = endpoint_url(&self.base_url, segments).map_err(TransportFailure::other)?;
        self.transport.get(&url).await
    }
}

/// Local argument check for [`CatalogService::fetch_product_by_id`].
///
/// # Errors
///
/// "Invalid product ID" when `id <= 0`.
pub fn check_product_id(id: i64) -> Result<(), ApiError> {
    if id <= 0 {
        return Err(ApiError::validation("Invalid product ID"));
    }
    Ok(())
}

/// Local argument check for [`CatalogService::fetch_products_by_category`].
///
/// # Errors
///
/// "Category is required" when `category` is blank after trimming.
pub fn check_category(category: &str) -> Result<(), ApiError> {
    if category.trim().is_empty() {
        return Err(ApiError::validation("Category is required"));
    }
    Ok(())
}
