//! Product domain model.
//!
//! A [`Product`] is an immutable catalog item decoded from the catalog
//! service's JSON. Products are never mutated after decoding; a refresh
//! replaces the whole catalog.

use serde::{Deserialize, Serialize};

/// Aggregate customer rating of a product.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rating {
    /// Average rating between 0.0 and 5.0.
    pub rate: f64,
    /// Number of ratings the average is computed from.
    pub count: u64,
}

/// A catalog item.
///
/// # Fields
///
/// - `id`: positive catalog identifier
/// - `title`: display name
/// - `price`: non-negative price in the store currency
/// - `category`: free-text classification, compared exactly when filtering
/// - `description`: free-text description
/// - `image`: URI of the product image
/// - `rating`: aggregate rating
///
/// # Examples
///
/// ```
/// use storefront::domain::Product;
///
/// let json = r#"{
///     "id": 1,
///     "title": "Fjallraven Backpack",
///     "price": 109.95,
///     "category": "men's clothing",
///     "description": "Your perfect pack for everyday use",
///     "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
///     "rating": { "rate": 3.9, "count": 120 }
/// }"#;
/// let product: Product = serde_json::from_str(json).unwrap();
/// assert_eq!(product.id, 1);
/// assert_eq!(product.rating.count, 120);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub price: f64,
    pub category: String,
    pub description: String,
    pub image: String,
    #[serde(default)]
    pub rating: Rating,
}

impl Product {
    /// Creates a product with an empty description and image and no ratings.
    ///
    /// Mostly useful for tests and fixtures.
    #[must_use]
    pub fn new(id: u64, title: impl Into<String>, price: f64, category: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            price,
            category: category.into(),
            description: String::new(),
            image: String::new(),
            rating: Rating::default(),
        }
    }

    /// Returns the same product with the given rating.
    #[must_use]
    pub const fn with_rating(mut self, rate: f64, count: u64) -> Self {
        self.rating = Rating { rate, count };
        self
    }
}
