//! Domain layer for the storefront crate.
//!
//! This module contains the core value types, independent of transport or
//! presentation concerns.
//!
//! # Organization
//!
//! - [`api_error`]: Structured API failure value and its predicates
//! - [`error`]: Crate-level error type and result alias
//! - [`product`]: Product and rating model
//!
//! # Examples
//!
//! ```
//! use storefront::domain::{Product, Result};
//!
//! fn sample() -> Result<Product> {
//!     Ok(Product::new(1, "Backpack", 109.95, "men's clothing"))
//! }
//! ```

pub mod api_error;
pub mod error;
pub mod product;

pub use api_error::{format_error_message, ApiError, ErrorCode, ErrorSource};
pub use error::{Result, StorefrontError};
pub use product::{Product, Rating};
