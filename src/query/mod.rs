//! Catalog query engine.
//!
//! Pure functions over an in-memory product list: filtering by category and
//! title search, and deriving the category chips shown above the list.
//!
//! Filtering runs in two stages, each preserving the original order:
//!
//! ```text
//!   all ──▶ category == selected (unless "All") ──▶ title contains query ──▶ visible
//! ```

use crate::domain::Product;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Pseudo-category that disables category filtering.
pub const ALL: &str = "All";

/// Returns the products matching `selected_category` and `search_query`.
///
/// Category matching is exact and case-sensitive. The search stage is skipped
/// when the query is blank after trimming; otherwise a product matches when
/// its lower-cased title contains the lower-cased query as typed.
///
/// ```
/// use storefront::domain::Product;
/// use storefront::query::filter_products;
///
/// let all = vec![
///     Product::new(1, "Backpack", 109.95, "men's clothing"),
///     Product::new(2, "Ring", 9.99, "jewelery"),
/// ];
/// let visible = filter_products(&all, "PACK", "All");
/// assert_eq!(visible.len(), 1);
/// assert_eq!(visible[0].id, 1);
/// ```
#[must_use]
pub fn filter_products(all: &[Product], search_query: &str, selected_category: &str) -> Vec<Product> {
    let _span = tracing::trace_span!("filter_products", total = all.len()).entered();

    let search = if search_query.trim().is_empty() {
        None
    } else {
        Some(search_query.to_lowercase())
    };

    all.iter()
        .filter(|p| selected_category == ALL || p.category == selected_category)
        .filter(|p| {
            search
                .as_deref()
                .map_or(true, |needle| p.title.to_lowercase().contains(needle))
        })
        .cloned()
        .collect()
}

/// Distinct categories, sorted.
#[must_use]
pub fn categories(all: &[Product]) -> Vec<String> {
    all.iter()
        .map(|p| p.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Number of products in `category`; [`ALL`] counts everything.
#[must_use]
pub fn category_count(all: &[Product], category: &str) -> usize {
    if category == ALL {
        return all.len();
    }
    all.iter().filter(|p| p.category == category).count()
}

/// A selectable category with its product count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryChoice {
    pub name: String,
    pub count: usize,
}

/// [`ALL`] with the total count, followed by every category in order.
///
/// A category literally named [`ALL`] gets no chip of its own. Its products
/// are still counted in the total.
#[must_use]
pub fn category_choices(all: &[Product]) -> Vec<CategoryChoice> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for product in all.iter().filter(|p| p.category != ALL) {
        *counts.entry(product.category.as_str()).or_default() += 1;
    }

    std::iter::once(CategoryChoice {
        name: ALL.to_string(),
        count: all.len(),
    })
    .chain(counts.into_iter().map(|(name, count)| CategoryChoice {
        name: name.to_string(),
        count,
    }))
    .collect()
}

/// Current search text and category selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub search_query: String,
    pub selected_category: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search_query: String::new(),
            selected_category: ALL.to_string(),
        }
    }
}

impl FilterState {
    #[must_use]
    pub fn new(search_query: impl Into<String>, selected_category: impl Into<String>) -> Self {
        Self {
            search_query: search_query.into(),
            selected_category: selected_category.into(),
        }
    }

    #[must_use]
    pub fn apply(&self, all: &[Product]) -> Vec<Product> {
        filter_products(all, &self.search_query, &self.selected_category)
    }

    /// True when either stage would narrow the list.
    #[must_use]
    pub fn is_filtering(&self) -> bool {
        !self.search_query.trim().is_empty() || self.selected_category != ALL
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Product> {
        vec![
            Product::new(1, "Fjallraven Backpack", 109.95, "men's clothing"),
            Product::new(2, "Slim Fit T-Shirt", 22.3, "men's clothing"),
            Product::new(3, "Gold Ring", 168.0, "jewelery"),
            Product::new(4, "Rain Jacket", 39.99, "women's clothing"),
            Product::new(5, "SSD 1TB", 109.0, "electronics"),
        ]
    }

    fn ids(products: &[Product]) -> Vec<u64> {
        products.iter().map(|p| p.id).collect()
    }

    #[test]
    fn no_filters_returns_everything_in_order() {
        let all = catalog();
        assert_eq!(filter_products(&all, "", ALL), all);
        assert_eq!(filter_products(&all, "   ", ALL), all);
    }

    #[test]
    fn category_is_exact_and_case_sensitive() {
        let all = catalog();
        assert_eq!(ids(&filter_products(&all, "", "men's clothing")), vec![1, 2]);
        assert!(filter_products(&all, "", "Men's Clothing").is_empty());
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let all = catalog();
        assert_eq!(ids(&filter_products(&all, "RING", ALL)), vec![3]);
        assert_eq!(ids(&filter_products(&all, "jack", ALL)), vec![4]);
        assert_eq!(ids(&filter_products(&all, "ja", ALL)), vec![1, 4]);
    }

    #[test]
    fn both_stages_combine() {
        let all = catalog();
        assert_eq!(ids(&filter_products(&all, "t", "men's clothing")), vec![2]);
        assert!(filter_products(&all, "ring", "electronics").is_empty());
    }

    #[test]
    fn surrounding_whitespace_is_kept_for_matching() {
        let all = catalog();
        assert_eq!(ids(&filter_products(&all, " jacket", ALL)), vec![4]);
        assert!(filter_products(&all, "jacket ", ALL).is_empty());
    }

    #[test]
    fn filtering_is_idempotent() {
        let all = catalog();
        let once = filter_products(&all, "a", "men's clothing");
        let twice = filter_products(&once, "a", "men's clothing");
        assert_eq!(once, twice);
    }

    #[test]
    fn categories_are_unique_and_sorted() {
        assert_eq!(
            categories(&catalog()),
            vec!["electronics", "jewelery", "men's clothing", "women's clothing"]
        );
        assert!(categories(&[]).is_empty());
    }

    #[test]
    fn choices_start_with_all_and_counts_add_up() {
        let all = catalog();
        let choices = category_choices(&all);
        assert_eq!(choices[0], CategoryChoice { name: ALL.into(), count: 5 });
        let per_category: usize = choices[1..].iter().map(|c| c.count).sum();
        assert_eq!(per_category, all.len());
        assert_eq!(category_count(&all, "men's clothing"), 2);
        assert_eq!(category_count(&all, ALL), 5);
        assert_eq!(category_count(&all, "toys"), 0);
    }

    #[test]
    fn a_category_named_all_does_not_duplicate_the_chip() {
        let mut all = catalog();
        all.push(Product::new(6, "Mystery Box", 5.0, ALL));

        let choices = category_choices(&all);
        let names: Vec<&str> = choices.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec![ALL, "electronics", "jewelery", "men's clothing", "women's clothing"]
        );
        assert_eq!(choices[0].count, 6);
    }

    #[test]
    fn filter_state_tracks_activity() {
        let mut state = FilterState::default();
        assert!(!state.is_filtering());

        state.search_query = "  ".into();
        assert!(!state.is_filtering());

        state.selected_category = "jewelery".into();
        assert!(state.is_filtering());
        assert_eq!(ids(&state.apply(&catalog())), vec![3]);

        state.clear();
        assert_eq!(state, FilterState::default());
    }
}
