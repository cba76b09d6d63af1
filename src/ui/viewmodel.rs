//! View model types representing renderable UI state.
//!
//! View models are computed from [`AppState`](crate::app::AppState) by
//! `compute_viewmodel` and consumed by the renderer. They carry display-ready
//! strings only; every number is already formatted.

use serde::Serialize;

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ViewModel {
    List(ListViewModel),
    Detail(DetailViewModel),
}

/// The product list screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListViewModel {
    pub header: HeaderInfo,
    pub search_bar: SearchBarInfo,

    /// "All" first, then one chip per category.
    pub chips: Vec<CategoryChip>,

    /// Shown while a search or category narrows the list.
    pub show_clear_filters: bool,

    pub rows: Vec<ProductRow>,

    /// Set only when `rows` is empty and nothing is loading or failed.
    pub empty_state: Option<EmptyState>,

    /// Set when the last load failed; replaces the list entirely.
    pub error: Option<ErrorBanner>,

    pub is_loading: bool,
    pub is_refreshing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderInfo {
    pub title: String,
    /// e.g. "20 items available" or "Loading products...".
    pub subtitle: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchBarInfo {
    pub query: String,
    pub placeholder: String,
    pub editable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryChip {
    pub label: String,
    pub count: usize,
    pub is_active: bool,
}

/// One product line in the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRow {
    pub id: u64,
    pub title: String,
    pub category: String,
    pub price: String,
    pub rating: String,
    pub is_selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmptyState {
    pub icon: String,
    pub title: String,
    pub message: String,
    pub action_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBanner {
    pub title: String,
    pub message: String,
    pub action_label: String,
}

/// The product detail screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailViewModel {
    pub id: u64,
    pub title: String,
    pub category: String,
    pub price: String,
    /// e.g. "⭐ 3.9 (120 reviews)".
    pub rating: String,
    pub description: String,
    pub image: String,
    /// Set when refreshing this product failed; the cached copy stays shown.
    pub error: Option<String>,
}
