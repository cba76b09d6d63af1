//! Application state and view model computation.
//!
//! [`AppState`] is the single source of truth for the list and detail screens.
//! Core data (the full catalog) is kept apart from derived data (visible
//! products, category choices, selection) so every filter pass recomputes the
//! derived part from scratch.
//!
//! # State Components
//!
//! - **Catalog**: every product from the last successful load
//! - **Visible products**: the catalog after [`FilterState::apply`]
//! - **Category choices**: "All" plus each category with its count
//! - **Selection**: cursor into the visible products
//! - **Phase / error**: fetch lifecycle and the last classified failure
//! - **Pacing**: search debouncer and refresh throttle

use super::modes::{LoadPhase, Screen};
use crate::domain::{format_error_message, ApiError, Product};
use crate::pacing::{Debouncer, Throttle};
use crate::query::{category_choices, CategoryChoice, FilterState};
use crate::ui::helpers::{capitalize_words, format_item_count, format_price, format_rating, format_reviews};
use crate::ui::viewmodel::{
    CategoryChip, DetailViewModel, EmptyState, ErrorBanner, HeaderInfo, ListViewModel, ProductRow,
    SearchBarInfo, ViewModel,
};
use crate::Config;
use mockable::Clock;
use std::sync::Arc;

/// Central state of the storefront screens.
#[derive(Debug)]
pub struct AppState {
    /// Full catalog from the last successful load.
    pub products: Vec<Product>,

    /// `products` after the current filters, in catalog order.
    pub visible_products: Vec<Product>,

    pub filters: FilterState,

    pub category_choices: Vec<CategoryChoice>,

    /// Index into `visible_products`; clamped on every filter pass.
    pub selected_index: usize,

    pub phase: LoadPhase,

    /// Last classified failure, cleared when a new load starts.
    pub error: Option<ApiError>,

    pub screen: Screen,

    /// Pending search text, fired by `Tick` once typing pauses.
    pub search: Debouncer<String>,

    /// Limits user-triggered refreshes.
    pub refresh: Throttle,
}

impl AppState {
    /// Creates an empty state in the [`LoadPhase::Loading`] phase.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, config: &Config) -> Self {
        Self {
            products: vec![],
            visible_products: vec![],
            filters: FilterState::default(),
            category_choices: vec![],
            selected_index: 0,
            phase: LoadPhase::Loading,
            error: None,
            screen: Screen::List,
            search: Debouncer::new(config.search_debounce, clock.clone()),
            refresh: Throttle::new(config.refresh_throttle, clock),
        }
    }

    /// Replaces the catalog and re-applies the current filters.
    pub fn replace_catalog(&mut self, products: Vec<Product>) {
        self.products = products;
        self.category_choices = category_choices(&self.products);
        self.apply_filters();
    }

    /// Recomputes the visible products and clamps the selection.
    pub fn apply_filters(&mut self) {
        let _span = tracing::debug_span!(
            "apply_filters",
            total_products = self.products.len(),
            query = %self.filters.search_query,
            category = %self.filters.selected_category
        )
        .entered();

        self.visible_products = self.filters.apply(&self.products);

        if self.visible_products.is_empty() {
            self.selected_index = 0;
        } else {
            self.selected_index = self.selected_index.min(self.visible_products.len() - 1);
        }

        tracing::debug!(visible_count = self.visible_products.len(), "filters applied");
    }

    /// Moves the cursor down, wrapping to the top.
    pub fn move_selection_down(&mut self) {
        if self.visible_products.is_empty() {
            return;
        }
        self.selected_index = (self.selected_index + 1) % self.visible_products.len();
    }

    /// Moves the cursor up, wrapping to the bottom.
    pub fn move_selection_up(&mut self) {
        if self.visible_products.is_empty() {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = self.visible_products.len() - 1;
        } else {
            self.selected_index -= 1;
        }
    }

    #[must_use]
    pub fn selected_product(&self) -> Option<&Product> {
        self.visible_products.get(self.selected_index)
    }

    /// Builds the view model for the current screen.
    #[must_use]
    pub fn compute_viewmodel(&self) -> ViewModel {
        match &self.screen {
            Screen::List => ViewModel::List(self.compute_list()),
            Screen::Detail(product) => ViewModel::Detail(self.compute_detail(product)),
        }
    }

    fn compute_list(&self) -> ListViewModel {
        let is_loading = self.phase == LoadPhase::Loading;
        let error = (self.phase == LoadPhase::Failed).then(|| ErrorBanner {
            title: "Oops!".to_string(),
            message: format_error_message(self.error.as_ref()),
            action_label: "Try Again".to_string(),
        });

        let subtitle = if is_loading {
            "Loading products...".to_string()
        } else {
            format_item_count(self.visible_products.len())
        };

        let chips = self
            .category_choices
            .iter()
            .map(|choice| CategoryChip {
                label: choice.name.clone(),
                count: choice.count,
                is_active: choice.name == self.filters.selected_category,
            })
            .collect();

        let rows = self
            .visible_products
            .iter()
            .enumerate()
            .map(|(index, product)| ProductRow {
                id: product.id,
                title: product.title.clone(),
                category: product.category.clone(),
                price: format_price(product.price),
                rating: format_rating(product.rating.rate),
                is_selected: index == self.selected_index,
            })
            .collect::<Vec<_>>();

        let empty_state = (rows.is_empty() && !is_loading && error.is_none()).then(|| self.compute_empty_state());

        ListViewModel {
            header: HeaderInfo {
                title: "Products".to_string(),
                subtitle,
            },
            search_bar: SearchBarInfo {
                query: self.filters.search_query.clone(),
                placeholder: "Search products...".to_string(),
                editable: !is_loading,
            },
            chips,
            show_clear_filters: self.filters.is_filtering(),
            rows,
            empty_state,
            error,
            is_loading,
            is_refreshing: self.phase == LoadPhase::Refreshing,
        }
    }

    fn compute_empty_state(&self) -> EmptyState {
        if self.filters.is_filtering() {
            EmptyState {
                icon: "🔍".to_string(),
                title: "No Results Found".to_string(),
                message: "We couldn't find any products matching your filters.".to_string(),
                action_label: "Clear Filters".to_string(),
            }
        } else {
            EmptyState {
                icon: "📦".to_string(),
                title: "No Products Found".to_string(),
                message: "We couldn't find any products at the moment.".to_string(),
                action_label: "Refresh".to_string(),
            }
        }
    }

    fn compute_detail(&self, product: &Product) -> DetailViewModel {
        DetailViewModel {
            id: product.id,
            title: product.title.clone(),
            category: capitalize_words(&product.category),
            price: format_price(product.price),
            rating: format_reviews(product.rating.rate, product.rating.count),
            description: product.description.clone(),
            image: product.image.clone(),
            error: self.error.as_ref().map(|e| e.message.clone()),
        }
    }
}
