//! Event handling and state transition logic.
//!
//! [`handle_event`] is the only place [`AppState`] changes. It returns whether
//! the screen needs redrawing and the side effects to run, in order.
//!
//! # Event Types
//!
//! - **Lifecycle**: `Start`, `Retry`, `Refresh`
//! - **Filtering**: `SearchInput`, `Tick`, `SelectCategory`, `ClearFilters`
//! - **Navigation**: `KeyDown`, `KeyUp`, `OpenSelected`, `Back`, `Quit`
//! - **Worker**: `WorkerResponse` with typed response variants

use super::modes::{LoadPhase, Screen};
use crate::app::{Action, AppState};
use crate::domain::error::Result;
use crate::worker::{WorkerMessage, WorkerResponse};

/// Inputs to the state machine.
#[derive(Debug, Clone)]
pub enum Event {
    /// First load when the list screen opens.
    Start,
    /// Reload after a failure, with the loading indicator.
    Retry,
    /// Pull-to-refresh: forced reload keeping the current list visible.
    Refresh,
    /// The search text changed; filtering waits for typing to pause.
    SearchInput(String),
    /// Scheduled wake-up delivered after [`Action::ScheduleTick`].
    Tick,
    SelectCategory(String),
    ClearFilters,
    KeyDown,
    KeyUp,
    /// Opens the detail screen for the selected product.
    OpenSelected,
    /// Returns from the detail screen to the list.
    Back,
    Quit,
    WorkerResponse(WorkerResponse),
}

/// Applies `event` to `state`.
///
/// Returns `(needs_render, actions)`.
///
/// # Errors
///
/// Currently infallible; the signature leaves room for handlers that consult
/// fallible resources.
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    match event {
        Event::Start | Event::Retry => {
            state.phase = LoadPhase::Loading;
            state.error = None;
            Ok((true, vec![Action::PostToWorker(WorkerMessage::load_products(false))]))
        }
        Event::Refresh => {
            if state.phase.is_busy() || !state.refresh.try_acquire() {
                tracing::debug!(phase = ?state.phase, "refresh ignored");
                return Ok((false, vec![]));
            }
            state.phase = LoadPhase::Refreshing;
            state.error = None;
            Ok((true, vec![Action::PostToWorker(WorkerMessage::load_products(true))]))
        }
        Event::SearchInput(query) => {
            state.filters.search_query.clone_from(query);
            state.search.call(query.clone());
            tracing::trace!(query = %query, "search input debounced");

            let wait = state.search.time_until_due().unwrap_or_default();
            Ok((true, vec![Action::ScheduleTick(wait)]))
        }
        Event::Tick => {
            if state.search.poll().is_some() {
                state.apply_filters();
                return Ok((true, vec![]));
            }
            // An earlier tick can arrive after the window was restarted.
            let actions = state
                .search
                .time_until_due()
                .map(|wait| vec![Action::ScheduleTick(wait)])
                .unwrap_or_default();
            Ok((false, actions))
        }
        Event::SelectCategory(category) => {
            if state.filters.selected_category == *category {
                return Ok((false, vec![]));
            }
            state.filters.selected_category.clone_from(category);
            state.apply_filters();
            Ok((true, vec![]))
        }
        Event::ClearFilters => {
            state.filters.clear();
            state.search.cancel();
            state.apply_filters();
            Ok((true, vec![]))
        }
        Event::KeyDown => {
            state.move_selection_down();
            Ok((true, vec![]))
        }
        Event::KeyUp => {
            state.move_selection_up();
            Ok((true, vec![]))
        }
        Event::OpenSelected => {
            let Some(product) = state.selected_product().cloned() else {
                tracing::debug!("no product selected");
                return Ok((false, vec![]));
            };
            tracing::debug!(product_id = product.id, "opening product detail");

            let id = i64::try_from(product.id).unwrap_or(i64::MAX);
            state.error = None;
            state.screen = Screen::Detail(Box::new(product));
            Ok((true, vec![Action::PostToWorker(WorkerMessage::load_product(id))]))
        }
        Event::Back => {
            if state.screen == Screen::List {
                return Ok((false, vec![]));
            }
            state.screen = Screen::List;
            if state.phase != LoadPhase::Failed {
                state.error = None;
            }
            Ok((true, vec![]))
        }
        Event::Quit => Ok((false, vec![Action::Quit])),
        Event::WorkerResponse(response) => Ok(handle_worker_response(state, response)),
    }
}

fn handle_worker_response(state: &mut AppState, response: &WorkerResponse) -> (bool, Vec<Action>) {
    match response {
        WorkerResponse::ProductsLoaded { products } => {
            state.replace_catalog(products.clone());
            state.phase = LoadPhase::Ready;
            state.error = None;
            (true, vec![])
        }
        WorkerResponse::ProductLoaded { product } => match &mut state.screen {
            Screen::Detail(current) if current.id == product.id => {
                **current = product.clone();
                (true, vec![])
            }
            _ => {
                tracing::debug!(product_id = product.id, "product loaded for a closed detail screen");
                (false, vec![])
            }
        },
        WorkerResponse::CategoriesLoaded { categories } => {
            tracing::debug!(category_count = categories.len(), "categories loaded");
            (false, vec![])
        }
        WorkerResponse::CategoryProductsLoaded { category, products } => {
            tracing::debug!(category = %category, product_count = products.len(), "category products loaded");
            (false, vec![])
        }
        WorkerResponse::CacheCleared => (false, vec![]),
        WorkerResponse::Error(error) => {
            tracing::error!(code = %error.code, status = ?error.status, error = %error.message, "catalog load failed");
            if state.phase.is_busy() {
                state.phase = LoadPhase::Failed;
            }
            state.error = Some(error.clone());
            (true, vec![])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ApiError, ErrorCode, Product};
    use crate::test_support::MutableClock;
    use crate::Config;
    use std::sync::Arc;
    use std::time::Duration;

    fn setup() -> (AppState, Arc<MutableClock>) {
        let clock = Arc::new(MutableClock::epoch());
        let state = AppState::new(clock.clone(), &Config::default());
        (state, clock)
    }

    fn catalog() -> Vec<Product> {
        vec![
            Product::new(1, "Backpack", 109.95, "men's clothing"),
            Product::new(2, "Gold Ring", 168.0, "jewelery"),
            Product::new(3, "Silver Ring", 10.99, "jewelery"),
            Product::new(4, "Rain Jacket", 39.99, "women's clothing"),
        ]
    }

    fn loaded() -> (AppState, Arc<MutableClock>) {
        let (mut state, clock) = setup();
        let response = WorkerResponse::ProductsLoaded { products: catalog() };
        handle_event(&mut state, &Event::WorkerResponse(response)).unwrap();
        (state, clock)
    }

    fn visible_ids(state: &AppState) -> Vec<u64> {
        state.visible_products.iter().map(|p| p.id).collect()
    }

    #[test]
    fn start_posts_cached_load() {
        let (mut state, _) = setup();
        let (render, actions) = handle_event(&mut state, &Event::Start).unwrap();
        assert!(render);
        assert!(matches!(
            actions.as_slice(),
            [Action::PostToWorker(WorkerMessage::LoadProducts { force_refresh: false, .. })]
        ));
        assert_eq!(state.phase, LoadPhase::Loading);
    }

    #[test]
    fn products_loaded_fills_catalog_and_categories() {
        let (state, _) = loaded();
        assert_eq!(state.phase, LoadPhase::Ready);
        assert_eq!(visible_ids(&state), vec![1, 2, 3, 4]);
        assert_eq!(state.category_choices[0].count, 4);
        assert_eq!(state.category_choices.len(), 4);
    }

    #[test]
    fn search_is_debounced_until_tick() {
        let (mut state, clock) = loaded();

        for query in ["r", "ri", "rin", "ring"] {
            let (_, actions) = handle_event(&mut state, &Event::SearchInput(query.into())).unwrap();
            assert_eq!(actions, vec![Action::ScheduleTick(Duration::from_millis(300))]);
            clock.advance_millis(50);
        }
        assert_eq!(state.filters.search_query, "ring");
        assert_eq!(visible_ids(&state), vec![1, 2, 3, 4], "filtering waits for the pause");

        let (render, actions) = handle_event(&mut state, &Event::Tick).unwrap();
        assert!(!render);
        assert_eq!(actions, vec![Action::ScheduleTick(Duration::from_millis(250))]);

        clock.advance_millis(250);
        let (render, _) = handle_event(&mut state, &Event::Tick).unwrap();
        assert!(render);
        assert_eq!(visible_ids(&state), vec![2, 3]);
    }

    #[test]
    fn category_applies_immediately_with_current_query() {
        let (mut state, clock) = loaded();
        handle_event(&mut state, &Event::SearchInput("ring".into())).unwrap();
        clock.advance_millis(300);
        handle_event(&mut state, &Event::Tick).unwrap();

        handle_event(&mut state, &Event::SelectCategory("men's clothing".into())).unwrap();
        assert!(visible_ids(&state).is_empty());

        handle_event(&mut state, &Event::SelectCategory("jewelery".into())).unwrap();
        assert_eq!(visible_ids(&state), vec![2, 3]);
    }

    #[test]
    fn clear_filters_cancels_pending_search() {
        let (mut state, clock) = loaded();
        handle_event(&mut state, &Event::SelectCategory("jewelery".into())).unwrap();
        handle_event(&mut state, &Event::SearchInput("gold".into())).unwrap();
        handle_event(&mut state, &Event::ClearFilters).unwrap();

        clock.advance_millis(1000);
        let (render, actions) = handle_event(&mut state, &Event::Tick).unwrap();
        assert!(!render);
        assert!(actions.is_empty());
        assert_eq!(visible_ids(&state), vec![1, 2, 3, 4]);
        assert!(!state.filters.is_filtering());
    }

    #[test]
    fn reload_keeps_filters() {
        let (mut state, _) = loaded();
        handle_event(&mut state, &Event::SelectCategory("jewelery".into())).unwrap();

        let mut fresh = catalog();
        fresh.push(Product::new(5, "Pearl Necklace", 55.0, "jewelery"));
        handle_event(&mut state, &Event::WorkerResponse(WorkerResponse::ProductsLoaded { products: fresh })).unwrap();

        assert_eq!(state.filters.selected_category, "jewelery");
        assert_eq!(visible_ids(&state), vec![2, 3, 5]);
    }

    #[test]
    fn refresh_is_throttled() {
        let (mut state, clock) = loaded();

        let (_, actions) = handle_event(&mut state, &Event::Refresh).unwrap();
        assert!(matches!(
            actions.as_slice(),
            [Action::PostToWorker(WorkerMessage::LoadProducts { force_refresh: true, .. })]
        ));
        assert_eq!(state.phase, LoadPhase::Refreshing);

        handle_event(&mut state, &Event::WorkerResponse(WorkerResponse::ProductsLoaded { products: catalog() })).unwrap();
        clock.advance_millis(100);
        let (render, actions) = handle_event(&mut state, &Event::Refresh).unwrap();
        assert!(!render);
        assert!(actions.is_empty());
    }

    #[test]
    fn error_fails_load_and_retry_clears_it() {
        let (mut state, _) = setup();
        handle_event(&mut state, &Event::Start).unwrap();

        let error = ApiError::new("Server error. Please try again later.", ErrorCode::Unknown).with_status(500);
        handle_event(&mut state, &Event::WorkerResponse(WorkerResponse::Error(error))).unwrap();
        assert_eq!(state.phase, LoadPhase::Failed);
        assert!(state.error.as_ref().is_some_and(ApiError::is_server_error));

        handle_event(&mut state, &Event::Retry).unwrap();
        assert_eq!(state.phase, LoadPhase::Loading);
        assert!(state.error.is_none());
    }

    #[test]
    fn open_and_back_navigate_between_screens() {
        let (mut state, _) = loaded();
        handle_event(&mut state, &Event::KeyDown).unwrap();

        let (render, actions) = handle_event(&mut state, &Event::OpenSelected).unwrap();
        assert!(render);
        assert!(matches!(
            actions.as_slice(),
            [Action::PostToWorker(WorkerMessage::LoadProduct { id: 2, .. })]
        ));
        assert!(matches!(&state.screen, Screen::Detail(product) if product.id == 2));

        let updated = Product::new(2, "Gold Ring (restocked)", 150.0, "jewelery");
        handle_event(&mut state, &Event::WorkerResponse(WorkerResponse::ProductLoaded { product: updated })).unwrap();
        assert!(matches!(&state.screen, Screen::Detail(product) if product.price == 150.0));

        handle_event(&mut state, &Event::Back).unwrap();
        assert_eq!(state.screen, Screen::List);
    }

    #[test]
    fn quit_emits_quit() {
        let (mut state, _) = setup();
        assert_eq!(handle_event(&mut state, &Event::Quit).unwrap(), (false, vec![Action::Quit]));
    }
}
