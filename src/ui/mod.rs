//! Presentation layer: view models, formatters and a text renderer.
//!
//! ```text
//! AppState → compute_viewmodel → ViewModel → render → String
//! ```
//!
//! - [`viewmodel`]: View model types representing renderable UI state
//! - [`helpers`]: Price, rating and text formatters
//! - [`renderer`]: Plain-text rendering used by the CLI

pub mod helpers;
pub mod renderer;
pub mod viewmodel;

pub use renderer::render;
pub use viewmodel::{
    CategoryChip, DetailViewModel, EmptyState, ErrorBanner, HeaderInfo, ListViewModel, ProductRow,
    SearchBarInfo, ViewModel,
};
