//! Load phase and screen state types.
//!
//! ```text
//!   Loading ──ProductsLoaded──▶ Ready ──Refresh──▶ Refreshing ──ProductsLoaded──▶ Ready
//!      │                          ▲                    │
//!      └──────Error──▶ Failed ──Retry──▶ Loading       └──Error──▶ Failed
//! ```

use crate::domain::Product;

/// Where the catalog fetch lifecycle currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    /// First load or retry; nothing to show yet.
    Loading,

    /// Forced reload while the previous catalog stays visible.
    Refreshing,

    Ready,

    /// The last load failed; the error is kept in state.
    Failed,
}

impl LoadPhase {
    /// True while a catalog request is outstanding.
    #[must_use]
    pub const fn is_busy(self) -> bool {
        matches!(self, Self::Loading | Self::Refreshing)
    }
}

/// Which screen is shown.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    List,
    Detail(Box<Product>),
}
