//! Call-rate limiting for user-driven events.
//!
//! - [`debounce`]: run once, with the last arguments, after a quiet window
//! - [`throttle`]: run at most once per window, dropping the rest
//!
//! Both read time from an injected [`mockable::Clock`] and are polled by
//! their owner rather than spawning timers.

pub mod debounce;
pub mod throttle;

pub use debounce::{Debounced, Debouncer};
pub use throttle::{Throttle, Throttled};
