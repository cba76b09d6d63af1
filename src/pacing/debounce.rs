//! Trailing-edge debouncing.
//!
//! Nothing here owns a timer. A [`Debouncer`] records the latest arguments and
//! their deadline; the owner polls it from its own tick, and a due poll hands
//! the arguments back exactly once.

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Holds the most recent pending call until `wait` passes without another.
pub struct Debouncer<A> {
    wait: TimeDelta,
    clock: Arc<dyn Clock>,
    pending: Option<(A, DateTime<Utc>)>,
}

impl<A: fmt::Debug> fmt::Debug for Debouncer<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debouncer")
            .field("wait", &self.wait)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl<A> Debouncer<A> {
    #[must_use]
    pub fn new(wait: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            wait: TimeDelta::from_std(wait).unwrap_or(TimeDelta::MAX),
            clock,
            pending: None,
        }
    }

    /// Replaces any pending call and restarts the quiet window.
    pub fn call(&mut self, args: A) {
        let deadline = self
            .clock
            .utc()
            .checked_add_signed(self.wait)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.pending = Some((args, deadline));
    }

    /// Takes the pending arguments if their deadline has passed.
    pub fn poll(&mut self) -> Option<A> {
        let now = self.clock.utc();
        let due = matches!(&self.pending, Some((_, deadline)) if now >= *deadline);
        if !due {
            return None;
        }
        self.pending.take().map(|(args, _)| args)
    }

    /// Drops the pending call without running it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Time left before the pending call is due; zero when already due,
    /// `None` when nothing is pending.
    #[must_use]
    pub fn time_until_due(&self) -> Option<Duration> {
        let (_, deadline) = self.pending.as_ref()?;
        let remaining = deadline.signed_duration_since(self.clock.utc());
        Some(remaining.to_std().unwrap_or(Duration::ZERO))
    }
}

/// A function wrapped in a [`Debouncer`].
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use storefront::pacing::Debounced;
///
/// let mut seen = Vec::new();
/// let mut search = Debounced::new(
///     |query: String| seen.push(query),
///     Duration::ZERO,
///     Arc::new(mockable::DefaultClock),
/// );
/// search.call("ba".into());
/// search.call("bag".into());
/// assert!(search.poll());
/// drop(search);
/// assert_eq!(seen, vec!["bag".to_string()]);
/// ```
pub struct Debounced<A, F> {
    debouncer: Debouncer<A>,
    func: F,
}

impl<A, F: FnMut(A)> Debounced<A, F> {
    #[must_use]
    pub fn new(func: F, wait: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            debouncer: Debouncer::new(wait, clock),
            func,
        }
    }

    pub fn call(&mut self, args: A) {
        self.debouncer.call(args);
    }

    /// Runs the function with the last arguments if the window has closed.
    /// Returns whether it ran.
    pub fn poll(&mut self) -> bool {
        match self.debouncer.poll() {
            Some(args) => {
                (self.func)(args);
                true
            }
            None => false,
        }
    }

    pub fn cancel(&mut self) {
        self.debouncer.cancel();
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MutableClock;

    #[test]
    fn burst_collapses_to_last_call() {
        let clock = Arc::new(MutableClock::epoch());
        let mut runs = Vec::new();
        {
            let mut debounced = Debounced::new(
                |q: &str| runs.push(q.to_string()),
                Duration::from_millis(300),
                clock.clone(),
            );
            for query in ["b", "ba", "bag", "bags", "bagsy"] {
                debounced.call(query);
                clock.advance_millis(10);
                assert!(!debounced.poll());
            }
            clock.advance_millis(300);
            assert!(debounced.poll());
            assert!(!debounced.poll(), "a due call runs once");
        }
        assert_eq!(runs, vec!["bagsy".to_string()]);
    }

    #[test]
    fn each_call_restarts_the_window() {
        let clock = Arc::new(MutableClock::epoch());
        let mut debouncer = Debouncer::new(Duration::from_millis(300), clock.clone());

        debouncer.call(1);
        clock.advance_millis(250);
        debouncer.call(2);
        clock.advance_millis(250);
        assert_eq!(debouncer.poll(), None);
        assert_eq!(debouncer.time_until_due(), Some(Duration::from_millis(50)));

        clock.advance_millis(50);
        assert_eq!(debouncer.poll(), Some(2));
        assert_eq!(debouncer.time_until_due(), None);
    }

    #[test]
    fn cancel_drops_pending_call() {
        let clock = Arc::new(MutableClock::epoch());
        let mut debouncer = Debouncer::new(Duration::from_millis(300), clock.clone());
        debouncer.call("x");
        debouncer.cancel();
        clock.advance_millis(1000);
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll(), None);
    }
}
