//! Leading-edge throttling without a trailing call.

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Admits one acquisition per `limit`; acquisitions during the cooldown are
/// refused and forgotten.
pub struct Throttle {
    limit: TimeDelta,
    clock: Arc<dyn Clock>,
    cooldown_until: Option<DateTime<Utc>>,
}

impl fmt::Debug for Throttle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Throttle")
            .field("limit", &self.limit)
            .field("cooldown_until", &self.cooldown_until)
            .finish_non_exhaustive()
    }
}

impl Throttle {
    #[must_use]
    pub fn new(limit: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            limit: TimeDelta::from_std(limit).unwrap_or(TimeDelta::MAX),
            clock,
            cooldown_until: None,
        }
    }

    /// Returns `true` and starts a cooldown if none is running.
    pub fn try_acquire(&mut self) -> bool {
        let now = self.clock.utc();
        if self.cooldown_until.is_some_and(|until| now < until) {
            return false;
        }
        let until = now
            .checked_add_signed(self.limit)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.cooldown_until = Some(until);
        true
    }

    /// True while acquisitions would be refused.
    #[must_use]
    pub fn is_cooling_down(&self) -> bool {
        let now = self.clock.utc();
        self.cooldown_until.is_some_and(|until| now < until)
    }
}

/// A function wrapped in a [`Throttle`].
pub struct Throttled<A, F> {
    throttle: Throttle,
    func: F,
    _args: std::marker::PhantomData<fn(A)>,
}

impl<A, F: FnMut(A)> Throttled<A, F> {
    #[must_use]
    pub fn new(func: F, limit: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            throttle: Throttle::new(limit, clock),
            func,
            _args: std::marker::PhantomData,
        }
    }

    /// Runs the function now unless a cooldown is active. Returns whether it
    /// ran.
    pub fn call(&mut self, args: A) -> bool {
        if !self.throttle.try_acquire() {
            tracing::trace!("throttled call dropped");
            return false;
        }
        (self.func)(args);
        true
    }
}
