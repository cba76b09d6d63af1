//! Side effects requested by the event handler.
//!
//! The handler mutates [`AppState`](crate::app::AppState) and returns
//! `Vec<Action>`; the runtime executes them in order. Keeping effects as data
//! lets the state machine be tested without a network or a timer.

use crate::worker::WorkerMessage;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Hands a request to the catalog worker.
    PostToWorker(WorkerMessage),

    /// Asks the runtime to deliver [`Event::Tick`](crate::app::Event::Tick)
    /// after the given delay, so a debounced search can fire.
    ScheduleTick(Duration),

    /// Ends the session.
    Quit,
}
