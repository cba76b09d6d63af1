//! Catalog worker for asynchronous fetches.
//!
//! The application layer posts [`WorkerMessage`]s and applies the
//! [`WorkerResponse`]s it gets back, so all network I/O, caching and retrying
//! stays out of the state machine.
//!
//! - `messages`: Request/response protocol types with trace context propagation
//! - `handler`: Worker implementation composing cache, retry and service

pub mod handler;
pub mod messages;

pub use handler::CatalogWorker;
pub use messages::{TraceContext, WorkerMessage, WorkerResponse};
