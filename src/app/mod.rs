//! Application layer coordinating state, events, and actions.
//!
//! This module sits between the runtime (the CLI in `main.rs`) and the
//! worker, query and pacing layers. Nothing in here performs I/O: the handler
//! mutates state and returns actions, and the runtime executes them.
//!
//! # Architecture
//!
//! ```text
//! User Input → Events → Event Handler → State Mutations → Actions → Side Effects
//!                           ↑                                  ↓
//!                           └──────── Worker Responses ────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing logic and state transitions
//! - [`modes`]: Load phase and screen types
//! - [`state`]: Central application state container and view model computation
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use mockable::DefaultClock;
//! use storefront::app::{handle_event, AppState, Event, LoadPhase};
//! use storefront::Config;
//!
//! let mut state = AppState::new(Arc::new(DefaultClock), &Config::default());
//! let (needs_render, actions) = handle_event(&mut state, &Event::Start)?;
//! assert!(needs_render);
//! assert_eq!(actions.len(), 1);
//! assert_eq!(state.phase, LoadPhase::Loading);
//! # Ok::<(), storefront::StorefrontError>(())
//! ```

pub mod actions;
pub mod handler;
pub mod modes;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use modes::{LoadPhase, Screen};
pub use state::AppState;
