//! Application layer coordinating form state, events, and actions.
//!
//! This module sits between the runtime (which owns the network call and the
//! presentation sink) and the domain layer. It implements the event-driven
//! submission workflow.
//!
//! # Architecture
//!
//! ```text
//! User Input → Events → Event Handler → State Mutations → Actions → Side Effects
//!                           ↑                                  ↓
//!                           └──────── Generation Outcome ──────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing logic and state transition coordinator
//! - [`modes`]: Workflow phase state machine
//! - [`state`]: Form state container and view model computation

pub mod actions;
pub mod handler;
pub mod modes;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use modes::WorkflowPhase;
pub use state::AppState;
