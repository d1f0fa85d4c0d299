//! State management module
//!
//! This module contains the shared mutable state: the trigger gate, the brew
//! counter with its event log, and the application state handed to handlers.

pub mod app_state;
pub mod brew_log;
pub mod gate;

// Re-export main types
pub use app_state::AppState;
pub use brew_log::{load_count, BrewEvent, BrewLog};
pub use gate::{GateState, Sequence, TriggerGate};
