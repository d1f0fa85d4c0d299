//! Brew Remote - press a coffee machine's buttons over HTTP
//!
//! This library drives the relays wired to the machine's power and brew
//! buttons, keeps overlapping presses out during boot and brew, and counts
//! every brew in a durable log.

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod hardware;
pub mod relay;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::{Config, Timings};
pub use controller::{Controller, TriggerOutcome};
pub use state::AppState;
pub use utils::signals::shutdown_signal;
