//! Background tasks module
//!
//! The timed sequences that run alongside the HTTP server, and the
//! supervisor that owns their handles.

pub mod brew_cycle;
pub mod power_on;
pub mod supervisor;

// Re-export main functions
pub use brew_cycle::brew_cycle_task;
pub use power_on::power_on_task;
pub use supervisor::TaskSupervisor;
