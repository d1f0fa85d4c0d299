//! Process utilities
//!
//! Signal handling used to stop the server and release the relays.

pub mod signals;

pub use signals::shutdown_signal;
