//! Hardware module
//!
//! Digital output lines wired to the coffee machine's button relays, the
//! status light and the beeper, plus the drivers that move them.

pub mod output;
pub mod recording;
pub mod status;
pub mod sysfs;

// Re-export main types
pub use output::{DigitalOutput, Level, LineRole, OutputLine, PinMap};
pub use recording::{LineAction, LineEvent, RecordingOutput};
pub use status::StatusIndicator;
pub use sysfs::SysfsGpio;
