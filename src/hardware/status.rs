//! Status light wrapper

use super::OutputLine;

/// The status light: high while idle, low while a button relay is closed,
/// blinking while the machine boots.
#[derive(Debug, Clone)]
pub struct StatusIndicator {
    line: OutputLine,
}

impl StatusIndicator {
    pub fn new(line: OutputLine) -> Self {
        Self { line }
    }

    /// An actuation is physically in flight
    pub fn busy(&self) {
        self.line.set_low();
    }

    pub fn idle(&self) {
        self.line.set_high();
    }

    pub fn toggle(&self) {
        self.line.toggle();
    }
}
