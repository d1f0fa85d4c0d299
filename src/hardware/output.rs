//! Output line abstraction shared by every driver

use std::{fmt, sync::Arc};

use tracing::{debug, warn};

use crate::error::OutputError;

/// The four lines the controller drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineRole {
    Power,
    Brewer,
    Status,
    Beeper,
}

impl LineRole {
    pub const ALL: [LineRole; 4] = [
        LineRole::Power,
        LineRole::Brewer,
        LineRole::Status,
        LineRole::Beeper,
    ];

    pub fn index(self) -> usize {
        match self {
            LineRole::Power => 0,
            LineRole::Brewer => 1,
            LineRole::Status => 2,
            LineRole::Beeper => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LineRole::Power => "power",
            LineRole::Brewer => "brewer",
            LineRole::Status => "status",
            LineRole::Beeper => "beeper",
        }
    }
}

impl fmt::Display for LineRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Electrical level of an output line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    High,
    Low,
}

impl Level {
    pub fn inverted(self) -> Self {
        match self {
            Level::High => Level::Low,
            Level::Low => Level::High,
        }
    }
}

/// GPIO pin numbers for each line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinMap {
    pub power: u32,
    pub brewer: u32,
    pub status: u32,
    pub beeper: u32,
}

impl PinMap {
    pub fn pin(&self, role: LineRole) -> u32 {
        match role {
            LineRole::Power => self.power,
            LineRole::Brewer => self.brewer,
            LineRole::Status => self.status,
            LineRole::Beeper => self.beeper,
        }
    }
}

/// Write-only digital output capability
pub trait DigitalOutput: Send + Sync {
    fn set_high(&self, line: LineRole) -> Result<(), OutputError>;
    fn set_low(&self, line: LineRole) -> Result<(), OutputError>;
    fn toggle(&self, line: LineRole) -> Result<(), OutputError>;
}

/// A single line bound to the driver that moves it.
///
/// Write failures are logged and otherwise ignored: a sequence that has
/// started always runs to completion.
#[derive(Clone)]
pub struct OutputLine {
    role: LineRole,
    driver: Arc<dyn DigitalOutput>,
}

impl OutputLine {
    pub fn new(role: LineRole, driver: Arc<dyn DigitalOutput>) -> Self {
        Self { role, driver }
    }

    pub fn role(&self) -> LineRole {
        self.role
    }

    pub fn set_high(&self) {
        debug!("{} line high", self.role);
        if let Err(e) = self.driver.set_high(self.role) {
            warn!("Failed to drive {} line high: {}", self.role, e);
        }
    }

    pub fn set_low(&self) {
        debug!("{} line low", self.role);
        if let Err(e) = self.driver.set_low(self.role) {
            warn!("Failed to drive {} line low: {}", self.role, e);
        }
    }

    pub fn toggle(&self) {
        debug!("{} line toggled", self.role);
        if let Err(e) = self.driver.toggle(self.role) {
            warn!("Failed to toggle {} line: {}", self.role, e);
        }
    }
}

impl fmt::Debug for OutputLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputLine").field("role", &self.role).finish()
    }
}
