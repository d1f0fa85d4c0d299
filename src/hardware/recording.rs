//! In-memory output driver used for dry runs and tests

use std::sync::{Mutex, MutexGuard};

use tokio::time::Instant;

use super::{DigitalOutput, Level, LineRole};
use crate::error::OutputError;

/// What was done to a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineAction {
    High,
    Low,
    Toggle,
}

/// One recorded line transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineEvent {
    pub at: Instant,
    pub line: LineRole,
    pub action: LineAction,
    /// Level after the action
    pub level: Level,
}

#[derive(Debug)]
struct Recorded {
    levels: [Level; 4],
    events: Vec<LineEvent>,
}

/// Output driver that keeps line levels in memory and remembers every change
#[derive(Debug)]
pub struct RecordingOutput {
    recorded: Mutex<Recorded>,
}

impl RecordingOutput {
    /// All lines start low
    pub fn new() -> Self {
        Self {
            recorded: Mutex::new(Recorded {
                levels: [Level::Low; 4],
                events: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn apply(&self, line: LineRole, action: LineAction) {
        let mut recorded = self.lock();
        let current = recorded.levels[line.index()];
        let level = match action {
            LineAction::High => Level::High,
            LineAction::Low => Level::Low,
            LineAction::Toggle => current.inverted(),
        };
        recorded.levels[line.index()] = level;
        recorded.events.push(LineEvent {
            at: Instant::now(),
            line,
            action,
            level,
        });
    }

    pub fn level(&self, line: LineRole) -> Level {
        self.lock().levels[line.index()]
    }

    pub fn events(&self) -> Vec<LineEvent> {
        self.lock().events.clone()
    }

    /// Events recorded for a single line, oldest first
    pub fn events_for(&self, line: LineRole) -> Vec<LineEvent> {
        self.lock()
            .events
            .iter()
            .filter(|e| e.line == line)
            .copied()
            .collect()
    }

    /// Number of recorded `action`s on `line`
    pub fn count(&self, line: LineRole, action: LineAction) -> usize {
        self.lock()
            .events
            .iter()
            .filter(|e| e.line == line && e.action == action)
            .count()
    }
}

impl Default for RecordingOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl DigitalOutput for RecordingOutput {
    fn set_high(&self, line: LineRole) -> Result<(), OutputError> {
        self.apply(line, LineAction::High);
        Ok(())
    }

    fn set_low(&self, line: LineRole) -> Result<(), OutputError> {
        self.apply(line, LineAction::Low);
        Ok(())
    }

    fn toggle(&self, line: LineRole) -> Result<(), OutputError> {
        self.apply(line, LineAction::Toggle);
        Ok(())
    }
}
