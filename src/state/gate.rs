//! Trigger gate: the single busy/idle cell that keeps sequences from overlapping

use std::{
    fmt,
    sync::{Mutex, MutexGuard},
};

use tokio::time::Instant;
use tracing::debug;

/// Timed sequence that can hold the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sequence {
    BrewCycle,
    PowerOn,
}

impl Sequence {
    pub fn name(self) -> &'static str {
        match self {
            Sequence::BrewCycle => "brew-cycle",
            Sequence::PowerOn => "power-on",
        }
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Idle,
    Busy { holder: Sequence, since: Instant },
}

/// Process-wide busy flag.
///
/// `try_enter` checks and flips under one lock, so two concurrent triggers
/// can never both observe `Idle` and proceed.
#[derive(Debug)]
pub struct TriggerGate {
    state: Mutex<GateState>,
}

impl TriggerGate {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GateState::Idle),
        }
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Move to `Busy` on behalf of `holder`; false if already busy
    pub fn try_enter(&self, holder: Sequence) -> bool {
        let mut state = self.lock();
        match *state {
            GateState::Busy { holder: current, .. } => {
                debug!("Gate held by {}, refusing {}", current, holder);
                false
            }
            GateState::Idle => {
                *state = GateState::Busy {
                    holder,
                    since: Instant::now(),
                };
                debug!("Gate entered by {}", holder);
                true
            }
        }
    }

    /// Run `f` with the gate locked, only if it is idle.
    ///
    /// Nothing can enter the gate while `f` runs, so a press fired from `f`
    /// never overlaps a sequence.
    pub fn if_idle<F>(&self, f: F) -> bool
    where
        F: FnOnce(),
    {
        let state = self.lock();
        if let GateState::Busy { holder, .. } = *state {
            debug!("Gate held by {}, skipping", holder);
            return false;
        }
        f();
        true
    }

    pub fn leave(&self) {
        let mut state = self.lock();
        if let GateState::Busy { holder, .. } = *state {
            debug!("Gate released by {}", holder);
        }
        *state = GateState::Idle;
    }

    pub fn is_busy(&self) -> bool {
        matches!(*self.lock(), GateState::Busy { .. })
    }

    pub fn state(&self) -> GateState {
        *self.lock()
    }
}

impl Default for TriggerGate {
    fn default() -> Self {
        Self::new()
    }
}
