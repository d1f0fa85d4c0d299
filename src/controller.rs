//! The three trigger intents offered to the HTTP layer

use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    config::Timings,
    hardware::{DigitalOutput, LineRole, OutputLine, StatusIndicator},
    relay::{Button, RelayActuator},
    state::{BrewLog, GateState, Sequence, TriggerGate},
    tasks::{brew_cycle_task, power_on_task, TaskSupervisor},
};

/// Result of a trigger request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerOutcome {
    pub accepted: bool,
    /// Brew count after the request, for brews counted immediately
    pub brew_count: Option<u64>,
}

impl TriggerOutcome {
    pub fn rejected() -> Self {
        Self {
            accepted: false,
            brew_count: None,
        }
    }

    pub fn accepted() -> Self {
        Self {
            accepted: true,
            brew_count: None,
        }
    }

    pub fn brewed(count: u64) -> Self {
        Self {
            accepted: true,
            brew_count: Some(count),
        }
    }
}

/// Owns the gate, the relays and the brew log, and runs the sequences
#[derive(Debug)]
pub struct Controller {
    gate: Arc<TriggerGate>,
    relay: Arc<RelayActuator>,
    status: StatusIndicator,
    log: Arc<BrewLog>,
    supervisor: Arc<TaskSupervisor>,
    timings: Timings,
}

impl Controller {
    /// Bind the lines to `output` and switch the status light to idle
    pub fn new(output: Arc<dyn DigitalOutput>, log: BrewLog, timings: Timings) -> Self {
        let line = |role| OutputLine::new(role, Arc::clone(&output));
        let gate = Arc::new(TriggerGate::new());
        let supervisor = Arc::new(TaskSupervisor::new());
        let status = StatusIndicator::new(line(LineRole::Status));
        let relay = Arc::new(RelayActuator::new(
            line(LineRole::Power),
            line(LineRole::Brewer),
            line(LineRole::Beeper),
            status.clone(),
            Arc::clone(&gate),
            Arc::clone(&supervisor),
        ));

        status.idle();

        Self {
            gate,
            relay,
            status,
            log: Arc::new(log),
            supervisor,
            timings,
        }
    }

    /// Sound the startup chime in the background
    pub fn announce_startup(&self) {
        let relay = Arc::clone(&self.relay);
        let chime = self.timings.startup_chime;
        self.supervisor.spawn("startup-chime", async move {
            relay.beep(1, chime, std::time::Duration::ZERO).await;
        });
    }

    /// Press the power button on its own
    pub fn trigger_power(&self) -> TriggerOutcome {
        info!("Pressing power button");
        if self.relay.pulse(Button::Power, self.timings.button_press) {
            TriggerOutcome::accepted()
        } else {
            TriggerOutcome::rejected()
        }
    }

    /// Press brew, count it, and lock the buttons for the brew cycle
    pub fn trigger_brew(&self) -> TriggerOutcome {
        info!("Pressing brew button");
        if !self.gate.try_enter(Sequence::BrewCycle) {
            warn!("Rejecting brew, machine is busy");
            return TriggerOutcome::rejected();
        }

        self.relay.fire(Button::Brewer, self.timings.button_press);
        let (count, event) = self.log.count_brew();

        self.supervisor.spawn(
            Sequence::BrewCycle.name(),
            brew_cycle_task(
                Arc::clone(&self.gate),
                Arc::clone(&self.relay),
                Arc::clone(&self.log),
                event,
                self.timings,
            ),
        );

        TriggerOutcome::brewed(count)
    }

    /// Press power, wait for the machine to boot, then brew
    pub fn trigger_combined(&self) -> TriggerOutcome {
        info!("Pressing power and brew buttons");
        if !self.gate.try_enter(Sequence::PowerOn) {
            warn!("Rejecting power and brew, machine is busy");
            return TriggerOutcome::rejected();
        }

        self.relay.fire(Button::Power, self.timings.button_press);

        self.supervisor.spawn(
            Sequence::PowerOn.name(),
            power_on_task(
                Arc::clone(&self.gate),
                Arc::clone(&self.relay),
                self.status.clone(),
                Arc::clone(&self.log),
                self.timings,
            ),
        );

        TriggerOutcome::accepted()
    }

    pub fn brew_count(&self) -> u64 {
        self.log.count()
    }

    pub fn is_busy(&self) -> bool {
        self.gate.is_busy()
    }

    pub fn gate_state(&self) -> GateState {
        self.gate.state()
    }

    pub fn log(&self) -> &BrewLog {
        &self.log
    }

    pub fn timings(&self) -> Timings {
        self.timings
    }

    pub fn supervisor(&self) -> &TaskSupervisor {
        &self.supervisor
    }

    /// Drive the relays and beeper low before exiting
    pub fn release_outputs(&self) {
        info!("Releasing relay lines");
        self.relay.release();
    }
}
