//! Relay actuator: presses the machine's buttons by pulsing their lines

use std::{sync::Arc, time::Duration};

use tokio::time::sleep;
use tracing::{info, warn};

use crate::{
    hardware::{OutputLine, StatusIndicator},
    state::TriggerGate,
    tasks::TaskSupervisor,
};

/// A physical button wired through a relay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Power,
    Brewer,
}

impl Button {
    pub fn name(self) -> &'static str {
        match self {
            Button::Power => "power",
            Button::Brewer => "brew",
        }
    }
}

/// Drives the power, brewer and beeper lines.
///
/// A pulse holds the button line high for the requested duration and keeps
/// the status light low while it does.
#[derive(Debug)]
pub struct RelayActuator {
    power: OutputLine,
    brewer: OutputLine,
    beeper: OutputLine,
    status: StatusIndicator,
    gate: Arc<TriggerGate>,
    supervisor: Arc<TaskSupervisor>,
}

impl RelayActuator {
    pub fn new(
        power: OutputLine,
        brewer: OutputLine,
        beeper: OutputLine,
        status: StatusIndicator,
        gate: Arc<TriggerGate>,
        supervisor: Arc<TaskSupervisor>,
    ) -> Self {
        Self {
            power,
            brewer,
            beeper,
            status,
            gate,
            supervisor,
        }
    }

    fn line(&self, button: Button) -> &OutputLine {
        match button {
            Button::Power => &self.power,
            Button::Brewer => &self.brewer,
        }
    }

    /// Press `button` for `duration` unless a sequence holds the gate.
    ///
    /// Returns once the press is scheduled; the gate itself is left untouched.
    /// The press is scheduled under the gate lock, so no sequence can enter
    /// between the check and the press.
    pub fn pulse(&self, button: Button, duration: Duration) -> bool {
        if duration.is_zero() {
            warn!("Refusing zero-length {} press", button.name());
            return false;
        }
        let fired = self.gate.if_idle(|| self.fire(button, duration));
        if !fired {
            warn!("Rejecting {} press, machine is busy", button.name());
        }
        fired
    }

    /// Press `button` without consulting the gate. Only for callers that
    /// already hold it.
    pub fn fire(&self, button: Button, duration: Duration) {
        info!("Pressing {} button for {}ms", button.name(), duration.as_millis());
        let line = self.line(button).clone();
        let status = self.status.clone();
        self.supervisor.spawn("pulse", async move {
            line.set_high();
            status.busy();
            sleep(duration).await;
            line.set_low();
            status.idle();
        });
    }

    /// Sound the beeper `times` times, each a pause of `off` then a tone of `on`
    pub async fn beep(&self, times: u32, on: Duration, off: Duration) {
        for _ in 0..times {
            sleep(off).await;
            self.beeper.set_high();
            sleep(on).await;
            self.beeper.set_low();
        }
    }

    /// Open every relay and silence the beeper
    pub fn release(&self) {
        self.power.set_low();
        self.brewer.set_low();
        self.beeper.set_low();
    }
}
