//! Power-on sequence: wait for the machine to boot, then brew

use std::sync::Arc;

use tokio::time::{interval_at, sleep, Instant};
use tracing::{info, warn};

use crate::{
    config::Timings,
    hardware::StatusIndicator,
    relay::{Button, RelayActuator},
    state::{BrewLog, TriggerGate},
};

/// Blink the status light while the machine boots, then press brew.
///
/// The caller must already have entered the gate for `Sequence::PowerOn` and
/// pressed power. The brew press happens after the gate is released, so a
/// request arriving in between can still take it first.
pub async fn power_on_task(
    gate: Arc<TriggerGate>,
    relay: Arc<RelayActuator>,
    status: StatusIndicator,
    log: Arc<BrewLog>,
    timings: Timings,
) {
    info!(
        "Booting the machine, rejecting requests for the next {} seconds",
        timings.boot.as_secs()
    );

    let boot = sleep(timings.boot);
    tokio::pin!(boot);
    let mut blink = interval_at(Instant::now() + timings.blink, timings.blink);

    loop {
        tokio::select! {
            biased;
            _ = &mut boot => {
                info!("Machine booted");
                break;
            }
            _ = blink.tick() => status.toggle(),
        }
    }

    gate.leave();
    status.idle();

    if relay.pulse(Button::Brewer, timings.button_press) {
        let count = log.record_brew().await;
        info!("Brewing coffee number #{} after boot", count);
    } else {
        warn!("Brew press after boot rejected, another sequence took the machine");
    }
}
