//! Brew-cycle sequence started by a direct brew press

use std::sync::Arc;

use tokio::time::sleep;
use tracing::info;

use crate::{
    config::Timings,
    relay::RelayActuator,
    state::{BrewEvent, BrewLog, TriggerGate},
};

/// Persist the counted brew, hold the gate for the simulated brew, release
/// it, then beep.
///
/// The caller must already have entered the gate for `Sequence::BrewCycle`.
pub async fn brew_cycle_task(
    gate: Arc<TriggerGate>,
    relay: Arc<RelayActuator>,
    log: Arc<BrewLog>,
    event: BrewEvent,
    timings: Timings,
) {
    log.append(&event).await;

    info!(
        "Brewing, rejecting requests for the next {} seconds",
        timings.brew_lockout.as_secs()
    );
    sleep(timings.brew_lockout).await;
    gate.leave();

    info!("Brew finished");
    relay
        .beep(timings.beep_count, timings.beep_on, timings.beep_off)
        .await;
}
