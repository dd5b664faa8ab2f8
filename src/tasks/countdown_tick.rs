//! Countdown tick background task

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use super::ticker::Tick;
use crate::{controller::TickOutcome, state::AppState};

/// Background task that applies scheduled ticks to the countdown, one at a time
pub async fn countdown_tick_task(state: Arc<AppState>, mut tick_rx: mpsc::UnboundedReceiver<Tick>) {
    info!("Starting countdown tick task");

    while let Some(tick) = tick_rx.recv().await {
        match state.apply_tick(tick) {
            Ok(TickOutcome::Finished) => {
                info!("Countdown reached 0:00");
            }
            Ok(TickOutcome::Counting(remaining_millis)) => {
                debug!("Tick applied, {}ms remaining", remaining_millis);
            }
            Ok(TickOutcome::Ignored) => {}
            Err(e) => {
                error!("Failed to apply countdown tick: {}", e);
            }
        }
    }

    debug!("Tick channel closed, countdown tick task exiting");
}
