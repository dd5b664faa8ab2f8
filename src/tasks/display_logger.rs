//! Logs what the screen shows whenever the text changes

use std::sync::Arc;
use tracing::{debug, info};

use crate::state::AppState;

/// Background task that writes each new display text to the log
pub async fn display_logger_task(state: Arc<AppState>) {
    let mut display_rx = state.subscribe_display();
    let mut shown = display_rx.borrow_and_update().clone();
    info!("Display: {}", shown);

    while display_rx.changed().await.is_ok() {
        let text = display_rx.borrow_and_update().clone();
        // Most ticks resend the same text
        if text != shown {
            info!("Display: {}", text);
            shown = text;
        }
    }

    debug!("Display channel closed, display logger exiting");
}
