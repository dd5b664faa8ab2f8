//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::info;

use super::{ButtonIcon, CountdownState};
use crate::{
    controller::{AlarmTrigger, CountdownController, DisplaySink, TickOutcome, Toggled},
    tasks::ticker::{Tick, TokioTickScheduler},
};

/// Controller wired to the runtime's display channel, alarm and ticker
pub type AppController =
    CountdownController<DisplayChannel, Arc<dyn AlarmTrigger + Send + Sync>, TokioTickScheduler>;

/// Display sink that publishes the latest text on a watch channel
pub struct DisplayChannel {
    tx: watch::Sender<String>,
}

impl DisplayChannel {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(String::new());
        Self { tx }
    }

    /// Receiver that observes every display change
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.tx.subscribe()
    }
}

impl Default for DisplayChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySink for DisplayChannel {
    fn set_display(&self, text: &str) {
        self.tx.send_replace(text.to_string());
    }
}

/// What the screen shows for the countdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownSnapshot {
    pub remaining_millis: u64,
    pub running: bool,
    pub display: String,
    pub button: ButtonIcon,
}

impl CountdownSnapshot {
    pub fn new(state: CountdownState, display: String) -> Self {
        Self {
            remaining_millis: state.remaining_millis,
            running: state.running,
            display,
            button: state.button(),
        }
    }
}

/// Main application state that owns the countdown and server metadata
pub struct AppState {
    /// The single countdown behind the toggle button
    controller: Mutex<AppController>,
    /// Latest text written to the display
    display_rx: watch::Receiver<String>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    /// Create a new AppState with a stopped three-minute countdown
    pub fn new(
        port: u16,
        host: String,
        scheduler: TokioTickScheduler,
        alarm: Arc<dyn AlarmTrigger + Send + Sync>,
    ) -> Self {
        let display = DisplayChannel::new();
        let display_rx = display.subscribe();

        Self {
            controller: Mutex::new(CountdownController::new(display, alarm, scheduler)),
            display_rx,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    /// Press the toggle button
    pub fn toggle(&self) -> Result<(Toggled, CountdownSnapshot), String> {
        let mut controller = self.controller.lock()
            .map_err(|e| format!("Failed to lock countdown: {}", e))?;

        let toggled = controller.toggle();
        let state = controller.state();
        drop(controller); // Release the lock early

        let action = match toggled {
            Toggled::Started(_) => "start",
            Toggled::Stopped => "stop",
        };
        info!("Toggle pressed: {}", action);

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        Ok((toggled, CountdownSnapshot::new(state, self.current_display())))
    }

    /// Feed one tick from the scheduler into the controller
    pub fn apply_tick(&self, tick: Tick) -> Result<TickOutcome, String> {
        let mut controller = self.controller.lock()
            .map_err(|e| format!("Failed to lock countdown: {}", e))?;

        Ok(controller.tick(tick.run, tick.elapsed))
    }

    /// Get current countdown snapshot
    pub fn get_countdown(&self) -> Result<CountdownSnapshot, String> {
        let state = self.controller.lock()
            .map(|controller| controller.state())
            .map_err(|e| format!("Failed to lock countdown: {}", e))?;

        Ok(CountdownSnapshot::new(state, self.current_display()))
    }

    /// Receiver for display changes
    pub fn subscribe_display(&self) -> watch::Receiver<String> {
        self.display_rx.clone()
    }

    fn current_display(&self) -> String {
        self.display_rx.borrow().clone()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
