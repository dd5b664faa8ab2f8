//! Countdown controller module
//! 
//! The state machine behind the toggle button, decoupled from any screen,
//! sound device or timer implementation.

pub mod capabilities;
pub mod countdown;

// Re-export main types
pub use capabilities::{AlarmTrigger, DisplaySink, RunId, TickHandle, TickScheduler};
pub use countdown::{CountdownController, TickOutcome, Toggled, TICK_INTERVAL};
