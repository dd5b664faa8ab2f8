//! Countdown state structure and display formatting

use serde::{Deserialize, Serialize};

/// Fixed countdown length: three minutes
pub const INITIAL_MILLIS: u64 = 3 * 60 * 1000;

/// Snapshot of a single countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownState {
    /// Time left on the clock, never below zero
    pub remaining_millis: u64,
    /// Whether the periodic tick is currently scheduled
    pub running: bool,
}

impl CountdownState {
    /// Icon the toggle button should show for this state
    pub fn button(&self) -> ButtonIcon {
        if self.running {
            ButtonIcon::Stop
        } else {
            ButtonIcon::Play
        }
    }
}

/// Icon on the single toggle button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonIcon {
    Play,
    Stop,
}

/// Format milliseconds as `M:SS`, rounding down to whole seconds.
///
/// Minutes are not padded and have no upper bound.
pub fn format_remaining(remaining_millis: u64) -> String {
    let minute = remaining_millis / 1000 / 60;
    let second = remaining_millis / 1000 % 60;
    format!("{}:{:02}", minute, second)
}
