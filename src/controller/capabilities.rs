//! Capabilities the countdown controller borrows from its host

use std::{sync::Arc, time::Duration};

/// Receives the text the screen should show
pub trait DisplaySink {
    fn set_display(&self, text: &str);
}

/// Requests an audible alert; fire-and-forget
pub trait AlarmTrigger {
    fn play_alarm(&self);
}

/// Identifies one started schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(pub u64);

impl RunId {
    pub fn next(self) -> Self {
        RunId(self.0.wrapping_add(1))
    }
}

/// Starts a repeating tick for a run.
///
/// Implementations deliver each tick back to the controller tagged with the
/// `RunId` they were scheduled for.
pub trait TickScheduler {
    type Handle: TickHandle;

    fn schedule(&mut self, period: Duration, run: RunId) -> Self::Handle;
}

/// Cancels a repeating tick
pub trait TickHandle {
    fn cancel(self);
}

impl<T: DisplaySink + ?Sized> DisplaySink for Arc<T> {
    fn set_display(&self, text: &str) {
        (**self).set_display(text)
    }
}

impl<T: AlarmTrigger + ?Sized> AlarmTrigger for Arc<T> {
    fn play_alarm(&self) {
        (**self).play_alarm()
    }
}
