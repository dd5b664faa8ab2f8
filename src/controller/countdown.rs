//! Start/stop/tick/finish state machine for the countdown

use std::{mem, time::Duration};
use tracing::{debug, info};

use super::capabilities::{AlarmTrigger, DisplaySink, RunId, TickHandle, TickScheduler};
use crate::state::countdown_state::{format_remaining, CountdownState, INITIAL_MILLIS};

/// Cadence of the periodic tick
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

const INITIAL_REMAINING: Duration = Duration::from_millis(INITIAL_MILLIS);

enum Phase<H> {
    Stopped,
    Running { run: RunId, handle: H },
}

/// Result of pressing the toggle button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    Started(RunId),
    Stopped,
}

/// Result of delivering one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Countdown is stopped or the tick belongs to a cancelled run
    Ignored,
    /// Countdown is still running with this many milliseconds left
    Counting(u64),
    /// Countdown reached zero, alarm fired and the schedule was cancelled
    Finished,
}

/// Owns a single countdown and drives its display and alarm
pub struct CountdownController<D, A, S: TickScheduler> {
    remaining: Duration,
    phase: Phase<S::Handle>,
    last_run: RunId,
    display: D,
    alarm: A,
    scheduler: S,
}

impl<D, A, S> CountdownController<D, A, S>
where
    D: DisplaySink,
    A: AlarmTrigger,
    S: TickScheduler,
{
    /// Create a stopped three-minute countdown and show its initial text
    pub fn new(display: D, alarm: A, scheduler: S) -> Self {
        display.set_display(&format_remaining(INITIAL_MILLIS));
        Self {
            remaining: INITIAL_REMAINING,
            phase: Phase::Stopped,
            last_run: RunId(0),
            display,
            alarm,
            scheduler,
        }
    }

    /// Start the countdown if stopped, stop it if running
    pub fn toggle(&mut self) -> Toggled {
        match mem::replace(&mut self.phase, Phase::Stopped) {
            Phase::Running { run, handle } => {
                handle.cancel();
                info!(
                    "Countdown stopped at {} ({:?})",
                    format_remaining(self.remaining_millis()),
                    run
                );
                Toggled::Stopped
            }
            Phase::Stopped => {
                if self.remaining.is_zero() {
                    // A finished countdown starts over from the top
                    self.remaining = INITIAL_REMAINING;
                    self.display.set_display(&format_remaining(INITIAL_MILLIS));
                }

                let run = self.last_run.next();
                self.last_run = run;
                let handle = self.scheduler.schedule(TICK_INTERVAL, run);
                self.phase = Phase::Running { run, handle };
                info!(
                    "Countdown started from {} ({:?})",
                    format_remaining(self.remaining_millis()),
                    run
                );
                Toggled::Started(run)
            }
        }
    }

    /// Apply one periodic tick that was scheduled for `run`
    pub fn tick(&mut self, run: RunId, elapsed: Duration) -> TickOutcome {
        match &self.phase {
            Phase::Running { run: current, .. } if *current == run => {}
            _ => {
                debug!("Ignoring tick for inactive {:?}", run);
                return TickOutcome::Ignored;
            }
        }

        // Sub-millisecond remainders carry over to the next tick
        self.remaining = self.remaining.saturating_sub(elapsed);

        if self.remaining.is_zero() {
            self.finish();
            return TickOutcome::Finished;
        }

        let remaining_millis = self.remaining_millis();
        self.display.set_display(&format_remaining(remaining_millis));
        TickOutcome::Counting(remaining_millis)
    }

    fn finish(&mut self) {
        self.display.set_display(&format_remaining(0));
        info!("Countdown finished, sounding alarm");
        self.alarm.play_alarm();

        if let Phase::Running { handle, .. } = mem::replace(&mut self.phase, Phase::Stopped) {
            handle.cancel();
        }
    }

    /// Current remaining time and running flag
    pub fn state(&self) -> CountdownState {
        CountdownState {
            remaining_millis: self.remaining_millis(),
            running: self.is_running(),
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running { .. })
    }

    /// Remaining time rounded down to whole milliseconds
    fn remaining_millis(&self) -> u64 {
        u64::try_from(self.remaining.as_millis()).unwrap_or(u64::MAX)
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn alarm(&self) -> &A {
        &self.alarm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    };

    #[derive(Default)]
    struct RecordingDisplay {
        texts: Mutex<Vec<String>>,
    }

    impl RecordingDisplay {
        fn texts(&self) -> Vec<String> {
            self.texts.lock().unwrap().clone()
        }
    }

    impl DisplaySink for RecordingDisplay {
        fn set_display(&self, text: &str) {
            self.texts.lock().unwrap().push(text.to_string());
        }
    }

    #[derive(Default)]
    struct CountingAlarm {
        fired: AtomicUsize,
    }

    impl AlarmTrigger for CountingAlarm {
        fn play_alarm(&self) {
            self.fired.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[derive(Default)]
    struct ScheduleLog {
        scheduled: Vec<(Duration, RunId)>,
        cancelled: Vec<RunId>,
    }

    #[derive(Clone, Default)]
    struct ManualScheduler {
        log: Arc<Mutex<ScheduleLog>>,
    }

    struct ManualHandle {
        run: RunId,
        log: Arc<Mutex<ScheduleLog>>,
    }

    impl TickScheduler for ManualScheduler {
        type Handle = ManualHandle;

        fn schedule(&mut self, period: Duration, run: RunId) -> ManualHandle {
            self.log.lock().unwrap().scheduled.push((period, run));
            ManualHandle {
                run,
                log: Arc::clone(&self.log),
            }
        }
    }

    impl TickHandle for ManualHandle {
        fn cancel(self) {
            self.log.lock().unwrap().cancelled.push(self.run);
        }
    }

    type TestController = CountdownController<RecordingDisplay, CountingAlarm, ManualScheduler>;

    fn controller() -> (TestController, Arc<Mutex<ScheduleLog>>) {
        let scheduler = ManualScheduler::default();
        let log = Arc::clone(&scheduler.log);
        let controller = CountdownController::new(
            RecordingDisplay::default(),
            CountingAlarm::default(),
            scheduler,
        );
        (controller, log)
    }

    fn alarms(controller: &TestController) -> usize {
        controller.alarm().fired.load(Ordering::SeqCst)
    }

    #[test]
    fn starts_stopped_showing_three_minutes() {
        let (controller, log) = controller();
        assert_eq!(
            controller.state(),
            CountdownState {
                remaining_millis: 180_000,
                running: false
            }
        );
        assert_eq!(controller.display().texts(), vec!["3:00"]);
        assert!(log.lock().unwrap().scheduled.is_empty());
    }

    #[test]
    fn toggle_starts_without_touching_display() {
        let (mut controller, log) = controller();

        let run = match controller.toggle() {
            Toggled::Started(run) => run,
            other => panic!("expected start, got {:?}", other),
        };

        assert_eq!(
            controller.state(),
            CountdownState {
                remaining_millis: 180_000,
                running: true
            }
        );
        assert_eq!(controller.display().texts(), vec!["3:00"]);
        assert_eq!(log.lock().unwrap().scheduled, vec![(TICK_INTERVAL, run)]);
    }

    #[test]
    fn toggle_twice_without_ticks_restores_initial_state() {
        let (mut controller, log) = controller();

        let Toggled::Started(run) = controller.toggle() else {
            panic!("expected start");
        };
        assert_eq!(controller.toggle(), Toggled::Stopped);

        assert_eq!(
            controller.state(),
            CountdownState {
                remaining_millis: 180_000,
                running: false
            }
        );
        assert_eq!(controller.display().texts(), vec!["3:00"]);
        assert_eq!(alarms(&controller), 0);
        assert_eq!(log.lock().unwrap().cancelled, vec![run]);
    }

    #[test]
    fn tick_decrements_by_elapsed_and_updates_display() {
        let (mut controller, _log) = controller();
        let Toggled::Started(run) = controller.toggle() else {
            panic!("expected start");
        };

        assert_eq!(
            controller.tick(run, TICK_INTERVAL),
            TickOutcome::Counting(179_900)
        );
        assert_eq!(
            controller.state(),
            CountdownState {
                remaining_millis: 179_900,
                running: true
            }
        );
        assert_eq!(controller.display().texts(), vec!["3:00", "2:59"]);
    }

    #[test]
    fn full_run_finishes_once_at_zero() {
        let (mut controller, log) = controller();
        let Toggled::Started(run) = controller.toggle() else {
            panic!("expected start");
        };

        let mut previous = controller.state().remaining_millis;
        let mut ticks = 0;
        loop {
            ticks += 1;
            match controller.tick(run, TICK_INTERVAL) {
                TickOutcome::Counting(remaining) => {
                    assert!(remaining < previous);
                    previous = remaining;
                }
                TickOutcome::Finished => break,
                TickOutcome::Ignored => panic!("tick ignored while running"),
            }
        }

        assert_eq!(ticks, 1_800);
        assert_eq!(
            controller.state(),
            CountdownState {
                remaining_millis: 0,
                running: false
            }
        );
        assert_eq!(controller.display().texts().last().unwrap(), "0:00");
        assert_eq!(alarms(&controller), 1);
        assert_eq!(log.lock().unwrap().cancelled, vec![run]);

        // Late ticks after the finish change nothing
        assert_eq!(controller.tick(run, TICK_INTERVAL), TickOutcome::Ignored);
        assert_eq!(alarms(&controller), 1);
    }

    #[test]
    fn oversized_tick_floors_at_zero() {
        let (mut controller, _log) = controller();
        let Toggled::Started(run) = controller.toggle() else {
            panic!("expected start");
        };

        assert_eq!(
            controller.tick(run, Duration::from_secs(10 * 60)),
            TickOutcome::Finished
        );
        assert_eq!(controller.state().remaining_millis, 0);
        assert_eq!(controller.display().texts(), vec!["3:00", "0:00"]);
        assert_eq!(alarms(&controller), 1);
    }

    #[test]
    fn stop_preserves_remaining_and_resume_continues() {
        let (mut controller, _log) = controller();
        let Toggled::Started(first) = controller.toggle() else {
            panic!("expected start");
        };
        for _ in 0..25 {
            controller.tick(first, TICK_INTERVAL);
        }
        controller.toggle();
        assert_eq!(
            controller.state(),
            CountdownState {
                remaining_millis: 177_500,
                running: false
            }
        );

        let Toggled::Started(second) = controller.toggle() else {
            panic!("expected start");
        };
        assert_ne!(first, second);
        assert_eq!(
            controller.tick(second, TICK_INTERVAL),
            TickOutcome::Counting(177_400)
        );
    }

    #[test]
    fn ticks_from_cancelled_run_are_ignored() {
        let (mut controller, _log) = controller();
        let Toggled::Started(first) = controller.toggle() else {
            panic!("expected start");
        };
        controller.toggle();

        assert_eq!(controller.tick(first, TICK_INTERVAL), TickOutcome::Ignored);
        assert_eq!(controller.state().remaining_millis, 180_000);

        let Toggled::Started(second) = controller.toggle() else {
            panic!("expected start");
        };
        assert_eq!(controller.tick(first, TICK_INTERVAL), TickOutcome::Ignored);
        assert_eq!(controller.state().remaining_millis, 180_000);
        assert_eq!(
            controller.tick(second, TICK_INTERVAL),
            TickOutcome::Counting(179_900)
        );
    }

    #[test]
    fn fractional_ticks_accumulate_without_loss() {
        let (mut controller, _log) = controller();
        let Toggled::Started(run) = controller.toggle() else {
            panic!("expected start");
        };

        for _ in 0..1_000 {
            controller.tick(run, Duration::from_micros(100_900));
        }
        // 1000 x 100.9ms = 100.9s consumed
        assert_eq!(controller.state().remaining_millis, 180_000 - 100_900);

        let mut ticks = 0;
        while controller.tick(run, Duration::from_micros(100_900)) != TickOutcome::Finished {
            ticks += 1;
        }
        // 79.1s left needs 784 ticks, the last one finishing
        assert_eq!(ticks, 783);
        assert_eq!(alarms(&controller), 1);
    }

    #[test]
    fn sub_millisecond_remainder_still_finishes() {
        let (mut controller, _log) = controller();
        let Toggled::Started(run) = controller.toggle() else {
            panic!("expected start");
        };

        let almost = Duration::from_millis(INITIAL_MILLIS) - Duration::from_micros(1);
        assert_eq!(controller.tick(run, almost), TickOutcome::Counting(0));
        assert!(controller.state().running);
        assert_eq!(controller.display().texts().last().unwrap(), "0:00");
        assert_eq!(alarms(&controller), 0);

        assert_eq!(controller.tick(run, Duration::from_micros(1)), TickOutcome::Finished);
        assert_eq!(alarms(&controller), 1);
    }

    #[test]
    fn toggle_after_finish_rearms_full_countdown() {
        let (mut controller, _log) = controller();
        let Toggled::Started(run) = controller.toggle() else {
            panic!("expected start");
        };
        controller.tick(run, Duration::from_millis(INITIAL_MILLIS));
        assert_eq!(alarms(&controller), 1);

        assert!(matches!(controller.toggle(), Toggled::Started(_)));
        assert_eq!(
            controller.state(),
            CountdownState {
                remaining_millis: 180_000,
                running: true
            }
        );
        assert_eq!(controller.display().texts(), vec!["3:00", "0:00", "3:00"]);
    }
}
