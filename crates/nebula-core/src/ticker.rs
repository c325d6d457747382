//! # Ticker Module
//!
//! Drives [`LayerStack::advance`] at the configured frame rate.
//!
//! ## Key Types
//! - `Scheduler`: waits between ticks; returning `false` cancels the loop.
//! - `FixedTicks`: deterministic scheduler that never sleeps.
//! - `SleepScheduler`: real-time scheduler with a cloneable [`CancelHandle`].
//! - `Ticker`: the loop itself.
//! - `FrameClock`: converts host-measured elapsed time into a number of due ticks.

use crate::stack::LayerStack;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{instrument, trace};

/// Interval between ticks: `trunc(1000 / fps)` milliseconds.
pub fn frame_interval(frames_per_second: u32) -> Duration {
    Duration::from_millis((1000.0 / frames_per_second.max(1) as f32) as u64)
}

/// Waits until the next tick is due.
pub trait Scheduler {
    /// Returns `false` when no further ticks should run.
    fn wait(&mut self, interval: Duration) -> bool;
}

/// Lets a [`Ticker`] run exactly `ticks` ticks (at least one) without waiting.
#[derive(Clone, Copy, Debug)]
pub struct FixedTicks {
    remaining: u64,
}

impl FixedTicks {
    pub fn new(ticks: u64) -> Self {
        Self { remaining: ticks }
    }
}

impl Scheduler for FixedTicks {
    fn wait(&mut self, _interval: Duration) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining > 0
    }
}

/// Stops a running [`SleepScheduler`] from any thread.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Sleeps the current thread between ticks.
#[derive(Debug, Default)]
pub struct SleepScheduler {
    cancel: CancelHandle,
}

impl SleepScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }
}

impl Scheduler for SleepScheduler {
    fn wait(&mut self, interval: Duration) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        std::thread::sleep(interval);
        !self.cancel.is_cancelled()
    }
}

pub struct Ticker<S: Scheduler> {
    scheduler: S,
}

impl<S: Scheduler> Ticker<S> {
    pub fn new(scheduler: S) -> Self {
        Self { scheduler }
    }

    /// Advances `stack` once immediately and again after every successful wait, calling
    /// `on_frame` after each tick. Returns the number of ticks run.
    ///
    /// The interval is re-read every tick, so a frame-rate change applies to the next wait.
    #[instrument(level = "debug", skip_all)]
    pub fn run<F>(&mut self, stack: &mut LayerStack, mut on_frame: F) -> u64
    where
        F: FnMut(&mut LayerStack),
    {
        let mut ticks = 0;
        loop {
            stack.advance();
            ticks += 1;
            on_frame(stack);
            if !self.scheduler.wait(stack.frame_interval()) {
                break;
            }
        }
        trace!(ticks, "ticker stopped");
        ticks
    }

    pub fn into_inner(self) -> S {
        self.scheduler
    }
}

/// Accumulates elapsed time for hosts that run their own frame loop.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameClock {
    pending: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `elapsed` and returns how many whole intervals are now due.
    pub fn tick(&mut self, elapsed: Duration, interval: Duration) -> u32 {
        if interval.is_zero() {
            return 0;
        }
        self.pending += elapsed;
        let mut due = 0;
        while self.pending >= interval {
            self.pending -= interval;
            due += 1;
        }
        due
    }

    /// Advances `stack` for every tick due after `elapsed`. Returns the ticks run.
    pub fn drive(&mut self, stack: &mut LayerStack, elapsed: Duration) -> u32 {
        let due = self.tick(elapsed, stack.frame_interval());
        for _ in 0..due {
            stack.advance();
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NebulaConfig;

    /// Records every interval it is asked to wait for; stops after `limit` waits.
    struct RecordingScheduler {
        intervals: Vec<Duration>,
        limit: usize,
    }

    impl Scheduler for RecordingScheduler {
        fn wait(&mut self, interval: Duration) -> bool {
            self.intervals.push(interval);
            self.intervals.len() < self.limit
        }
    }

    fn stack() -> LayerStack {
        LayerStack::with_seed(NebulaConfig::default(), 1).unwrap()
    }

    #[test]
    fn test_frame_rate_change_applies_to_next_wait() {
        let mut stack = stack();
        let mut ticker = Ticker::new(RecordingScheduler {
            intervals: Vec::new(),
            limit: 3,
        });

        let mut tick = 0;
        let ticks = ticker.run(&mut stack, |stack| {
            tick += 1;
            if tick == 2 {
                stack.set_frames_per_second(10);
            }
        });

        assert_eq!(ticks, 3);
        assert_eq!(
            ticker.into_inner().intervals,
            vec![
                Duration::from_millis(41),
                Duration::from_millis(100),
                Duration::from_millis(100)
            ]
        );
    }

    #[test]
    fn test_cancel_handle_stops_running_loop() {
        let mut stack = stack();
        stack.set_frames_per_second(140);
        let scheduler = SleepScheduler::new();
        let handle = scheduler.cancel_handle();
        let mut ticker = Ticker::new(scheduler);

        let mut seen = 0;
        let ticks = ticker.run(&mut stack, |_| {
            seen += 1;
            if seen == 3 {
                handle.cancel();
            }
        });

        assert_eq!(ticks, 3);
        assert_eq!(seen, 3);
        assert!(ticker.into_inner().cancel_handle().is_cancelled());
    }

    #[test]
    fn test_frame_interval_truncates() {
        assert_eq!(frame_interval(24), Duration::from_millis(41));
        assert_eq!(frame_interval(1), Duration::from_millis(1000));
        assert_eq!(frame_interval(140), Duration::from_millis(7));
    }

    #[test]
    fn test_fixed_ticks_counts_down() {
        let mut scheduler = FixedTicks::new(3);
        assert!(scheduler.wait(Duration::ZERO));
        assert!(scheduler.wait(Duration::ZERO));
        assert!(!scheduler.wait(Duration::ZERO));
        assert!(!scheduler.wait(Duration::ZERO));
    }

    #[test]
    fn test_cancelled_sleep_scheduler_stops_immediately() {
        let mut scheduler = SleepScheduler::new();
        scheduler.cancel_handle().cancel();
        assert!(!scheduler.wait(Duration::from_secs(60)));
    }

    #[test]
    fn test_frame_clock_carries_remainder() {
        let mut clock = FrameClock::new();
        let interval = Duration::from_millis(40);
        assert_eq!(clock.tick(Duration::from_millis(30), interval), 0);
        assert_eq!(clock.tick(Duration::from_millis(30), interval), 1);
        assert_eq!(clock.tick(Duration::from_millis(100), interval), 3);
        assert_eq!(clock.tick(Duration::from_millis(10), Duration::ZERO), 0);
    }
}
