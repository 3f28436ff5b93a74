//! Countdown timer
//!
//! Tick-driven countdown for the warehouse collection phase. Warnings at
//! configured remaining-time thresholds are one-shot latches, same
//! discipline as the gate transitions. Reaching zero emits a terminal
//! `TimeUp` signal; the session driver turns that into a forced quiz
//! start.

use std::time::Duration;

/// A signal emitted by the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerSignal {
    /// Remaining time crossed a warning threshold
    Warning { threshold: Duration },
    /// Countdown reached zero
    TimeUp,
}

/// Cancellable, resettable countdown
///
/// Cooperative: the owner calls `tick` with elapsed time; nothing runs in
/// the background. `start` resets all latches for a fresh countdown.
#[derive(Debug)]
pub struct CountdownTimer {
    total: Duration,
    remaining: Duration,
    thresholds: Vec<Duration>,
    warned: Vec<bool>,
    running: bool,
    time_up: bool,
}

impl CountdownTimer {
    /// Create a stopped timer with the given warning thresholds
    pub fn new(total: Duration, thresholds: Vec<Duration>) -> Self {
        let warned = vec![false; thresholds.len()];
        Self {
            total,
            remaining: total,
            thresholds,
            warned,
            running: false,
            time_up: false,
        }
    }

    /// Start (or restart) the countdown for the given duration
    pub fn start(&mut self, duration: Duration) {
        self.total = duration;
        self.remaining = duration;
        self.running = true;
        self.time_up = false;
        self.warned.iter_mut().for_each(|w| *w = false);
    }

    /// Advance the countdown, returning any signals that fired
    ///
    /// Warnings fire in threshold order; `TimeUp` fires at most once per
    /// start and stops the timer.
    pub fn tick(&mut self, elapsed: Duration) -> Vec<TimerSignal> {
        if !self.running || self.time_up {
            return Vec::new();
        }

        self.remaining = self.remaining.saturating_sub(elapsed);

        let mut signals = Vec::new();
        for (i, threshold) in self.thresholds.iter().enumerate() {
            if !self.warned[i] && self.remaining <= *threshold {
                self.warned[i] = true;
                signals.push(TimerSignal::Warning {
                    threshold: *threshold,
                });
            }
        }

        if self.remaining == Duration::ZERO {
            self.running = false;
            self.time_up = true;
            signals.push(TimerSignal::TimeUp);
        }

        signals
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn resume(&mut self) {
        if !self.time_up {
            self.running = true;
        }
    }

    /// Stop the countdown without firing `TimeUp`
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn elapsed(&self) -> Duration {
        self.total.saturating_sub(self.remaining)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_time_up(&self) -> bool {
        self.time_up
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    fn reference_timer() -> CountdownTimer {
        let mut timer = CountdownTimer::new(secs(300), vec![secs(120), secs(30)]);
        timer.start(secs(300));
        timer
    }

    #[test]
    fn new_timer_is_stopped() {
        let timer = CountdownTimer::new(secs(300), vec![secs(120)]);
        assert!(!timer.is_running());
        assert!(!timer.is_time_up());
    }

    #[test]
    fn tick_decrements_remaining() {
        let mut timer = reference_timer();
        timer.tick(secs(50));
        assert_eq!(timer.remaining(), secs(250));
        assert_eq!(timer.elapsed(), secs(50));
    }

    #[test]
    fn warnings_fire_once_at_thresholds() {
        let mut timer = reference_timer();

        // 300 -> 180: no warning yet
        assert!(timer.tick(secs(120)).is_empty());

        // 180 -> 110: crosses the 120s threshold
        let signals = timer.tick(secs(70));
        assert_eq!(signals, vec![TimerSignal::Warning { threshold: secs(120) }]);

        // Stays below 120s but no re-fire
        assert!(timer.tick(secs(10)).is_empty());

        // Crosses 30s
        let signals = timer.tick(secs(80));
        assert_eq!(signals, vec![TimerSignal::Warning { threshold: secs(30) }]);
    }

    #[test]
    fn one_large_tick_fires_all_pending_signals() {
        let mut timer = reference_timer();
        let signals = timer.tick(secs(300));
        assert_eq!(
            signals,
            vec![
                TimerSignal::Warning { threshold: secs(120) },
                TimerSignal::Warning { threshold: secs(30) },
                TimerSignal::TimeUp,
            ]
        );
        assert!(timer.is_time_up());
        assert!(!timer.is_running());
    }

    #[test]
    fn time_up_fires_once_and_stops_ticking() {
        let mut timer = reference_timer();
        timer.tick(secs(400));
        assert!(timer.is_time_up());

        assert!(timer.tick(secs(10)).is_empty());
        assert_eq!(timer.remaining(), Duration::ZERO);
    }

    #[test]
    fn pause_suspends_ticking() {
        let mut timer = reference_timer();
        timer.pause();
        assert!(timer.tick(secs(100)).is_empty());
        assert_eq!(timer.remaining(), secs(300));

        timer.resume();
        timer.tick(secs(100));
        assert_eq!(timer.remaining(), secs(200));
    }

    #[test]
    fn resume_after_time_up_is_a_noop() {
        let mut timer = reference_timer();
        timer.tick(secs(300));
        timer.resume();
        assert!(!timer.is_running());
    }

    #[test]
    fn restart_resets_latches() {
        let mut timer = reference_timer();
        timer.tick(secs(300));
        assert!(timer.is_time_up());

        timer.start(secs(300));
        assert!(!timer.is_time_up());
        assert!(timer.is_running());

        // Warnings fire again on the new countdown
        let signals = timer.tick(secs(200));
        assert_eq!(signals, vec![TimerSignal::Warning { threshold: secs(120) }]);
    }

    #[test]
    fn stop_does_not_fire_time_up() {
        let mut timer = reference_timer();
        timer.stop();
        assert!(!timer.is_time_up());
        assert!(!timer.is_running());
    }
}
