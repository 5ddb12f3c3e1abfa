use std::thread;
use std::time::{Duration, Instant};

/// Monotonic time source plus the blocking hold used between phase segments.
pub trait Clock {
    /// Elapsed time since the clock was created. Never goes backwards.
    fn now(&self) -> Duration;

    /// Blocks for the given duration.
    fn hold(&mut self, duration: Duration);
}

/// Wall-clock-independent clock backed by `Instant` and `thread::sleep`.
#[derive(Debug, Clone)]
pub struct SystemClock {
    started: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.started.elapsed()
    }

    fn hold(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Virtual clock: `hold` advances time instantly.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Duration,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, duration: Duration) {
        self.now += duration;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now
    }

    fn hold(&mut self, duration: Duration) {
        self.advance(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_hold_advances() {
        let mut clock = ManualClock::new();
        clock.hold(Duration::from_millis(2000));
        clock.advance(Duration::from_millis(500));
        assert_eq!(clock.now(), Duration::from_millis(2500));
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let mut clock = SystemClock::new();
        let before = clock.now();
        clock.hold(Duration::from_millis(5));
        assert!(clock.now() >= before + Duration::from_millis(5));
    }
}
