//! Clock and pacing utilities for the driving loop.
//!
//! The detection core never owns a tick source. Whatever drives it (a
//! display refresh, a replay loop) uses these helpers to:
//! - Anchor ticks to a monotonic epoch
//! - Convert between nanoseconds and seconds
//! - Throttle periodic work such as status logging

use std::time::Instant;

/// A session clock that provides monotonic timestamps relative to a fixed
/// epoch (the moment the session started).
#[derive(Debug, Clone)]
pub struct TickClock {
    /// The instant the session started.
    epoch: Instant,

    /// Wall-clock time at epoch (RFC 3339 string).
    epoch_wall: String,
}

impl TickClock {
    /// Create a new clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Get nanoseconds elapsed since session start.
    pub fn elapsed_ns(&self) -> u64 {
        self.epoch.elapsed().as_nanos() as u64
    }

    /// Wall-clock time at session start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }

    /// Convert an elapsed nanosecond value to seconds.
    pub fn ns_to_secs(ns: u64) -> f64 {
        ns as f64 / 1_000_000_000.0
    }
}

/// Rate controller for periodic work inside a faster loop.
#[derive(Debug)]
pub struct RateController {
    target_interval_ns: u64,
    last_tick_ns: Option<u64>,
}

impl RateController {
    /// Create a controller targeting the given Hz rate.
    pub fn new(target_hz: u32) -> Self {
        Self {
            target_interval_ns: 1_000_000_000 / target_hz.max(1) as u64,
            last_tick_ns: None,
        }
    }

    /// Check if enough time has passed for the next tick.
    /// Returns true and updates internal state if ready.
    /// The first call always returns true.
    pub fn should_tick(&mut self, current_ns: u64) -> bool {
        match self.last_tick_ns {
            None => {
                self.last_tick_ns = Some(current_ns);
                true
            }
            Some(last) if current_ns >= last + self.target_interval_ns => {
                self.last_tick_ns = Some(current_ns);
                true
            }
            _ => false,
        }
    }

    /// Target interval in nanoseconds.
    pub fn interval_ns(&self) -> u64 {
        self.target_interval_ns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_elapsed() {
        let clock = TickClock::start();
        assert!(clock.elapsed_ns() < 1_000_000_000);
        assert!(!clock.epoch_wall().is_empty());
    }

    #[test]
    fn test_ns_to_secs_conversion() {
        assert!((TickClock::ns_to_secs(1_500_000_000) - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_rate_controller() {
        let mut ctrl = RateController::new(60);
        assert!(ctrl.should_tick(0)); // first tick always fires
        assert!(!ctrl.should_tick(1_000_000)); // 1ms later, too soon
        assert!(ctrl.should_tick(17_000_000)); // ~17ms later (60Hz ~ 16.67ms)
    }

    #[test]
    fn test_rate_controller_zero_hz_is_clamped() {
        let ctrl = RateController::new(0);
        assert_eq!(ctrl.interval_ns(), 1_000_000_000);
    }
}
