//! Single-shot auto-off countdown
//!
//! The timer only keeps a deadline. Whoever drives the light polls it with the
//! current time (see `runtime::run_light`), which keeps the timer owned by the
//! light and free of any global registry.

use embassy_time::{Duration, Instant};

/// Convert a delay in seconds to a duration with microsecond precision
///
/// Negative and NaN delays become zero.
pub fn delay_from_secs(secs: f32) -> Duration {
    let micros = (secs.max(0.0) * 1_000_000.0) as u64;
    Duration::from_micros(micros)
}

#[derive(Debug, Clone, Default)]
pub struct AutoOffTimer {
    deadline: Option<Instant>,
}

impl AutoOffTimer {
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Start the countdown from `now`, replacing any running one
    pub fn arm(&mut self, delay: Duration, now: Instant) {
        self.deadline = Some(now.checked_add(delay).unwrap_or(Instant::MAX));
    }

    /// Start the countdown with a delay in seconds
    pub fn arm_secs(&mut self, delay_secs: f32, now: Instant) {
        self.arm(delay_from_secs(delay_secs), now);
    }

    /// Stop the countdown without firing
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Check for expiry
    ///
    /// Returns `true` exactly once per arm, on the first poll at or after the
    /// deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
