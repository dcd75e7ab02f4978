#![forbid(unsafe_code)]

//! Fixed-duration eased animation between two values.
//!
//! # Invariants
//!
//! 1. `value()` equals `from` before the first tick and exactly `to` once
//!    complete.
//! 2. A zero duration completes on the first non-zero tick.

use std::time::Duration;

use super::{Animation, Easing};

/// Duration and curve of a timing animation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimingConfig {
    /// Duration in milliseconds.
    pub duration_ms: u64,
    pub easing: Easing,
}

impl Default for TimingConfig {
    /// Platform default: 300 ms, quadratic in-out.
    fn default() -> Self {
        Self {
            duration_ms: 300,
            easing: Easing::InOutQuad,
        }
    }
}

impl TimingConfig {
    /// Create a timing config.
    #[must_use]
    pub const fn new(duration: Duration, easing: Easing) -> Self {
        Self {
            duration_ms: duration.as_millis() as u64,
            easing,
        }
    }

    /// Duration as a [`Duration`].
    #[inline]
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// An eased interpolation from `from` to `to` over a fixed duration.
#[derive(Debug, Clone)]
pub struct Timing {
    from: f64,
    to: f64,
    duration: Duration,
    easing: Easing,
    elapsed: Duration,
    value: f64,
    velocity: f64,
}

impl Timing {
    /// Create a timing animation.
    #[must_use]
    pub fn new(from: f64, to: f64, config: TimingConfig) -> Self {
        Self {
            from,
            to,
            duration: config.duration(),
            easing: config.easing,
            elapsed: Duration::ZERO,
            value: from,
            velocity: 0.0,
        }
    }

    /// Start value.
    #[inline]
    #[must_use]
    pub fn from(&self) -> f64 {
        self.from
    }

    /// End value.
    #[inline]
    #[must_use]
    pub fn to(&self) -> f64 {
        self.to
    }

    /// Configured duration.
    #[inline]
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Easing curve.
    #[inline]
    #[must_use]
    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Linear progress in [0, 1].
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return if self.elapsed.is_zero() { 0.0 } else { 1.0 };
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }
}

impl Animation for Timing {
    fn tick(&mut self, dt: Duration) {
        if dt.is_zero() || self.is_complete() {
            return;
        }
        self.elapsed = self.elapsed.saturating_add(dt);

        let prev = self.value;
        self.value = if self.progress() >= 1.0 {
            self.to
        } else {
            self.from + (self.to - self.from) * self.easing.apply(self.progress())
        };
        self.velocity = if self.is_complete() {
            0.0
        } else {
            (self.value - prev) / dt.as_secs_f64()
        };
    }

    fn is_complete(&self) -> bool {
        !self.elapsed.is_zero() && self.elapsed >= self.duration
    }

    fn value(&self) -> f64 {
        self.value
    }

    fn velocity(&self) -> f64 {
        self.velocity
    }
}
