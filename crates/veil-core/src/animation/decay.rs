#![forbid(unsafe_code)]

//! Friction-based decay ("fling") animation.
//!
//! Carries an initial velocity forward and lets it decay exponentially:
//!
//!   v(t) = v₀ · d^(t_ms)
//!   x(t) = x₀ + v₀ · (d^(t_ms) − 1) / (1000 · ln d)
//!
//! where `d` is the per-millisecond deceleration factor. There is no fixed end
//! time; the animation completes once the speed drops below the stop
//! threshold.
//!
//! # Invariants
//!
//! 1. Speed is monotonically non-increasing.
//! 2. Position moves monotonically in the direction of the initial velocity.
//! 3. The total travel is bounded by `v₀ / (1000 · |ln d|)`.

use std::time::Duration;

use super::Animation;

/// Bounds for the deceleration factor; `1.0` would never stop.
const MIN_DECELERATION: f64 = 0.5;
const MAX_DECELERATION: f64 = 0.999_999;

/// Friction parameters of a decay animation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DecayConfig {
    /// Fraction of velocity retained per millisecond.
    pub deceleration: f64,
    /// Speed (units/s) below which the animation stops.
    pub velocity_threshold: f64,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            deceleration: 0.998,
            velocity_threshold: 1.0,
        }
    }
}

/// A decelerating motion that continues an initial velocity.
#[derive(Debug, Clone)]
pub struct Decay {
    position: f64,
    velocity: f64,
    deceleration: f64,
    velocity_threshold: f64,
}

impl Decay {
    /// Start decaying from `position` with `velocity` (units/s).
    #[must_use]
    pub fn new(position: f64, velocity: f64, config: DecayConfig) -> Self {
        Self {
            position,
            velocity,
            deceleration: config.deceleration.clamp(MIN_DECELERATION, MAX_DECELERATION),
            velocity_threshold: config.velocity_threshold.abs(),
        }
    }

    /// Where the motion would come to rest if left undisturbed.
    #[must_use]
    pub fn resting_position(&self) -> f64 {
        self.position - self.velocity / (1000.0 * self.deceleration.ln())
    }
}

impl Animation for Decay {
    fn tick(&mut self, dt: Duration) {
        if dt.is_zero() || self.is_complete() {
            return;
        }
        let ms = dt.as_secs_f64() * 1000.0;
        let factor = self.deceleration.powf(ms);
        self.position += self.velocity * (factor - 1.0) / (1000.0 * self.deceleration.ln());
        self.velocity *= factor;
        if self.velocity.abs() < self.velocity_threshold {
            self.velocity = 0.0;
        }
    }

    fn is_complete(&self) -> bool {
        self.velocity.abs() < self.velocity_threshold || self.velocity == 0.0
    }

    fn value(&self) -> f64 {
        self.position
    }

    fn velocity(&self) -> f64 {
        self.velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_16: Duration = Duration::from_millis(16);

    #[test]
    fn moves_in_velocity_direction_and_slows() {
        let mut d = Decay::new(500.0, 2000.0, DecayConfig::default());
        let mut prev_pos = 500.0;
        let mut prev_speed = 2000.0;
        for _ in 0..30 {
            d.tick(MS_16);
            assert!(d.value() > prev_pos);
            assert!(d.velocity().abs() < prev_speed);
            prev_pos = d.value();
            prev_speed = d.velocity().abs();
        }
    }

    #[test]
    fn eventually_stops_near_resting_position() {
        let mut d = Decay::new(0.0, 1500.0, DecayConfig::default());
        let rest = d.resting_position();
        for _ in 0..1000 {
            d.tick(MS_16);
            if d.is_complete() {
                break;
            }
        }
        assert!(d.is_complete());
        assert!((d.value() - rest).abs() < 1.0, "{} vs {rest}", d.value());
    }

    #[test]
    fn negative_velocity_moves_up() {
        let mut d = Decay::new(0.0, -1200.0, DecayConfig::default());
        d.tick(MS_16);
        assert!(d.value() < 0.0);
    }

    #[test]
    fn below_threshold_is_complete_immediately() {
        let d = Decay::new(10.0, 0.5, DecayConfig::default());
        assert!(d.is_complete());
    }

    #[test]
    fn frame_rate_independent() {
        let mut a = Decay::new(0.0, 3000.0, DecayConfig::default());
        let mut b = a.clone();
        a.tick(Duration::from_millis(64));
        for _ in 0..4 {
            b.tick(MS_16);
        }
        assert!((a.value() - b.value()).abs() < 1e-6);
        assert!((a.velocity() - b.velocity()).abs() < 1e-6);
    }
}
