#![forbid(unsafe_code)]

//! Damped harmonic oscillator (spring) animation.
//!
//! Models a mass on a spring pulled toward a target:
//!
//!   m·a = -stiffness × (position - target) - damping × velocity
//!
//! # Parameters
//!
//! - **stiffness** (k): restoring force strength. Higher = faster response.
//! - **damping** (c): velocity drag. The damping ratio is `c / (2·√(k·m))`:
//!   - `< 1` underdamped: oscillates past the target before settling
//!   - `= 1` critically damped: fastest convergence without overshoot
//!   - `> 1` overdamped: no overshoot, slower approach
//! - **mass** (m): inertia. Lower mass = faster response.
//! - **rest thresholds**: the spring is at rest once both the displacement
//!   from the target and the speed fall below their thresholds.
//!
//! # Integration
//!
//! Each `tick()` advances the closed-form solution of the oscillator from the
//! current state, so arbitrarily large frame deltas and very stiff, heavily
//! damped configurations (such as the overlay's show spring) are stable.
//!
//! # Invariants
//!
//! 1. An overdamped or critically damped spring never crosses its target when
//!    starting at rest.
//! 2. A spring at rest stays at rest until `set_target()` or `impulse()`.
//! 3. Stiffness and mass are always positive (clamped on construction).

use std::time::Duration;

use super::Animation;

/// Minimum stiffness to prevent degenerate springs.
const MIN_STIFFNESS: f64 = 0.1;

/// Minimum mass to prevent division by zero.
const MIN_MASS: f64 = 0.001;

/// Physical parameters of a spring.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpringConfig {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
    /// Displacement below which (with speed) the spring is at rest.
    pub rest_displacement_threshold: f64,
    /// Speed below which (with displacement) the spring is at rest.
    pub rest_speed_threshold: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: 100.0,
            damping: 10.0,
            mass: 1.0,
            rest_displacement_threshold: 0.01,
            rest_speed_threshold: 2.0,
        }
    }
}

impl SpringConfig {
    /// Heavily damped, light spring used to present the overlay.
    ///
    /// Damping 600 and mass 0.5 rule out any overshoot; stiffness is chosen so
    /// a unit travel settles within roughly 0.4 s.
    #[must_use]
    pub fn overlay_show() -> Self {
        Self {
            stiffness: 12_000.0,
            damping: 600.0,
            mass: 0.5,
            rest_displacement_threshold: 0.01,
            rest_speed_threshold: 0.01,
        }
    }

    /// Damping ratio `c / (2·√(k·m))`.
    #[must_use]
    pub fn damping_ratio(&self) -> f64 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }
}

/// A damped harmonic oscillator producing physically-based motion.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use veil_core::animation::{Animation, Spring, SpringConfig};
///
/// let mut spring = Spring::new(0.0, 1.0, SpringConfig::overlay_show());
/// for _ in 0..60 {
///     spring.tick(Duration::from_millis(16));
/// }
/// assert!(spring.is_complete());
/// assert_eq!(spring.value(), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    stiffness: f64,
    damping: f64,
    mass: f64,
    rest_threshold: f64,
    velocity_threshold: f64,
    at_rest: bool,
}

impl Spring {
    /// Create a spring starting at `initial` and targeting `target`.
    #[must_use]
    pub fn new(initial: f64, target: f64, config: SpringConfig) -> Self {
        Self {
            position: initial,
            velocity: 0.0,
            target,
            stiffness: config.stiffness.max(MIN_STIFFNESS),
            damping: config.damping.max(0.0),
            mass: config.mass.max(MIN_MASS),
            rest_threshold: config.rest_displacement_threshold.abs(),
            velocity_threshold: config.rest_speed_threshold.abs(),
            at_rest: false,
        }
    }

    /// Start with an initial velocity (builder pattern).
    #[must_use]
    pub fn with_velocity(mut self, velocity: f64) -> Self {
        self.velocity = velocity;
        self
    }

    /// Current position (unclamped).
    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Current target.
    #[inline]
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Stiffness parameter.
    #[inline]
    #[must_use]
    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }

    /// Damping parameter.
    #[inline]
    #[must_use]
    pub fn damping(&self) -> f64 {
        self.damping
    }

    /// Mass parameter.
    #[inline]
    #[must_use]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Change the target. Wakes the spring if it was at rest.
    pub fn set_target(&mut self, target: f64) {
        if (self.target - target).abs() > self.rest_threshold {
            self.target = target;
            self.at_rest = false;
        }
    }

    /// Apply an impulse (add to velocity). Wakes the spring.
    pub fn impulse(&mut self, velocity_delta: f64) {
        self.velocity += velocity_delta;
        self.at_rest = false;
    }

    /// Advance the closed-form solution by `t` seconds.
    fn step(&mut self, t: f64) {
        let x0 = self.position - self.target;
        let v0 = self.velocity;
        let omega0 = (self.stiffness / self.mass).sqrt();
        let zeta = self.damping / (2.0 * (self.stiffness * self.mass).sqrt());

        let (x, v) = if (zeta - 1.0).abs() < 1e-6 {
            // Critically damped.
            let b = v0 + omega0 * x0;
            let decay = (-omega0 * t).exp();
            let x = decay * (x0 + b * t);
            let v = decay * (b - omega0 * (x0 + b * t));
            (x, v)
        } else if zeta < 1.0 {
            // Underdamped.
            let omega_d = omega0 * (1.0 - zeta * zeta).sqrt();
            let a = zeta * omega0;
            let b = (v0 + a * x0) / omega_d;
            let decay = (-a * t).exp();
            let (sin, cos) = (omega_d * t).sin_cos();
            let x = decay * (x0 * cos + b * sin);
            let v = decay * ((b * omega_d - a * x0) * cos - (a * b + x0 * omega_d) * sin);
            (x, v)
        } else {
            // Overdamped.
            let root = (zeta * zeta - 1.0).sqrt();
            let r1 = -omega0 * (zeta - root);
            let r2 = -omega0 * (zeta + root);
            let c2 = (v0 - r1 * x0) / (r2 - r1);
            let c1 = x0 - c2;
            let (e1, e2) = ((r1 * t).exp(), (r2 * t).exp());
            (c1 * e1 + c2 * e2, r1 * c1 * e1 + r2 * c2 * e2)
        };

        self.position = self.target + x;
        self.velocity = v;
    }

    /// Advance the spring by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }

        let secs = dt.as_secs_f64();
        if secs <= 0.0 {
            return;
        }

        self.step(secs);

        let pos_delta = (self.position - self.target).abs();
        if pos_delta < self.rest_threshold && self.velocity.abs() < self.velocity_threshold {
            self.position = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }
}

impl Animation for Spring {
    fn tick(&mut self, dt: Duration) {
        self.advance(dt);
    }

    fn is_complete(&self) -> bool {
        self.at_rest
    }

    fn value(&self) -> f64 {
        self.position
    }

    fn velocity(&self) -> f64 {
        self.velocity
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
