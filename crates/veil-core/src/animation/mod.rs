#![forbid(unsafe_code)]

//! Scalar animation primitives.
//!
//! Three animation families drive every animated property of an overlay:
//!
//! | Family | Type | Ends when |
//! |--------|------|-----------|
//! | spring | [`Spring`] | displacement and speed fall below the rest thresholds |
//! | timing | [`Timing`] | the fixed duration elapses |
//! | decay  | [`Decay`]  | speed falls below the stop threshold |
//!
//! All three implement [`Animation`] and are wrapped by the closed
//! [`ActiveAnimation`] enum so a cell can hold exactly one of them.
//!
//! # Invariants
//!
//! 1. `tick()` with a zero duration never changes state.
//! 2. A complete animation ignores further ticks.
//! 3. `value()` is the raw (unclamped) position in the animated unit.

use std::time::Duration;

pub mod decay;
pub mod spring;
pub mod timing;

pub use decay::{Decay, DecayConfig};
pub use spring::{Spring, SpringConfig};
pub use timing::{Timing, TimingConfig};

/// A scalar animation advanced by frame deltas.
pub trait Animation {
    /// Advance the animation by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its end state.
    fn is_complete(&self) -> bool;

    /// Current position.
    fn value(&self) -> f64;

    /// Current velocity in units per second.
    fn velocity(&self) -> f64;
}

// ---------------------------------------------------------------------------
// Easing
// ---------------------------------------------------------------------------

/// Easing curve applied to timing animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Easing {
    /// Linear interpolation.
    Linear,
    /// Cubic ease-out (decelerating). Used for exits that should feel quick.
    EaseOut,
    /// Cubic ease-in (accelerating).
    EaseIn,
    /// Cubic S-curve.
    EaseInOut,
    /// Quadratic S-curve; the platform default for untuned timings.
    #[default]
    InOutQuad,
}

impl Easing {
    /// Apply the easing function to a progress value in [0, 1].
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Self::EaseIn => t * t * t,
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let inv = -2.0 * t + 2.0;
                    1.0 - inv * inv * inv / 2.0
                }
            }
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let inv = -2.0 * t + 2.0;
                    1.0 - inv * inv / 2.0
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Interpolation
// ---------------------------------------------------------------------------

/// Behaviour of [`interpolate`] outside the input range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Extrapolate {
    /// Hold the output at the nearest range endpoint.
    #[default]
    Clamp,
    /// Continue the linear mapping past the endpoints.
    Extend,
}

/// Map `value` from `input` to `output` linearly.
///
/// A degenerate input range (both ends equal) yields `output.0`.
pub fn interpolate(
    value: f64,
    input: (f64, f64),
    output: (f64, f64),
    extrapolate: Extrapolate,
) -> f64 {
    let span = input.1 - input.0;
    if span == 0.0 || !value.is_finite() {
        return output.0;
    }
    let mut t = (value - input.0) / span;
    if extrapolate == Extrapolate::Clamp {
        t = t.clamp(0.0, 1.0);
    }
    output.0 + (output.1 - output.0) * t
}

// ---------------------------------------------------------------------------
// Closed set of running animations
// ---------------------------------------------------------------------------

/// Which animation family is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationKind {
    Spring,
    Timing,
    Decay,
}

/// An in-flight animation of one of the three families.
#[derive(Debug, Clone)]
pub enum ActiveAnimation {
    Spring(Spring),
    Timing(Timing),
    Decay(Decay),
}

impl ActiveAnimation {
    /// The animation family.
    pub fn kind(&self) -> AnimationKind {
        match self {
            Self::Spring(_) => AnimationKind::Spring,
            Self::Timing(_) => AnimationKind::Timing,
            Self::Decay(_) => AnimationKind::Decay,
        }
    }
}

impl Animation for ActiveAnimation {
    fn tick(&mut self, dt: Duration) {
        match self {
            Self::Spring(a) => a.tick(dt),
            Self::Timing(a) => a.tick(dt),
            Self::Decay(a) => a.tick(dt),
        }
    }

    fn is_complete(&self) -> bool {
        match self {
            Self::Spring(a) => a.is_complete(),
            Self::Timing(a) => a.is_complete(),
            Self::Decay(a) => a.is_complete(),
        }
    }

    fn value(&self) -> f64 {
        match self {
            Self::Spring(a) => a.value(),
            Self::Timing(a) => a.value(),
            Self::Decay(a) => a.value(),
        }
    }

    fn velocity(&self) -> f64 {
        match self {
            Self::Spring(a) => a.velocity(),
            Self::Timing(a) => a.velocity(),
            Self::Decay(a) => a.velocity(),
        }
    }
}

impl From<Spring> for ActiveAnimation {
    fn from(a: Spring) -> Self {
        Self::Spring(a)
    }
}

impl From<Timing> for ActiveAnimation {
    fn from(a: Timing) -> Self {
        Self::Timing(a)
    }
}

impl From<Decay> for ActiveAnimation {
    fn from(a: Decay) -> Self {
        Self::Decay(a)
    }
}
