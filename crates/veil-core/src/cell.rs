#![forbid(unsafe_code)]

//! Animated scalar cells with single-writer ownership.
//!
//! An [`AnimatedCell`] is one continuously-updated numeric value driving a
//! visual property. At any instant it has at most one writer:
//!
//! ```text
//!            begin_gesture()              start(anim)
//!   Idle ───────────────────▶ Gesture ───────────────────▶ Driver(kind)
//!    ▲  ◀─────────────────────   │   ◀── begin_gesture() ──     │
//!    │       end_gesture()       │                              │
//!    └───────────── cancel() / animation completes ◀────────────┘
//! ```
//!
//! Every change of writer goes through an explicit cancel-then-acquire step:
//! acquiring a cell drops whatever animation owned it, and bumps the cell's
//! generation so completions of the dropped animation can never be observed.
//!
//! # Invariants
//!
//! 1. At most one [`ActiveAnimation`] is attached to a cell.
//! 2. [`AnimatedCell::set`] succeeds only while the gesture owns the cell.
//! 3. The generation strictly increases on every acquisition.
//! 4. [`AnimatedCell::tick`] reports a completion at most once per generation.

use std::fmt;
use std::time::Duration;

use crate::animation::{ActiveAnimation, Animation, AnimationKind};

/// Who is currently allowed to write a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Writer {
    /// Nobody; the value is at rest.
    #[default]
    Idle,
    /// The gesture interpreter, between pan start and pan end.
    Gesture,
    /// The transition driver, through the given animation family.
    Driver(AnimationKind),
}

/// A write was attempted by something that does not own the cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnershipError {
    /// Name of the cell.
    pub cell: &'static str,
    /// Writer that holds the cell.
    pub owner: Writer,
}

impl fmt::Display for OwnershipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cell `{}` is owned by {:?}; gesture writes require gesture ownership",
            self.cell, self.owner
        )
    }
}

impl std::error::Error for OwnershipError {}

/// Completion report for an animation that ran to its natural end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Finished {
    /// Generation under which the animation was started.
    pub generation: u64,
    /// Which family finished.
    pub kind: AnimationKind,
}

/// A single animated numeric value with explicit writer ownership.
#[derive(Debug, Clone)]
pub struct AnimatedCell {
    name: &'static str,
    value: f64,
    writer: Writer,
    animation: Option<ActiveAnimation>,
    generation: u64,
}

impl AnimatedCell {
    /// Create an idle cell holding `value`.
    #[must_use]
    pub fn new(name: &'static str, value: f64) -> Self {
        Self {
            name,
            value,
            writer: Writer::Idle,
            animation: None,
            generation: 0,
        }
    }

    /// Cell name, for diagnostics.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Current value.
    #[inline]
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Current writer.
    #[inline]
    #[must_use]
    pub fn writer(&self) -> Writer {
        self.writer
    }

    /// Current generation.
    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether an animation currently drives the cell.
    #[inline]
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// The running animation, if any.
    #[inline]
    #[must_use]
    pub fn animation(&self) -> Option<&ActiveAnimation> {
        self.animation.as_ref()
    }

    /// Drop any writer and return to idle, keeping the current value.
    ///
    /// Returns the family of the cancelled animation, if one was running.
    pub fn cancel(&mut self) -> Option<AnimationKind> {
        let cancelled = self.animation.take().map(|a| a.kind());
        if self.writer != Writer::Idle {
            self.generation += 1;
        }
        #[cfg(feature = "tracing")]
        {
            if let Some(kind) = cancelled {
                tracing::trace!(cell = self.name, ?kind, "cell.cancel");
            }
        }
        self.writer = Writer::Idle;
        cancelled
    }

    /// Cancel any writer and jump to `value`.
    pub fn reset_to(&mut self, value: f64) {
        self.cancel();
        self.value = value;
    }

    /// Hand the cell to the gesture interpreter, cancelling any animation.
    ///
    /// Returns the family of the cancelled animation, if one was running.
    pub fn begin_gesture(&mut self) -> Option<AnimationKind> {
        let cancelled = self.animation.take().map(|a| a.kind());
        self.writer = Writer::Gesture;
        self.generation += 1;
        cancelled
    }

    /// Write a gesture-driven value.
    pub fn set(&mut self, value: f64) -> Result<(), OwnershipError> {
        if self.writer != Writer::Gesture {
            return Err(OwnershipError {
                cell: self.name,
                owner: self.writer,
            });
        }
        self.value = value;
        Ok(())
    }

    /// Release gesture ownership. No-op if the gesture does not own the cell.
    pub fn end_gesture(&mut self) {
        if self.writer == Writer::Gesture {
            self.writer = Writer::Idle;
        }
    }

    /// Attach `animation`, cancelling the current writer first.
    ///
    /// Returns the generation the animation runs under.
    pub fn start(&mut self, animation: impl Into<ActiveAnimation>) -> u64 {
        let animation = animation.into();
        self.animation = None;
        self.generation += 1;
        self.writer = Writer::Driver(animation.kind());
        self.value = animation.value();
        self.animation = Some(animation);
        self.generation
    }

    /// Advance the attached animation by `dt` and copy its value.
    ///
    /// Returns `Some` exactly once, on the frame the animation completes.
    pub fn tick(&mut self, dt: Duration) -> Option<Finished> {
        let animation = self.animation.as_mut()?;
        animation.tick(dt);
        self.value = animation.value();
        if !animation.is_complete() {
            return None;
        }
        let kind = animation.kind();
        self.animation = None;
        self.writer = Writer::Idle;
        Some(Finished {
            generation: self.generation,
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Decay, DecayConfig, Easing, Timing, TimingConfig};

    const MS_16: Duration = Duration::from_millis(16);

    fn short_timing(from: f64, to: f64) -> Timing {
        Timing::new(from, to, TimingConfig::new(Duration::from_millis(32), Easing::Linear))
    }

    #[test]
    fn new_cell_is_idle() {
        let cell = AnimatedCell::new("opacity", 1.0);
        assert_eq!(cell.writer(), Writer::Idle);
        assert_eq!(cell.value(), 1.0);
        assert!(!cell.is_animating());
    }

    #[test]
    fn set_requires_gesture_ownership() {
        let mut cell = AnimatedCell::new("translate_y", 0.0);
        let err = cell.set(10.0).unwrap_err();
        assert_eq!(err.owner, Writer::Idle);
        assert_eq!(err.cell, "translate_y");

        cell.begin_gesture();
        cell.set(10.0).unwrap();
        assert_eq!(cell.value(), 10.0);

        cell.end_gesture();
        assert!(cell.set(20.0).is_err());
    }

    #[test]
    fn driver_cannot_be_written_by_gesture_without_acquire() {
        let mut cell = AnimatedCell::new("translate_y", 0.0);
        cell.start(short_timing(0.0, 100.0));
        let err = cell.set(5.0).unwrap_err();
        assert_eq!(err.owner, Writer::Driver(AnimationKind::Timing));
    }

    #[test]
    fn begin_gesture_cancels_animation() {
        let mut cell = AnimatedCell::new("translate_y", 0.0);
        let generation = cell.start(short_timing(0.0, 100.0));
        cell.tick(MS_16);
        let mid = cell.value();

        assert_eq!(cell.begin_gesture(), Some(AnimationKind::Timing));
        assert!(!cell.is_animating());
        assert!(cell.generation() > generation);
        assert_eq!(cell.value(), mid);
        assert_eq!(cell.tick(MS_16), None);
    }

    #[test]
    fn start_replaces_previous_animation() {
        let mut cell = AnimatedCell::new("translate_y", 300.0);
        let first = cell.start(Decay::new(300.0, 2000.0, DecayConfig::default()));
        let second = cell.start(short_timing(300.0, 0.0));
        assert!(second > first);
        assert_eq!(cell.writer(), Writer::Driver(AnimationKind::Timing));
    }

    #[test]
    fn completion_reported_once() {
        let mut cell = AnimatedCell::new("show_screen", 0.0);
        let generation = cell.start(short_timing(0.0, 1.0));
        assert_eq!(cell.tick(MS_16), None);
        let done = cell.tick(MS_16).expect("finished");
        assert_eq!(done.generation, generation);
        assert_eq!(done.kind, AnimationKind::Timing);
        assert_eq!(cell.value(), 1.0);
        assert_eq!(cell.writer(), Writer::Idle);
        assert_eq!(cell.tick(MS_16), None);
    }

    #[test]
    fn reset_to_cancels_and_jumps() {
        let mut cell = AnimatedCell::new("scale", 0.9);
        cell.start(short_timing(0.9, 1.0));
        cell.reset_to(1.0);
        assert_eq!(cell.value(), 1.0);
        assert_eq!(cell.writer(), Writer::Idle);
        assert!(!cell.is_animating());
    }

    #[test]
    fn ownership_error_display() {
        let err = OwnershipError {
            cell: "opacity",
            owner: Writer::Idle,
        };
        assert!(err.to_string().contains("opacity"));
    }
}
