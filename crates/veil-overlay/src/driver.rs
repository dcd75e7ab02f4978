#![forbid(unsafe_code)]

//! Transition driver: starts, cancels and advances animations on the value
//! store.
//!
//! Every animation is started under a [`Transition`] tag so the controller
//! can tell which completion it is looking at. Starting an animation on a
//! cell always replaces the previous owner; there is no queue.
//!
//! # Invariants
//!
//! 1. At most one tagged animation per cell.
//! 2. [`TransitionDriver::tick`] reports a [`Completion`] only for an
//!    animation that ran to its natural end under the tag it was started
//!    with. Cancelled or superseded animations report nothing.
//! 3. Handing a cell to the gesture drops its tag.

use std::time::Duration;

use veil_core::animation::{Decay, DecayConfig, Spring, SpringConfig, Timing, TimingConfig};

use crate::values::{CellId, ValueStore};

/// Why an animation is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// `show_screen` springing to 1.
    Show,
    /// `show_screen` timing to 0.
    Hide,
    /// Offsets returning to rest after a released drag.
    SnapBack,
    /// Opacity fading out after a dismissing release.
    DismissFade,
    /// Fixed-duration position animation to full height.
    DismissSlide,
    /// Velocity-carrying position animation.
    DismissFling,
}

/// A tagged animation that finished this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub cell: CellId,
    pub transition: Transition,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Tag {
    transition: Transition,
    generation: u64,
}

/// Starts and advances the overlay's animations.
#[derive(Debug, Clone, Default)]
pub struct TransitionDriver {
    tags: [Option<Tag>; 4],
}

impl TransitionDriver {
    /// Create an idle driver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spring `id` from its current value to `target`.
    pub fn spring_to(
        &mut self,
        values: &mut ValueStore,
        id: CellId,
        target: f64,
        config: SpringConfig,
        transition: Transition,
    ) -> u64 {
        let cell = values.cell_mut(id);
        let spring = Spring::new(cell.value(), target, config);
        let generation = cell.start(spring);
        self.tag(id, transition, generation)
    }

    /// Time `id` from its current value to `target`.
    pub fn timing_to(
        &mut self,
        values: &mut ValueStore,
        id: CellId,
        target: f64,
        config: TimingConfig,
        transition: Transition,
    ) -> u64 {
        let cell = values.cell_mut(id);
        let timing = Timing::new(cell.value(), target, config);
        let generation = cell.start(timing);
        self.tag(id, transition, generation)
    }

    /// Let `id` coast from its current value with `velocity` (units/s).
    pub fn decay(
        &mut self,
        values: &mut ValueStore,
        id: CellId,
        velocity: f64,
        config: DecayConfig,
        transition: Transition,
    ) -> u64 {
        let cell = values.cell_mut(id);
        let decay = Decay::new(cell.value(), velocity, config);
        let generation = cell.start(decay);
        self.tag(id, transition, generation)
    }

    /// Stop whatever animates `id`, keeping its current value.
    pub fn cancel(&mut self, values: &mut ValueStore, id: CellId) -> Option<Transition> {
        let cancelled = self.tags[id.index()].take().map(|t| t.transition);
        if let Some(kind) = values.cell_mut(id).cancel() {
            tracing::trace!(
                message = "driver.cancel",
                cell = id.name(),
                ?kind,
                transition = ?cancelled
            );
        }
        cancelled
    }

    /// Cancel any animation on `id` and give the cell to the gesture.
    pub fn hand_to_gesture(&mut self, values: &mut ValueStore, id: CellId) -> Option<Transition> {
        let cancelled = self.tags[id.index()].take().map(|t| t.transition);
        if let Some(kind) = values.cell_mut(id).begin_gesture() {
            tracing::debug!(
                message = "driver.interrupt",
                cell = id.name(),
                ?kind,
                transition = ?cancelled
            );
        }
        cancelled
    }

    /// Transition currently running on `id`.
    #[must_use]
    pub fn transition(&self, id: CellId) -> Option<Transition> {
        self.tags[id.index()].map(|t| t.transition)
    }

    /// Whether any tagged animation is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.tags.iter().any(Option::is_some)
    }

    /// Advance every animation by `dt`, returning those that finished.
    pub fn tick(&mut self, values: &mut ValueStore, dt: Duration) -> Vec<Completion> {
        let mut done = Vec::new();
        for id in CellId::ALL {
            let slot = &mut self.tags[id.index()];
            let cell = values.cell_mut(id);
            let Some(finished) = cell.tick(dt) else {
                if !cell.is_animating() {
                    *slot = None;
                }
                continue;
            };
            match slot.take() {
                Some(tag) if tag.generation == finished.generation => {
                    tracing::trace!(
                        message = "driver.complete",
                        cell = id.name(),
                        transition = ?tag.transition
                    );
                    done.push(Completion {
                        cell: id,
                        transition: tag.transition,
                        generation: finished.generation,
                    });
                }
                _ => {}
            }
        }
        done
    }

    fn tag(&mut self, id: CellId, transition: Transition, generation: u64) -> u64 {
        let previous = self.tags[id.index()].replace(Tag {
            transition,
            generation,
        });
        tracing::trace!(
            message = "driver.start",
            cell = id.name(),
            ?transition,
            replaced = ?previous.map(|t| t.transition)
        );
        generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veil_core::animation::Easing;
    use veil_core::cell::Writer;

    const MS_16: Duration = Duration::from_millis(16);

    fn ms(n: u64, easing: Easing) -> TimingConfig {
        TimingConfig::new(Duration::from_millis(n), easing)
    }

    fn run(driver: &mut TransitionDriver, values: &mut ValueStore, frames: usize) -> Vec<Completion> {
        let mut all = Vec::new();
        for _ in 0..frames {
            all.extend(driver.tick(values, MS_16));
        }
        all
    }

    #[test]
    fn timing_completes_once_with_tag() {
        let mut values = ValueStore::new();
        let mut driver = TransitionDriver::new();
        driver.timing_to(&mut values, CellId::Opacity, 0.0, ms(200, Easing::EaseOut), Transition::DismissFade);
        assert_eq!(driver.transition(CellId::Opacity), Some(Transition::DismissFade));

        let done = run(&mut driver, &mut values, 20);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].cell, CellId::Opacity);
        assert_eq!(done[0].transition, Transition::DismissFade);
        assert_eq!(values.get(CellId::Opacity), 0.0);
        assert!(!driver.is_running());
    }

    #[test]
    fn spring_show_completes() {
        let mut values = ValueStore::new();
        let mut driver = TransitionDriver::new();
        driver.spring_to(&mut values, CellId::ShowScreen, 1.0, SpringConfig::overlay_show(), Transition::Show);
        let done = run(&mut driver, &mut values, 60);
        assert_eq!(done.iter().filter(|c| c.transition == Transition::Show).count(), 1);
        assert_eq!(values.get(CellId::ShowScreen), 1.0);
    }

    #[test]
    fn restarting_cell_suppresses_old_completion() {
        let mut values = ValueStore::new();
        let mut driver = TransitionDriver::new();
        driver.spring_to(&mut values, CellId::ShowScreen, 1.0, SpringConfig::overlay_show(), Transition::Show);
        run(&mut driver, &mut values, 3);
        let partial = values.get(CellId::ShowScreen);
        assert!(partial > 0.0 && partial < 1.0);

        driver.timing_to(&mut values, CellId::ShowScreen, 0.0, ms(150, Easing::EaseOut), Transition::Hide);
        let done = run(&mut driver, &mut values, 20);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].transition, Transition::Hide);
        assert_eq!(values.get(CellId::ShowScreen), 0.0);
    }

    #[test]
    fn cancel_reports_no_completion() {
        let mut values = ValueStore::new();
        let mut driver = TransitionDriver::new();
        driver.timing_to(&mut values, CellId::Scale, 0.5, ms(100, Easing::Linear), Transition::SnapBack);
        run(&mut driver, &mut values, 2);
        assert_eq!(driver.cancel(&mut values, CellId::Scale), Some(Transition::SnapBack));
        assert!(run(&mut driver, &mut values, 20).is_empty());
        assert_eq!(values.cell(CellId::Scale).writer(), Writer::Idle);
    }

    #[test]
    fn hand_to_gesture_interrupts() {
        let mut values = ValueStore::new();
        let mut driver = TransitionDriver::new();
        values.cell_mut(CellId::TranslateY).reset_to(400.0);
        driver.timing_to(&mut values, CellId::TranslateY, 0.0, ms(300, Easing::InOutQuad), Transition::SnapBack);
        run(&mut driver, &mut values, 2);
        let mid = values.get(CellId::TranslateY);

        assert_eq!(
            driver.hand_to_gesture(&mut values, CellId::TranslateY),
            Some(Transition::SnapBack)
        );
        assert_eq!(values.cell(CellId::TranslateY).writer(), Writer::Gesture);
        assert!(run(&mut driver, &mut values, 30).is_empty());
        assert_eq!(values.get(CellId::TranslateY), mid);
    }

    #[test]
    fn decay_fling_runs_until_stop() {
        let mut values = ValueStore::new();
        let mut driver = TransitionDriver::new();
        values.cell_mut(CellId::TranslateY).reset_to(500.0);
        driver.decay(&mut values, CellId::TranslateY, 2500.0, DecayConfig::default(), Transition::DismissFling);
        let done = run(&mut driver, &mut values, 500);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].transition, Transition::DismissFling);
        assert!(values.get(CellId::TranslateY) > 1500.0);
    }

    #[test]
    fn independent_cells_complete_independently() {
        let mut values = ValueStore::new();
        let mut driver = TransitionDriver::new();
        driver.timing_to(&mut values, CellId::Opacity, 0.0, ms(32, Easing::Linear), Transition::DismissFade);
        driver.timing_to(&mut values, CellId::TranslateY, 844.0, ms(64, Easing::Linear), Transition::DismissSlide);
        let first = run(&mut driver, &mut values, 2);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].cell, CellId::Opacity);
        let second = run(&mut driver, &mut values, 2);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].cell, CellId::TranslateY);
    }
}
