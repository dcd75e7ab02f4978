#![forbid(unsafe_code)]

//! Gesture interpreter: turns pan samples into cell writes and decides
//! between dismissal and snap-back on release.
//!
//! # Drag feedback
//!
//! While the pan is active the bubble follows the finger vertically and
//! fades/shrinks as it travels toward half the screen height:
//!
//! ```text
//! translate_y = max(0, offset + translation)
//! opacity     = interpolate(translate_y, [0, H/2] → [1, min_opacity], clamp)
//! scale       = interpolate(translate_y, [0, H/2] → [1, min_scale],   clamp)
//! ```
//!
//! # Release decision
//!
//! `projected = translation + velocity × projection_factor`. The release
//! dismisses when `projected > H/2` and `translate_y > 0`; otherwise every
//! offset cell snaps back to rest.
//!
//! # Invariants
//!
//! 1. Gesture writes happen only between `on_pan_begin` and release; the
//!    cells are acquired with an explicit cancel-then-acquire.
//! 2. `translate_y` never goes negative during a drag.
//! 3. Snap-back always targets exactly `{0, 1, 1}`.

use veil_core::animation::{Extrapolate, TimingConfig, interpolate};
use veil_core::geometry::Size;
use veil_core::gesture::GestureSample;
use veil_runtime::config::{DismissPolicyConfig, DragPolicyConfig, OverlayConfig};

use crate::driver::{Transition, TransitionDriver};
use crate::values::{CellId, ValueStore};

/// What a gesture did to the overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    /// Nothing happened (gestures disabled, stray event).
    Ignored,
    /// A drag took over the offset cells.
    Began,
    /// The bubble followed the finger to this `translate_y`.
    Dragged { translate_y: f64 },
    /// The release returned the bubble to rest.
    SnapBack,
    /// The release committed to dismissal.
    Dismiss { fling: bool },
    /// A tap asked to close the overlay.
    Close,
}

/// Maps pan samples onto the value store.
#[derive(Debug, Clone)]
pub struct GestureInterpreter {
    drag: DragPolicyConfig,
    dismiss: DismissPolicyConfig,
    snap_back: TimingConfig,
    offset: f64,
    active: bool,
}

impl GestureInterpreter {
    /// Create an interpreter tuned by `config`.
    #[must_use]
    pub fn new(config: &OverlayConfig) -> Self {
        Self {
            drag: config.drag.clone(),
            dismiss: config.dismiss.clone(),
            snap_back: config.transitions.snap_back,
            offset: 0.0,
            active: false,
        }
    }

    /// Whether a drag currently owns the offset cells.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Base offset captured at the start of the current drag.
    #[inline]
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Opacity for a given `translate_y`.
    #[must_use]
    pub fn drag_opacity(&self, translate_y: f64, viewport: Size) -> f64 {
        interpolate(
            translate_y,
            (0.0, viewport.half_height()),
            (1.0, self.drag.min_opacity),
            Extrapolate::Clamp,
        )
    }

    /// Scale for a given `translate_y`.
    #[must_use]
    pub fn drag_scale(&self, translate_y: f64, viewport: Size) -> f64 {
        interpolate(
            translate_y,
            (0.0, viewport.half_height()),
            (1.0, self.drag.min_scale),
            Extrapolate::Clamp,
        )
    }

    /// Take the offset cells from whatever animates them and capture the
    /// current `translate_y` as the drag's base offset.
    pub fn on_pan_begin(
        &mut self,
        values: &mut ValueStore,
        driver: &mut TransitionDriver,
    ) -> GestureOutcome {
        for id in CellId::DRAG {
            driver.hand_to_gesture(values, id);
        }
        self.offset = values.get(CellId::TranslateY);
        self.active = true;
        tracing::debug!(message = "gesture.begin", offset = self.offset);
        GestureOutcome::Began
    }

    /// Apply one pan update.
    pub fn on_pan_update(
        &mut self,
        sample: GestureSample,
        viewport: Size,
        values: &mut ValueStore,
    ) -> GestureOutcome {
        if !self.active {
            return GestureOutcome::Ignored;
        }
        let translate_y = (self.offset + sample.translation_y).max(0.0);
        let opacity = self.drag_opacity(translate_y, viewport);
        let scale = self.drag_scale(translate_y, viewport);

        for (id, value) in [
            (CellId::TranslateY, translate_y),
            (CellId::Opacity, opacity),
            (CellId::Scale, scale),
        ] {
            if let Err(err) = values.cell_mut(id).set(value) {
                tracing::warn!(message = "gesture.write_rejected", %err);
                return GestureOutcome::Ignored;
            }
        }
        GestureOutcome::Dragged { translate_y }
    }

    /// Release the drag and start the resulting animations.
    pub fn on_pan_end(
        &mut self,
        sample: GestureSample,
        viewport: Size,
        values: &mut ValueStore,
        driver: &mut TransitionDriver,
    ) -> GestureOutcome {
        if !self.active {
            return GestureOutcome::Ignored;
        }
        self.release(values);

        let half = viewport.half_height();
        let projected = sample.translation_y + sample.velocity_y * self.dismiss.projection_factor;
        let translate_y = values.get(CellId::TranslateY);

        if projected > half && translate_y > 0.0 {
            let fling = sample.velocity_y.abs() > self.dismiss.fling_velocity_threshold;
            driver.cancel(values, CellId::TranslateY);
            driver.timing_to(values, CellId::Opacity, 0.0, self.dismiss.fade, Transition::DismissFade);
            if fling {
                driver.decay(
                    values,
                    CellId::TranslateY,
                    sample.velocity_y,
                    self.dismiss.decay,
                    Transition::DismissFling,
                );
            } else {
                driver.timing_to(
                    values,
                    CellId::TranslateY,
                    viewport.height,
                    self.dismiss.slide,
                    Transition::DismissSlide,
                );
            }
            tracing::debug!(
                message = "gesture.release",
                decision = "dismiss",
                fling,
                projected,
                translate_y,
                velocity_y = sample.velocity_y
            );
            return GestureOutcome::Dismiss { fling };
        }

        tracing::debug!(
            message = "gesture.release",
            decision = "snap_back",
            projected,
            translate_y,
            velocity_y = sample.velocity_y
        );
        self.snap_back(values, driver)
    }

    /// The pan was taken away (second pointer, platform cancel): snap back.
    pub fn on_pan_cancel(
        &mut self,
        values: &mut ValueStore,
        driver: &mut TransitionDriver,
    ) -> GestureOutcome {
        if !self.active {
            return GestureOutcome::Ignored;
        }
        self.release(values);
        tracing::debug!(message = "gesture.cancel");
        self.snap_back(values, driver)
    }

    /// A tap resolved. Taps only close while no drag owns the cells.
    pub fn on_tap(&self) -> GestureOutcome {
        if self.active {
            return GestureOutcome::Ignored;
        }
        GestureOutcome::Close
    }

    /// Drop an in-progress drag without animating (overlay is going away).
    pub fn abort(&mut self, values: &mut ValueStore) {
        if self.active {
            self.release(values);
        }
    }

    fn release(&mut self, values: &mut ValueStore) {
        for id in CellId::DRAG {
            values.cell_mut(id).end_gesture();
        }
        self.active = false;
    }

    fn snap_back(&mut self, values: &mut ValueStore, driver: &mut TransitionDriver) -> GestureOutcome {
        for (id, target) in [
            (CellId::TranslateY, 0.0),
            (CellId::Scale, 1.0),
            (CellId::Opacity, 1.0),
        ] {
            driver.timing_to(values, id, target, self.snap_back, Transition::SnapBack);
        }
        GestureOutcome::SnapBack
    }
}
