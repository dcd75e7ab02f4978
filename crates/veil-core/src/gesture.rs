#![forbid(unsafe_code)]

//! Gesture recognition: transforms raw pointer events into pan and tap gestures.
//!
//! [`GestureRecognizer`] is a stateful processor that converts raw
//! [`PointerEvent`] sequences into [`GestureEvent`]s for a single-pointer
//! vertical pan and a companion tap.
//!
//! # State Machine
//!
//! Two recognizers run side by side over the same contact:
//!
//! - **Pan**: `Possible → Active → (End | Cancel)`. Becomes active once the
//!   pointer moves `pan_activation_distance` vertically from where it went
//!   down, and fails if the pointer lifts first. Horizontal travel alone
//!   never activates it.
//! - **Tap**: `Possible → (Tap | Failed)`. Fails as soon as the pointer travels
//!   further than `tap_max_travel`. A tap waits for the pan to fail: it is only
//!   emitted on lift, and only if the pan never activated.
//!
//! # Invariants
//!
//! 1. Pan and tap never both emit for the same contact.
//! 2. Every `PanBegin` is followed by exactly one `PanEnd` or `PanCancel`.
//! 3. A second simultaneous pointer fails both recognizers for the rest of
//!    the contact; an active pan is cancelled.
//! 4. After `reset()`, all state machines return to idle.
//!
//! # Failure Modes
//!
//! - Events for pointers other than the tracked one are only counted, never
//!   interpreted.
//! - A `Move` or `Up` without a prior `Down` is ignored.

use std::collections::VecDeque;
use std::time::Duration;

use web_time::Instant;

use crate::event::{PointerEvent, PointerEventKind, PointerId};
use crate::geometry::Point;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Thresholds for gesture recognition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GestureConfig {
    /// Vertical distance (logical units) before a pan activates (default: 16).
    pub pan_activation_distance: f64,
    /// Maximum travel (logical units) for a contact to still count as a tap
    /// (default: 32).
    pub tap_max_travel: f64,
    /// Window of recent samples used to estimate release velocity, in
    /// milliseconds (default: 100).
    pub velocity_window_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            pan_activation_distance: 16.0,
            tap_max_travel: 32.0,
            velocity_window_ms: 100,
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// One pan update: vertical translation since the pointer went down and the
/// current vertical velocity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureSample {
    /// Vertical translation in logical units (positive = down).
    pub translation_y: f64,
    /// Vertical velocity in logical units per second (positive = down).
    pub velocity_y: f64,
}

impl GestureSample {
    /// Create a sample.
    #[must_use]
    pub const fn new(translation_y: f64, velocity_y: f64) -> Self {
        Self {
            translation_y,
            velocity_y,
        }
    }
}

/// High-level gesture produced by the recognizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    /// The pan activated.
    PanBegin,
    /// The pointer moved during an active pan.
    PanUpdate(GestureSample),
    /// The pointer lifted during an active pan.
    PanEnd(GestureSample),
    /// The active pan was taken away (second pointer, platform cancel).
    PanCancel,
    /// The contact lifted within tap travel and the pan never activated.
    Tap { position: Point },
}

// ---------------------------------------------------------------------------
// Velocity estimation
// ---------------------------------------------------------------------------

/// Estimates vertical velocity from recent position samples.
#[derive(Debug, Clone)]
pub struct VelocityTracker {
    window: Duration,
    samples: VecDeque<(Instant, f64)>,
}

impl VelocityTracker {
    /// Create a tracker averaging over `window`.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            samples: VecDeque::with_capacity(16),
        }
    }

    /// Record the vertical position `y` at `now`.
    pub fn push(&mut self, now: Instant, y: f64) {
        self.samples.push_back((now, y));
        while let Some(&(t, _)) = self.samples.front() {
            if now.duration_since(t) > self.window && self.samples.len() > 2 {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    /// Average velocity across the window, in units per second.
    #[must_use]
    pub fn velocity(&self) -> f64 {
        let (Some(&(t0, y0)), Some(&(t1, y1))) = (self.samples.front(), self.samples.back())
        else {
            return 0.0;
        };
        let dt = t1.duration_since(t0).as_secs_f64();
        if dt <= 0.0 { 0.0 } else { (y1 - y0) / dt }
    }

    /// Forget all samples.
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

// ---------------------------------------------------------------------------
// Internal state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PanState {
    Possible,
    Active,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TapState {
    Possible,
    Failed,
}

/// The contact currently being interpreted.
#[derive(Debug, Clone)]
struct Contact {
    pointer: PointerId,
    origin: Point,
    last: Point,
    pan: PanState,
    tap: TapState,
}

// ---------------------------------------------------------------------------
// GestureRecognizer
// ---------------------------------------------------------------------------

/// Stateful recognizer for a single-pointer vertical pan and a tap.
///
/// Call [`process`](GestureRecognizer::process) for each incoming
/// [`PointerEvent`].
pub struct GestureRecognizer {
    config: GestureConfig,
    contact: Option<Contact>,
    pointers_down: usize,
    velocity: VelocityTracker,
}

impl std::fmt::Debug for GestureRecognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureRecognizer")
            .field("panning", &self.is_panning())
            .field("pointers_down", &self.pointers_down)
            .finish()
    }
}

impl GestureRecognizer {
    /// Create a new gesture recognizer with the given configuration.
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        let window = Duration::from_millis(config.velocity_window_ms);
        Self {
            config,
            contact: None,
            pointers_down: 0,
            velocity: VelocityTracker::new(window),
        }
    }

    /// Process a raw event, returning any gesture events produced.
    ///
    /// Most events produce 0 or 1 gesture events. The move that activates a
    /// pan produces both `PanBegin` and the first `PanUpdate`.
    pub fn process(&mut self, event: &PointerEvent, now: Instant) -> Vec<GestureEvent> {
        let mut out = Vec::with_capacity(2);
        match event.kind {
            PointerEventKind::Down => self.on_down(event, now, &mut out),
            PointerEventKind::Move => self.on_move(event, now, &mut out),
            PointerEventKind::Up => self.on_up(event, now, &mut out),
            PointerEventKind::Cancel => self.on_cancel(event, &mut out),
        }
        out
    }

    /// Whether a pan is currently active.
    #[inline]
    #[must_use]
    pub fn is_panning(&self) -> bool {
        self.contact
            .as_ref()
            .is_some_and(|c| c.pan == PanState::Active)
    }

    /// Reset all gesture state to initial idle.
    pub fn reset(&mut self) {
        self.contact = None;
        self.pointers_down = 0;
        self.velocity.clear();
    }

    /// Get a reference to the current configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Update the configuration.
    pub fn set_config(&mut self, config: GestureConfig) {
        self.velocity = VelocityTracker::new(Duration::from_millis(config.velocity_window_ms));
        self.config = config;
    }
}

// ---------------------------------------------------------------------------
// Internal event handlers
// ---------------------------------------------------------------------------

impl GestureRecognizer {
    fn on_down(&mut self, event: &PointerEvent, now: Instant, out: &mut Vec<GestureEvent>) {
        self.pointers_down += 1;

        if self.pointers_down > 1 {
            // Multi-pointer contact: neither recognizer may fire.
            if let Some(contact) = self.contact.as_mut() {
                if contact.pan == PanState::Active {
                    out.push(GestureEvent::PanCancel);
                }
                contact.pan = PanState::Failed;
                contact.tap = TapState::Failed;
            }
            return;
        }

        self.velocity.clear();
        self.velocity.push(now, event.position.y);
        self.contact = Some(Contact {
            pointer: event.pointer,
            origin: event.position,
            last: event.position,
            pan: PanState::Possible,
            tap: TapState::Possible,
        });
    }

    fn on_move(&mut self, event: &PointerEvent, now: Instant, out: &mut Vec<GestureEvent>) {
        let Some(contact) = self.contact.as_mut() else {
            return;
        };
        if contact.pointer != event.pointer {
            return;
        }
        contact.last = event.position;
        self.velocity.push(now, event.position.y);

        let travel = contact.origin.distance(event.position);
        if travel > self.config.tap_max_travel {
            contact.tap = TapState::Failed;
        }

        let vertical = (event.position.y - contact.origin.y).abs();
        if contact.pan == PanState::Possible && vertical >= self.config.pan_activation_distance {
            contact.pan = PanState::Active;
            out.push(GestureEvent::PanBegin);
        }

        if contact.pan == PanState::Active {
            out.push(GestureEvent::PanUpdate(GestureSample {
                translation_y: event.position.y - contact.origin.y,
                velocity_y: self.velocity.velocity(),
            }));
        }
    }

    fn on_up(&mut self, event: &PointerEvent, now: Instant, out: &mut Vec<GestureEvent>) {
        self.pointers_down = self.pointers_down.saturating_sub(1);

        let is_tracked = self
            .contact
            .as_ref()
            .is_some_and(|c| c.pointer == event.pointer);
        if is_tracked {
            if let Some(contact) = self.contact.as_mut() {
                contact.last = event.position;
                if contact.origin.distance(event.position) > self.config.tap_max_travel {
                    contact.tap = TapState::Failed;
                }
            }
            self.velocity.push(now, event.position.y);
        }

        if self.pointers_down > 0 {
            return;
        }

        // Last pointer lifted: resolve the contact.
        let Some(contact) = self.contact.take() else {
            return;
        };
        match contact.pan {
            PanState::Active => out.push(GestureEvent::PanEnd(GestureSample {
                translation_y: contact.last.y - contact.origin.y,
                velocity_y: self.velocity.velocity(),
            })),
            PanState::Possible if contact.tap == TapState::Possible => {
                out.push(GestureEvent::Tap {
                    position: contact.last,
                });
            }
            PanState::Possible | PanState::Failed => {}
        }
        self.velocity.clear();
    }

    fn on_cancel(&mut self, _event: &PointerEvent, out: &mut Vec<GestureEvent>) {
        if self.is_panning() {
            out.push(GestureEvent::PanCancel);
        }
        self.reset();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const MS_16: Duration = Duration::from_millis(16);

    fn gr() -> GestureRecognizer {
        GestureRecognizer::new(GestureConfig::default())
    }

    fn second(e: PointerEvent) -> PointerEvent {
        e.with_pointer(PointerId(1))
    }

    // --- Tap tests ---

    #[test]
    fn tap_with_small_travel() {
        let mut gr = gr();
        let t = Instant::now();
        assert!(gr.process(&PointerEvent::down(100.0, 100.0), t).is_empty());
        assert!(gr.process(&PointerEvent::moved(106.0, 108.0), t + MS_16).is_empty());
        let events = gr.process(&PointerEvent::up(106.0, 108.0), t + MS_16 * 2);
        assert_eq!(
            events,
            vec![GestureEvent::Tap {
                position: Point::new(106.0, 108.0)
            }]
        );
    }

    #[test]
    fn tap_fails_beyond_max_travel_even_without_pan() {
        let config = GestureConfig {
            pan_activation_distance: 1_000.0,
            ..GestureConfig::default()
        };
        let mut gr = GestureRecognizer::new(config);
        let t = Instant::now();
        gr.process(&PointerEvent::down(0.0, 0.0), t);
        gr.process(&PointerEvent::moved(0.0, 40.0), t + MS_16);
        let events = gr.process(&PointerEvent::up(0.0, 40.0), t + MS_16 * 2);
        assert!(events.is_empty());
    }

    #[test]
    fn tap_fails_when_lift_is_far_without_moves() {
        let config = GestureConfig {
            pan_activation_distance: 1_000.0,
            ..GestureConfig::default()
        };
        let mut gr = GestureRecognizer::new(config);
        let t = Instant::now();
        gr.process(&PointerEvent::down(0.0, 0.0), t);
        let events = gr.process(&PointerEvent::up(40.0, 0.0), t + MS_16);
        assert!(events.is_empty());
    }

    #[test]
    fn tap_travel_boundary_is_inclusive() {
        let config = GestureConfig {
            pan_activation_distance: 1_000.0,
            ..GestureConfig::default()
        };
        let mut gr = GestureRecognizer::new(config);
        let t = Instant::now();
        gr.process(&PointerEvent::down(0.0, 0.0), t);
        gr.process(&PointerEvent::moved(0.0, 32.0), t + MS_16);
        let events = gr.process(&PointerEvent::up(0.0, 32.0), t + MS_16 * 2);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], GestureEvent::Tap { .. }));
    }

    // --- Pan tests ---

    #[test]
    fn pan_activates_after_threshold() {
        let mut gr = gr();
        let t = Instant::now();
        gr.process(&PointerEvent::down(50.0, 50.0), t);

        let events = gr.process(&PointerEvent::moved(50.0, 60.0), t + MS_16);
        assert!(events.is_empty());
        assert!(!gr.is_panning());

        let events = gr.process(&PointerEvent::moved(50.0, 70.0), t + MS_16 * 2);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], GestureEvent::PanBegin);
        match events[1] {
            GestureEvent::PanUpdate(sample) => assert_eq!(sample.translation_y, 20.0),
            other => panic!("expected update, got {other:?}"),
        }
        assert!(gr.is_panning());
    }

    #[test]
    fn horizontal_travel_does_not_activate_pan() {
        let mut gr = gr();
        let t = Instant::now();
        gr.process(&PointerEvent::down(50.0, 50.0), t);
        assert!(gr.process(&PointerEvent::moved(80.0, 55.0), t + MS_16).is_empty());
        assert!(!gr.is_panning());

        // Travel past the tap limit fails the tap, still without a pan.
        assert!(gr.process(&PointerEvent::moved(120.0, 55.0), t + MS_16 * 2).is_empty());
        assert!(gr.process(&PointerEvent::up(120.0, 55.0), t + MS_16 * 3).is_empty());

        gr.process(&PointerEvent::down(50.0, 50.0), t + MS_16 * 4);
        gr.process(&PointerEvent::moved(90.0, 50.0), t + MS_16 * 5);
        let events = gr.process(&PointerEvent::moved(90.0, 66.0), t + MS_16 * 6);
        assert_eq!(events[0], GestureEvent::PanBegin);
    }

    #[test]
    fn pan_end_suppresses_tap() {
        let mut gr = gr();
        let t = Instant::now();
        gr.process(&PointerEvent::down(0.0, 0.0), t);
        gr.process(&PointerEvent::moved(0.0, 20.0), t + MS_16);
        let events = gr.process(&PointerEvent::up(0.0, 20.0), t + MS_16 * 2);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], GestureEvent::PanEnd(_)));
        assert!(!gr.is_panning());
    }

    #[test]
    fn pan_end_reports_velocity() {
        let mut gr = gr();
        let t = Instant::now();
        gr.process(&PointerEvent::down(0.0, 0.0), t);
        for i in 1u32..=5 {
            gr.process(
                &PointerEvent::moved(0.0, 20.0 * f64::from(i)),
                t + Duration::from_millis(10 * u64::from(i)),
            );
        }
        let events = gr.process(&PointerEvent::up(0.0, 100.0), t + Duration::from_millis(50));
        let GestureEvent::PanEnd(sample) = events[0] else {
            panic!("expected pan end, got {events:?}");
        };
        assert_eq!(sample.translation_y, 100.0);
        assert!((sample.velocity_y - 2000.0).abs() < 1.0, "{}", sample.velocity_y);
    }

    #[test]
    fn upward_translation_is_negative() {
        let mut gr = gr();
        let t = Instant::now();
        gr.process(&PointerEvent::down(0.0, 300.0), t);
        let events = gr.process(&PointerEvent::moved(0.0, 250.0), t + MS_16);
        assert!(matches!(
            events[1],
            GestureEvent::PanUpdate(GestureSample { translation_y, .. }) if translation_y == -50.0
        ));
    }

    // --- Multi-pointer tests ---

    #[test]
    fn second_pointer_cancels_active_pan() {
        let mut gr = gr();
        let t = Instant::now();
        gr.process(&PointerEvent::down(0.0, 0.0), t);
        gr.process(&PointerEvent::moved(0.0, 30.0), t + MS_16);
        let events = gr.process(&second(PointerEvent::down(100.0, 100.0)), t + MS_16 * 2);
        assert_eq!(events, vec![GestureEvent::PanCancel]);

        // Further moves and lifts are ignored entirely.
        assert!(gr.process(&PointerEvent::moved(0.0, 80.0), t + MS_16 * 3).is_empty());
        assert!(gr.process(&second(PointerEvent::up(100.0, 100.0)), t + MS_16 * 4).is_empty());
        assert!(gr.process(&PointerEvent::up(0.0, 80.0), t + MS_16 * 5).is_empty());
    }

    #[test]
    fn second_pointer_fails_tap() {
        let mut gr = gr();
        let t = Instant::now();
        gr.process(&PointerEvent::down(0.0, 0.0), t);
        assert!(gr.process(&second(PointerEvent::down(5.0, 5.0)), t).is_empty());
        assert!(gr.process(&second(PointerEvent::up(5.0, 5.0)), t + MS_16).is_empty());
        assert!(gr.process(&PointerEvent::up(0.0, 0.0), t + MS_16).is_empty());
    }

    #[test]
    fn recognizer_recovers_after_multi_pointer_contact() {
        let mut gr = gr();
        let t = Instant::now();
        gr.process(&PointerEvent::down(0.0, 0.0), t);
        gr.process(&second(PointerEvent::down(5.0, 5.0)), t);
        gr.process(&second(PointerEvent::up(5.0, 5.0)), t);
        gr.process(&PointerEvent::up(0.0, 0.0), t);

        gr.process(&PointerEvent::down(0.0, 0.0), t + MS_16);
        let events = gr.process(&PointerEvent::up(0.0, 0.0), t + MS_16 * 2);
        assert!(matches!(events[0], GestureEvent::Tap { .. }));
    }

    // --- Cancel / reset ---

    #[test]
    fn platform_cancel_during_pan() {
        let mut gr = gr();
        let t = Instant::now();
        gr.process(&PointerEvent::down(0.0, 0.0), t);
        gr.process(&PointerEvent::moved(0.0, 30.0), t + MS_16);
        let events = gr.process(&PointerEvent::cancel(0.0, 30.0), t + MS_16 * 2);
        assert_eq!(events, vec![GestureEvent::PanCancel]);
        assert!(!gr.is_panning());
    }

    #[test]
    fn stray_events_ignored() {
        let mut gr = gr();
        let t = Instant::now();
        assert!(gr.process(&PointerEvent::moved(0.0, 30.0), t).is_empty());
        assert!(gr.process(&PointerEvent::up(0.0, 30.0), t).is_empty());
    }

    #[test]
    fn reset_clears_state() {
        let mut gr = gr();
        let t = Instant::now();
        gr.process(&PointerEvent::down(0.0, 0.0), t);
        gr.process(&PointerEvent::moved(0.0, 30.0), t + MS_16);
        assert!(gr.is_panning());
        gr.reset();
        assert!(!gr.is_panning());
        assert!(gr.process(&PointerEvent::up(0.0, 30.0), t).is_empty());
    }

    #[test]
    fn velocity_tracker_window() {
        let mut tracker = VelocityTracker::new(Duration::from_millis(100));
        let t = Instant::now();
        tracker.push(t, 0.0);
        tracker.push(t + Duration::from_millis(500), 0.0);
        tracker.push(t + Duration::from_millis(550), 50.0);
        tracker.push(t + Duration::from_millis(600), 100.0);
        // The stale sample at t=0 is evicted; velocity reflects the last 100ms.
        assert!((tracker.velocity() - 1000.0).abs() < 1e-6);
    }

    #[test]
    fn velocity_tracker_empty_is_zero() {
        let tracker = VelocityTracker::new(Duration::from_millis(100));
        assert_eq!(tracker.velocity(), 0.0);
    }
}
