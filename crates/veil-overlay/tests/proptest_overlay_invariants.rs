//! Property-based invariant tests for the overlay.
//!
//! 1. Drag opacity and scale are non-increasing in `translate_y` and
//!    clamped at their floors
//! 2. A release whose projection stays within half the screen always ends
//!    exactly at rest
//! 3. Under arbitrary gesture/frame interleavings `show_screen` stays in
//!    [0, 1], `translate_y` never goes negative during a drag, and `reset`
//!    runs at most once per session

use std::time::Duration;

use proptest::prelude::*;
use veil_core::geometry::Size;
use veil_core::gesture::{GestureEvent, GestureSample};
use veil_overlay::{GestureInterpreter, GestureOutcome, OverlayController, TransitionDriver, ValueStore};
use veil_runtime::config::OverlayConfig;
use veil_runtime::handoff::{AppContext, AppHost};
use veil_runtime::overlay::{Message, OverlayData, OverlayKind};

const MS_16: Duration = Duration::from_millis(16);
const VIEWPORT: Size = Size {
    width: 390.0,
    height: 844.0,
};
const HALF: f64 = 422.0;

#[derive(Default)]
struct Resets {
    sessions: Vec<u64>,
    current: u64,
}

impl AppHost for Resets {
    fn on_reset(&mut self) {
        self.sessions.push(self.current);
    }
}

#[derive(Debug, Clone)]
enum Op {
    Open,
    Close,
    PanBegin,
    PanUpdate(f64),
    PanEnd(f64, f64),
    PanCancel,
    Frames(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        1 => Just(Op::Open),
        1 => Just(Op::Close),
        2 => Just(Op::PanBegin),
        3 => (-300.0..900.0f64).prop_map(Op::PanUpdate),
        2 => ((-300.0..900.0f64), (-5000.0..5000.0f64)).prop_map(|(t, v)| Op::PanEnd(t, v)),
        1 => Just(Op::PanCancel),
        3 => (1usize..20).prop_map(Op::Frames),
    ]
}

proptest! {
    #[test]
    fn drag_feedback_is_monotone_and_clamped(a in 0.0..2000.0f64, b in 0.0..2000.0f64) {
        let interp = GestureInterpreter::new(&OverlayConfig::default());
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(interp.drag_opacity(hi, VIEWPORT) <= interp.drag_opacity(lo, VIEWPORT));
        prop_assert!(interp.drag_scale(hi, VIEWPORT) <= interp.drag_scale(lo, VIEWPORT));
        prop_assert!(interp.drag_opacity(hi, VIEWPORT) >= 0.75);
        prop_assert!(interp.drag_scale(hi, VIEWPORT) >= 0.85);
        prop_assert!(interp.drag_opacity(lo, VIEWPORT) <= 1.0);
        if hi >= HALF {
            prop_assert_eq!(interp.drag_opacity(hi, VIEWPORT), 0.75);
            prop_assert_eq!(interp.drag_scale(hi, VIEWPORT), 0.85);
        }
    }

    #[test]
    fn contained_release_ends_exactly_at_rest(
        translation in -400.0..HALF,
        velocity in -8000.0..8000.0f64,
    ) {
        let projected = translation + velocity * 0.1;
        prop_assume!(projected <= HALF || translation <= 0.0);

        let mut interp = GestureInterpreter::new(&OverlayConfig::default());
        let mut values = ValueStore::new();
        let mut driver = TransitionDriver::new();
        interp.on_pan_begin(&mut values, &mut driver);
        interp.on_pan_update(GestureSample::new(translation, velocity), VIEWPORT, &mut values);
        interp.on_pan_end(GestureSample::new(translation, velocity), VIEWPORT, &mut values, &mut driver);
        for _ in 0..40 {
            driver.tick(&mut values, MS_16);
        }
        let s = values.snapshot();
        prop_assert_eq!((s.translate_y, s.scale, s.opacity), (0.0, 1.0, 1.0));
    }

    #[test]
    fn arbitrary_interleavings_keep_invariants(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut app = AppContext::new(Resets::default());
        let mut ctrl = OverlayController::new(
            OverlayConfig::default(),
            VIEWPORT,
            app.store(),
            app.handoff(),
        );

        for op in &ops {
            match *op {
                Op::Open => {
                    let session = app.open(OverlayData::for_message(Message::new("m", "hi")));
                    app.host_mut().current = session;
                }
                Op::Close => app.set_overlay(OverlayKind::None),
                Op::PanBegin => { ctrl.handle_gesture(GestureEvent::PanBegin); }
                Op::PanUpdate(t) => {
                    let out = ctrl.handle_gesture(GestureEvent::PanUpdate(GestureSample::new(t, 0.0)));
                    if let GestureOutcome::Dragged { translate_y } = out {
                        prop_assert!(translate_y >= 0.0);
                        prop_assert_eq!(ctrl.snapshot().translate_y, translate_y);
                    }
                }
                Op::PanEnd(t, v) => {
                    ctrl.handle_gesture(GestureEvent::PanEnd(GestureSample::new(t, v)));
                }
                Op::PanCancel => { ctrl.handle_gesture(GestureEvent::PanCancel); }
                Op::Frames(n) => {
                    for _ in 0..n {
                        ctrl.frame(MS_16);
                        app.pump();
                        ctrl.sync();
                        let s = ctrl.snapshot();
                        prop_assert!((0.0..=1.0).contains(&s.show_screen), "show_screen {}", s.show_screen);
                    }
                }
            }
            ctrl.sync();
            prop_assert!((0.0..=1.0).contains(&ctrl.snapshot().show_screen));
        }

        let mut sessions = app.host().sessions.clone();
        let total = sessions.len();
        sessions.dedup();
        prop_assert_eq!(sessions.len(), total, "reset ran twice for one session");
    }
}
