#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use veil_core::event::{PointerEvent, PointerEventKind, PointerId};
use veil_core::geometry::Size;
use veil_overlay::OverlayController;
use veil_runtime::config::OverlayConfig;
use veil_runtime::handoff::{AppContext, NoopHost};
use veil_runtime::overlay::{Message, OverlayData, OverlayKind};
use web_time::Instant;

#[derive(Debug, Arbitrary)]
enum Step {
    Pointer { kind: u8, pointer: u8, x: i16, y: i16 },
    Frames(u8),
    Open,
    Close,
}

const MS_16: Duration = Duration::from_millis(16);

fuzz_target!(|steps: Vec<Step>| {
    let mut app = AppContext::new(NoopHost);
    let mut ctrl = OverlayController::new(
        OverlayConfig::default(),
        Size::new(390.0, 844.0),
        app.store(),
        app.handoff(),
    );
    let start = Instant::now();
    let mut elapsed = Duration::ZERO;

    for step in steps.iter().take(512) {
        match *step {
            Step::Pointer { kind, pointer, x, y } => {
                let kind = match kind % 4 {
                    0 => PointerEventKind::Down,
                    1 => PointerEventKind::Move,
                    2 => PointerEventKind::Up,
                    _ => PointerEventKind::Cancel,
                };
                let event = PointerEvent::new(kind, f64::from(x), f64::from(y))
                    .with_pointer(PointerId(u32::from(pointer % 3)));
                elapsed += Duration::from_millis(8);
                ctrl.handle_pointer(&event, start + elapsed);
            }
            Step::Frames(n) => {
                for _ in 0..(n % 32) {
                    ctrl.frame(MS_16);
                    app.pump();
                    ctrl.sync();
                }
            }
            Step::Open => {
                app.open(OverlayData::for_message(Message::new("m", "fuzz")));
                ctrl.sync();
            }
            Step::Close => {
                app.set_overlay(OverlayKind::None);
                ctrl.sync();
            }
        }

        let s = ctrl.snapshot();
        assert!((0.0..=1.0).contains(&s.show_screen), "show_screen {}", s.show_screen);
        assert!(s.translate_y.is_finite() && s.scale.is_finite() && s.opacity.is_finite());
        assert!((0.0..=1.0).contains(&ctrl.overlay_opacity()));
    }
});
