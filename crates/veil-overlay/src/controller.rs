#![forbid(unsafe_code)]

//! Overlay controller: the interaction context of the message overlay.
//!
//! Composes the value store, transition driver, gesture recognizer and
//! interpreter, visibility machine and layout measurer. Everything here runs
//! synchronously on input events and frame callbacks; the only way out to
//! the application context is [`Handoff::send`].
//!
//! ```text
//!   PointerEvent ─▶ GestureRecognizer ─▶ GestureInterpreter ─▶ ValueStore
//!                                                 │                 ▲
//!                                                 ▼                 │
//!   frame(dt) ─────────────────────────▶ TransitionDriver ──────────┘
//!                                                 │ completions
//!                                                 ▼
//!                                      Handoff ──▶ AppContext
//! ```
//!
//! # Lifecycle
//!
//! 1. [`OverlayController::sync`] sees the store switch to `Message` and
//!    shows: offsets reset, `show_screen` reset to 0 and sprung to 1.
//! 2. Tap: `CloseRequested`. Dismissing release: offsets animate away and
//!    the fade completion posts `DismissComplete`.
//! 3. The app context sets the kind to `None`; the next `sync` hides:
//!    `show_screen` times to 0 from wherever it is.
//! 4. The hide completion posts `HideComplete`, on which the app context
//!    runs `reset()` exactly once.
//!
//! A new pan during a drag dismissal, while its fade still runs, cancels the
//! dismissal and returns to `Visible`. `set_visible(false)` posts
//! `CloseRequested` before hiding, so the store never re-opens the session.
//!
//! # Failure Modes
//!
//! - **Data missing while the kind is `Message`**: [`render`] returns `None`
//!   for that frame.
//! - **Application context gone**: handoff messages are dropped with a
//!   warning; the overlay still animates out locally.
//!
//! [`render`]: OverlayController::render

use std::sync::Arc;
use std::time::Duration;

use veil_core::event::PointerEvent;
use veil_core::geometry::{Alignment, Point, Rect, Size};
use veil_core::gesture::{GestureEvent, GestureRecognizer};
use veil_runtime::config::OverlayConfig;
use veil_runtime::handoff::{AppMsg, Handoff};
use veil_runtime::overlay::{MessageAction, OverlayData, OverlayKind};
use veil_runtime::store::{OverlayState, OverlayStore};
use web_time::Instant;

use crate::driver::{Completion, Transition, TransitionDriver};
use crate::interpreter::{GestureInterpreter, GestureOutcome};
use crate::measurer::{Geometry, LayoutMeasurer};
use crate::memo::{OverlayProps, RenderGate};
use crate::style::{BubbleStyle, OverlayTheme, RenderProps, style};
use crate::values::{CellId, ValueSnapshot, ValueStore};
use crate::visibility::{OverlayPhase, VisibilityMachine};

/// Drives one message overlay.
pub struct OverlayController {
    config: OverlayConfig,
    theme: OverlayTheme,
    viewport: Size,
    store: OverlayStore,
    handoff: Handoff,
    values: ValueStore,
    driver: TransitionDriver,
    recognizer: GestureRecognizer,
    interpreter: GestureInterpreter,
    machine: VisibilityMachine,
    measurer: LayoutMeasurer,
    gate: RenderGate,
    visible: bool,
    session: u64,
    data: Option<Arc<OverlayData>>,
    bubble: Option<BubbleStyle>,
    picker: Option<Rect>,
    /// Session closed through `set_visible(false)` whose kind change has
    /// not reached the store yet.
    closing: Option<u64>,
}

impl std::fmt::Debug for OverlayController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayController")
            .field("phase", &self.machine.phase())
            .field("visible", &self.visible)
            .field("session", &self.session)
            .field("values", &self.values.snapshot())
            .finish()
    }
}

impl OverlayController {
    /// Create a hidden controller reading `store` and posting to `handoff`.
    #[must_use]
    pub fn new(config: OverlayConfig, viewport: Size, store: OverlayStore, handoff: Handoff) -> Self {
        Self {
            recognizer: GestureRecognizer::new(config.gesture.clone()),
            interpreter: GestureInterpreter::new(&config),
            config,
            theme: OverlayTheme::default(),
            viewport,
            store,
            handoff,
            values: ValueStore::new(),
            driver: TransitionDriver::new(),
            machine: VisibilityMachine::new(),
            measurer: LayoutMeasurer::new(),
            gate: RenderGate::new(),
            visible: false,
            session: 0,
            data: None,
            bubble: None,
            picker: None,
            closing: None,
        }
    }

    /// Set the theme tokens (builder pattern).
    #[must_use]
    pub fn with_theme(mut self, theme: OverlayTheme) -> Self {
        self.theme = theme;
        self
    }

    // --- Accessors ---

    /// Whether the overlay is (becoming) visible.
    #[inline]
    #[must_use]
    pub fn visible(&self) -> bool {
        self.visible
    }

    #[inline]
    #[must_use]
    pub fn phase(&self) -> OverlayPhase {
        self.machine.phase()
    }

    /// Session of the message currently presented.
    #[inline]
    #[must_use]
    pub fn session(&self) -> u64 {
        self.session
    }

    #[inline]
    #[must_use]
    pub fn values(&self) -> &ValueStore {
        &self.values
    }

    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> ValueSnapshot {
        self.values.snapshot()
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Opacity a parent backdrop should use this frame.
    #[must_use]
    pub fn overlay_opacity(&self) -> f64 {
        self.values.get(CellId::ShowScreen).clamp(0.0, 1.0) * self.values.get(CellId::Opacity)
    }

    /// Latest bubble geometry.
    #[must_use]
    pub fn geometry(&self) -> Option<&Geometry> {
        self.measurer.geometry()
    }

    /// Whether the overlay has animation or drag work pending.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.driver.is_running() || self.interpreter.is_active()
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    // --- Application state ---

    /// Bring the controller in line with the overlay store. Returns whether
    /// visibility changed.
    pub fn sync(&mut self) -> bool {
        let state = self.store.snapshot();
        let wanted = state.is_message() && self.closing != Some(state.session);
        if wanted && (!self.visible || state.session != self.session) {
            self.show(&state);
            return true;
        }
        if !wanted && self.visible {
            return self.hide();
        }
        false
    }

    /// Drive visibility directly.
    ///
    /// `true` presents the store's current data; `false` asks the
    /// application to close the session and starts the hide transition, so
    /// the hide completion still ends in exactly one `reset()`.
    pub fn set_visible(&mut self, visible: bool) -> bool {
        if visible {
            let state = self.store.snapshot();
            self.show(&state);
            return true;
        }
        let owned = {
            let state = self.store.load();
            state.is_message() && state.session == self.session
        };
        if owned && self.visible {
            self.closing = Some(self.session);
            self.handoff.send(AppMsg::CloseRequested {
                session: self.session,
            });
        }
        self.hide()
    }

    fn show(&mut self, state: &OverlayState) {
        self.interpreter.abort(&mut self.values);
        self.recognizer.reset();
        for id in CellId::ALL {
            self.driver.cancel(&mut self.values, id);
        }
        self.values.reset_offsets();
        self.values.cell_mut(CellId::ShowScreen).reset_to(0.0);
        self.measurer.clear();
        self.picker = None;
        self.closing = None;

        let previous = self.machine.show(state.session);
        self.driver.spring_to(
            &mut self.values,
            CellId::ShowScreen,
            1.0,
            self.config.transitions.show_spring,
            Transition::Show,
        );

        self.session = state.session;
        self.data = state.data.clone();
        self.bubble = self
            .data
            .as_deref()
            .map(|data| BubbleStyle::resolve(data, &self.theme));
        self.visible = true;
        self.gate.invalidate();

        tracing::info!(
            message = "overlay.show",
            session = state.session,
            restarted = previous != OverlayPhase::Hidden,
            has_data = self.data.is_some()
        );
    }

    fn hide(&mut self) -> bool {
        if !self.machine.hide() {
            return false;
        }
        self.visible = false;
        self.interpreter.abort(&mut self.values);
        self.recognizer.reset();
        let from = self.values.get(CellId::ShowScreen);
        self.driver.timing_to(
            &mut self.values,
            CellId::ShowScreen,
            0.0,
            self.config.transitions.hide,
            Transition::Hide,
        );
        tracing::info!(message = "overlay.hide", session = self.session, from);
        true
    }

    // --- Frames ---

    /// Advance animations by `dt` and react to completions.
    pub fn frame(&mut self, dt: Duration) -> Vec<Completion> {
        let done = self.driver.tick(&mut self.values, dt);
        for completion in &done {
            match completion.transition {
                Transition::Show => {
                    if self.machine.on_settled() {
                        tracing::debug!(message = "overlay.settled", session = self.session);
                    }
                }
                Transition::Hide => {
                    for id in CellId::DRAG {
                        self.driver.cancel(&mut self.values, id);
                    }
                    if let Some(session) = self.machine.on_hidden() {
                        tracing::info!(message = "overlay.hidden", session);
                        self.data = None;
                        self.bubble = None;
                        self.picker = None;
                        self.measurer.clear();
                        self.handoff.send(AppMsg::HideComplete { session });
                    }
                }
                Transition::DismissFade => {
                    tracing::debug!(message = "overlay.dismiss_complete", session = self.session);
                    self.handoff.send(AppMsg::DismissComplete {
                        session: self.session,
                    });
                }
                Transition::SnapBack | Transition::DismissSlide | Transition::DismissFling => {}
            }
        }
        done
    }

    // --- Input ---

    fn interactive(&self) -> bool {
        self.machine.accepts_gestures() && self.store.load().kind == OverlayKind::Message
    }

    /// A drag dismissal whose fade is still running can be caught by a new
    /// pan until the fade completes or the hide starts.
    fn dismiss_interruptible(&self) -> bool {
        self.machine.phase() == OverlayPhase::Dismissing
            && !self.machine.is_hiding()
            && self.driver.transition(CellId::Opacity) == Some(Transition::DismissFade)
            && self.store.load().kind == OverlayKind::Message
    }

    fn gestures_enabled(&self) -> bool {
        self.interactive() || self.dismiss_interruptible()
    }

    /// Feed one raw pointer event.
    pub fn handle_pointer(&mut self, event: &PointerEvent, now: Instant) -> Vec<GestureOutcome> {
        if !self.gestures_enabled() {
            self.recognizer.reset();
            return Vec::new();
        }
        self.recognizer
            .process(event, now)
            .into_iter()
            .map(|gesture| self.handle_gesture(gesture))
            .collect()
    }

    /// Apply one recognized gesture.
    pub fn handle_gesture(&mut self, gesture: GestureEvent) -> GestureOutcome {
        if !self.interactive() {
            if !(matches!(gesture, GestureEvent::PanBegin) && self.dismiss_interruptible()) {
                return GestureOutcome::Ignored;
            }
            self.machine.resume();
            tracing::info!(message = "overlay.dismiss_interrupted", session = self.session);
        }
        match gesture {
            GestureEvent::PanBegin => self.interpreter.on_pan_begin(&mut self.values, &mut self.driver),
            GestureEvent::PanUpdate(sample) => {
                self.interpreter
                    .on_pan_update(sample, self.viewport, &mut self.values)
            }
            GestureEvent::PanEnd(sample) => {
                let outcome = self.interpreter.on_pan_end(
                    sample,
                    self.viewport,
                    &mut self.values,
                    &mut self.driver,
                );
                self.after_release(outcome);
                outcome
            }
            GestureEvent::PanCancel => {
                let outcome = self.interpreter.on_pan_cancel(&mut self.values, &mut self.driver);
                self.after_release(outcome);
                outcome
            }
            GestureEvent::Tap { position } => self.on_tap(position),
        }
    }

    fn after_release(&mut self, outcome: GestureOutcome) {
        match outcome {
            GestureOutcome::Dismiss { fling } => {
                self.machine.dismiss();
                tracing::info!(message = "overlay.dismiss", session = self.session, fling);
            }
            GestureOutcome::SnapBack => {
                tracing::debug!(message = "overlay.snap_back", session = self.session);
            }
            _ => {}
        }
    }

    fn on_tap(&mut self, position: Point) -> GestureOutcome {
        if self.measurer.geometry().is_some_and(|g| g.rect.contains(position)) {
            return GestureOutcome::Ignored;
        }
        let outcome = self.interpreter.on_tap();
        if outcome == GestureOutcome::Close {
            self.machine.dismiss();
            tracing::info!(
                message = "overlay.tap",
                session = self.session,
                x = position.x,
                y = position.y
            );
            self.handoff.send(AppMsg::CloseRequested {
                session: self.session,
            });
        }
        outcome
    }

    /// Hand a contextual action to the application and close.
    pub fn activate_action(&mut self, action: &MessageAction) -> bool {
        if !self.interactive() {
            return false;
        }
        self.machine.dismiss();
        tracing::info!(message = "overlay.action", session = self.session, action = %action.id);
        self.handoff.send(AppMsg::ActionSelected {
            session: self.session,
            action: action.clone(),
        })
    }

    /// Hand a picked reaction to the application and close.
    pub fn select_reaction(&mut self, kind: &str) -> bool {
        if !self.interactive() {
            return false;
        }
        self.machine.dismiss();
        tracing::info!(message = "overlay.reaction", session = self.session, kind);
        self.handoff.send(AppMsg::ReactionSelected {
            session: self.session,
            kind: kind.to_owned(),
        })
    }

    // --- Layout & render ---

    /// Record the bubble's layout. Returns whether the geometry changed.
    pub fn on_layout(&mut self, rect: Rect) -> bool {
        let alignment = self
            .data
            .as_deref()
            .map_or(Alignment::default(), |d| d.alignment);
        self.measurer.on_layout(rect, alignment)
    }

    /// Record the reaction picker's laid-out frame.
    pub fn on_picker_layout(&mut self, rect: Rect) {
        self.picker = Some(rect);
    }

    /// Whether the host must re-render for the current props.
    pub fn needs_render(&mut self) -> bool {
        let props = OverlayProps::new(self.visible, self.data.clone());
        self.gate.offer(props) || self.is_animating()
    }

    /// Render props for this frame, or `None` when there is nothing to show.
    #[must_use]
    pub fn render(&self) -> Option<RenderProps> {
        if self.machine.phase() == OverlayPhase::Hidden {
            return None;
        }
        let data = self.data.as_deref()?;
        data.message.as_ref()?;
        let bubble = self.bubble.as_ref()?;
        Some(style(
            &self.values.snapshot(),
            bubble,
            self.measurer.geometry(),
            self.picker.as_ref(),
        ))
    }

    /// Data currently presented.
    #[must_use]
    pub fn data(&self) -> Option<&Arc<OverlayData>> {
        self.data.as_ref()
    }
}
