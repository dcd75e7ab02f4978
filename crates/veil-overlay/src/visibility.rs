#![forbid(unsafe_code)]

//! Overlay visibility state machine.
//!
//! ```text
//!            show()                on_settled()
//!  Hidden ───────────▶ Showing ───────────────▶ Visible
//!    ▲                   │                        │
//!    │                   │ hide() / dismiss()     │ hide() / dismiss()
//!    │                   ▼                        │
//!    └────────────── Dismissing ◀─────────────────┘
//!      on_hidden()
//! ```
//!
//! `show()` is accepted in every phase and always restarts from hidden
//! semantics; the caller resets the offset cells when it returns.
//!
//! # Invariants
//!
//! 1. `on_hidden` yields the session at most once per show.
//! 2. Gestures are accepted only in `Showing` and `Visible`; a dismissal
//!    that has not started hiding can be [`resume`]d back to `Visible`.
//!
//! [`resume`]: VisibilityMachine::resume

/// Where the overlay is in its show/dismiss cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OverlayPhase {
    #[default]
    Hidden,
    Showing,
    Visible,
    Dismissing,
}

impl OverlayPhase {
    /// Stable name, for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hidden => "hidden",
            Self::Showing => "showing",
            Self::Visible => "visible",
            Self::Dismissing => "dismissing",
        }
    }
}

/// Tracks [`OverlayPhase`] and the session each show belongs to.
#[derive(Debug, Clone, Default)]
pub struct VisibilityMachine {
    phase: OverlayPhase,
    session: Option<u64>,
    hiding: bool,
}

impl VisibilityMachine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn phase(&self) -> OverlayPhase {
        self.phase
    }

    /// Session of the current (or last) show.
    #[inline]
    #[must_use]
    pub fn session(&self) -> Option<u64> {
        self.session
    }

    /// Whether the hide transition has started.
    #[inline]
    #[must_use]
    pub fn is_hiding(&self) -> bool {
        self.hiding
    }

    #[inline]
    #[must_use]
    pub fn accepts_gestures(&self) -> bool {
        matches!(self.phase, OverlayPhase::Showing | OverlayPhase::Visible)
    }

    /// Begin showing `session`. Returns the phase that was interrupted.
    pub fn show(&mut self, session: u64) -> OverlayPhase {
        let previous = self.phase;
        self.phase = OverlayPhase::Showing;
        self.session = Some(session);
        self.hiding = false;
        previous
    }

    /// The show spring settled. Returns whether the phase changed.
    pub fn on_settled(&mut self) -> bool {
        if self.phase != OverlayPhase::Showing {
            return false;
        }
        self.phase = OverlayPhase::Visible;
        true
    }

    /// A tap or a dismissing release committed to closing.
    pub fn dismiss(&mut self) -> bool {
        if !self.accepts_gestures() {
            return false;
        }
        self.phase = OverlayPhase::Dismissing;
        true
    }

    /// A new gesture caught a dismissal before the hide started. Returns
    /// whether the phase changed.
    pub fn resume(&mut self) -> bool {
        if self.phase != OverlayPhase::Dismissing || self.hiding {
            return false;
        }
        self.phase = OverlayPhase::Visible;
        true
    }

    /// `visible` went false. Returns whether the hide transition should
    /// start now.
    pub fn hide(&mut self) -> bool {
        if self.phase == OverlayPhase::Hidden || self.hiding {
            return false;
        }
        self.phase = OverlayPhase::Dismissing;
        self.hiding = true;
        true
    }

    /// The hide transition finished. Returns the session to release.
    pub fn on_hidden(&mut self) -> Option<u64> {
        if !self.hiding {
            return None;
        }
        self.phase = OverlayPhase::Hidden;
        self.hiding = false;
        self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_cycle() {
        let mut m = VisibilityMachine::new();
        assert_eq!(m.phase(), OverlayPhase::Hidden);
        assert!(!m.accepts_gestures());

        assert_eq!(m.show(1), OverlayPhase::Hidden);
        assert!(m.accepts_gestures());
        assert!(m.on_settled());
        assert_eq!(m.phase(), OverlayPhase::Visible);

        assert!(m.dismiss());
        assert!(!m.accepts_gestures());
        assert!(m.hide());
        assert_eq!(m.on_hidden(), Some(1));
        assert_eq!(m.phase(), OverlayPhase::Hidden);
    }

    #[test]
    fn hidden_reported_once() {
        let mut m = VisibilityMachine::new();
        m.show(3);
        assert!(m.hide());
        assert!(!m.hide());
        assert_eq!(m.on_hidden(), Some(3));
        assert_eq!(m.on_hidden(), None);
    }

    #[test]
    fn hide_before_settle() {
        let mut m = VisibilityMachine::new();
        m.show(1);
        assert!(m.hide());
        assert!(!m.on_settled());
        assert_eq!(m.phase(), OverlayPhase::Dismissing);
    }

    #[test]
    fn show_while_dismissing_restarts() {
        let mut m = VisibilityMachine::new();
        m.show(1);
        m.hide();
        assert_eq!(m.show(2), OverlayPhase::Dismissing);
        assert!(!m.is_hiding());
        assert_eq!(m.on_hidden(), None);
        assert_eq!(m.session(), Some(2));
    }

    #[test]
    fn resume_only_before_hiding() {
        let mut m = VisibilityMachine::new();
        m.show(1);
        m.on_settled();
        assert!(!m.resume());
        assert!(m.dismiss());
        assert!(m.resume());
        assert_eq!(m.phase(), OverlayPhase::Visible);
        assert!(m.accepts_gestures());

        assert!(m.dismiss());
        assert!(m.hide());
        assert!(!m.resume());
        assert_eq!(m.phase(), OverlayPhase::Dismissing);
    }

    #[test]
    fn hide_when_hidden_is_noop() {
        let mut m = VisibilityMachine::new();
        assert!(!m.hide());
        assert!(!m.dismiss());
    }
}
