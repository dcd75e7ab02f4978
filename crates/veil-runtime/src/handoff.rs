#![forbid(unsafe_code)]

//! One-way handoff from the interaction context to the application context.
//!
//! The interaction context (gesture and per-frame animation work) never calls
//! application code directly. Instead it posts an [`AppMsg`] through a
//! [`Handoff`] and moves on; the [`AppContext`] drains its queue on its own
//! schedule and applies each message.
//!
//! ```text
//!  interaction context                         application context
//!  ───────────────────                         ───────────────────
//!  tap / drag dismiss ──▶ Handoff::send ──mpsc──▶ AppContext::handle
//!  hide animation done ─▶ Handoff::send ──mpsc──▶   ├─ OverlayStore writes
//!                                                  └─ AppHost callbacks
//! ```
//!
//! # Invariants
//!
//! 1. [`Handoff::send`] never blocks and never fails loudly.
//! 2. Every handler checks the current session and kind before acting and is
//!    a no-op on mismatch, so duplicate or late messages are harmless.
//! 3. `reset()` runs at most once per session.
//!
//! # Failure Modes
//!
//! - **Application context gone**: `send` logs `handoff.closed` and drops the
//!   message.
//! - **Stale completion** (overlay reopened meanwhile): the handler logs
//!   `app.stale` and does nothing. A `HideComplete` after the app switched
//!   to another overlay kind still releases the message data once.

use std::sync::mpsc;
use std::time::Duration;

use crate::overlay::{Message, MessageAction, OverlayData, OverlayKind};
use crate::store::OverlayStore;

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// A request from the interaction context to the application context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppMsg {
    /// A tap or a direct hide asked to close the overlay.
    CloseRequested { session: u64 },
    /// The drag-dismiss animation finished; the overlay should close.
    DismissComplete { session: u64 },
    /// The hide animation finished; the overlay data can be released.
    HideComplete { session: u64 },
    /// The user picked a contextual action.
    ActionSelected { session: u64, action: MessageAction },
    /// The user picked a reaction.
    ReactionSelected { session: u64, kind: String },
}

impl AppMsg {
    /// Session the message refers to.
    #[must_use]
    pub const fn session(&self) -> u64 {
        match self {
            Self::CloseRequested { session }
            | Self::DismissComplete { session }
            | Self::HideComplete { session }
            | Self::ActionSelected { session, .. }
            | Self::ReactionSelected { session, .. } => *session,
        }
    }

    /// Stable name, for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CloseRequested { .. } => "close_requested",
            Self::DismissComplete { .. } => "dismiss_complete",
            Self::HideComplete { .. } => "hide_complete",
            Self::ActionSelected { .. } => "action_selected",
            Self::ReactionSelected { .. } => "reaction_selected",
        }
    }
}

/// Fire-and-forget sender into the application context.
#[derive(Debug, Clone)]
pub struct Handoff {
    sender: mpsc::Sender<AppMsg>,
}

impl Handoff {
    /// Wrap a raw channel sender.
    #[must_use]
    pub fn new(sender: mpsc::Sender<AppMsg>) -> Self {
        Self { sender }
    }

    /// Post `msg` without waiting. Returns whether it was queued.
    pub fn send(&self, msg: AppMsg) -> bool {
        let name = msg.name();
        let session = msg.session();
        match self.sender.send(msg) {
            Ok(()) => {
                tracing::trace!(message = "handoff.send", msg = name, session);
                true
            }
            Err(_) => {
                tracing::warn!(message = "handoff.closed", msg = name, session);
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Host hooks
// ---------------------------------------------------------------------------

/// Application-side effects triggered by the overlay.
///
/// All methods run on the application context and default to no-ops.
pub trait AppHost {
    /// The overlay finished closing and its data was released.
    fn on_reset(&mut self) {}

    /// The active overlay kind changed.
    fn on_overlay_changed(&mut self, _kind: OverlayKind) {}

    /// A contextual action was chosen for `message`.
    fn on_action(&mut self, _action: &MessageAction, _message: Option<&Message>) {}

    /// A reaction was chosen for `message`.
    fn on_reaction(&mut self, _kind: &str, _message: Option<&Message>) {}
}

/// Host that ignores every callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHost;

impl AppHost for NoopHost {}

// ---------------------------------------------------------------------------
// AppContext
// ---------------------------------------------------------------------------

/// The application/logic context: sole writer of the overlay state.
pub struct AppContext<H: AppHost = NoopHost> {
    store: OverlayStore,
    sender: mpsc::Sender<AppMsg>,
    receiver: mpsc::Receiver<AppMsg>,
    host: H,
    last_reset_session: Option<u64>,
}

impl<H: AppHost> std::fmt::Debug for AppContext<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("store", &self.store)
            .field("last_reset_session", &self.last_reset_session)
            .finish()
    }
}

impl<H: AppHost> AppContext<H> {
    /// Create an application context around `host`.
    pub fn new(host: H) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            store: OverlayStore::new(),
            sender,
            receiver,
            host,
            last_reset_session: None,
        }
    }

    /// Read handle on the overlay state, for the interaction context.
    #[must_use]
    pub fn store(&self) -> OverlayStore {
        self.store.clone()
    }

    /// Sender for the interaction context.
    #[must_use]
    pub fn handoff(&self) -> Handoff {
        Handoff::new(self.sender.clone())
    }

    /// The host.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Open the message overlay for `data`. Returns the new session.
    pub fn open(&mut self, data: OverlayData) -> u64 {
        let session = self.store.open(data);
        tracing::debug!(message = "app.open", session);
        self.host.on_overlay_changed(OverlayKind::Message);
        session
    }

    /// Set the active overlay kind.
    pub fn set_overlay(&mut self, kind: OverlayKind) {
        if self.store.load().kind == kind {
            return;
        }
        self.store.set_kind(kind);
        tracing::debug!(message = "app.set_overlay", kind = kind.as_str());
        self.host.on_overlay_changed(kind);
    }

    /// Release the overlay data and notify the host.
    pub fn reset(&mut self) {
        let session = self.store.load().session;
        self.store.reset();
        self.last_reset_session = Some(session);
        tracing::debug!(message = "app.reset", session);
        self.host.on_reset();
    }

    /// Apply one message. Returns whether it changed anything.
    pub fn handle(&mut self, msg: AppMsg) -> bool {
        let state = self.store.snapshot();
        if msg.session() != state.session {
            tracing::debug!(
                message = "app.stale",
                msg = msg.name(),
                session = msg.session(),
                current = state.session
            );
            return false;
        }
        let message = state.data.as_ref().and_then(|d| d.message.as_ref());

        match msg {
            AppMsg::CloseRequested { .. } | AppMsg::DismissComplete { .. } => {
                if !state.is_message() {
                    return false;
                }
                self.set_overlay(OverlayKind::None);
                true
            }
            AppMsg::HideComplete { session } => {
                if state.is_message() || self.last_reset_session == Some(session) {
                    tracing::debug!(
                        message = "app.stale",
                        msg = "hide_complete",
                        session,
                        kind = state.kind.as_str()
                    );
                    return false;
                }
                self.reset();
                true
            }
            AppMsg::ActionSelected { action, .. } => {
                if !state.is_message() {
                    return false;
                }
                tracing::debug!(message = "app.action", action = %action.id);
                self.host.on_action(&action, message);
                self.set_overlay(OverlayKind::None);
                true
            }
            AppMsg::ReactionSelected { kind, .. } => {
                if !state.is_message() {
                    return false;
                }
                tracing::debug!(message = "app.reaction", kind = %kind);
                self.host.on_reaction(&kind, message);
                self.set_overlay(OverlayKind::None);
                true
            }
        }
    }

    /// Apply every queued message without blocking. Returns how many were
    /// handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(msg) = self.receiver.try_recv() {
            self.handle(msg);
            handled += 1;
        }
        handled
    }

    /// Wait up to `timeout` for one message and apply it.
    ///
    /// Returns `false` on timeout.
    pub fn pump_timeout(&mut self, timeout: Duration) -> bool {
        match self.receiver.recv_timeout(timeout) {
            Ok(msg) => {
                self.handle(msg);
                true
            }
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingHost {
        resets: usize,
        kinds: Vec<OverlayKind>,
        actions: Vec<String>,
        reactions: Vec<String>,
    }

    impl AppHost for RecordingHost {
        fn on_reset(&mut self) {
            self.resets += 1;
        }

        fn on_overlay_changed(&mut self, kind: OverlayKind) {
            self.kinds.push(kind);
        }

        fn on_action(&mut self, action: &MessageAction, message: Option<&Message>) {
            assert!(message.is_some());
            self.actions.push(action.id.clone());
        }

        fn on_reaction(&mut self, kind: &str, _message: Option<&Message>) {
            self.reactions.push(kind.to_string());
        }
    }

    fn ctx() -> AppContext<RecordingHost> {
        AppContext::new(RecordingHost::default())
    }

    fn data() -> OverlayData {
        OverlayData::for_message(Message::new("m1", "hello"))
    }

    #[test]
    fn close_then_hide_resets_once() {
        let mut app = ctx();
        let handoff = app.handoff();
        let session = app.open(data());

        handoff.send(AppMsg::CloseRequested { session });
        handoff.send(AppMsg::HideComplete { session });
        handoff.send(AppMsg::HideComplete { session });
        assert_eq!(app.pump(), 3);

        assert_eq!(app.host().resets, 1);
        assert_eq!(app.store().load().kind, OverlayKind::None);
        assert!(app.store().load().data.is_none());
    }

    #[test]
    fn hide_complete_ignored_while_message_active() {
        let mut app = ctx();
        let session = app.open(data());
        assert!(!app.handle(AppMsg::HideComplete { session }));
        assert_eq!(app.host().resets, 0);
        assert!(app.store().load().is_message());
    }

    #[test]
    fn stale_session_is_noop() {
        let mut app = ctx();
        let first = app.open(data());
        let second = app.open(data());
        assert_ne!(first, second);

        assert!(!app.handle(AppMsg::DismissComplete { session: first }));
        assert!(app.store().load().is_message());

        assert!(app.handle(AppMsg::DismissComplete { session: second }));
        assert_eq!(app.store().load().kind, OverlayKind::None);
    }

    #[test]
    fn duplicate_close_is_idempotent() {
        let mut app = ctx();
        let session = app.open(data());
        assert!(app.handle(AppMsg::CloseRequested { session }));
        assert!(!app.handle(AppMsg::DismissComplete { session }));
        assert_eq!(
            app.host().kinds,
            vec![OverlayKind::Message, OverlayKind::None]
        );
    }

    #[test]
    fn hide_complete_resets_but_keeps_switched_kind() {
        let mut app = ctx();
        let session = app.open(data());
        app.set_overlay(OverlayKind::Gallery);
        assert!(app.handle(AppMsg::HideComplete { session }));
        assert!(!app.handle(AppMsg::HideComplete { session }));
        assert_eq!(app.host().resets, 1);
        assert_eq!(app.store().load().kind, OverlayKind::Gallery);
        assert!(app.store().load().data.is_none());
    }

    #[test]
    fn action_forwards_and_closes() {
        let mut app = ctx();
        let session = app.open(data());
        let action = MessageAction::new("copy", "Copy Message");
        assert!(app.handle(AppMsg::ActionSelected { session, action }));
        assert_eq!(app.host().actions, vec!["copy".to_string()]);
        assert_eq!(app.store().load().kind, OverlayKind::None);
    }

    #[test]
    fn reaction_forwards_and_closes() {
        let mut app = ctx();
        let session = app.open(data());
        assert!(app.handle(AppMsg::ReactionSelected {
            session,
            kind: "love".into()
        }));
        assert_eq!(app.host().reactions, vec!["love".to_string()]);
        assert_eq!(app.store().load().kind, OverlayKind::None);
    }

    #[test]
    fn send_after_context_dropped_is_harmless() {
        let app = ctx();
        let handoff = app.handoff();
        drop(app);
        assert!(!handoff.send(AppMsg::CloseRequested { session: 1 }));
    }

    #[test]
    fn pump_timeout_handles_cross_thread_message() {
        let mut app = ctx();
        let session = app.open(data());
        let handoff = app.handoff();
        std::thread::spawn(move || {
            handoff.send(AppMsg::CloseRequested { session });
        })
        .join()
        .unwrap();
        assert!(app.pump_timeout(Duration::from_secs(1)));
        assert_eq!(app.store().load().kind, OverlayKind::None);
        assert!(!app.pump_timeout(Duration::from_millis(5)));
    }

    #[test]
    fn set_overlay_same_kind_is_noop() {
        let mut app = ctx();
        app.set_overlay(OverlayKind::None);
        assert!(app.host().kinds.is_empty());
    }
}
