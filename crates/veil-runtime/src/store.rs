#![forbid(unsafe_code)]

//! Process-wide overlay state with wait-free reads.
//!
//! [`OverlayStore`] holds the active [`OverlayKind`], the [`OverlayData`]
//! snapshot and a session counter. The application context is its only
//! writer; the interaction context reads it every frame through
//! [`OverlayStore::load`], which never blocks.
//!
//! # Invariants
//!
//! 1. Writes are only reachable from this crate (`AppContext`).
//! 2. `session` strictly increases on every [`OverlayStore::open`], so a
//!    completion tagged with an older session is recognisably stale.
//! 3. `reset()` clears the data and a `Message` kind but keeps the session
//!    counter and any other overlay kind the app switched to.

use std::sync::Arc;

use arc_swap::{ArcSwap, Guard};

use crate::overlay::{OverlayData, OverlayKind};

/// One consistent view of the overlay state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OverlayState {
    pub kind: OverlayKind,
    pub data: Option<Arc<OverlayData>>,
    /// Incremented each time a message overlay is opened.
    pub session: u64,
}

impl OverlayState {
    /// Whether the message overlay is the active kind.
    #[inline]
    #[must_use]
    pub fn is_message(&self) -> bool {
        self.kind == OverlayKind::Message
    }
}

/// Shared overlay state; clones share the same underlying store.
#[derive(Clone)]
pub struct OverlayStore {
    inner: Arc<ArcSwap<OverlayState>>,
}

impl std::fmt::Debug for OverlayStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.load();
        f.debug_struct("OverlayStore")
            .field("kind", &state.kind)
            .field("session", &state.session)
            .field("has_data", &state.data.is_some())
            .finish()
    }
}

impl Default for OverlayStore {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayStore {
    /// Create an empty store (kind `None`, no data).
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(OverlayState::default())),
        }
    }

    /// Read the current state without cloning it.
    #[inline]
    pub fn load(&self) -> Guard<Arc<OverlayState>> {
        self.inner.load()
    }

    /// Read the current state as an owned `Arc`.
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> Arc<OverlayState> {
        self.inner.load_full()
    }

    /// Open the message overlay for `data`, starting a new session.
    pub(crate) fn open(&self, data: OverlayData) -> u64 {
        let data = Arc::new(data);
        let prev = self.inner.rcu(|state| OverlayState {
            kind: OverlayKind::Message,
            data: Some(Arc::clone(&data)),
            session: state.session + 1,
        });
        prev.session + 1
    }

    /// Switch the active kind, keeping data and session.
    pub(crate) fn set_kind(&self, kind: OverlayKind) {
        self.inner.rcu(|state| OverlayState {
            kind,
            data: state.data.clone(),
            session: state.session,
        });
    }

    /// Release the data, keeping the session counter. A `Message` kind drops
    /// to `None`; other kinds stay active.
    pub(crate) fn reset(&self) {
        self.inner.rcu(|state| OverlayState {
            kind: match state.kind {
                OverlayKind::Message => OverlayKind::None,
                other => other,
            },
            data: None,
            session: state.session,
        });
    }
}
