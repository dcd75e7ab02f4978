#![forbid(unsafe_code)]

//! veil Runtime
//!
//! The application/logic context of the overlay engine.
//!
//! # Key Components
//!
//! - [`OverlayStore`] - Overlay kind, data and session, read wait-free
//! - [`AppContext`] - Sole writer of the store; applies [`AppMsg`] requests
//! - [`Handoff`] - Fire-and-forget channel from the interaction context
//! - [`FrameTicker`] - Background frame source for hosts without a display
//!   callback
//! - [`OverlayConfig`] - Every tunable of the overlay as data
//!
//! # Role in veil
//! `veil-runtime` owns everything that is not per-frame arithmetic: which
//! overlay is open, the data it presents, `reset()`, and the host callbacks.
//! The interaction context (`veil-overlay`) only reads the store and posts
//! messages; it never waits on this crate.

pub mod config;
pub mod handoff;
pub mod logging;
pub mod overlay;
pub mod store;
pub mod subscription;

pub use config::{
    ConfigError, DismissPolicyConfig, DragPolicyConfig, FramePolicyConfig, OverlayConfig,
    TransitionPolicyConfig,
};
pub use handoff::{AppContext, AppHost, AppMsg, Handoff, NoopHost};
pub use overlay::{
    Attachment, AttachmentAction, AttachmentKind, AttachmentSet, ContentKind,
    DEFAULT_CONTENT_ORDER, GroupPosition, Message, MessageAction, OverlayData, OverlayKind,
    QuotedMessage, Reaction,
};
pub use store::{OverlayState, OverlayStore};
pub use subscription::{FrameTicker, StopSignal, StopTrigger, SubId, Subscription, SubscriptionHandle};
