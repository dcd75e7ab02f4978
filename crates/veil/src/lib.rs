#![forbid(unsafe_code)]

//! veil public facade crate.
//!
//! Re-exports the types a host needs to present a gesture-driven message
//! overlay and offers a prelude for day-to-day usage.
//!
//! ```ignore
//! use veil::prelude::*;
//!
//! let mut app = AppContext::new(NoopHost);
//! let mut overlay = OverlayController::new(
//!     OverlayConfig::default(),
//!     Size::new(390.0, 844.0),
//!     app.store(),
//!     app.handoff(),
//! );
//!
//! app.open(OverlayData::for_message(Message::new("m1", "hello")));
//! overlay.sync();
//! // per display frame:
//! overlay.frame(dt);
//! app.pump();
//! overlay.sync();
//! ```

mod error;

pub use error::{Error, Result};

// --- Core re-exports -------------------------------------------------------

pub use veil_core::animation::{Easing, SpringConfig, TimingConfig};
pub use veil_core::event::{PointerEvent, PointerEventKind, PointerId};
pub use veil_core::geometry::{Alignment, Point, Rect, Size};
pub use veil_core::gesture::{GestureConfig, GestureEvent, GestureSample};

// --- Runtime re-exports ----------------------------------------------------

pub use veil_runtime::{
    AppContext, AppHost, AppMsg, Attachment, AttachmentKind, ConfigError, FrameTicker, Handoff,
    Message, MessageAction, NoopHost, OverlayConfig, OverlayData, OverlayKind, OverlayStore,
    Reaction, SubscriptionHandle, logging,
};

// --- Overlay re-exports ----------------------------------------------------

pub use veil_overlay::{
    ContentBlock, ContentRenderer, GestureOutcome, OverlayController, OverlayPhase, OverlayTheme,
    RenderProps, Rgba, render_content, should_skip_render,
};

/// Load an [`OverlayConfig`] from a `.toml` or `.json` file and validate it.
///
/// Any other extension is read as TOML.
#[cfg(feature = "config")]
pub fn load_config(path: impl AsRef<std::path::Path>) -> Result<OverlayConfig> {
    let path = path.as_ref();
    let config = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => OverlayConfig::from_json_file(path)?,
        _ => OverlayConfig::from_toml_file(path)?,
    };
    Ok(config.validated()?)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Alignment, AppContext, AppHost, Error, GestureOutcome, Message, NoopHost, OverlayConfig,
        OverlayController, OverlayData, OverlayKind, OverlayPhase, PointerEvent, Rect,
        RenderProps, Result, Size,
    };

    pub use crate::{core, overlay, runtime};
}

pub use veil_core as core;
pub use veil_overlay as overlay;
pub use veil_runtime as runtime;
