#![forbid(unsafe_code)]

//! Message overlay components for veil.
//!
//! # Key Components
//!
//! - [`ValueStore`] - The four animated cells (`show_screen`, `translate_y`,
//!   `scale`, `opacity`)
//! - [`TransitionDriver`] - Spring/timing/decay animations with tagged
//!   completions
//! - [`GestureInterpreter`] - Drag feedback and the dismiss-or-snap-back
//!   decision
//! - [`VisibilityMachine`] - `Hidden → Showing → Visible → Dismissing`
//! - [`LayoutMeasurer`] - Bubble geometry and the grow-from-anchor transform
//! - [`OverlayController`] - Composes everything for one overlay
//!
//! Styling ([`style`](style::style)), content dispatch
//! ([`render_content`]) and render suppression ([`should_skip_render`]) are
//! pure functions the controller calls.

pub mod content;
pub mod controller;
pub mod driver;
pub mod interpreter;
pub mod measurer;
pub mod memo;
pub mod style;
pub mod values;
pub mod visibility;

pub use content::{ContentBlock, ContentRenderer, blocks, is_emoji_only, render_content};
pub use controller::OverlayController;
pub use driver::{Completion, Transition, TransitionDriver};
pub use interpreter::{GestureInterpreter, GestureOutcome};
pub use measurer::{Geometry, GrowTransform, LayoutMeasurer};
pub use memo::{OverlayProps, RenderGate, should_skip_render};
pub use style::{
    BubbleFill, BubbleStyle, CornerRadii, OverlayTheme, RenderProps, Rgba, bubble_fill,
    corner_radii,
};
pub use values::{CellId, ValueSnapshot, ValueStore};
pub use visibility::{OverlayPhase, VisibilityMachine};
