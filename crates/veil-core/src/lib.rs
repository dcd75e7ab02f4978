#![forbid(unsafe_code)]

//! Core: animation primitives, animated value cells, and pointer gestures.
//!
//! # Role in veil
//! `veil-core` is the interaction layer. It owns the numeric machinery that
//! runs on the interaction/animation context: scalar animations, the
//! single-writer [`cell::AnimatedCell`], and the pan/tap recognizer that turns
//! raw pointer input into gestures.
//!
//! # Primary responsibilities
//! - **Animation**: spring, timing and decay families plus easing and
//!   interpolation helpers.
//! - **AnimatedCell**: one animated scalar with explicit cancel-then-acquire
//!   ownership between a gesture and the transition driver.
//! - **PointerEvent**: canonical pointer input.
//! - **GestureRecognizer**: single-pointer vertical pan with a companion tap.
//!
//! # How it fits in the system
//! The overlay crate (`veil-overlay`) composes these pieces into the overlay
//! controller. The application context (`veil-runtime`) never touches them;
//! nothing here blocks or allocates per frame beyond gesture output vectors.

pub mod animation;
pub mod cell;
pub mod event;
pub mod geometry;
pub mod gesture;

pub use animation::{
    ActiveAnimation, Animation, AnimationKind, Decay, DecayConfig, Easing, Extrapolate, Spring,
    SpringConfig, Timing, TimingConfig, interpolate,
};
pub use cell::{AnimatedCell, Finished, OwnershipError, Writer};
pub use event::{PointerEvent, PointerEventKind, PointerId};
pub use geometry::{Alignment, Point, Rect, Size};
pub use gesture::{GestureConfig, GestureEvent, GestureRecognizer, GestureSample};
