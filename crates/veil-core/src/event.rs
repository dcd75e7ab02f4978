#![forbid(unsafe_code)]

//! Canonical pointer input events.
//!
//! Coordinates are logical units relative to the top-left of the viewport.
//! Every event carries the id of the pointer (finger, stylus, mouse) that
//! produced it so multi-pointer input can be detected and rejected.

use crate::geometry::Point;

/// Identifier of a single pointer for the duration of its contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PointerId(pub u32);

/// The phase of a pointer contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventKind {
    /// Contact started.
    Down,
    /// Contact moved.
    Move,
    /// Contact lifted.
    Up,
    /// The platform took the contact away (e.g. system gesture).
    Cancel,
}

/// A raw pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub pointer: PointerId,
    pub position: Point,
}

impl PointerEvent {
    /// Create a pointer event for the primary pointer.
    #[must_use]
    pub const fn new(kind: PointerEventKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            pointer: PointerId(0),
            position: Point::new(x, y),
        }
    }

    /// Primary pointer down at `(x, y)`.
    #[must_use]
    pub const fn down(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Down, x, y)
    }

    /// Primary pointer moved to `(x, y)`.
    #[must_use]
    pub const fn moved(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Move, x, y)
    }

    /// Primary pointer lifted at `(x, y)`.
    #[must_use]
    pub const fn up(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Up, x, y)
    }

    /// Primary pointer cancelled at `(x, y)`.
    #[must_use]
    pub const fn cancel(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Cancel, x, y)
    }

    /// Attribute the event to another pointer (builder pattern).
    #[must_use]
    pub const fn with_pointer(mut self, pointer: PointerId) -> Self {
        self.pointer = pointer;
        self
    }
}
