#![forbid(unsafe_code)]

//! Layout measurer: records the message bubble's geometry on every layout
//! pass and derives the "grow from this point" transform for elements
//! anchored above it (the reaction picker).
//!
//! The anchor is the bubble's top edge at the alignment-adjusted reference x:
//! the right edge for left-aligned bubbles, the left edge for right-aligned
//! ones.
//!
//! ```text
//!         anchor (left alignment)
//!              ▼
//!   ┌──────────●
//!   │ bubble   │
//!   └──────────┘
//! ```
//!
//! Scaling an element by `s` around its own centre and then translating by
//! `(1 − s)·(anchor − centre)` is the same as scaling it around `anchor`.

use veil_core::geometry::{Alignment, Point, Rect};

/// Bubble geometry from the latest layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub rect: Rect,
    pub alignment: Alignment,
    /// Alignment-adjusted horizontal reference point.
    pub reference_x: f64,
}

impl Geometry {
    #[must_use]
    pub fn new(rect: Rect, alignment: Alignment) -> Self {
        Self {
            rect,
            alignment,
            reference_x: alignment.reference_x(&rect),
        }
    }

    /// Point anchored elements grow out of.
    #[inline]
    #[must_use]
    pub fn anchor(&self) -> Point {
        Point::new(self.reference_x, self.rect.top())
    }

    /// Transform that scales `element` by `scale` around [`Self::anchor`].
    #[must_use]
    pub fn grow_transform(&self, element: &Rect, scale: f64) -> GrowTransform {
        let scale = scale.clamp(0.0, 1.0);
        let anchor = self.anchor();
        let centre = element.center();
        GrowTransform {
            scale,
            translate_x: (1.0 - scale) * (anchor.x - centre.x),
            translate_y: (1.0 - scale) * (anchor.y - centre.y),
        }
    }
}

/// Centre-relative scale plus translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowTransform {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl GrowTransform {
    /// No-op transform.
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
    };

    /// Where `p` (in element coordinates around `centre`) ends up.
    #[must_use]
    pub fn apply(&self, centre: Point, p: Point) -> Point {
        Point::new(
            centre.x + (p.x - centre.x) * self.scale + self.translate_x,
            centre.y + (p.y - centre.y) * self.scale + self.translate_y,
        )
    }
}

/// Keeps the most recent [`Geometry`].
#[derive(Debug, Clone, Default)]
pub struct LayoutMeasurer {
    geometry: Option<Geometry>,
    passes: u64,
}

impl LayoutMeasurer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one layout pass. Returns whether the geometry changed.
    pub fn on_layout(&mut self, rect: Rect, alignment: Alignment) -> bool {
        self.passes += 1;
        let next = Geometry::new(rect, alignment);
        if self.geometry == Some(next) {
            return false;
        }
        tracing::trace!(
            message = "layout.measure",
            x = rect.x,
            y = rect.y,
            width = rect.width,
            height = rect.height,
            reference_x = next.reference_x
        );
        self.geometry = Some(next);
        true
    }

    #[inline]
    #[must_use]
    pub fn geometry(&self) -> Option<&Geometry> {
        self.geometry.as_ref()
    }

    /// Number of layout passes seen.
    #[inline]
    #[must_use]
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Grow transform for `element`, identity until the first layout.
    #[must_use]
    pub fn grow_transform(&self, element: &Rect, show_screen: f64) -> GrowTransform {
        self.geometry
            .map_or(GrowTransform::IDENTITY, |g| g.grow_transform(element, show_screen))
    }

    pub fn clear(&mut self) {
        self.geometry = None;
    }
}
