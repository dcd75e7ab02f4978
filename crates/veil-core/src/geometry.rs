#![forbid(unsafe_code)]

//! Geometric primitives in logical (density-independent) units.

/// A point in logical units, origin at the top-left of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Device viewport extent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size. Negative extents are clamped to zero.
    #[inline]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Half the vertical extent; the drag distance at which the opacity and
    /// scale ramps bottom out and past which a release may dismiss.
    #[inline]
    pub fn half_height(&self) -> f64 {
        self.height / 2.0
    }
}

/// An axis-aligned rectangle, used for measured layout bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width (never negative).
    pub width: f64,
    /// Height (never negative).
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle. Negative extents are clamped to zero.
    #[inline]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Left edge (alias for x).
    #[inline]
    pub const fn left(&self) -> f64 {
        self.x
    }

    /// Top edge (alias for y).
    #[inline]
    pub const fn top(&self) -> f64 {
        self.y
    }

    /// Right edge.
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Centre of the rectangle.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if a point is inside the rectangle (right/bottom exclusive).
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }
}

/// Horizontal alignment of a message bubble within the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Alignment {
    /// Messages from other participants.
    #[default]
    Left,
    /// Messages from the current user.
    Right,
}

impl Alignment {
    /// Horizontal reference point used to anchor elements above a bubble.
    ///
    /// Left-aligned bubbles anchor at their right edge, right-aligned bubbles
    /// at their left edge, so anchored elements grow toward the screen centre.
    #[inline]
    pub fn reference_x(self, rect: &Rect) -> f64 {
        match self {
            Self::Left => rect.right(),
            Self::Right => rect.left(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_edges_and_center() {
        let r = Rect::new(10.0, 20.0, 100.0, 40.0);
        assert_eq!(r.right(), 110.0);
        assert_eq!(r.bottom(), 60.0);
        assert_eq!(r.center(), Point::new(60.0, 40.0));
    }

    #[test]
    fn negative_extent_clamped() {
        let r = Rect::new(0.0, 0.0, -5.0, 3.0);
        assert_eq!(r.width, 0.0);
        assert!(r.is_empty());
    }

    #[test]
    fn contains_is_right_exclusive() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(Point::new(0.0, 0.0)));
        assert!(r.contains(Point::new(9.9, 9.9)));
        assert!(!r.contains(Point::new(10.0, 5.0)));
    }

    #[test]
    fn reference_x_follows_alignment() {
        let r = Rect::new(16.0, 100.0, 200.0, 48.0);
        assert_eq!(Alignment::Left.reference_x(&r), 216.0);
        assert_eq!(Alignment::Right.reference_x(&r), 16.0);
    }

    #[test]
    fn half_height() {
        assert_eq!(Size::new(390.0, 844.0).half_height(), 422.0);
    }
}
