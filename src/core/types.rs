use serde::{Deserialize, Serialize};

/// Overall canvas size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    #[must_use]
    pub fn width_px(self) -> f64 {
        f64::from(self.width)
    }

    #[must_use]
    pub fn height_px(self) -> f64 {
        f64::from(self.height)
    }
}

/// A point in pixel space (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in pixel space.
///
/// `width`/`height` are never negative for rectangles produced by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds a rectangle from two corners, normalizing negative extents.
    #[must_use]
    pub fn from_corners(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            x: x0.min(x1),
            y: y0.min(y1),
            width: (x1 - x0).abs(),
            height: (y1 - y0).abs(),
        }
    }

    #[must_use]
    pub fn right(self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn area(self) -> f64 {
        self.width * self.height
    }

    #[must_use]
    pub fn center(self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Shrinks the rectangle by `amount` on every side, collapsing to a
    /// zero-size rectangle at the centre rather than going negative.
    #[must_use]
    pub fn inset(self, amount: f64) -> Self {
        if !amount.is_finite() || amount <= 0.0 {
            return self;
        }
        let dx = amount.min(self.width * 0.5);
        let dy = amount.min(self.height * 0.5);
        Self {
            x: self.x + dx,
            y: self.y + dy,
            width: self.width - 2.0 * dx,
            height: self.height - 2.0 * dy,
        }
    }

    /// Returns `true` when the interiors of both rectangles overlap.
    #[must_use]
    pub fn overlaps(self, other: Self) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Returns `true` when `other` lies inside `self` (within `epsilon`).
    #[must_use]
    pub fn contains_rect(self, other: Self, epsilon: f64) -> bool {
        other.x >= self.x - epsilon
            && other.y >= self.y - epsilon
            && other.right() <= self.right() + epsilon
            && other.bottom() <= self.bottom() + epsilon
    }

    /// Clips `self` to `bounds`; a rectangle entirely outside collapses
    /// onto the nearest edge.
    #[must_use]
    pub fn clamp_to(self, bounds: Self) -> Self {
        let clip_x = |value: f64| value.max(bounds.x).min(bounds.right());
        let clip_y = |value: f64| value.max(bounds.y).min(bounds.bottom());
        Self::from_corners(
            clip_x(self.x),
            clip_y(self.y),
            clip_x(self.right()),
            clip_y(self.bottom()),
        )
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

/// Output pixel interval of a scale.
///
/// `start` may be greater than `end` (e.g. a Y axis mapping low values to the
/// bottom of the plot).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelRange {
    pub start: f64,
    pub end: f64,
}

impl PixelRange {
    #[must_use]
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn reversed(self) -> Self {
        Self {
            start: self.end,
            end: self.start,
        }
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.end - self.start
    }

    #[must_use]
    pub fn extent(self) -> f64 {
        self.span().abs()
    }

    #[must_use]
    pub fn min(self) -> f64 {
        self.start.min(self.end)
    }

    #[must_use]
    pub fn max(self) -> f64 {
        self.start.max(self.end)
    }

    #[must_use]
    pub fn midpoint(self) -> f64 {
        (self.start + self.end) * 0.5
    }

    /// Linear interpolation at `t` where `0` maps to `start` and `1` to `end`.
    #[must_use]
    pub fn lerp(self, t: f64) -> f64 {
        self.start + t * self.span()
    }
}
