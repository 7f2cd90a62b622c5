//! Geometric primitives in pixel space.
//!
//! Scenes speak in these types: curve points, marker lines, and widget
//! regions. All coordinates are `f64` because path data is emitted as
//! decimal strings and must not pick up single-precision noise.

/// A 2D point with floating-point pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point {
    /// Origin point (0, 0).
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A line segment between two points (axis markers, gridlines).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Line {
    /// Start point.
    pub start: Point,
    /// End point.
    pub end: Point,
}

impl Line {
    /// Create a new line segment.
    #[must_use]
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Create a line from coordinates.
    #[must_use]
    pub const fn from_coords(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::new(Point::new(x0, y0), Point::new(x1, y1))
    }
}

/// A rectangle defined by top-left position and size.
///
/// Widget regions and bar geometry. `height` grows downward, matching
/// screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X coordinate of the top-left corner.
    pub x: f64,
    /// Y coordinate of the top-left corner.
    pub y: f64,
    /// Width of the rectangle.
    pub width: f64,
    /// Height of the rectangle.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Get the center point of the rectangle.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(3.0, 4.0);
        assert!((p1.distance(p2) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_point_distance_symmetric() {
        let p1 = Point::new(-2.0, 7.5);
        let p2 = Point::new(4.0, 1.0);
        assert!((p1.distance(p2) - p2.distance(p1)).abs() < 1e-12);
    }

    #[test]
    fn test_line_from_coords() {
        let line = Line::from_coords(0.0, 0.0, 3.0, 4.0);
        assert_eq!(line.start, Point::ORIGIN);
        assert_eq!(line.end, Point::new(3.0, 4.0));
    }

    #[test]
    fn test_rect_center() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        let c = rect.center();
        assert!((c.x - 60.0).abs() < 1e-9);
        assert!((c.y - 45.0).abs() < 1e-9);
    }
}
