// Basic geometry types shared by layout, hit testing and drawing

use std::ops::Sub;

/// A point in label or window coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self {
            x: x as f64,
            y: y as f64,
        }
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Width and height.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A size with no vertical limit.
    pub const fn with_unbounded_height(width: f64) -> Self {
        Self {
            width,
            height: f64::INFINITY,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point { x, y },
            size: Size { width, height },
        }
    }

    pub fn left(&self) -> f64 {
        self.origin.x
    }

    pub fn top(&self) -> f64 {
        self.origin.y
    }

    pub fn right(&self) -> f64 {
        self.origin.x + self.size.width
    }

    pub fn bottom(&self) -> f64 {
        self.origin.y + self.size.height
    }

    pub fn width(&self) -> f64 {
        self.size.width
    }

    pub fn height(&self) -> f64 {
        self.size.height
    }

    /// Half-open containment: the left and top edges are inside, the right and
    /// bottom edges are not. An empty rectangle contains nothing.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left().min(other.left());
        let top = self.top().min(other.top());
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(left, top, right - left, bottom - top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_half_open() {
        let rect = Rect::new(10.0, 20.0, 6.0, 12.0);
        assert!(rect.contains(Point::new(10.0, 20.0)));
        assert!(rect.contains(Point::new(15.9, 31.9)));
        assert!(!rect.contains(Point::new(16.0, 25.0)));
        assert!(!rect.contains(Point::new(12.0, 32.0)));
        assert!(!rect.contains(Point::new(9.9, 25.0)));
    }

    #[test]
    fn test_zero_width_rect_contains_nothing() {
        let rect = Rect::new(30.0, 0.0, 0.0, 12.0);
        assert!(!rect.contains(Point::new(30.0, 5.0)));
    }

    #[test]
    fn test_point_subtraction() {
        let p = Point::new(105.0, 47.0) - Point::new(100.0, 40.0);
        assert_eq!(p, Point::new(5.0, 7.0));
    }

    #[test]
    fn test_union() {
        let a = Rect::new(0.0, 0.0, 6.0, 12.0);
        let b = Rect::new(6.0, 0.0, 6.0, 12.0);
        assert_eq!(a.union(&b), Rect::new(0.0, 0.0, 12.0, 12.0));
    }
}
