// Touch points delivered with a pointer-release event

use crate::geometry::Point;

/// One finger (or mouse button) in a terminating touch event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Touch {
    /// Location in window coordinates.
    pub location: Point,
    /// Seconds on a monotonic clock; only the ordering matters.
    pub timestamp: f64,
}

impl Touch {
    pub fn new(location: impl Into<Point>, timestamp: f64) -> Self {
        Touch {
            location: location.into(),
            timestamp,
        }
    }

    /// Location relative to a view whose top-left corner is at `origin`.
    pub fn location_in(&self, origin: Point) -> Point {
        self.location - origin
    }
}

/// The most recently updated touch. Among equal timestamps the one that comes
/// last wins.
pub fn latest_touch(touches: &[Touch]) -> Option<&Touch> {
    touches
        .iter()
        .max_by(|a, b| a.timestamp.total_cmp(&b.timestamp))
}
