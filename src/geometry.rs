//! Axis-aligned rectangle math shared by layout and hit-testing.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in layout space (f64 compositor coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Rect {
    /// Construct a rectangle from origin and dimensions.
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Center point of the rectangle.
    #[must_use]
    pub fn center(&self) -> DVec2 {
        DVec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether a point lies inside the rectangle (edges inclusive).
    #[must_use]
    pub fn contains(&self, point: DVec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}
