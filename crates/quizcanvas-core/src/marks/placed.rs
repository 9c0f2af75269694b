//! Placed pattern shapes for pattern questions.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Default half-extent of a placed shape.
pub const DEFAULT_SIZE: f64 = 25.0;

/// Shape stamped onto the canvas in pattern mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacedKind {
    #[default]
    Circle,
    Triangle,
    Square,
}

/// A pattern shape stamped at a position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedShape {
    pub x: f64,
    pub y: f64,
    #[serde(rename = "type")]
    pub kind: PlacedKind,
    pub size: f64,
}

impl PlacedShape {
    /// Create a shape of the given kind at the given center with the default
    /// size.
    pub fn new(center: Point, kind: PlacedKind) -> Self {
        Self {
            x: center.x,
            y: center.y,
            kind,
            size: DEFAULT_SIZE,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Check if a point lies within the shape's bounding box (inflated by
    /// `tolerance`).
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let extent = self.size + tolerance;
        (point.x - self.x).abs() <= extent && (point.y - self.y).abs() <= extent
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_size() {
        let shape = PlacedShape::new(Point::new(50.0, 50.0), PlacedKind::Triangle);
        assert_eq!(shape.size, DEFAULT_SIZE);
        assert_eq!(shape.kind, PlacedKind::Triangle);
    }

    #[test]
    fn test_hit_test_box() {
        let shape = PlacedShape::new(Point::new(0.0, 0.0), PlacedKind::Square);
        assert!(shape.hit_test(Point::new(20.0, -20.0), 0.0));
        assert!(!shape.hit_test(Point::new(30.0, 0.0), 0.0));
    }

    #[test]
    fn test_translate() {
        let mut shape = PlacedShape::new(Point::new(10.0, 10.0), PlacedKind::Circle);
        shape.translate(-10.0, 5.0);
        assert_eq!(shape.center(), Point::new(0.0, 15.0));
    }

    #[test]
    fn test_wire_format() {
        let shape = PlacedShape::new(Point::new(1.0, 2.0), PlacedKind::Square);
        let json = serde_json::to_value(&shape).unwrap();
        assert_eq!(json["type"], "square");
        assert_eq!(json["size"], 25.0);
    }
}
