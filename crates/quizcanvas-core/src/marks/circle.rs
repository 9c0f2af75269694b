//! Circle and oval marks for encircle questions.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Default radius for a plain circle mark.
pub const DEFAULT_RADIUS: f64 = 30.0;
/// Default radii for an oval mark.
pub const OVAL_RADIUS_X: f64 = 40.0;
pub const OVAL_RADIUS_Y: f64 = 25.0;

/// Circle mark variant tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CircleKind {
    Circle,
    Oval,
}

/// A circle or oval drawn around an area of the reference image.
///
/// Authored answer keys may omit the kind tag and the radius fields; the
/// evaluator treats the missing fields as wildcards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleMark {
    pub x: f64,
    pub y: f64,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<CircleKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(rename = "radiusX", default, skip_serializing_if = "Option::is_none")]
    pub radius_x: Option<f64>,
    #[serde(rename = "radiusY", default, skip_serializing_if = "Option::is_none")]
    pub radius_y: Option<f64>,
}

impl CircleMark {
    /// Create a plain circle at the given center with the default radius.
    pub fn circle(center: Point) -> Self {
        Self {
            x: center.x,
            y: center.y,
            kind: Some(CircleKind::Circle),
            radius: Some(DEFAULT_RADIUS),
            radius_x: None,
            radius_y: None,
        }
    }

    /// Create an oval at the given center with the default radii.
    pub fn oval(center: Point) -> Self {
        Self {
            x: center.x,
            y: center.y,
            kind: Some(CircleKind::Oval),
            radius: None,
            radius_x: Some(OVAL_RADIUS_X),
            radius_y: Some(OVAL_RADIUS_Y),
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Effective horizontal/vertical radii, falling back to defaults for
    /// marks authored without them.
    fn radii(&self) -> (f64, f64) {
        match (self.radius, self.radius_x, self.radius_y) {
            (Some(r), _, _) => (r, r),
            (None, Some(rx), Some(ry)) => (rx, ry),
            (None, Some(rx), None) => (rx, rx),
            (None, None, Some(ry)) => (ry, ry),
            (None, None, None) => (DEFAULT_RADIUS, DEFAULT_RADIUS),
        }
    }

    /// Check if a point lies inside the (inflated) mark.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let (rx, ry) = self.radii();
        let rx = rx + tolerance;
        let ry = ry + tolerance;
        if rx < f64::EPSILON || ry < f64::EPSILON {
            return false;
        }
        let dx = (point.x - self.x) / rx;
        let dy = (point.y - self.y) / ry;
        dx * dx + dy * dy <= 1.0
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }
}
