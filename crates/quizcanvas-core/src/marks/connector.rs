//! Connector marks (arrows) for connect questions.

use super::{MarkColor, point_to_polyline_dist};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// An arrow connecting two matched elements on the reference image.
///
/// Coordinates are stored flat (`[x1, y1, x2, y2, ...]`) to match the wire
/// format. Only the first and last coordinate pairs are endpoints that matter
/// for scoring; everything in between is rendering detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorMark {
    pub points: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<MarkColor>,
}

impl ConnectorMark {
    /// Create a two-point connector from start to end.
    pub fn new(start: Point, end: Point, color: MarkColor) -> Self {
        Self {
            points: vec![start.x, start.y, end.x, end.y],
            color: Some(color),
        }
    }

    /// The first coordinate pair, if present.
    pub fn start(&self) -> Option<Point> {
        self.coord_pairs().next()
    }

    /// The last coordinate pair, if present.
    pub fn end(&self) -> Option<Point> {
        self.coord_pairs().last()
    }

    /// Whether both endpoints are present (at least 4 coordinate values).
    pub fn has_endpoints(&self) -> bool {
        self.points.len() >= 4
    }

    /// Iterate the flat coordinate list as points. A trailing unpaired value
    /// is ignored.
    pub fn coord_pairs(&self) -> impl Iterator<Item = Point> + '_ {
        self.points.chunks_exact(2).map(|c| Point::new(c[0], c[1]))
    }

    /// Check if a point lies within `tolerance` of the connector's polyline.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let pts: Vec<Point> = self.coord_pairs().collect();
        match pts.len() {
            0 => false,
            1 => {
                let d = ((point.x - pts[0].x).powi(2) + (point.y - pts[0].y).powi(2)).sqrt();
                d <= tolerance
            }
            _ => point_to_polyline_dist(point, &pts) <= tolerance,
        }
    }

    /// Rigid translation: every coordinate pair moves by the same delta.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        for (i, v) in self.points.iter_mut().enumerate() {
            if i % 2 == 0 {
                *v += dx;
            } else {
                *v += dy;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marks::CONNECTOR_PALETTE;

    #[test]
    fn test_endpoints() {
        let mark = ConnectorMark::new(
            Point::new(10.0, 10.0),
            Point::new(200.0, 200.0),
            CONNECTOR_PALETTE[0],
        );
        assert!(mark.has_endpoints());
        assert_eq!(mark.start(), Some(Point::new(10.0, 10.0)));
        assert_eq!(mark.end(), Some(Point::new(200.0, 200.0)));
    }

    #[test]
    fn test_missing_endpoint() {
        let mark = ConnectorMark {
            points: vec![10.0, 10.0],
            color: None,
        };
        assert!(!mark.has_endpoints());
        assert_eq!(mark.start(), mark.end());
    }

    #[test]
    fn test_rigid_translate() {
        let mut mark = ConnectorMark::new(
            Point::new(0.0, 0.0),
            Point::new(10.0, 20.0),
            CONNECTOR_PALETTE[1],
        );
        mark.translate(5.0, -3.0);
        assert_eq!(mark.points, vec![5.0, -3.0, 15.0, 17.0]);
    }

    #[test]
    fn test_hit_test_near_segment() {
        let mark = ConnectorMark::new(
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            CONNECTOR_PALETTE[2],
        );
        assert!(mark.hit_test(Point::new(50.0, 5.0), 8.0));
        assert!(!mark.hit_test(Point::new(50.0, 20.0), 8.0));
    }

    #[test]
    fn test_wire_format() {
        let mark = ConnectorMark::new(
            Point::new(1.0, 2.0),
            Point::new(3.0, 4.0),
            CONNECTOR_PALETTE[0],
        );
        let json = serde_json::to_value(&mark).unwrap();
        assert_eq!(json["points"], serde_json::json!([1.0, 2.0, 3.0, 4.0]));
        assert_eq!(json["color"], "#f87171");
    }
}
