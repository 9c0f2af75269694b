//! Mark definitions for the annotation canvas.

mod circle;
mod connector;
mod placed;

pub use circle::{CircleKind, CircleMark};
pub use connector::ConnectorMark;
pub use placed::{PlacedKind, PlacedShape};

use kurbo::Point;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Serializable stroke color (RGB8), carried on the wire as a `#rrggbb` hex
/// string to match the authoring tool's payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl MarkColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rgb` or `#rrggbb` hex string.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?.trim();
        match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
                let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
                let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
                Some(Self::new(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self::new(r, g, b))
            }
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for MarkColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for MarkColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).ok_or_else(|| D::Error::custom(format!("invalid color: {s}")))
    }
}

/// Cyclic palette for connector marks; each committed connector takes the
/// next color.
pub const CONNECTOR_PALETTE: [MarkColor; 6] = [
    MarkColor::new(0xf8, 0x71, 0x71),
    MarkColor::new(0x60, 0xa5, 0xfa),
    MarkColor::new(0x34, 0xd3, 0x99),
    MarkColor::new(0xfb, 0xbf, 0x24),
    MarkColor::new(0xa7, 0x8b, 0xfa),
    MarkColor::new(0xec, 0x48, 0x99),
];

/// Which of the three mark lists a change applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkKind {
    Circles,
    Connectors,
    Shapes,
}

impl MarkKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MarkKind::Circles => "circles",
            MarkKind::Connectors => "connectors",
            MarkKind::Shapes => "shapes",
        }
    }
}

/// One user-drawn mark.
///
/// Deserialization is untagged to match the authoring wire format: connectors
/// are recognized by their `points` array, placed shapes by their mandatory
/// `size`, and anything else with a position is a circle/oval mark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Annotation {
    Connector(ConnectorMark),
    Shape(PlacedShape),
    Circle(CircleMark),
}

impl Annotation {
    pub fn kind(&self) -> MarkKind {
        match self {
            Annotation::Connector(_) => MarkKind::Connectors,
            Annotation::Shape(_) => MarkKind::Shapes,
            Annotation::Circle(_) => MarkKind::Circles,
        }
    }

    /// Check if a point (in canvas coordinates) hits this mark.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self {
            Annotation::Connector(c) => c.hit_test(point, tolerance),
            Annotation::Shape(s) => s.hit_test(point, tolerance),
            Annotation::Circle(c) => c.hit_test(point, tolerance),
        }
    }

    /// Rigid translation by the given delta.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            Annotation::Connector(c) => c.translate(dx, dy),
            Annotation::Shape(s) => s.translate(dx, dy),
            Annotation::Circle(c) => c.translate(dx, dy),
        }
    }
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = kurbo::Vec2::new(b.x - a.x, b.y - a.y);
    let pv = kurbo::Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    ((point.x - proj.x).powi(2) + (point.y - proj.y).powi(2)).sqrt()
}

/// Minimum distance from a point to a polyline (sequence of connected segments).
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}
