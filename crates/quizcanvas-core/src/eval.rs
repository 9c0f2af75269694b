//! Tolerance-based evaluation of learner annotation sets against stored
//! answer keys.
//!
//! Comparisons are index-aligned: the i-th learner mark is compared to the
//! i-th key mark, and a length mismatch short-circuits to incorrect. Bad
//! input of any shape (unparseable payloads, missing fields, wrong mark
//! kinds) degrades to an incorrect verdict with a logged reason; this module
//! never returns an error and never panics.

use crate::editor::Mode;
use crate::marks::{Annotation, CircleMark, ConnectorMark, PlacedShape};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Geometric tolerances, in pixels at the answer key's reference scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    /// Max per-axis center offset for circle marks.
    pub position: f64,
    /// Max radius difference for circle marks; skipped when either side
    /// omits the radius.
    pub radius: f64,
    /// Max per-coordinate offset for connector endpoints.
    pub connector: f64,
    /// Max per-axis center offset for placed shapes.
    pub shape_position: f64,
}

impl Tolerances {
    /// Profile used for authoritative submission-time scoring.
    pub const SUBMISSION: Self = Self {
        position: 30.0,
        radius: 20.0,
        connector: 30.0,
        shape_position: 25.0,
    };

    /// Profile used for in-session review, with a tighter position check
    /// for circle marks.
    pub const REVIEW: Self = Self {
        position: 20.0,
        radius: 20.0,
        connector: 30.0,
        shape_position: 25.0,
    };
}

impl Default for Tolerances {
    fn default() -> Self {
        Self::SUBMISSION
    }
}

/// Authored answer-key payload for one question.
///
/// Encircle keys carry `circles`; connect and pattern keys carry `drawings`.
/// The base dimensions record the canvas size the key was authored at, so
/// tolerances stay meaningful when the rendering surface is resized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerKey {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub circles: Option<Vec<CircleMark>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drawings: Option<Vec<Annotation>>,
    #[serde(rename = "baseWidth", skip_serializing_if = "Option::is_none")]
    pub base_width: Option<f64>,
    #[serde(rename = "baseHeight", skip_serializing_if = "Option::is_none")]
    pub base_height: Option<f64>,
}

impl AnswerKey {
    /// Key for an encircle question.
    pub fn from_circles(circles: Vec<CircleMark>, base_width: f64, base_height: f64) -> Self {
        Self {
            circles: Some(circles),
            drawings: None,
            base_width: Some(base_width),
            base_height: Some(base_height),
        }
    }

    /// Key for a connect or pattern question.
    pub fn from_drawings(drawings: Vec<Annotation>, base_width: f64, base_height: f64) -> Self {
        Self {
            circles: None,
            drawings: Some(drawings),
            base_width: Some(base_width),
            base_height: Some(base_height),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Evaluate a serialized learner answer against a serialized answer key.
///
/// This is the authoritative server-side path: both sides arrive as text.
/// The key may be double-encoded (a JSON string containing JSON), which some
/// authoring paths produce.
pub fn evaluate_answer(
    mode: Mode,
    user_answer: &str,
    correct_answer: &str,
    tolerances: Tolerances,
) -> bool {
    let Some(user) = decode_lenient(user_answer) else {
        warn!("invalid user answer payload");
        return false;
    };
    let Some(learner) = parse_array::<Annotation>(&user) else {
        warn!("user answer is not an annotation array");
        return false;
    };
    evaluate_annotations(mode, &learner, correct_answer, tolerances)
}

/// Evaluate an in-memory annotation set against a serialized answer key.
pub fn evaluate_annotations(
    mode: Mode,
    learner: &[Annotation],
    correct_answer: &str,
    tolerances: Tolerances,
) -> bool {
    let Some(key) = decode_lenient(correct_answer) else {
        warn!("invalid answer key payload");
        return false;
    };
    match mode {
        Mode::Encircle => {
            let (Some(user), Some(correct)) = (
                as_circles(learner),
                key_marks::<CircleMark>(&key, "circles"),
            ) else {
                warn!("encircle answer or key has wrong mark kinds");
                return false;
            };
            circles_correct(&user, &correct, tolerances)
        }
        Mode::Connect => {
            let (Some(user), Some(correct)) = (
                as_connectors(learner),
                key_marks::<ConnectorMark>(&key, "drawings"),
            ) else {
                warn!("connect answer or key has wrong mark kinds");
                return false;
            };
            connectors_correct(&user, &correct, tolerances)
        }
        Mode::Pattern => {
            let (Some(user), Some(correct)) = (
                as_shapes(learner),
                key_marks::<PlacedShape>(&key, "drawings"),
            ) else {
                warn!("pattern answer or key has wrong mark kinds");
                return false;
            };
            shapes_correct(&user, &correct, tolerances)
        }
    }
}

/// Index-aligned comparison of circle marks.
pub fn circles_correct(
    learner: &[CircleMark],
    correct: &[CircleMark],
    tolerances: Tolerances,
) -> bool {
    if learner.len() != correct.len() {
        debug!(
            "circle count mismatch: learner={}, correct={}",
            learner.len(),
            correct.len()
        );
        return false;
    }
    learner.iter().zip(correct).enumerate().all(|(i, (u, c))| {
        let position = (u.x - c.x).abs() < tolerances.position
            && (u.y - c.y).abs() < tolerances.position;
        let radius = match (u.radius, c.radius) {
            (Some(ur), Some(cr)) => (ur - cr).abs() < tolerances.radius,
            _ => true,
        };
        let kind = c.kind.is_none() || u.kind == c.kind;
        debug!("circle {i}: position={position}, radius={radius}, kind={kind}");
        position && radius && kind
    })
}

/// Index-aligned comparison of connector endpoints. Only the first four
/// coordinates (start, end) are scored; either side missing an endpoint
/// fails.
pub fn connectors_correct(
    learner: &[ConnectorMark],
    correct: &[ConnectorMark],
    tolerances: Tolerances,
) -> bool {
    if learner.len() != correct.len() {
        debug!(
            "connector count mismatch: learner={}, correct={}",
            learner.len(),
            correct.len()
        );
        return false;
    }
    learner.iter().zip(correct).enumerate().all(|(i, (u, c))| {
        if !u.has_endpoints() || !c.has_endpoints() {
            debug!("connector {i}: missing endpoint");
            return false;
        }
        let matched = (0..4).all(|j| (u.points[j] - c.points[j]).abs() < tolerances.connector);
        debug!("connector {i}: matched={matched}");
        matched
    })
}

/// Index-aligned comparison of placed shapes: exact kind equality plus a
/// per-axis position check.
pub fn shapes_correct(
    learner: &[PlacedShape],
    correct: &[PlacedShape],
    tolerances: Tolerances,
) -> bool {
    if learner.len() != correct.len() {
        debug!(
            "shape count mismatch: learner={}, correct={}",
            learner.len(),
            correct.len()
        );
        return false;
    }
    learner.iter().zip(correct).enumerate().all(|(i, (u, c))| {
        let kind = u.kind == c.kind;
        let position = (u.x - c.x).abs() < tolerances.shape_position
            && (u.y - c.y).abs() < tolerances.shape_position;
        debug!("shape {i}: kind={kind}, position={position}");
        kind && position
    })
}

/// Parse serialized JSON, unwrapping double-encoded payloads (a JSON string
/// whose content is itself JSON).
fn decode_lenient(raw: &str) -> Option<Value> {
    let mut value: Value = serde_json::from_str(raw).ok()?;
    while let Value::String(inner) = &value {
        value = serde_json::from_str(inner).ok()?;
    }
    Some(value)
}

fn parse_array<T: serde::de::DeserializeOwned>(value: &Value) -> Option<Vec<T>> {
    if !value.is_array() {
        return None;
    }
    serde_json::from_value(value.clone()).ok()
}

/// Extract the key's mark list for one mode: either the named field of an
/// object payload, or the payload itself when it is a bare array.
fn key_marks<T: serde::de::DeserializeOwned>(key: &Value, field: &str) -> Option<Vec<T>> {
    let marks = match key.get(field) {
        Some(inner) => inner,
        None => key,
    };
    parse_array(marks)
}

fn as_circles(annotations: &[Annotation]) -> Option<Vec<CircleMark>> {
    annotations
        .iter()
        .map(|a| match a {
            Annotation::Circle(c) => Some(c.clone()),
            Annotation::Connector(_) | Annotation::Shape(_) => None,
        })
        .collect()
}

fn as_connectors(annotations: &[Annotation]) -> Option<Vec<ConnectorMark>> {
    annotations
        .iter()
        .map(|a| match a {
            Annotation::Connector(c) => Some(c.clone()),
            Annotation::Circle(_) | Annotation::Shape(_) => None,
        })
        .collect()
}

fn as_shapes(annotations: &[Annotation]) -> Option<Vec<PlacedShape>> {
    annotations
        .iter()
        .map(|a| match a {
            Annotation::Shape(s) => Some(s.clone()),
            Annotation::Circle(_) | Annotation::Connector(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circle(x: f64, y: f64, radius: f64) -> String {
        format!(r#"{{"x":{x},"y":{y},"radius":{radius},"type":"circle"}}"#)
    }

    #[test]
    fn test_encircle_within_tolerance() {
        let correct = format!(r#"{{"circles":[{}]}}"#, circle(100.0, 100.0, 30.0));
        let user = format!("[{}]", circle(115.0, 112.0, 35.0));
        assert!(evaluate_answer(
            Mode::Encircle,
            &user,
            &correct,
            Tolerances::SUBMISSION
        ));
    }

    #[test]
    fn test_encircle_length_mismatch_is_commutative() {
        let one = format!("[{}]", circle(100.0, 100.0, 30.0));
        let two = format!(
            "[{},{}]",
            circle(100.0, 100.0, 30.0),
            circle(200.0, 200.0, 30.0)
        );
        assert!(!evaluate_answer(
            Mode::Encircle,
            &one,
            &two,
            Tolerances::SUBMISSION
        ));
        assert!(!evaluate_answer(
            Mode::Encircle,
            &two,
            &one,
            Tolerances::SUBMISSION
        ));
    }

    #[test]
    fn test_encircle_bare_array_key() {
        let correct = format!("[{}]", circle(50.0, 50.0, 30.0));
        let user = format!("[{}]", circle(55.0, 45.0, 30.0));
        assert!(evaluate_answer(
            Mode::Encircle,
            &user,
            &correct,
            Tolerances::SUBMISSION
        ));
    }

    #[test]
    fn test_encircle_radius_skipped_when_key_omits_it() {
        let correct = r#"[{"x":50,"y":50}]"#;
        let user = format!("[{}]", circle(55.0, 45.0, 99.0));
        assert!(evaluate_answer(
            Mode::Encircle,
            &user,
            correct,
            Tolerances::SUBMISSION
        ));
    }

    #[test]
    fn test_encircle_kind_mismatch_fails() {
        let correct = r#"[{"x":50,"y":50,"type":"oval","radiusX":40,"radiusY":25}]"#;
        let user = format!("[{}]", circle(50.0, 50.0, 30.0));
        assert!(!evaluate_answer(
            Mode::Encircle,
            &user,
            correct,
            Tolerances::SUBMISSION
        ));
    }

    #[test]
    fn test_review_profile_is_tighter() {
        let correct = format!("[{}]", circle(100.0, 100.0, 30.0));
        let user = format!("[{}]", circle(125.0, 100.0, 30.0));
        assert!(evaluate_answer(
            Mode::Encircle,
            &user,
            &correct,
            Tolerances::SUBMISSION
        ));
        assert!(!evaluate_answer(
            Mode::Encircle,
            &user,
            &correct,
            Tolerances::REVIEW
        ));
    }

    #[test]
    fn test_connect_within_tolerance() {
        let correct = r##"[{"points":[10,10,200,200],"color":"#f87171"}]"##;
        let user = r##"[{"points":[35,38,215,190],"color":"#60a5fa"}]"##;
        assert!(evaluate_answer(
            Mode::Connect,
            user,
            correct,
            Tolerances::SUBMISSION
        ));
    }

    #[test]
    fn test_connect_out_of_tolerance() {
        let correct = r##"[{"points":[10,10,200,200],"color":"#f87171"}]"##;
        let user = r##"[{"points":[10,10,260,260],"color":"#f87171"}]"##;
        assert!(!evaluate_answer(
            Mode::Connect,
            user,
            correct,
            Tolerances::SUBMISSION
        ));
    }

    #[test]
    fn test_connect_missing_endpoint_fails() {
        let correct = r##"[{"points":[10,10,200,200],"color":"#f87171"}]"##;
        let user = r#"[{"points":[10,10]}]"#;
        assert!(!evaluate_answer(
            Mode::Connect,
            user,
            correct,
            Tolerances::SUBMISSION
        ));
    }

    #[test]
    fn test_connect_drawings_wrapper_key() {
        let correct = r##"{"drawings":[{"points":[10,10,200,200],"color":"#f87171"}],"baseWidth":800,"baseHeight":400}"##;
        let user = r##"[{"points":[12,8,205,198],"color":"#34d399"}]"##;
        assert!(evaluate_answer(
            Mode::Connect,
            user,
            correct,
            Tolerances::SUBMISSION
        ));
    }

    #[test]
    fn test_pattern_kind_mismatch_fails_regardless_of_position() {
        let correct = r#"[{"x":50,"y":50,"type":"triangle","size":25}]"#;
        let user = r#"[{"x":60,"y":70,"type":"square","size":25}]"#;
        assert!(!evaluate_answer(
            Mode::Pattern,
            user,
            correct,
            Tolerances::SUBMISSION
        ));
    }

    #[test]
    fn test_pattern_within_tolerance() {
        let correct = r#"[{"x":50,"y":50,"type":"triangle","size":25}]"#;
        let user = r#"[{"x":60,"y":70,"type":"triangle","size":25}]"#;
        assert!(evaluate_answer(
            Mode::Pattern,
            user,
            correct,
            Tolerances::SUBMISSION
        ));
    }

    #[test]
    fn test_empty_sets_match() {
        assert!(evaluate_answer(
            Mode::Encircle,
            "[]",
            "[]",
            Tolerances::SUBMISSION
        ));
    }

    #[test]
    fn test_malformed_key_is_incorrect_not_fatal() {
        let user = format!("[{}]", circle(1.0, 1.0, 30.0));
        assert!(!evaluate_answer(
            Mode::Encircle,
            &user,
            "not json at all",
            Tolerances::SUBMISSION
        ));
        assert!(!evaluate_answer(
            Mode::Encircle,
            "still not json",
            "[]",
            Tolerances::SUBMISSION
        ));
    }

    #[test]
    fn test_double_encoded_key() {
        let inner = format!(r#"{{"circles":[{}]}}"#, circle(100.0, 100.0, 30.0));
        let double = serde_json::to_string(&inner).unwrap();
        let user = format!("[{}]", circle(100.0, 100.0, 30.0));
        assert!(evaluate_answer(
            Mode::Encircle,
            &user,
            &double,
            Tolerances::SUBMISSION
        ));
    }

    #[test]
    fn test_wrong_mark_kind_in_learner_set() {
        let learner = vec![Annotation::Shape(crate::marks::PlacedShape::new(
            kurbo::Point::new(50.0, 50.0),
            crate::marks::PlacedKind::Triangle,
        ))];
        let correct = format!("[{}]", circle(50.0, 50.0, 30.0));
        assert!(!evaluate_annotations(
            Mode::Encircle,
            &learner,
            &correct,
            Tolerances::SUBMISSION
        ));
    }

    #[test]
    fn test_answer_key_round_trip() {
        let key = AnswerKey::from_circles(
            vec![CircleMark::circle(kurbo::Point::new(10.0, 20.0))],
            800.0,
            400.0,
        );
        let json = key.to_json().unwrap();
        let user = serde_json::to_string(&vec![Annotation::Circle(CircleMark::circle(
            kurbo::Point::new(12.0, 18.0),
        ))])
        .unwrap();
        assert!(evaluate_answer(
            Mode::Encircle,
            &user,
            &json,
            Tolerances::SUBMISSION
        ));

        let parsed: AnswerKey = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, key);
    }
}
