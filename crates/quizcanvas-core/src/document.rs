//! Annotation document: the mark lists for one editing session plus their
//! undo history.

use crate::editor::Mode;
use crate::history::{History, Snapshot};
use crate::marks::{Annotation, CircleMark, ConnectorMark, MarkKind, PlacedShape};

/// All marks drawn in one question's editing session.
///
/// Exactly one list is active at a time, selected by the question's
/// [`Mode`]; the other two stay empty in normal use but are snapshotted and
/// restored together so undo/redo always round-trips the whole state.
#[derive(Debug, Clone, Default)]
pub struct AnnotationDocument {
    pub circles: Vec<CircleMark>,
    pub connectors: Vec<ConnectorMark>,
    pub shapes: Vec<PlacedShape>,
    history: History,
}

impl AnnotationDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document pre-populated with marks, e.g. when restoring a
    /// partially answered question.
    pub fn with_marks(
        circles: Vec<CircleMark>,
        connectors: Vec<ConnectorMark>,
        shapes: Vec<PlacedShape>,
    ) -> Self {
        Self {
            circles,
            connectors,
            shapes,
            history: History::new(),
        }
    }

    /// Take a snapshot of the current state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            circles: self.circles.clone(),
            connectors: self.connectors.clone(),
            shapes: self.shapes.clone(),
        }
    }

    /// Push current state to the undo stack (call before making changes).
    pub fn push_undo(&mut self) {
        let snapshot = self.snapshot();
        self.history.push(snapshot);
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.circles = snapshot.circles;
        self.connectors = snapshot.connectors;
        self.shapes = snapshot.shapes;
    }

    /// Undo the last change. Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.undo(current) {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    /// Redo the last undone change. Returns false if there was nothing to
    /// redo.
    pub fn redo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.redo(current) {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Empty all three mark lists. History is untouched; callers push a
    /// snapshot first if the clear should be undoable.
    pub fn clear(&mut self) {
        self.circles.clear();
        self.connectors.clear();
        self.shapes.clear();
    }

    /// Number of marks in the list that `mode` operates on.
    pub fn active_len(&self, mode: Mode) -> usize {
        match mode {
            Mode::Encircle => self.circles.len(),
            Mode::Connect => self.connectors.len(),
            Mode::Pattern => self.shapes.len(),
        }
    }

    /// The marks for `mode`'s active list, as the unified annotation type.
    pub fn active_annotations(&self, mode: Mode) -> Vec<Annotation> {
        self.annotations_of(mode.mark_kind())
    }

    /// The annotations for one mark list, regardless of mode.
    pub fn annotations_of(&self, kind: MarkKind) -> Vec<Annotation> {
        match kind {
            MarkKind::Circles => self.circles.iter().cloned().map(Annotation::Circle).collect(),
            MarkKind::Connectors => self
                .connectors
                .iter()
                .cloned()
                .map(Annotation::Connector)
                .collect(),
            MarkKind::Shapes => self.shapes.iter().cloned().map(Annotation::Shape).collect(),
        }
    }

    /// Serialize the active list for `mode` to JSON, as submitted upstream.
    pub fn active_to_json(&self, mode: Mode) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.active_annotations(mode))
    }

    pub fn is_empty(&self) -> bool {
        self.circles.is_empty() && self.connectors.is_empty() && self.shapes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    #[test]
    fn test_undo_add() {
        let mut doc = AnnotationDocument::new();
        doc.push_undo();
        doc.circles.push(CircleMark::circle(Point::new(5.0, 5.0)));

        assert!(doc.can_undo());
        assert!(doc.undo());
        assert!(doc.is_empty());
        assert!(doc.can_redo());

        assert!(doc.redo());
        assert_eq!(doc.circles.len(), 1);
    }

    #[test]
    fn test_undo_round_trips_all_lists() {
        let mut doc = AnnotationDocument::new();
        doc.circles.push(CircleMark::circle(Point::new(1.0, 1.0)));
        doc.shapes.push(PlacedShape::new(
            Point::new(2.0, 2.0),
            crate::marks::PlacedKind::Square,
        ));

        let before = doc.snapshot();
        doc.push_undo();
        doc.clear();

        assert!(doc.undo());
        assert_eq!(doc.snapshot(), before);
    }

    #[test]
    fn test_active_lists_by_mode() {
        let mut doc = AnnotationDocument::new();
        doc.circles.push(CircleMark::circle(Point::new(0.0, 0.0)));
        assert_eq!(doc.active_len(Mode::Encircle), 1);
        assert_eq!(doc.active_len(Mode::Connect), 0);

        let annotations = doc.active_annotations(Mode::Encircle);
        assert!(matches!(annotations[0], Annotation::Circle(_)));
    }

    #[test]
    fn test_active_json_is_bare_array() {
        let mut doc = AnnotationDocument::new();
        doc.circles.push(CircleMark::circle(Point::new(3.0, 4.0)));
        let json = doc.active_to_json(Mode::Encircle).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["x"], 3.0);
    }
}
