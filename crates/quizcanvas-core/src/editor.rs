//! Canvas interaction state machine.
//!
//! Owns the live annotation document for one question, the tool selection,
//! and the selection index, and translates pointer events into document
//! mutations through the undo history. Every committed mutation re-notifies
//! the [`ChangeSink`] so the owning question's in-memory answer stays in sync
//! with what is rendered.

use crate::document::AnnotationDocument;
use crate::marks::{
    Annotation, CONNECTOR_PALETTE, CircleMark, MarkColor, MarkKind, ConnectorMark, PlacedKind,
    PlacedShape,
};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Hit tolerance for picking marks under the pointer, in canvas pixels.
pub const HIT_TOLERANCE: f64 = 8.0;

/// Question mode, fixed per question. Determines which mark kind the editor
/// produces and which evaluation algorithm applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Encircle,
    Connect,
    Pattern,
}

impl Mode {
    /// The mark list this mode operates on.
    pub fn mark_kind(self) -> MarkKind {
        match self {
            Mode::Encircle => MarkKind::Circles,
            Mode::Connect => MarkKind::Connectors,
            Mode::Pattern => MarkKind::Shapes,
        }
    }
}

/// Active tool. Only meaningful in encircle mode; connect and pattern marks
/// are always selectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Draw,
    Select,
}

/// State of the current pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum Interaction {
    #[default]
    Idle,
    /// Connector started, endpoint pending. Discarded if never finished.
    DrawingConnector { start: Point },
    /// Dragging the selected mark. `last` tracks the previous pointer
    /// position when the drag is pointer-driven.
    Dragging { last: Option<Point> },
}

/// Port notified after every committed mutation with the new content of the
/// affected mark list. Implementations forward to persistence; failures are
/// theirs to log — the editor never rolls back a local edit.
pub trait ChangeSink {
    fn annotation_set_changed(&mut self, kind: MarkKind, annotations: Vec<Annotation>);
}

/// Sink that ignores all notifications.
#[derive(Debug, Default)]
pub struct NullSink;

impl ChangeSink for NullSink {
    fn annotation_set_changed(&mut self, _kind: MarkKind, _annotations: Vec<Annotation>) {}
}

/// Sink that records notifications, for tests and ephemeral use.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<(MarkKind, Vec<Annotation>)>,
}

impl ChangeSink for RecordingSink {
    fn annotation_set_changed(&mut self, kind: MarkKind, annotations: Vec<Annotation>) {
        self.events.push((kind, annotations));
    }
}

/// Interactive annotation editor for one question.
pub struct Editor<S: ChangeSink> {
    /// The document being edited.
    pub document: AnnotationDocument,
    mode: Mode,
    tool: Tool,
    /// Shape stamped by [`add_placed_shape`](Self::add_placed_shape).
    pub shape_kind: PlacedKind,
    /// When set, [`add_circle_or_oval`](Self::add_circle_or_oval) produces
    /// ovals instead of circles.
    pub oval: bool,
    palette_index: usize,
    selection: Option<usize>,
    interaction: Interaction,
    sink: S,
}

impl<S: ChangeSink> Editor<S> {
    /// Create an editor with an empty document.
    pub fn new(mode: Mode, sink: S) -> Self {
        Self::with_document(mode, AnnotationDocument::new(), sink)
    }

    /// Create an editor over an existing document, e.g. when restoring a
    /// partially answered question.
    pub fn with_document(mode: Mode, document: AnnotationDocument, sink: S) -> Self {
        Self {
            document,
            mode,
            tool: Tool::default(),
            shape_kind: PlacedKind::default(),
            oval: false,
            palette_index: 0,
            selection: None,
            interaction: Interaction::Idle,
            sink,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Set the current tool. Aborts any in-flight interaction.
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
        self.interaction = Interaction::Idle;
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// The color the next committed connector will take.
    pub fn current_connector_color(&self) -> MarkColor {
        CONNECTOR_PALETTE[self.palette_index]
    }

    pub fn is_drawing_connector(&self) -> bool {
        matches!(self.interaction, Interaction::DrawingConnector { .. })
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.interaction, Interaction::Dragging { .. })
    }

    pub fn can_undo(&self) -> bool {
        self.document.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.document.can_redo()
    }

    /// Consume the editor, discarding any pending interaction, and return
    /// the document for submission.
    pub fn finish(self) -> AnnotationDocument {
        self.document
    }

    fn selectable(&self) -> bool {
        match self.mode {
            Mode::Encircle => self.tool == Tool::Select,
            Mode::Connect | Mode::Pattern => true,
        }
    }

    fn notify(&mut self) {
        let kind = self.mode.mark_kind();
        let annotations = self.document.annotations_of(kind);
        log::debug!("{}: {} mark(s)", kind.as_str(), annotations.len());
        self.sink.annotation_set_changed(kind, annotations);
    }

    /// Drop the selection if it no longer points at a mark, e.g. after an
    /// undo shrank the active list.
    fn clamp_selection(&mut self) {
        if let Some(index) = self.selection {
            if index >= self.document.active_len(self.mode) {
                self.selection = None;
            }
        }
    }

    /// Append a circle (or oval, when the toggle is set) at `point`.
    /// No-op outside encircle mode with the draw tool.
    pub fn add_circle_or_oval(&mut self, point: Point) {
        if self.mode != Mode::Encircle || self.tool != Tool::Draw {
            return;
        }
        self.document.push_undo();
        let mark = if self.oval {
            CircleMark::oval(point)
        } else {
            CircleMark::circle(point)
        };
        self.document.circles.push(mark);
        self.notify();
    }

    /// Start a connector at `point`. A second begin before the end replaces
    /// the pending start. No-op outside connect mode.
    pub fn begin_connector(&mut self, point: Point) {
        if self.mode != Mode::Connect {
            return;
        }
        self.interaction = Interaction::DrawingConnector { start: point };
    }

    /// Commit the pending connector, ending at `point`, and advance the
    /// palette. No-op when no connector is pending.
    pub fn end_connector(&mut self, point: Point) {
        let Interaction::DrawingConnector { start } = self.interaction else {
            return;
        };
        self.document.push_undo();
        let color = CONNECTOR_PALETTE[self.palette_index];
        self.palette_index = (self.palette_index + 1) % CONNECTOR_PALETTE.len();
        self.document
            .connectors
            .push(ConnectorMark::new(start, point, color));
        self.interaction = Interaction::Idle;
        self.notify();
    }

    /// Discard a pending connector without committing it.
    pub fn cancel_connector(&mut self) {
        if self.is_drawing_connector() {
            self.interaction = Interaction::Idle;
        }
    }

    /// Stamp the currently selected shape kind at `point`. No-op outside
    /// pattern mode.
    pub fn add_placed_shape(&mut self, point: Point) {
        if self.mode != Mode::Pattern {
            return;
        }
        self.document.push_undo();
        self.document
            .shapes
            .push(PlacedShape::new(point, self.shape_kind));
        self.notify();
    }

    /// Select the mark at `index` in the active list. Ignored when the mode
    /// and tool do not permit selection or the index is out of range.
    pub fn select_annotation(&mut self, index: usize) {
        if !self.selectable() || index >= self.document.active_len(self.mode) {
            return;
        }
        self.selection = Some(index);
    }

    /// Select the mark at `index` and start dragging it. Pushes history once
    /// for the whole drag.
    pub fn begin_drag(&mut self, index: usize) {
        if !self.selectable() || index >= self.document.active_len(self.mode) {
            return;
        }
        self.document.push_undo();
        self.selection = Some(index);
        self.interaction = Interaction::Dragging { last: None };
    }

    /// Translate the selected mark by the given delta. Only applies during a
    /// drag; intermediate frames do not touch history.
    pub fn move_selected(&mut self, dx: f64, dy: f64) {
        if !self.is_dragging() {
            return;
        }
        let Some(index) = self.selection else {
            return;
        };
        match self.mode {
            Mode::Encircle => {
                if let Some(mark) = self.document.circles.get_mut(index) {
                    mark.translate(dx, dy);
                }
            }
            Mode::Connect => {
                if let Some(mark) = self.document.connectors.get_mut(index) {
                    mark.translate(dx, dy);
                }
            }
            Mode::Pattern => {
                if let Some(mark) = self.document.shapes.get_mut(index) {
                    mark.translate(dx, dy);
                }
            }
        }
    }

    /// Commit the current drag and notify the sink.
    pub fn end_drag(&mut self) {
        if !self.is_dragging() {
            return;
        }
        self.interaction = Interaction::Idle;
        self.notify();
    }

    /// Remove the selected mark. No-op when nothing is selected.
    pub fn delete_selected(&mut self) {
        let Some(index) = self.selection else {
            return;
        };
        if index >= self.document.active_len(self.mode) {
            self.selection = None;
            return;
        }
        self.document.push_undo();
        match self.mode {
            Mode::Encircle => {
                self.document.circles.remove(index);
            }
            Mode::Connect => {
                self.document.connectors.remove(index);
            }
            Mode::Pattern => {
                self.document.shapes.remove(index);
            }
        }
        self.selection = None;
        self.notify();
    }

    /// Empty all three mark lists together and notify the sink with empty
    /// sets for each kind.
    pub fn clear_all(&mut self) {
        self.document.push_undo();
        self.document.clear();
        self.selection = None;
        self.interaction = Interaction::Idle;
        for kind in [MarkKind::Circles, MarkKind::Connectors, MarkKind::Shapes] {
            self.sink.annotation_set_changed(kind, Vec::new());
        }
    }

    /// Undo the last committed mutation. Returns false when there was
    /// nothing to undo.
    pub fn undo(&mut self) -> bool {
        if !self.document.undo() {
            return false;
        }
        self.clamp_selection();
        self.notify();
        true
    }

    /// Redo the last undone mutation. Returns false when there was nothing
    /// to redo.
    pub fn redo(&mut self) -> bool {
        if !self.document.redo() {
            return false;
        }
        self.clamp_selection();
        self.notify();
        true
    }

    /// Topmost mark of the active list under `point`, if any. Later marks
    /// win, matching render order.
    pub fn hit_index(&self, point: Point) -> Option<usize> {
        let annotations = self.document.active_annotations(self.mode);
        annotations
            .iter()
            .enumerate()
            .rev()
            .find(|(_, a)| a.hit_test(point, HIT_TOLERANCE))
            .map(|(index, _)| index)
    }

    /// Pointer pressed at `point`.
    ///
    /// In connect mode this starts a connector; in encircle (select tool)
    /// and pattern modes it picks up the mark under the pointer for
    /// dragging.
    pub fn pointer_down(&mut self, point: Point) {
        match self.mode {
            Mode::Connect => self.begin_connector(point),
            Mode::Encircle | Mode::Pattern => {
                if self.selectable() {
                    if let Some(index) = self.hit_index(point) {
                        self.begin_drag(index);
                        if self.is_dragging() {
                            self.interaction = Interaction::Dragging { last: Some(point) };
                        }
                    }
                }
            }
        }
    }

    /// Pointer moved to `point`. Advances an in-flight drag.
    pub fn pointer_move(&mut self, point: Point) {
        if let Interaction::Dragging { last } = self.interaction {
            if let Some(prev) = last {
                self.move_selected(point.x - prev.x, point.y - prev.y);
            }
            self.interaction = Interaction::Dragging { last: Some(point) };
        }
    }

    /// Pointer released at `point`. Commits the pending connector or drag,
    /// or adds a new mark when the mode and tool call for one.
    pub fn pointer_up(&mut self, point: Point) {
        match self.mode {
            Mode::Connect => {
                if self.is_drawing_connector() {
                    self.end_connector(point);
                } else {
                    self.end_drag();
                }
            }
            Mode::Encircle => {
                if self.is_dragging() {
                    self.end_drag();
                } else if self.tool == Tool::Draw {
                    self.add_circle_or_oval(point);
                }
            }
            Mode::Pattern => {
                if self.is_dragging() {
                    self.end_drag();
                } else {
                    self.add_placed_shape(point);
                }
            }
        }
    }
}
