//! QuizCanvas Core Library
//!
//! Interactive annotation editor and tolerance-based evaluation engine for
//! image-annotation assessments: learners draw over a reference image and
//! the drawing is scored against a stored answer key.

pub mod assessment;
pub mod capture;
pub mod document;
pub mod editor;
pub mod eval;
pub mod history;
pub mod marks;
pub mod store;
pub mod vision;

pub use assessment::{AssessmentScore, QuestionInfo, SubmittedAnswer, rescore};
pub use capture::CaptureWriter;
pub use document::AnnotationDocument;
pub use editor::{ChangeSink, Editor, Mode, NullSink, RecordingSink, Tool};
pub use eval::{AnswerKey, Tolerances, evaluate_annotations, evaluate_answer};
pub use history::{History, Snapshot};
pub use marks::{
    Annotation, CircleKind, CircleMark, ConnectorMark, MarkColor, MarkKind, PlacedKind,
    PlacedShape,
};
pub use store::{AnswerKeyStore, FileStore, MemoryStore, StoreError};
pub use vision::{VisionAnalyzer, VisionRequest, VisionResponse, analyze_or_fallback, fallback_analysis};
