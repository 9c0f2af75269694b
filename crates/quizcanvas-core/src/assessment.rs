//! Assessment-level rescoring of submitted answers.
//!
//! Clients send a per-question correctness flag along with each answer, but
//! for interactive question modes the flag is advisory only: the
//! authoritative verdict is re-derived here from the submitted annotation
//! set and the stored answer key, using the same algorithms the client ran.

use crate::editor::Mode;
use crate::eval::{Tolerances, evaluate_answer};
use log::warn;
use serde::{Deserialize, Serialize};

/// One submitted answer, as received from the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmittedAnswer {
    #[serde(rename = "questionId")]
    pub question_id: String,
    /// The learner's answer. For interactive modes this is the serialized
    /// annotation set; for static questions it is the literal answer text.
    #[serde(rename = "userAnswer")]
    pub user_answer: String,
    /// Client-computed verdict. Trusted only for non-interactive questions.
    #[serde(rename = "isCorrect")]
    pub is_correct: bool,
}

/// What the scorer needs to know about a question.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionInfo {
    /// Interactive mode, or `None` for question types scored elsewhere.
    pub mode: Option<Mode>,
    /// The stored answer key, serialized.
    pub correct_answer: String,
}

/// Aggregate result of an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AssessmentScore {
    /// Number of correct verdicts.
    pub score: usize,
    /// Number of answers scored.
    pub total: usize,
}

/// Rescore an assessment in place.
///
/// Answers for unknown questions are dropped (and logged). For each
/// interactive answer the verdict is recomputed with the submission
/// tolerance profile and written back; non-interactive answers keep the
/// client flag. Returns the recomputed aggregate score.
pub fn rescore(
    answers: &mut Vec<SubmittedAnswer>,
    lookup: impl Fn(&str) -> Option<QuestionInfo>,
) -> AssessmentScore {
    answers.retain(|answer| {
        let known = lookup(&answer.question_id).is_some();
        if !known {
            warn!("question {} not found, dropping answer", answer.question_id);
        }
        known
    });

    let mut score = 0;
    for answer in answers.iter_mut() {
        // retain() above guarantees the lookup succeeds.
        let Some(info) = lookup(&answer.question_id) else {
            continue;
        };
        if let Some(mode) = info.mode {
            answer.is_correct = evaluate_answer(
                mode,
                &answer.user_answer,
                &info.correct_answer,
                Tolerances::SUBMISSION,
            );
        }
        if answer.is_correct {
            score += 1;
        }
    }
    AssessmentScore {
        score,
        total: answers.len(),
    }
}
