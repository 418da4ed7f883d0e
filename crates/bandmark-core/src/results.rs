//! Per-question scoring results.

use serde::{Deserialize, Serialize};

use crate::answer::AnswerValue;

/// The outcome of scoring one question.
///
/// `is_correct` is strict: the question earned full marks. `points` may be
/// positive while `is_correct` is false for multi-part questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// The question this result belongs to.
    pub question_id: String,
    /// Whether the question earned full marks.
    pub is_correct: bool,
    /// The submitted answer, echoed. `None` when the question was skipped.
    pub user_answer: Option<AnswerValue>,
    /// The correct answer, echoed. `None` for unsupported question types.
    pub correct_answer: Option<AnswerValue>,
    /// Points awarded. Bounded by `max_points`.
    pub points: u32,
    /// The key cardinality: 1 for scalar keys, N for N-slot keys.
    pub max_points: u32,
}

impl ScoreResult {
    /// Fraction of available points earned, or 0.0 when nothing is at stake.
    pub fn ratio(&self) -> f64 {
        if self.max_points == 0 {
            0.0
        } else {
            f64::from(self.points) / f64::from(self.max_points)
        }
    }

    /// True when the question received any submission at all.
    pub fn answered(&self) -> bool {
        self.user_answer.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_guards_zero_max() {
        let result = ScoreResult {
            question_id: "q1".into(),
            is_correct: false,
            user_answer: None,
            correct_answer: None,
            points: 0,
            max_points: 0,
        };
        assert_eq!(result.ratio(), 0.0);
        assert!(!result.answered());
    }

    #[test]
    fn ratio_of_partial_credit() {
        let result = ScoreResult {
            question_id: "q2".into(),
            is_correct: false,
            user_answer: Some(AnswerValue::IndexList(vec![0])),
            correct_answer: Some(AnswerValue::IndexList(vec![0, 2])),
            points: 1,
            max_points: 2,
        };
        assert_eq!(result.ratio(), 0.5);
        assert!(result.answered());
    }
}
