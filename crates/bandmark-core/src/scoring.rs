//! The answer-scoring engine.
//!
//! Pure, synchronous comparison of submitted answers against question keys.
//! Dispatch is an exhaustive match on [`QuestionKind`]; each comparison rule
//! lives in [`checks`] as a standalone function with its own edge-case
//! policy. Nothing here returns `Err` or panics on user input: a missing,
//! malformed, or unrecognized answer degrades to zero points for that
//! question and the rest of the batch scores normally.

use std::collections::HashMap;

use crate::answer::{AnswerValue, UserAnswer};
use crate::model::{Question, QuestionKind};
use crate::results::ScoreResult;

/// Points awarded by a comparator, before being folded into a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub is_correct: bool,
    pub points: u32,
}

impl Outcome {
    fn zero() -> Self {
        Outcome {
            is_correct: false,
            points: 0,
        }
    }
}

/// Score a whole test: one result per question, in question order.
///
/// Answers are matched by question id; when the same id appears more than
/// once the last submission wins. Answers for ids that match no question are
/// ignored.
pub fn score_test(questions: &[Question], answers: &[UserAnswer]) -> Vec<ScoreResult> {
    let mut by_id: HashMap<&str, &AnswerValue> = HashMap::new();
    for ua in answers {
        by_id.insert(ua.question_id.as_str(), &ua.answer);
    }

    questions
        .iter()
        .map(|q| score_question(q, by_id.get(q.id.as_str()).copied()))
        .collect()
}

/// Score a single question against an optional submission.
pub fn score_question(question: &Question, answer: Option<&AnswerValue>) -> ScoreResult {
    let outcome = match (&question.kind, answer) {
        (_, None) | (QuestionKind::Unsupported, _) => Outcome::zero(),
        (QuestionKind::MultipleChoice { mode, answer: key, .. }, Some(value)) => {
            checks::check_choice(*mode, &key.to_vec(), value)
        }
        (
            QuestionKind::TrueFalseNotGiven { answer: key }
            | QuestionKind::YesNoNotGiven { answer: key },
            Some(value),
        ) => checks::check_label(key, value),
        (QuestionKind::MatchingHeadings { answer: key, .. }, Some(value)) => {
            checks::check_pairs(key, value)
        }
        (
            QuestionKind::SentenceCompletion { answer: key, .. }
            | QuestionKind::ShortAnswer { answer: key, .. },
            Some(value),
        ) => checks::check_text(key, value),
        (
            QuestionKind::SummaryCompletion { answer: key }
            | QuestionKind::DiagramLabelCompletion { answer: key },
            Some(value),
        ) => checks::check_sequence(&key.to_vec(), value),
        (QuestionKind::TableCompletion { answer: key }, Some(value)) => {
            checks::check_groups(key, value)
        }
    };

    ScoreResult {
        question_id: question.id.clone(),
        is_correct: outcome.is_correct,
        user_answer: answer.cloned(),
        correct_answer: question.kind.key_value(),
        points: outcome.points.min(question.kind.max_points()),
        max_points: question.kind.max_points(),
    }
}

/// The per-type comparison rules.
///
/// Each function takes the normalized key and the raw submitted value and
/// returns an [`Outcome`]. They are deliberately independent of the
/// dispatching match above so each rule can be exercised on its own.
pub mod checks {
    use std::collections::BTreeMap;

    use super::Outcome;
    use crate::answer::{normalize_text, AnswerValue};
    use crate::model::{ChoiceMode, OneOrMany};

    /// Multiple choice, both modes.
    ///
    /// Single: the submission must be exactly the key. Multiple: correct only
    /// with every key index present and no extras; points count the key
    /// indices the submission did include, so partial credit survives an
    /// incorrect overall verdict.
    pub fn check_choice(mode: ChoiceMode, key: &[u32], value: &AnswerValue) -> Outcome {
        let Some(picked) = value.indices() else {
            return Outcome::zero();
        };
        match mode {
            ChoiceMode::Single => {
                let is_correct = picked == key;
                Outcome {
                    is_correct,
                    points: u32::from(is_correct),
                }
            }
            ChoiceMode::Multiple => {
                let points = key.iter().filter(|&&k| picked.contains(&k)).count() as u32;
                Outcome {
                    is_correct: points as usize == key.len() && picked.len() == key.len(),
                    points,
                }
            }
        }
    }

    /// Fixed label sets (TRUE/FALSE/NOT GIVEN, YES/NO/NOT GIVEN).
    ///
    /// Compared exactly as given: labels are part of the question's contract,
    /// not free text.
    pub fn check_label(key: &str, value: &AnswerValue) -> Outcome {
        let Some(texts) = value.texts() else {
            return Outcome::zero();
        };
        let is_correct = texts.len() == 1 && texts[0] == key;
        Outcome {
            is_correct,
            points: u32::from(is_correct),
        }
    }

    /// Single free-text gap: normalized equality.
    pub fn check_text(key: &str, value: &AnswerValue) -> Outcome {
        check_sequence(std::slice::from_ref(&key.to_string()), value)
    }

    /// Ordered free-text gaps: positional normalized equality.
    ///
    /// Points count the key positions that match; a submission shorter than
    /// the key simply misses the remaining positions.
    pub fn check_sequence(key: &[String], value: &AnswerValue) -> Outcome {
        let Some(texts) = value.texts() else {
            return Outcome::zero();
        };
        let points = key
            .iter()
            .zip(texts.iter())
            .filter(|(k, t)| normalize_text(k) == normalize_text(t))
            .count() as u32;
        Outcome {
            is_correct: points as usize == key.len(),
            points,
        }
    }

    /// Key→label pairs (matching headings): per-key normalized equality.
    pub fn check_pairs(key: &BTreeMap<String, String>, value: &AnswerValue) -> Outcome {
        let Some(entries) = value.entries() else {
            return Outcome::zero();
        };
        let points = key
            .iter()
            .filter(|(k, expected)| {
                entries
                    .get(*k)
                    .and_then(|v| v.texts())
                    .is_some_and(|texts| {
                        texts.len() == 1 && normalize_text(&texts[0]) == normalize_text(expected)
                    })
            })
            .count() as u32;
        Outcome {
            is_correct: points as usize == key.len(),
            points,
        }
    }

    /// Grouped ordered gaps (table completion): positional normalized
    /// equality within each group, totalled across groups.
    pub fn check_groups(
        key: &BTreeMap<String, OneOrMany<String>>,
        value: &AnswerValue,
    ) -> Outcome {
        let Some(entries) = value.entries() else {
            return Outcome::zero();
        };
        let mut points = 0u32;
        let mut slots = 0u32;
        for (group, expected) in key {
            let expected = expected.to_vec();
            slots += expected.len() as u32;
            if let Some(texts) = entries.get(group).and_then(|v| v.texts()) {
                points += expected
                    .iter()
                    .zip(texts.iter())
                    .filter(|(k, t)| normalize_text(k) == normalize_text(t))
                    .count() as u32;
            }
        }
        Outcome {
            is_correct: points == slots,
            points,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::checks::*;
    use super::*;
    use crate::model::{ChoiceMode, OneOrMany};

    fn question(id: &str, kind: QuestionKind) -> Question {
        Question {
            id: id.into(),
            text: String::new(),
            kind,
        }
    }

    fn answer(id: &str, value: AnswerValue) -> UserAnswer {
        UserAnswer {
            question_id: id.into(),
            answer: value,
        }
    }

    #[test]
    fn every_question_gets_exactly_one_result() {
        let questions = vec![
            question(
                "q1",
                QuestionKind::SentenceCompletion {
                    answer: "Paris".into(),
                    word_limit: None,
                },
            ),
            question("q2", QuestionKind::Unsupported),
            question(
                "q3",
                QuestionKind::TrueFalseNotGiven {
                    answer: "NOT GIVEN".into(),
                },
            ),
        ];
        let results = score_test(&questions, &[]);
        assert_eq!(results.len(), questions.len());
        for (r, q) in results.iter().zip(&questions) {
            assert_eq!(r.question_id, q.id);
            assert!(!r.is_correct);
            assert_eq!(r.points, 0);
            assert!(r.user_answer.is_none());
        }
    }

    #[test]
    fn scoring_is_idempotent() {
        let questions = vec![question(
            "q1",
            QuestionKind::MultipleChoice {
                mode: ChoiceMode::Multiple,
                answer: vec![0, 2].into(),
                options: vec![],
            },
        )];
        let answers = vec![answer("q1", AnswerValue::IndexList(vec![0, 1, 2]))];
        let first = score_test(&questions, &answers);
        let second = score_test(&questions, &answers);
        assert_eq!(first, second);
    }

    #[test]
    fn last_submission_wins_on_duplicate_ids() {
        let questions = vec![question(
            "q1",
            QuestionKind::SentenceCompletion {
                answer: "Paris".into(),
                word_limit: None,
            },
        )];
        let answers = vec![
            answer("q1", AnswerValue::Text("London".into())),
            answer("q1", AnswerValue::Text("Paris".into())),
        ];
        let results = score_test(&questions, &answers);
        assert!(results[0].is_correct);
    }

    #[test]
    fn single_choice_exact_equality() {
        let key = vec![1];
        let hit = check_choice(ChoiceMode::Single, &key, &AnswerValue::Index(1));
        assert!(hit.is_correct);
        assert_eq!(hit.points, 1);

        let miss = check_choice(ChoiceMode::Single, &key, &AnswerValue::Index(2));
        assert!(!miss.is_correct);
        assert_eq!(miss.points, 0);
    }

    #[test]
    fn multiple_choice_partial_credit() {
        let key = vec![0, 2];

        let missing = check_choice(
            ChoiceMode::Multiple,
            &key,
            &AnswerValue::IndexList(vec![0]),
        );
        assert!(!missing.is_correct);
        assert_eq!(missing.points, 1);

        let extra = check_choice(
            ChoiceMode::Multiple,
            &key,
            &AnswerValue::IndexList(vec![0, 1, 2]),
        );
        assert!(!extra.is_correct);
        assert_eq!(extra.points, 2);

        let exact = check_choice(
            ChoiceMode::Multiple,
            &key,
            &AnswerValue::IndexList(vec![2, 0]),
        );
        assert!(exact.is_correct);
        assert_eq!(exact.points, 2);
    }

    #[test]
    fn labels_compare_case_sensitively() {
        let hit = check_label("NOT GIVEN", &AnswerValue::Text("NOT GIVEN".into()));
        assert!(hit.is_correct);

        let miss = check_label("NOT GIVEN", &AnswerValue::Text("not given".into()));
        assert!(!miss.is_correct);
    }

    #[test]
    fn free_text_ignores_case_and_whitespace() {
        let outcome = check_text("Paris", &AnswerValue::Text("  paris ".into()));
        assert!(outcome.is_correct);
        assert_eq!(outcome.points, 1);
    }

    #[test]
    fn sequence_counts_matching_positions() {
        let key: Vec<String> = vec!["red".into(), "green".into(), "blue".into()];
        let outcome = check_sequence(
            &key,
            &AnswerValue::TextList(vec!["Red".into(), "yellow".into(), " BLUE ".into()]),
        );
        assert!(!outcome.is_correct);
        assert_eq!(outcome.points, 2);
    }

    #[test]
    fn sequence_accepts_scalar_for_singleton_key() {
        let key: Vec<String> = vec!["blue".into()];
        let outcome = check_sequence(&key, &AnswerValue::Text("blue".into()));
        assert!(outcome.is_correct);
        assert_eq!(outcome.points, 1);
    }

    #[test]
    fn pairs_require_every_key_to_match() {
        let key: BTreeMap<String, String> = [
            ("A".to_string(), "iv".to_string()),
            ("B".to_string(), "vii".to_string()),
        ]
        .into_iter()
        .collect();

        let partial = check_pairs(
            &key,
            &AnswerValue::Entries(
                [
                    ("A".to_string(), AnswerValue::Text("iv".into())),
                    ("B".to_string(), AnswerValue::Text("ii".into())),
                ]
                .into_iter()
                .collect(),
            ),
        );
        assert!(!partial.is_correct);
        assert_eq!(partial.points, 1);

        let full = check_pairs(
            &key,
            &AnswerValue::Entries(
                [
                    ("A".to_string(), AnswerValue::Text("IV".into())),
                    ("B".to_string(), AnswerValue::Text("vii".into())),
                ]
                .into_iter()
                .collect(),
            ),
        );
        assert!(full.is_correct);
        assert_eq!(full.points, 2);
    }

    #[test]
    fn groups_total_matching_slots() {
        let key: BTreeMap<String, OneOrMany<String>> = [(
            "groupA".to_string(),
            OneOrMany::Many(vec!["x".to_string(), "y".to_string()]),
        )]
        .into_iter()
        .collect();

        let outcome = check_groups(
            &key,
            &AnswerValue::Entries(
                [(
                    "groupA".to_string(),
                    AnswerValue::TextList(vec!["x".into(), "z".into()]),
                )]
                .into_iter()
                .collect(),
            ),
        );
        assert!(!outcome.is_correct);
        assert_eq!(outcome.points, 1);
    }

    #[test]
    fn groups_accept_scalar_cells() {
        let key: BTreeMap<String, OneOrMany<String>> = [(
            "row1".to_string(),
            OneOrMany::One("nitrogen".to_string()),
        )]
        .into_iter()
        .collect();

        let outcome = check_groups(
            &key,
            &AnswerValue::Entries(
                [("row1".to_string(), AnswerValue::Text("Nitrogen".into()))]
                    .into_iter()
                    .collect(),
            ),
        );
        assert!(outcome.is_correct);
        assert_eq!(outcome.points, 1);
    }

    #[test]
    fn wrong_shape_scores_zero_without_error() {
        let questions = vec![question(
            "q1",
            QuestionKind::MatchingHeadings {
                answer: [("A".to_string(), "iv".to_string())].into_iter().collect(),
                headings: vec![],
            },
        )];
        // A bare string where a map was expected.
        let answers = vec![answer("q1", AnswerValue::Text("iv".into()))];
        let results = score_test(&questions, &answers);
        assert!(!results[0].is_correct);
        assert_eq!(results[0].points, 0);
    }

    #[test]
    fn unknown_type_does_not_abort_the_batch() {
        let questions = vec![
            question("q1", QuestionKind::Unsupported),
            question(
                "q2",
                QuestionKind::ShortAnswer {
                    answer: "oxygen".into(),
                    word_limit: Some(1),
                },
            ),
        ];
        let answers = vec![
            answer("q1", AnswerValue::Text("anything".into())),
            answer("q2", AnswerValue::Text("Oxygen".into())),
        ];
        let results = score_test(&questions, &answers);
        assert_eq!(results[0].points, 0);
        assert!(!results[0].is_correct);
        assert!(results[0].correct_answer.is_none());
        assert!(results[1].is_correct);
    }

    #[test]
    fn numeric_text_counts_as_an_index() {
        let outcome = check_choice(ChoiceMode::Single, &[2], &AnswerValue::Text("2".into()));
        assert!(outcome.is_correct);
    }

    #[test]
    fn points_never_exceed_max_points() {
        let q = question(
            "q1",
            QuestionKind::SummaryCompletion {
                answer: vec!["a".to_string(), "b".to_string()].into(),
            },
        );
        let result = score_question(
            &q,
            Some(&AnswerValue::TextList(vec![
                "a".into(),
                "b".into(),
                "c".into(),
            ])),
        );
        assert!(result.points <= result.max_points);
        assert!(result.is_correct);
    }
}
