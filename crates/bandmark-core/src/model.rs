//! Core data model types for bandmark.
//!
//! These are the fundamental types the entire bandmark system uses to
//! represent test sets, questions, and their correct-answer keys.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::answer::AnswerValue;

/// A scalar-or-array field.
///
/// Question keys (and the answers users submit against them) may legitimately
/// arrive as either a bare scalar or an array. `to_vec` is the single
/// normalization point that coerces a scalar into a singleton list so the
/// positional comparison logic never has to care which shape the caller used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    /// A bare scalar.
    One(T),
    /// An explicit list.
    Many(Vec<T>),
}

impl<T: Clone> OneOrMany<T> {
    /// Normalize to a list, coercing a scalar into a singleton.
    pub fn to_vec(&self) -> Vec<T> {
        match self {
            OneOrMany::One(v) => vec![v.clone()],
            OneOrMany::Many(vs) => vs.clone(),
        }
    }

    /// Number of elements after normalization.
    pub fn len(&self) -> usize {
        match self {
            OneOrMany::One(_) => 1,
            OneOrMany::Many(vs) => vs.len(),
        }
    }

    /// True if the normalized list is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> From<T> for OneOrMany<T> {
    fn from(v: T) -> Self {
        OneOrMany::One(v)
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(vs: Vec<T>) -> Self {
        OneOrMany::Many(vs)
    }
}

/// How a multiple-choice key is compared against the user's selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChoiceMode {
    /// Exactly one option index is correct.
    #[default]
    Single,
    /// A set of option indices is correct; no extra, no missing.
    Multiple,
}

/// The question type together with its correct-answer payload.
///
/// The variant tag selects both the key shape and the comparison rule, so
/// comparator dispatch is exhaustive and checked at compile time. Rendering
/// metadata (`options`, `headings`, `word_limit`) rides along where it exists
/// but never influences scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice {
        #[serde(default, rename = "answer_type", alias = "answerType")]
        mode: ChoiceMode,
        answer: OneOrMany<u32>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        options: Vec<String>,
    },
    TrueFalseNotGiven {
        answer: String,
    },
    YesNoNotGiven {
        answer: String,
    },
    MatchingHeadings {
        /// Paragraph key (e.g. "A") to heading label (e.g. "iv").
        answer: BTreeMap<String, String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        headings: Vec<String>,
    },
    SentenceCompletion {
        answer: String,
        #[serde(default, rename = "word_limit", alias = "wordLimit")]
        word_limit: Option<u32>,
    },
    ShortAnswer {
        answer: String,
        #[serde(default, rename = "word_limit", alias = "wordLimit")]
        word_limit: Option<u32>,
    },
    SummaryCompletion {
        answer: OneOrMany<String>,
    },
    TableCompletion {
        /// Group key (e.g. a row label) to the expected cell values.
        answer: BTreeMap<String, OneOrMany<String>>,
    },
    DiagramLabelCompletion {
        answer: OneOrMany<String>,
    },
    /// Any question type this engine does not recognize. Scores zero points
    /// without aborting the rest of the batch.
    #[serde(other)]
    Unsupported,
}

impl QuestionKind {
    /// The wire tag for this question type.
    pub fn type_name(&self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice { .. } => "multiple_choice",
            QuestionKind::TrueFalseNotGiven { .. } => "true_false_not_given",
            QuestionKind::YesNoNotGiven { .. } => "yes_no_not_given",
            QuestionKind::MatchingHeadings { .. } => "matching_headings",
            QuestionKind::SentenceCompletion { .. } => "sentence_completion",
            QuestionKind::ShortAnswer { .. } => "short_answer",
            QuestionKind::SummaryCompletion { .. } => "summary_completion",
            QuestionKind::TableCompletion { .. } => "table_completion",
            QuestionKind::DiagramLabelCompletion { .. } => "diagram_label_completion",
            QuestionKind::Unsupported => "unsupported",
        }
    }

    /// Maximum points this question can award: the cardinality of its key.
    pub fn max_points(&self) -> u32 {
        match self {
            QuestionKind::MultipleChoice { answer, .. } => answer.len() as u32,
            QuestionKind::TrueFalseNotGiven { .. }
            | QuestionKind::YesNoNotGiven { .. }
            | QuestionKind::SentenceCompletion { .. }
            | QuestionKind::ShortAnswer { .. } => 1,
            QuestionKind::MatchingHeadings { answer, .. } => answer.len() as u32,
            QuestionKind::SummaryCompletion { answer }
            | QuestionKind::DiagramLabelCompletion { answer } => answer.len() as u32,
            QuestionKind::TableCompletion { answer } => {
                answer.values().map(|v| v.len() as u32).sum()
            }
            QuestionKind::Unsupported => 0,
        }
    }

    /// The correct-answer payload echoed as an [`AnswerValue`] for results.
    pub fn key_value(&self) -> Option<AnswerValue> {
        match self {
            QuestionKind::MultipleChoice { answer, .. } => match answer {
                OneOrMany::One(i) => Some(AnswerValue::Index(*i)),
                OneOrMany::Many(is) => Some(AnswerValue::IndexList(is.clone())),
            },
            QuestionKind::TrueFalseNotGiven { answer }
            | QuestionKind::YesNoNotGiven { answer }
            | QuestionKind::SentenceCompletion { answer, .. }
            | QuestionKind::ShortAnswer { answer, .. } => {
                Some(AnswerValue::Text(answer.clone()))
            }
            QuestionKind::MatchingHeadings { answer, .. } => Some(AnswerValue::Entries(
                answer
                    .iter()
                    .map(|(k, v)| (k.clone(), AnswerValue::Text(v.clone())))
                    .collect(),
            )),
            QuestionKind::SummaryCompletion { answer }
            | QuestionKind::DiagramLabelCompletion { answer } => match answer {
                OneOrMany::One(t) => Some(AnswerValue::Text(t.clone())),
                OneOrMany::Many(ts) => Some(AnswerValue::TextList(ts.clone())),
            },
            QuestionKind::TableCompletion { answer } => Some(AnswerValue::Entries(
                answer
                    .iter()
                    .map(|(k, v)| (k.clone(), AnswerValue::TextList(v.to_vec())))
                    .collect(),
            )),
            QuestionKind::Unsupported => None,
        }
    }
}

/// A single scorable question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier within one test attempt.
    pub id: String,
    /// The prompt shown to the candidate. Not used for scoring.
    #[serde(default)]
    pub text: String,
    /// The question type and its correct-answer key.
    #[serde(flatten)]
    pub kind: QuestionKind,
}

/// Which IELTS skill a test set exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Skill {
    Reading,
    Listening,
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Skill::Reading => write!(f, "reading"),
            Skill::Listening => write!(f, "listening"),
        }
    }
}

impl FromStr for Skill {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reading" => Ok(Skill::Reading),
            "listening" => Ok(Skill::Listening),
            other => Err(format!("unknown skill: {other}")),
        }
    }
}

/// A collection of questions scored together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSet {
    /// Unique identifier for this test set.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Description of this test set.
    #[serde(default)]
    pub description: String,
    /// The skill this set belongs to.
    #[serde(default = "default_skill")]
    pub skill: Skill,
    /// Part number within the full paper, if this set is one part.
    #[serde(default)]
    pub part: Option<u32>,
    /// The questions in this set.
    #[serde(default)]
    pub questions: Vec<Question>,
}

fn default_skill() -> Skill {
    Skill::Reading
}
