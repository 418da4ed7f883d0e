//! User-submitted answer values and shape normalization.
//!
//! Rendering widgets emit loosely-shaped values: a bare option index, a
//! string, lists of either, or a map for grouped questions. The accessors
//! here coerce whatever arrived into the shape a comparator needs instead of
//! failing, so one malformed submission can only under-score its own
//! question.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Any value a question widget may submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// A single option index.
    Index(u32),
    /// Free text or a label.
    Text(String),
    /// Several option indices.
    IndexList(Vec<u32>),
    /// Several text values, compared positionally.
    TextList(Vec<String>),
    /// Values keyed by group (paragraph letter, table row, ...).
    Entries(BTreeMap<String, AnswerValue>),
}

impl AnswerValue {
    /// The value as a list of option indices, if it can be read as one.
    ///
    /// Scalars become singletons; numeric text is accepted since some widgets
    /// emit `"2"` where `2` was meant.
    pub fn indices(&self) -> Option<Vec<u32>> {
        match self {
            AnswerValue::Index(i) => Some(vec![*i]),
            AnswerValue::IndexList(is) => Some(is.clone()),
            AnswerValue::Text(t) => t.trim().parse::<u32>().ok().map(|i| vec![i]),
            AnswerValue::TextList(ts) => ts
                .iter()
                .map(|t| t.trim().parse::<u32>().ok())
                .collect::<Option<Vec<_>>>(),
            AnswerValue::Entries(_) => None,
        }
    }

    /// The value as a list of text entries, if it can be read as one.
    pub fn texts(&self) -> Option<Vec<String>> {
        match self {
            AnswerValue::Text(t) => Some(vec![t.clone()]),
            AnswerValue::TextList(ts) => Some(ts.clone()),
            AnswerValue::Index(i) => Some(vec![i.to_string()]),
            AnswerValue::IndexList(is) => Some(is.iter().map(|i| i.to_string()).collect()),
            AnswerValue::Entries(_) => None,
        }
    }

    /// The value as grouped entries, if it is a map.
    pub fn entries(&self) -> Option<&BTreeMap<String, AnswerValue>> {
        match self {
            AnswerValue::Entries(map) => Some(map),
            _ => None,
        }
    }
}

/// One submitted answer, keyed by the question it belongs to.
///
/// Collections of these are replaced by question id on edit, never
/// duplicated; when duplicates do arrive, the last submission wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAnswer {
    #[serde(rename = "question_id", alias = "questionId")]
    pub question_id: String,
    pub answer: AnswerValue,
}

/// Normalize free text for comparison: trim and lowercase.
///
/// Matching is exact after normalization. No fuzzy matching, no synonyms.
pub fn normalize_text(text: &str) -> String {
    text.trim().to_lowercase()
}
