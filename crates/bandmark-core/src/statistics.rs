//! Aggregate scoring statistics.
//!
//! Turns a batch of per-question results into an attempt-level summary:
//! points, an accuracy percentage under a chosen aggregate policy, a
//! per-question-type breakdown, and an indicative IELTS band.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::Question;
use crate::results::ScoreResult;

/// How the accuracy percentage is derived.
///
/// Two defensible readings of "score" exist for partial-credit questions, so
/// the choice is explicit rather than implied by a call site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregatePolicy {
    /// Fully-correct questions over the question count. Partial credit is
    /// visible per question but does not move the percentage.
    #[default]
    PerQuestion,
    /// Points earned over points available, so partial credit counts.
    PartialCredit,
}

/// Statistics for one question type within an attempt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeStats {
    /// Questions of this type.
    pub questions: usize,
    /// Fully-correct questions of this type.
    pub correct: usize,
    /// Points earned.
    pub points: u32,
    /// Points available.
    pub max_points: u32,
}

/// Attempt-level summary derived from per-question results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptSummary {
    /// Questions scored.
    pub total_questions: usize,
    /// Questions with any submission.
    pub answered: usize,
    /// Fully-correct questions.
    pub correct: usize,
    /// Points earned across all questions.
    pub points: u32,
    /// Points available across all questions.
    pub max_points: u32,
    /// The policy the percentage was computed under.
    pub policy: AggregatePolicy,
    /// Rounded accuracy percentage, 0..=100.
    pub percentage: u32,
    /// Indicative IELTS band, when there was anything to score.
    pub band: Option<f64>,
    /// Breakdown by question type tag.
    pub per_type: BTreeMap<String, TypeStats>,
}

/// Summarize a scored attempt under the given aggregate policy.
pub fn summarize(
    questions: &[Question],
    results: &[ScoreResult],
    policy: AggregatePolicy,
) -> AttemptSummary {
    let total_questions = results.len();
    let answered = results.iter().filter(|r| r.answered()).count();
    let correct = results.iter().filter(|r| r.is_correct).count();
    let points: u32 = results.iter().map(|r| r.points).sum();
    let max_points: u32 = results.iter().map(|r| r.max_points).sum();

    let percentage = match policy {
        AggregatePolicy::PerQuestion => percentage(correct as u32, total_questions as u32),
        AggregatePolicy::PartialCredit => percentage(points, max_points),
    };

    let mut per_type: BTreeMap<String, TypeStats> = BTreeMap::new();
    for (question, result) in questions.iter().zip(results.iter()) {
        let stats = per_type
            .entry(question.kind.type_name().to_string())
            .or_default();
        stats.questions += 1;
        stats.correct += usize::from(result.is_correct);
        stats.points += result.points;
        stats.max_points += result.max_points;
    }

    AttemptSummary {
        total_questions,
        answered,
        correct,
        points,
        max_points,
        policy,
        percentage,
        band: band_estimate(correct, total_questions),
        per_type,
    }
}

/// Rounded percentage with a zero denominator collapsing to 0.
pub fn percentage(earned: u32, available: u32) -> u32 {
    if available == 0 {
        return 0;
    }
    (f64::from(earned) / f64::from(available) * 100.0).round() as u32
}

/// Indicative IELTS band for a raw correct count.
///
/// The published conversion assumes a 40-question paper, so shorter sets are
/// scaled to a /40 equivalent first. This is an estimate for practice
/// feedback, not an official band.
pub fn band_estimate(correct: usize, total: usize) -> Option<f64> {
    if total == 0 {
        return None;
    }
    let raw = ((correct as f64) * 40.0 / (total as f64)).round() as u32;
    let band = match raw {
        39..=40 => 9.0,
        37..=38 => 8.5,
        35..=36 => 8.0,
        33..=34 => 7.5,
        30..=32 => 7.0,
        27..=29 => 6.5,
        23..=26 => 6.0,
        19..=22 => 5.5,
        15..=18 => 5.0,
        13..=14 => 4.5,
        10..=12 => 4.0,
        8..=9 => 3.5,
        6..=7 => 3.0,
        4..=5 => 2.5,
        2..=3 => 2.0,
        1 => 1.5,
        _ => 1.0,
    };
    Some(band)
}
