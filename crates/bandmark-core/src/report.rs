//! Attempt report types with JSON persistence and progress comparison.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::Skill;
use crate::results::ScoreResult;
use crate::statistics::{AggregatePolicy, AttemptSummary};

/// A complete scored attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptReport {
    /// Unique attempt identifier.
    pub id: Uuid,
    /// When the attempt was scored.
    pub created_at: DateTime<Utc>,
    /// Summary of the test set.
    pub test: TestSummary,
    /// The aggregate policy used.
    pub policy: AggregatePolicy,
    /// Per-question results.
    pub results: Vec<ScoreResult>,
    /// Aggregate summary.
    pub summary: AttemptSummary,
}

/// Summary of a test set (without the question definitions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSummary {
    pub id: String,
    pub name: String,
    pub skill: Skill,
    pub question_count: usize,
}

impl AttemptReport {
    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: AttemptReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Compare this attempt against an earlier one on the same test.
    ///
    /// Questions are matched by id; points deltas drive the classification.
    pub fn compare(&self, baseline: &AttemptReport) -> ProgressReport {
        let point_map = |report: &AttemptReport| -> HashMap<String, (u32, u32)> {
            report
                .results
                .iter()
                .map(|r| (r.question_id.clone(), (r.points, r.max_points)))
                .collect()
        };

        let baseline_points = point_map(baseline);
        let current_points = point_map(self);

        let mut improvements = Vec::new();
        let mut regressions = Vec::new();
        let mut unchanged = 0usize;
        let mut new_questions = 0usize;

        for result in &self.results {
            let Some(&(base, _)) = baseline_points.get(&result.question_id) else {
                new_questions += 1;
                continue;
            };
            let delta = QuestionDelta {
                question_id: result.question_id.clone(),
                baseline_points: base,
                current_points: result.points,
                max_points: result.max_points,
            };
            if result.points > base {
                improvements.push(delta);
            } else if result.points < base {
                regressions.push(delta);
            } else {
                unchanged += 1;
            }
        }

        let removed_questions = baseline_points
            .keys()
            .filter(|id| !current_points.contains_key(*id))
            .count();

        ProgressReport {
            baseline_percentage: baseline.summary.percentage,
            current_percentage: self.summary.percentage,
            improvements,
            regressions,
            unchanged,
            new_questions,
            removed_questions,
        }
    }
}

/// Result of comparing two attempts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReport {
    /// Percentage on the baseline attempt.
    pub baseline_percentage: u32,
    /// Percentage on the current attempt.
    pub current_percentage: u32,
    /// Questions that gained points.
    pub improvements: Vec<QuestionDelta>,
    /// Questions that lost points.
    pub regressions: Vec<QuestionDelta>,
    /// Questions with no change.
    pub unchanged: usize,
    /// Questions in current but not baseline.
    pub new_questions: usize,
    /// Questions in baseline but not current.
    pub removed_questions: usize,
}

/// A per-question change between two attempts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionDelta {
    pub question_id: String,
    pub baseline_points: u32,
    pub current_points: u32,
    pub max_points: u32,
}

impl ProgressReport {
    /// Format the progress report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Summary:** {}% -> {}%, {} improved, {} regressed, {} unchanged\n\n",
            self.baseline_percentage,
            self.current_percentage,
            self.improvements.len(),
            self.regressions.len(),
            self.unchanged
        ));

        if !self.regressions.is_empty() {
            md.push_str("### Regressions\n\n");
            md.push_str("| Question | Baseline | Current | Max |\n");
            md.push_str("|----------|----------|---------|-----|\n");
            for d in &self.regressions {
                md.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    d.question_id, d.baseline_points, d.current_points, d.max_points
                ));
            }
            md.push('\n');
        }

        if !self.improvements.is_empty() {
            md.push_str("### Improvements\n\n");
            md.push_str("| Question | Baseline | Current | Max |\n");
            md.push_str("|----------|----------|---------|-----|\n");
            for d in &self.improvements {
                md.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    d.question_id, d.baseline_points, d.current_points, d.max_points
                ));
            }
        }

        md
    }

    /// Returns true if any question lost points.
    pub fn has_regressions(&self) -> bool {
        !self.regressions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::TypeStats;
    use std::collections::BTreeMap;

    fn make_result(question_id: &str, points: u32, max_points: u32) -> ScoreResult {
        ScoreResult {
            question_id: question_id.into(),
            is_correct: points == max_points && max_points > 0,
            user_answer: None,
            correct_answer: None,
            points,
            max_points,
        }
    }

    fn make_report(results: Vec<ScoreResult>) -> AttemptReport {
        let correct = results.iter().filter(|r| r.is_correct).count();
        let total = results.len();
        let points = results.iter().map(|r| r.points).sum();
        let max_points = results.iter().map(|r| r.max_points).sum();
        AttemptReport {
            id: Uuid::nil(),
            created_at: Utc::now(),
            test: TestSummary {
                id: "test".into(),
                name: "Test".into(),
                skill: Skill::Reading,
                question_count: total,
            },
            policy: AggregatePolicy::PerQuestion,
            results,
            summary: AttemptSummary {
                total_questions: total,
                answered: total,
                correct,
                points,
                max_points,
                policy: AggregatePolicy::PerQuestion,
                percentage: crate::statistics::percentage(correct as u32, total as u32),
                band: None,
                per_type: BTreeMap::<String, TypeStats>::new(),
            },
        }
    }

    #[test]
    fn compare_identical_attempts() {
        let baseline = make_report(vec![make_result("q1", 1, 1)]);
        let current = make_report(vec![make_result("q1", 1, 1)]);

        let progress = current.compare(&baseline);
        assert!(progress.improvements.is_empty());
        assert!(progress.regressions.is_empty());
        assert_eq!(progress.unchanged, 1);
        assert!(!progress.has_regressions());
    }

    #[test]
    fn compare_detects_regression() {
        let baseline = make_report(vec![make_result("q1", 2, 2)]);
        let current = make_report(vec![make_result("q1", 1, 2)]);

        let progress = current.compare(&baseline);
        assert_eq!(progress.regressions.len(), 1);
        assert_eq!(progress.regressions[0].question_id, "q1");
        assert!(progress.has_regressions());
    }

    #[test]
    fn compare_detects_improvement_and_churn() {
        let baseline = make_report(vec![
            make_result("q1", 0, 1),
            make_result("old", 1, 1),
        ]);
        let current = make_report(vec![
            make_result("q1", 1, 1),
            make_result("new", 0, 1),
        ]);

        let progress = current.compare(&baseline);
        assert_eq!(progress.improvements.len(), 1);
        assert_eq!(progress.new_questions, 1);
        assert_eq!(progress.removed_questions, 1);
    }

    #[test]
    fn json_roundtrip() {
        let report = make_report(vec![make_result("q1", 1, 1)]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("attempt.json");

        report.save_json(&path).unwrap();
        let loaded = AttemptReport::load_json(&path).unwrap();

        assert_eq!(loaded.test.id, "test");
        assert_eq!(loaded.results.len(), 1);
    }

    #[test]
    fn markdown_output() {
        let baseline = make_report(vec![make_result("q1", 2, 2)]);
        let current = make_report(vec![make_result("q1", 0, 2)]);

        let progress = current.compare(&baseline);
        let md = progress.to_markdown();
        assert!(md.contains("Regressions"));
        assert!(md.contains("q1"));
    }
}
