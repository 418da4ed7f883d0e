//! CSV export of per-question results.

use std::path::Path;

use anyhow::Result;

use bandmark_core::answer::AnswerValue;
use bandmark_core::report::AttemptReport;

/// Quote a CSV field, doubling embedded quotes.
fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn format_answer(value: Option<&AnswerValue>) -> String {
    match value {
        None => String::new(),
        Some(v) => serde_json::to_string(v).unwrap_or_default(),
    }
}

/// Render the per-question results as CSV, header row included.
pub fn results_csv(report: &AttemptReport) -> String {
    let mut csv = String::from("question_id,correct,points,max_points,user_answer,correct_answer\n");
    for r in &report.results {
        csv.push_str(&format!(
            "{},{},{},{},{},{}\n",
            csv_field(&r.question_id),
            r.is_correct,
            r.points,
            r.max_points,
            csv_field(&format_answer(r.user_answer.as_ref())),
            csv_field(&format_answer(r.correct_answer.as_ref())),
        ));
    }
    csv
}

/// Write the per-question results CSV to a file.
pub fn write_csv_report(report: &AttemptReport, path: &Path) -> Result<()> {
    let csv = results_csv(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, csv)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bandmark_core::model::Skill;
    use bandmark_core::report::TestSummary;
    use bandmark_core::results::ScoreResult;
    use bandmark_core::statistics::{AggregatePolicy, AttemptSummary};
    use chrono::Utc;
    use std::collections::BTreeMap;
    use uuid::Uuid;

    fn report_with(results: Vec<ScoreResult>) -> AttemptReport {
        AttemptReport {
            id: Uuid::nil(),
            created_at: Utc::now(),
            test: TestSummary {
                id: "t".into(),
                name: "T".into(),
                skill: Skill::Reading,
                question_count: results.len(),
            },
            policy: AggregatePolicy::PerQuestion,
            results,
            summary: AttemptSummary {
                total_questions: 0,
                answered: 0,
                correct: 0,
                points: 0,
                max_points: 0,
                policy: AggregatePolicy::PerQuestion,
                percentage: 0,
                band: None,
                per_type: BTreeMap::new(),
            },
        }
    }

    #[test]
    fn csv_has_header_and_one_row_per_result() {
        let report = report_with(vec![ScoreResult {
            question_id: "q1".into(),
            is_correct: true,
            user_answer: Some(AnswerValue::Text("Paris".into())),
            correct_answer: Some(AnswerValue::Text("Paris".into())),
            points: 1,
            max_points: 1,
        }]);
        let csv = results_csv(&report);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("question_id,"));
        assert!(lines[1].starts_with("q1,true,1,1"));
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        let report = report_with(vec![ScoreResult {
            question_id: "q,1".into(),
            is_correct: false,
            user_answer: Some(AnswerValue::TextList(vec!["a".into(), "b".into()])),
            correct_answer: None,
            points: 0,
            max_points: 2,
        }]);
        let csv = results_csv(&report);
        assert!(csv.contains("\"q,1\""));
        // JSON-encoded list contains commas and quotes, so it must be quoted.
        assert!(csv.contains("\"[\"\"a\"\",\"\"b\"\"]\""));
    }

    #[test]
    fn writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        write_csv_report(&report_with(vec![]), &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("question_id,"));
    }
}
