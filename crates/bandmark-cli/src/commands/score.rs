//! The `bandmark score` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use uuid::Uuid;

use bandmark_client::config::{create_api, load_config_from};
use bandmark_core::answer::UserAnswer;
use bandmark_core::report::{AttemptReport, TestSummary};
use bandmark_core::scoring::score_test;
use bandmark_core::statistics::{summarize, AggregatePolicy};
use bandmark_core::traits::{ExamApi, ScoreSubmission};
use bandmark_report::{write_csv_report, write_html_report};

pub async fn execute(
    test_path: PathBuf,
    answers_path: PathBuf,
    partial_credit: bool,
    output: Option<PathBuf>,
    format: String,
    submit: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let policy = if partial_credit {
        AggregatePolicy::PartialCredit
    } else {
        config.default_policy
    };

    let sets = super::load_sets(&test_path)?;
    anyhow::ensure!(!sets.is_empty(), "no test sets found in {}", test_path.display());

    let answers_content = std::fs::read_to_string(&answers_path)
        .with_context(|| format!("failed to read answers: {}", answers_path.display()))?;
    let answers: Vec<UserAnswer> = serde_json::from_str(&answers_content)
        .with_context(|| format!("failed to parse answers: {}", answers_path.display()))?;

    let output = output.unwrap_or_else(|| config.output_dir.clone());

    for set in &sets {
        let results = score_test(&set.questions, &answers);
        let summary = summarize(&set.questions, &results, policy);

        let report = AttemptReport {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            test: TestSummary {
                id: set.id.clone(),
                name: set.name.clone(),
                skill: set.skill,
                question_count: set.questions.len(),
            },
            policy,
            results,
            summary,
        };

        print_summary(&report);

        // Save outputs
        std::fs::create_dir_all(&output)?;
        let timestamp = report.created_at.format("%Y-%m-%dT%H%M%S");

        let formats: Vec<&str> = if format == "all" {
            vec!["json", "html", "csv"]
        } else {
            format.split(',').map(|s| s.trim()).collect()
        };

        for fmt in &formats {
            match *fmt {
                "json" => {
                    let path = output.join(format!("attempt-{}-{timestamp}.json", set.id));
                    report.save_json(&path)?;
                    eprintln!("Results saved to: {}", path.display());
                }
                "html" => {
                    let path = output.join(format!("attempt-{}-{timestamp}.html", set.id));
                    write_html_report(&report, &path)?;
                    eprintln!("HTML report: {}", path.display());
                }
                "csv" => {
                    let path = output.join(format!("attempt-{}-{timestamp}.csv", set.id));
                    write_csv_report(&report, &path)?;
                    eprintln!("CSV report: {}", path.display());
                }
                _ => {
                    eprintln!("Unknown format: {fmt}");
                }
            }
        }

        // Best-effort: a failed submission must never cost the candidate
        // their local result.
        if submit {
            let api = create_api(&config)?;
            let submission = ScoreSubmission {
                test_id: set.id.clone(),
                attempt_id: report.id,
                percentage: report.summary.percentage,
                points: report.summary.points,
                max_points: report.summary.max_points,
                completed_at: report.created_at,
            };
            match api.submit_score(&submission).await {
                Ok(()) => eprintln!("Score submitted to {}", api.name()),
                Err(e) => {
                    tracing::warn!("score submission failed, keeping local result: {e:#}");
                }
            }
        }
    }

    Ok(())
}

fn print_summary(report: &AttemptReport) {
    use comfy_table::{Cell, Table};

    let summary = &report.summary;

    let mut table = Table::new();
    table.set_header(vec!["Test", "Score", "Correct", "Answered", "Points", "Band"]);
    table.add_row(vec![
        Cell::new(&report.test.name),
        Cell::new(format!("{}%", summary.percentage)),
        Cell::new(format!("{}/{}", summary.correct, summary.total_questions)),
        Cell::new(format!("{}/{}", summary.answered, summary.total_questions)),
        Cell::new(format!("{}/{}", summary.points, summary.max_points)),
        Cell::new(
            summary
                .band
                .map(|b| format!("{b:.1}"))
                .unwrap_or_else(|| "-".to_string()),
        ),
    ]);

    eprintln!("\n{table}");

    for result in report.results.iter().filter(|r| !r.is_correct) {
        let verdict = if result.user_answer.is_none() {
            "skipped"
        } else {
            "incorrect"
        };
        eprintln!(
            "  {}: {verdict} ({}/{})",
            result.question_id, result.points, result.max_points
        );
    }
}
