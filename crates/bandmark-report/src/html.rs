//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS inlined.

use std::path::Path;

use anyhow::Result;

use bandmark_core::answer::AnswerValue;
use bandmark_core::report::AttemptReport;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Render an answer value for display.
fn format_answer(value: Option<&AnswerValue>) -> String {
    match value {
        None => "—".to_string(),
        Some(v) => serde_json::to_string(v).unwrap_or_default(),
    }
}

/// Generate an HTML page from an attempt report.
pub fn generate_html(report: &AttemptReport) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>bandmark attempt — {}</title>\n",
        html_escape(&report.test.name)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>bandmark attempt</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Test: <strong>{}</strong> | {} | {} questions | {}</p>\n",
        html_escape(&report.test.name),
        report.test.skill,
        report.test.question_count,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Summary dashboard
    let summary = &report.summary;
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str(
        "<thead><tr><th>Score</th><th>Correct</th><th>Answered</th><th>Points</th><th>Band</th></tr></thead>\n",
    );
    html.push_str(&format!(
        "<tbody><tr><td>{}%</td><td>{}/{}</td><td>{}/{}</td><td>{}/{}</td><td>{}</td></tr></tbody>\n",
        summary.percentage,
        summary.correct,
        summary.total_questions,
        summary.answered,
        summary.total_questions,
        summary.points,
        summary.max_points,
        summary
            .band
            .map(|b| format!("{b:.1}"))
            .unwrap_or_else(|| "—".to_string()),
    ));
    html.push_str("</table>\n");

    // Per-type breakdown
    if !summary.per_type.is_empty() {
        html.push_str("<table class=\"summary\">\n");
        html.push_str(
            "<thead><tr><th>Question type</th><th>Correct</th><th>Points</th></tr></thead>\n<tbody>\n",
        );
        for (type_name, stats) in &summary.per_type {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}/{}</td><td>{}/{}</td></tr>\n",
                html_escape(type_name),
                stats.correct,
                stats.questions,
                stats.points,
                stats.max_points,
            ));
        }
        html.push_str("</tbody></table>\n");
    }
    html.push_str("</section>\n");

    // Per-question results
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Questions</h2>\n");
    html.push_str("<table class=\"results-table\">\n");
    html.push_str(
        "<thead><tr><th>Question</th><th>Result</th><th>Points</th><th>Your answer</th><th>Correct answer</th></tr></thead>\n<tbody>\n",
    );

    for r in &report.results {
        let row_class = if r.is_correct { "pass" } else { "fail" };
        let verdict = if r.is_correct {
            "correct"
        } else if r.user_answer.is_none() {
            "skipped"
        } else {
            "incorrect"
        };
        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td class=\"{}\">{}</td><td>{}/{}</td><td>{}</td><td>{}</td></tr>\n",
            row_class,
            html_escape(&r.question_id),
            row_class,
            verdict,
            r.points,
            r.max_points,
            html_escape(&format_answer(r.user_answer.as_ref())),
            html_escape(&format_answer(r.correct_answer.as_ref())),
        ));
    }

    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(report)
            .unwrap_or_default()
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>\n");
    html
}

/// Generate and write an HTML report to a file.
pub fn write_html_report(report: &AttemptReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

const CSS: &str = r#"
body { font-family: -apple-system, system-ui, sans-serif; margin: 2rem auto; max-width: 60rem; color: #1a1a2e; }
header h1 { margin-bottom: 0.25rem; }
.meta { color: #666; margin-top: 0; }
h2 { border-bottom: 2px solid #eee; padding-bottom: 0.25rem; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { text-align: left; padding: 0.4rem 0.6rem; border-bottom: 1px solid #eee; }
thead th { background: #f7f7fb; }
tr.pass td.pass { color: #1a7f37; font-weight: 600; }
tr.fail td.fail { color: #b42318; font-weight: 600; }
.raw-data pre { background: #f7f7fb; padding: 1rem; overflow-x: auto; font-size: 0.85rem; }
"#;
