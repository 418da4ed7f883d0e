//! The `bandmark compare` command.

use std::path::PathBuf;

use anyhow::Result;

use bandmark_core::report::AttemptReport;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    fail_on_regression: bool,
    format: String,
) -> Result<()> {
    let baseline = AttemptReport::load_json(&baseline_path)?;
    let current = AttemptReport::load_json(&current_path)?;

    let progress = current.compare(&baseline);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", progress.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&progress)?);
        }
        _ => {
            // text format
            println!(
                "Comparison: {}% -> {}%, {} improved, {} regressed, {} unchanged",
                progress.baseline_percentage,
                progress.current_percentage,
                progress.improvements.len(),
                progress.regressions.len(),
                progress.unchanged
            );

            if !progress.regressions.is_empty() {
                println!("\nRegressions:");
                for d in &progress.regressions {
                    println!(
                        "  {} {} -> {} (of {})",
                        d.question_id, d.baseline_points, d.current_points, d.max_points
                    );
                }
            }

            if !progress.improvements.is_empty() {
                println!("\nImprovements:");
                for d in &progress.improvements {
                    println!(
                        "  {} {} -> {} (of {})",
                        d.question_id, d.baseline_points, d.current_points, d.max_points
                    );
                }
            }
        }
    }

    if fail_on_regression && progress.has_regressions() {
        std::process::exit(1);
    }

    Ok(())
}
